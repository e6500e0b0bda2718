//! Property schema tree supplied by the schema shim
//!
//! A resource or data source is described by its input and output property
//! lists. Object-typed properties carry their own property lists, which is
//! where nested named types come from.

use crate::docs::DocKind;
use serde::{Deserialize, Serialize};

/// Kind of a property type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    String,
    List,
    Set,
    Map,
    Object,
}

impl PropertyKind {
    pub fn is_collection(&self) -> bool {
        matches!(self, PropertyKind::List | PropertyKind::Set | PropertyKind::Map)
    }
}

/// The type of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub kind: PropertyKind,

    /// Element type of a list, set or map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<PropertyType>>,

    /// Fields of an object
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

impl PropertyType {
    pub fn scalar(kind: PropertyKind) -> Self {
        Self {
            kind,
            element: None,
            properties: vec![],
        }
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Self {
            kind: PropertyKind::Object,
            element: None,
            properties,
        }
    }

    pub fn collection(kind: PropertyKind, element: PropertyType) -> Self {
        Self {
            kind,
            element: Some(Box::new(element)),
            properties: vec![],
        }
    }

    /// Structural equality: kinds, element types, and property names,
    /// optionality and types. Descriptions do not participate.
    pub fn same_shape(&self, other: &PropertyType) -> bool {
        if self.kind != other.kind || self.properties.len() != other.properties.len() {
            return false;
        }
        let elements_match = match (&self.element, &other.element) {
            (Some(a), Some(b)) => a.same_shape(b),
            (None, None) => true,
            _ => false,
        };
        elements_match
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|(a, b)| {
                    a.name == b.name && a.optional == b.optional && a.typ.same_shape(&b.typ)
                })
    }
}

/// One named property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,

    #[serde(rename = "type")]
    pub typ: PropertyType,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub computed: bool,

    #[serde(default)]
    pub sensitive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, typ: PropertyType) -> Self {
        Self {
            name: name.into(),
            typ,
            optional: false,
            computed: false,
            sensitive: false,
            description: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Schema of one resource or data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    /// Terraform name, e.g. `aws_quicksight_template`
    pub tf_name: String,

    /// Destination type name used as the root of nested type names,
    /// e.g. `Template`
    pub type_name: String,

    pub kind: DocKind,

    /// Resource inputs or data source arguments
    #[serde(default)]
    pub inputs: Vec<Property>,

    /// Resource outputs or data source results
    #[serde(default)]
    pub outputs: Vec<Property>,

    /// Resource state inputs, used for lookups of existing resources
    #[serde(default)]
    pub state: Vec<Property>,
}
