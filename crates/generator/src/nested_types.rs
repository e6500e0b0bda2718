//! Registry of named nested object types and the naming resolver

use crate::graph::NestedTypeGraph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tfgen_common::naming::pascal_case;
use tfgen_common::{GeneratorError, PropertyType, Result};
use tracing::{debug, warn};

/// Names at or above this length are too unwieldy for generated code, so
/// the resolver looks for a shorter candidate instead
pub const MAX_TYPE_NAME_LEN: usize = 120;

/// Location of a nested type within an entity schema, such as
/// `aws_lb_listener.inputs.default_actions.$.forward`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TypePath(String);

impl TypePath {
    pub fn entity(tf_name: &str) -> Self {
        Self(tf_name.to_string())
    }

    /// Append one segment
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}.{}", self.0, segment))
    }

    /// The element of a list, set or map
    pub fn element(&self) -> Self {
        self.child("$")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of an entity a type was reached from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Input,
    Output,
}

/// One named object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNestedType {
    /// Shape last declared under this name
    #[serde(flatten)]
    pub typ: PropertyType,

    /// Terraform name of the entity that declared the type
    pub declarer: String,

    /// Non-optional properties of the last declared shape
    pub required: BTreeSet<String>,

    /// Required properties as seen from the input side, when the type is
    /// used as an input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_inputs: Option<BTreeSet<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_outputs: Option<BTreeSet<String>>,

    /// Every location that resolved to this name
    pub type_paths: BTreeSet<TypePath>,
}

impl SchemaNestedType {
    /// A type may share a name with another declaration from the same
    /// entity, or with any declaration of the same shape
    fn is_compatible(&self, declarer: &str, typ: &PropertyType) -> bool {
        self.declarer == declarer || self.typ.same_shape(typ)
    }
}

/// Name to type registry for one package.
///
/// Naming is order-dependent: the first declaration of a shape takes the
/// name it resolves to, and later incompatible declarations move to other
/// candidates. Callers must declare types in a fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaNestedTypes {
    pub name_to_type: BTreeMap<String, SchemaNestedType>,
}

impl SchemaNestedTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.name_to_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_type.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNestedType> {
        self.name_to_type.get(name)
    }

    /// True when `name` is free or bound to a compatible type
    fn is_available(&self, name: &str, declarer: &str, typ: &PropertyType) -> bool {
        self.name_to_type
            .get(name)
            .is_none_or(|existing| existing.is_compatible(declarer, typ))
    }

    /// Pick the shortest candidate for `property_name` that is free or
    /// compatible, falling back to the longest candidate
    pub fn shortest_name(
        &self,
        property_name: &str,
        graph: &NestedTypeGraph,
        declarer: &str,
        typ: &PropertyType,
    ) -> String {
        let Some(node) = graph.branch(property_name) else {
            return format!("{}{}", graph.root, pascal_case(property_name));
        };

        let mut candidates: Vec<&String> = node.paths.iter().collect();
        candidates.sort_by_key(|c| c.len());

        if let Some(found) = candidates
            .iter()
            .find(|c| self.is_available(c, declarer, typ))
        {
            return (*found).clone();
        }

        let longest = candidates
            .last()
            .map_or_else(|| node.longest_path_name.clone(), |c| (*c).clone());
        debug!(
            property = property_name,
            type_name = %longest,
            "no compatible candidate name, using the longest"
        );
        longest
    }

    /// Choose the name for the type of `property_name`.
    ///
    /// The fully qualified name is preferred while it stays below
    /// [`MAX_TYPE_NAME_LEN`]; otherwise the shortest usable candidate wins.
    pub fn name_for_type_node(
        &self,
        graph: &NestedTypeGraph,
        property_name: &str,
        declarer: &str,
        typ: &PropertyType,
    ) -> String {
        if let Some(node) = graph.branch(property_name) {
            let longest = &node.longest_path_name;
            if longest.len() < MAX_TYPE_NAME_LEN && self.is_available(longest, declarer, typ) {
                return longest.clone();
            }
        }
        self.shortest_name(property_name, graph, declarer, typ)
    }

    /// Branch `graph` for `property_name`, resolve a name for its type and
    /// record the declaration.
    ///
    /// Returns the extended graph, for walking the type's own properties,
    /// along with the chosen name.
    pub fn declare_type(
        &mut self,
        type_path: TypePath,
        declarer: &str,
        graph: &NestedTypeGraph,
        property_name: &str,
        typ: &PropertyType,
        side: Side,
    ) -> Result<(NestedTypeGraph, String)> {
        let graph = graph.create_branch(property_name);
        let name = self.name_for_type_node(&graph, property_name, declarer, typ);
        self.declare_named(&name, type_path, declarer, typ, side)?;
        Ok((graph, name))
    }

    /// Record a declaration under an already chosen name, merging it into
    /// an existing compatible entry
    pub fn declare_named(
        &mut self,
        name: &str,
        type_path: TypePath,
        declarer: &str,
        typ: &PropertyType,
        side: Side,
    ) -> Result<()> {
        let required: BTreeSet<String> = typ
            .properties
            .iter()
            .filter(|p| !p.optional)
            .map(|p| p.name.clone())
            .collect();

        if let Some(existing) = self.name_to_type.get_mut(name) {
            if !existing.is_compatible(declarer, typ) {
                warn!(
                    type_name = name,
                    existing = %existing.declarer,
                    declarer,
                    "incompatible type name reuse"
                );
                return Err(GeneratorError::DuplicateType {
                    name: name.to_string(),
                    existing: existing.declarer.clone(),
                });
            }

            debug!(type_name = name, path = %type_path, "merging into existing type");
            existing.type_paths.insert(type_path);
            match side {
                Side::Input => existing.required_inputs = Some(required.clone()),
                Side::Output => existing.required_outputs = Some(required.clone()),
            }
            existing.typ = typ.clone();
            existing.declarer = declarer.to_string();
            existing.required = required;
            return Ok(());
        }

        debug!(type_name = name, path = %type_path, "declaring type");
        let (required_inputs, required_outputs) = match side {
            Side::Input => (Some(required.clone()), None),
            Side::Output => (None, Some(required.clone())),
        };
        self.name_to_type.insert(
            name.to_string(),
            SchemaNestedType {
                typ: typ.clone(),
                declarer: declarer.to_string(),
                required,
                required_inputs,
                required_outputs,
                type_paths: BTreeSet::from([type_path]),
            },
        );
        Ok(())
    }
}
