//! Documentation records extracted from Terraform provider markdown

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which kind of entity a markdown document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocKind {
    Resources,
    DataSources,
}

impl DocKind {
    /// Directory name used by the current docs layout (`docs/<dir>`)
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocKind::Resources => "resources",
            DocKind::DataSources => "data-sources",
        }
    }

    /// Directory name used by the legacy layout (`website/docs/<dir>`)
    pub fn legacy_dir_name(&self) -> &'static str {
        match self {
            DocKind::Resources => "r",
            DocKind::DataSources => "d",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKind::Resources => write!(f, "resource"),
            DocKind::DataSources => write!(f, "data source"),
        }
    }
}

/// Documentation for one argument of a resource or data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDoc {
    /// Free text; continuation lines are appended after a `\n`
    pub description: String,

    /// Nested field name to description, for object-typed arguments
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nested_arguments: BTreeMap<String, String>,

    /// True when this entry mirrors a bullet found inside another argument's
    /// nested block rather than a genuine top-level argument
    #[serde(default)]
    pub is_nested: bool,
}

impl ArgumentDoc {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

/// The complete documentation for one resource or data source.
///
/// For example, using two arguments from `s3_bucket.html.markdown`, `bucket`
/// and `website` are top-level arguments and `index_document` is a nested
/// argument of `website`. `index_document` is also recorded as a top-level
/// entry with `is_nested` set, because object names in provider docs are not
/// always consistent and consumers sometimes look nested fields up by their
/// bare name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDoc {
    /// Prose that is neither an argument nor an attribute
    pub description: String,

    /// Argument name to its documentation
    pub arguments: BTreeMap<String, ArgumentDoc>,

    /// Attribute name to description; attributes never nest
    pub attributes: BTreeMap<String, String>,

    /// Import command documentation, empty when none was found
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub import: String,
}

impl EntityDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an argument, creating an empty entry if missing.
    ///
    /// The returned flag is true when the entry was created by this call.
    pub fn get_or_create_argument(&mut self, name: &str) -> (&mut ArgumentDoc, bool) {
        let created = !self.arguments.contains_key(name);
        let arg = self.arguments.entry(name.to_string()).or_default();
        (arg, created)
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.arguments.is_empty()
            && self.attributes.is_empty()
            && self.import.is_empty()
    }

    /// Copy every attribute of `source` into this document
    pub fn overlay_attributes(&mut self, source: &EntityDoc) {
        for (name, desc) in &source.attributes {
            self.attributes.insert(name.clone(), desc.clone());
        }
    }

    /// Copy the arguments of `source`, and their nested arguments, into this
    /// document's attributes
    pub fn overlay_arguments_to_attributes(&mut self, source: &EntityDoc) {
        for (name, arg) in &source.arguments {
            self.attributes
                .insert(name.clone(), arg.description.clone());
            for (nested, desc) in &arg.nested_arguments {
                self.attributes.insert(nested.clone(), desc.clone());
            }
        }
    }

    /// Copy the arguments of `source` into this document, replacing
    /// descriptions and merging nested arguments
    pub fn overlay_arguments(&mut self, source: &EntityDoc) {
        for (name, arg) in &source.arguments {
            let (dest, _) = self.get_or_create_argument(name);
            dest.description = arg.description.clone();
            for (nested, desc) in &arg.nested_arguments {
                dest.nested_arguments.insert(nested.clone(), desc.clone());
            }
        }
    }
}
