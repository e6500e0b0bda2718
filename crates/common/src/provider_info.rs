//! Provider mapping configuration loaded from YAML or JSON files
//!
//! The mapping tells the generator which destination token each Terraform
//! resource and data source maps to, and carries per-entity documentation
//! and field overrides.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root structure of a provider mapping file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderInfo {
    /// Provider identifier (e.g., "aws", "google")
    pub name: String,
    /// Prefix of Terraform entity names when it differs from `name`
    /// (e.g., "azurerm" for the "azure" provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_prefix: Option<String>,
    /// GitHub organisation hosting the upstream Terraform provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_org: Option<String>,
    /// Git host of the upstream provider
    #[serde(default = "default_git_host")]
    pub git_host: String,
    /// Terraform resource name to mapping
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceInfo>,
    /// Terraform data source name to mapping
    #[serde(default)]
    pub data_sources: BTreeMap<String, DataSourceInfo>,
}

fn default_git_host() -> String {
    "github.com".to_string()
}

/// Mapping for a single resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResourceInfo {
    /// Destination token, e.g. `aws:s3/bucket:Bucket`
    pub tok: String,
    /// Documentation overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocInfo>,
    /// Per-field overrides keyed by Terraform field name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldInfo>,
}

/// Data sources carry the same mapping shape as resources
pub type DataSourceInfo = ResourceInfo;

/// Documentation overrides for an entity
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DocInfo {
    /// Markdown text to use instead of the upstream document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Extra file name to try when locating the upstream document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Replacement body for the import section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_details: Option<String>,
    /// Copy attributes from another entity's docs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_attributes_from: Option<String>,
    /// Copy another entity's arguments in as attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_attributes_from_arguments: Option<String>,
    /// Copy arguments from another entity's docs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_arguments_from: Option<String>,
}

/// Overrides for a single field
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldInfo {
    /// Destination property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exclude the field from generation
    #[serde(default)]
    pub omit: bool,
    /// Explicit name for the nested object type of this field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_type_name: Option<String>,
    /// Overrides for the element of a collection field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem: Option<Box<FieldInfo>>,
    /// Overrides for the fields of an object field
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldInfo>,
}

impl FieldInfo {
    /// Overrides that apply to the fields of this field's object type,
    /// looking through a collection element if present
    pub fn object_fields(&self) -> Option<&BTreeMap<String, FieldInfo>> {
        if !self.fields.is_empty() {
            return Some(&self.fields);
        }
        self.elem.as_deref().map(|elem| &elem.fields)
    }
}

impl ProviderInfo {
    /// Load a mapping file, choosing the format by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read provider mapping {:?}: {}", path, e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                GeneratorError::Config(format!(
                    "Failed to parse provider mapping JSON from {:?}: {}",
                    path, e
                ))
            }),
            _ => serde_yaml::from_str(&content).map_err(|e| {
                GeneratorError::Config(format!(
                    "Failed to parse provider mapping YAML from {:?}: {}",
                    path, e
                ))
            }),
        }
    }

    /// Prefix used by Terraform entity names
    pub fn resource_prefix(&self) -> &str {
        self.resource_prefix.as_deref().unwrap_or(&self.name)
    }

    /// Organisation hosting the upstream provider, defaulting to the
    /// `terraform-providers` convention of naming the org after the provider
    pub fn github_org(&self) -> &str {
        self.github_org.as_deref().unwrap_or("terraform-providers")
    }

    pub fn entity(&self, kind: crate::DocKind, tf_name: &str) -> Option<&ResourceInfo> {
        match kind {
            crate::DocKind::Resources => self.resources.get(tf_name),
            crate::DocKind::DataSources => self.data_sources.get(tf_name),
        }
    }
}

/// Strip the provider prefix from a Terraform entity name
///
/// ```
/// use tfgen_common::provider_info::without_package_name;
///
/// assert_eq!(without_package_name("aws", "aws_s3_bucket"), "s3_bucket");
/// assert_eq!(without_package_name("aws", "google_bucket"), "google_bucket");
/// ```
pub fn without_package_name(prefix: &str, name: &str) -> String {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(name)
        .to_string()
}

/// The parts of a destination token `pkg:module/member:Name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeToken<'a> {
    pub package: &'a str,
    pub module: &'a str,
    pub name: &'a str,
}

impl<'a> TypeToken<'a> {
    pub fn parse(tok: &'a str) -> Option<Self> {
        let mut parts = tok.splitn(3, ':');
        let package = parts.next()?;
        let module_member = parts.next()?;
        let name = parts.next()?;
        let module = module_member.split('/').next().unwrap_or(module_member);
        Some(Self {
            package,
            module,
            name,
        })
    }

    /// Module name as it appears in SDK references; the `index` module is
    /// the package root and has no name
    pub fn module_name(&self) -> &'a str {
        if self.module == "index" {
            ""
        } else {
            self.module
        }
    }
}
