//! Common types and utilities for tfgen
//!
//! This crate contains the data structures shared by the documentation
//! parser, the nested type generator, the example converter and the CLI:
//! documentation records, the property schema tree, provider mapping
//! configuration and run statistics.

pub mod docs;
pub mod language;
pub mod naming;
pub mod provider_info;
pub mod schema;
pub mod stats;

pub use docs::{ArgumentDoc, DocKind, EntityDoc};
pub use language::{GeneratorLanguage, TargetLanguage};
pub use provider_info::{DataSourceInfo, DocInfo, FieldInfo, ProviderInfo, ResourceInfo};
pub use schema::{EntitySchema, Property, PropertyKind, PropertyType};
pub use stats::Stats;

use thiserror::Error;

/// Errors that can occur while translating provider documentation and schemas
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A type name is already bound to a different shape declared by a
    /// different entity, even at the most qualified name available.
    #[error("duplicate type {name}: already declared by {existing} with a different shape")]
    DuplicateType { name: String, existing: String },

    /// A field the schema marks as required was excluded by an `omit` rule.
    #[error("required field '{field}' of '{resource}' cannot be omitted")]
    RequiredFieldOmitted { resource: String, field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
