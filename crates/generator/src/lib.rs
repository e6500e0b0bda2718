//! Nested type naming for Terraform provider schemas
//!
//! This crate walks resource and data source schemas, builds a
//! [`NestedTypeGraph`] of candidate names for every nested object type, and
//! resolves each type to a short, collision-free name in a
//! [`SchemaNestedTypes`] registry. Structurally identical types are merged
//! under one name.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let generator = NestedTypeGenerator::new()?;
//! let types = generator.gather(&provider, &schemas)?;
//! generator.write_to_directory(&provider.name, &types, Path::new("out"))?;
//! ```

mod gather;
mod graph;
mod nested_types;
mod templates;

pub use graph::{NestedTypeGraph, NestedTypeNode};
pub use nested_types::{SchemaNestedType, SchemaNestedTypes, Side, TypePath, MAX_TYPE_NAME_LEN};

use std::fs;
use std::path::Path;
use tera::Tera;
use tfgen_common::{EntitySchema, GeneratorError, ProviderInfo, Result, Stats};
use tracing::info;

/// Resolves nested type names and renders the results
pub struct NestedTypeGenerator {
    tera: Tera,
}

impl NestedTypeGenerator {
    pub fn new() -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera })
    }

    /// Resolve the nested types of `schemas`, in order
    pub fn gather(
        &self,
        provider: &ProviderInfo,
        schemas: &[EntitySchema],
    ) -> Result<SchemaNestedTypes> {
        let types = SchemaNestedTypes::gather(provider, schemas)?;
        info!(
            provider = %provider.name,
            entities = schemas.len(),
            types = types.len(),
            "resolved nested types"
        );
        Ok(types)
    }

    /// Render a markdown report listing each type and where it is used
    pub fn render_report(&self, provider: &str, types: &SchemaNestedTypes) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("provider", provider);
        context.insert("types", types);
        self.tera
            .render("nested_types.md", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {:?}", e)))
    }

    /// Render the end-of-run summary, with the number of nested types
    /// when known
    pub fn render_summary(
        &self,
        stats: &Stats,
        types: Option<&SchemaNestedTypes>,
    ) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("stats", stats);
        if let Some(types) = types {
            context.insert("types", &types.len());
        }
        self.tera
            .render("summary.txt", &context)
            .map_err(|e| GeneratorError::Generation(format!("Template error: {}", e)))
    }

    /// Write `nested_types.json` and `nested_types.md` to `output_dir`
    pub fn write_to_directory(
        &self,
        provider: &str,
        types: &SchemaNestedTypes,
        output_dir: &Path,
    ) -> Result<()> {
        fs::create_dir_all(output_dir).map_err(|e| {
            GeneratorError::Generation(format!("Failed to create output directory: {}", e))
        })?;

        let json = serde_json::to_string_pretty(types)?;
        fs::write(output_dir.join("nested_types.json"), json).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write nested_types.json: {}", e))
        })?;

        let report = self.render_report(provider, types)?;
        fs::write(output_dir.join("nested_types.md"), report).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write nested_types.md: {}", e))
        })?;

        Ok(())
    }
}

/// Resolve nested types and write them to a directory (convenience function)
pub fn generate_nested_types(
    provider: &ProviderInfo,
    schemas: &[EntitySchema],
    output_path: &str,
) -> Result<SchemaNestedTypes> {
    let generator = NestedTypeGenerator::new()?;
    let types = generator.gather(provider, schemas)?;
    generator.write_to_directory(&provider.name, &types, Path::new(output_path))?;
    Ok(types)
}
