//! Template loading and management

use std::collections::HashMap;
use tera::{Tera, Value};
use tfgen_common::{GeneratorError, Result};

/// Load the report templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("type_label", type_label_filter);

    tera.add_raw_template(
        "nested_types.md",
        include_str!("../templates/nested_types.md.tera"),
    )
    .map_err(|e| {
        GeneratorError::Generation(format!("Failed to load nested_types.md template: {}", e))
    })?;

    tera.add_raw_template("summary.txt", include_str!("../templates/summary.txt.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load summary.txt template: {}", e))
        })?;

    Ok(tera)
}

/// Filter rendering a serialized `PropertyType` as a short label such as
/// `list<object>` or `map<string>`
fn type_label_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(type_label(value)?))
}

fn type_label(value: &Value) -> tera::Result<String> {
    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("type_label filter expects a property type"))?;

    match value.get("element") {
        Some(element) => Ok(format!("{}<{}>", kind, type_label(element)?)),
        None => Ok(kind.to_string()),
    }
}
