//! Parser for the `## Schema` section emitted by tfplugindocs
//!
//! The generated layout is regular:
//!
//! ```text
//! ## Schema
//!
//! ### Required
//!
//! - `name` (String) The name.
//!
//! ### Optional
//!
//! - `rule` (Block List) A rule. (see [below for nested schema](#nestedblock--rule))
//!
//! <a id="nestedblock--rule"></a>
//! ### Nested Schema for `rule`
//!
//! Required:
//!
//! - `id` (String) Rule ID.
//! ```

use super::sections::is_blank;
use regex::Regex;
use std::sync::LazyLock;
use tfgen_common::{EntityDoc, Stats};
use tracing::warn;

static PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*]\s+(?:`([^`]+)`|\*\*([^*]+)\*\*)\s*(?:\(([^)]*)\))?\s*(.*)$")
        .expect("schema parameter pattern is valid")
});

static NESTED_SCHEMA_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{3,4}\s+Nested Schema for `([^`]+)`").expect("nested schema pattern is valid")
});

static NESTED_SCHEMA_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(see \[below for nested schema\]\([^)]*\)\)").expect("link pattern is valid")
});

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<a id="[^"]*"></a>$"#).expect("anchor pattern is valid"));

/// Which list a parameter appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    ReadOnly,
}

impl Requirement {
    fn from_heading(line: &str) -> Option<Self> {
        let text = line.trim().trim_start_matches('#').trim().trim_end_matches(':');
        match text {
            "Required" => Some(Requirement::Required),
            "Optional" => Some(Requirement::Optional),
            "Read-Only" | "Read-only" | "Read Only" => Some(Requirement::ReadOnly),
            _ => None,
        }
    }
}

/// One documented parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    /// Declared type, e.g. `String` or `Block List, Max: 1`
    pub type_decl: Option<String>,
    pub requirement: Requirement,
}

/// The parameters of one `### Nested Schema for` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedSchema {
    /// Dotted path, e.g. `rule.filter`
    pub path: String,
    pub parameters: Vec<Parameter>,
}

/// Everything parsed from a `## Schema` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopLevelSchema {
    pub parameters: Vec<Parameter>,
    pub nested: Vec<NestedSchema>,
}

impl TopLevelSchema {
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.nested.iter().all(|n| n.parameters.is_empty())
    }
}

/// Parse the lines of a `## Schema` section, header included or not
pub fn parse_schema_section<S: AsRef<str>>(lines: &[S]) -> TopLevelSchema {
    let mut schema = TopLevelSchema::default();
    let mut requirement: Option<Requirement> = None;
    let mut in_nested = false;
    let mut last_was_parameter = false;

    for line in lines.iter().map(AsRef::as_ref) {
        if let Some(caps) = NESTED_SCHEMA_HEADER.captures(line) {
            schema.nested.push(NestedSchema {
                path: caps[1].to_string(),
                parameters: Vec::new(),
            });
            in_nested = true;
            requirement = None;
            last_was_parameter = false;
            continue;
        }
        if let Some(req) = Requirement::from_heading(line) {
            requirement = Some(req);
            last_was_parameter = false;
            continue;
        }
        if is_blank(line) || ANCHOR.is_match(line.trim()) {
            last_was_parameter = false;
            continue;
        }

        let target = if in_nested {
            schema.nested.last_mut().map(|n| &mut n.parameters)
        } else {
            Some(&mut schema.parameters)
        };
        let Some(target) = target else { continue };

        match (PARAMETER.captures(line), requirement) {
            (Some(caps), Some(requirement)) => {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map_or("", |m| m.as_str());
                let description = caps.get(4).map_or("", |m| m.as_str());
                target.push(Parameter {
                    name: name.to_string(),
                    description: NESTED_SCHEMA_LINK.replace_all(description, "").trim().to_string(),
                    type_decl: caps.get(3).map(|m| m.as_str().to_string()),
                    requirement,
                });
                last_was_parameter = true;
            }
            _ if last_was_parameter => {
                if let Some(param) = target.last_mut() {
                    param.description.push('\n');
                    param.description.push_str(line.trim());
                }
            }
            _ => {}
        }
    }
    schema
}

/// Record a parsed schema in `doc`.
///
/// Top-level parameters become arguments; nested parameters are recorded
/// both under their block and under their dotted path.
pub fn apply_schema(schema: &TopLevelSchema, doc: &mut EntityDoc, stats: &mut Stats) {
    for param in &schema.parameters {
        set_argument(doc, stats, &param.name, &param.description, false);
    }

    for block in &schema.nested {
        for param in &block.parameters {
            let (parent, _) = doc.get_or_create_argument(&block.path);
            parent.is_nested = true;
            parent
                .nested_arguments
                .insert(param.name.clone(), param.description.clone());

            let full_path = format!("{}.{}", block.path, param.name);
            set_argument(doc, stats, &full_path, &param.description, true);
        }
    }
}

fn set_argument(doc: &mut EntityDoc, stats: &mut Stats, name: &str, description: &str, nested: bool) {
    let (arg, created) = doc.get_or_create_argument(name);
    if !created && !arg.description.is_empty() && arg.description != description {
        warn!(
            argument = name,
            "conflicting descriptions in schema section, keeping the last one"
        );
        stats.warnings += 1;
    }
    arg.description = description.to_string();
    arg.is_nested = nested;
}
