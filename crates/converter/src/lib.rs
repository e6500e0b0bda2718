//! Conversion of Terraform HCL examples into target languages
//!
//! Examples are first translated to PCL in batches through
//! `pulumi convert`. When a batch fails, [`bulk_convert`] bisects it down to
//! a single failing example and leaves a reproduction directory behind. The
//! PCL is then rendered per target language and assembled into fenced code
//! blocks by [`ExampleTranslator`].

pub mod bulk;
pub mod examples;
pub mod pulumi;
mod templates;

pub use bulk::{bisect, bulk_convert, prepare_repro_dir, split_in_half, Bisection};
pub use examples::{hcl_conversions_to_string, ExampleTranslator};
pub use pulumi::{LanguageBackend, PulumiCli};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use tfgen_common::{ProviderInfo, TargetLanguage};
use thiserror::Error;

/// Example ID to HCL source
pub type Examples = BTreeMap<String, String>;

/// Errors raised while converting examples
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The external tool exited unsuccessfully
    #[error("pulumi {command} failed: {status}\nStdout:\n{stdout}\n\nStderr:\n{stderr}")]
    Tool {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("malformed converter output: {0}")]
    Output(String),

    /// An HCL snippet was converted that was never part of a batch
    #[error("unexpected HCL snippet in conversion: {0:?}")]
    UnexpectedSnippet(String),

    #[error("conversion errors: {0}")]
    Diagnostics(String),

    /// Bisection finished; `dir` holds a minimal reproduction
    #[error(
        "\n######\n  pulumi convert failed\n  minimal repro: {}\n  full error below\n######\n{source}",
        dir.display()
    )]
    MinimalRepro {
        dir: PathBuf,
        source: Box<ConvertError>,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// HCL diagnostic severity for errors
pub const SEVERITY_ERROR: u8 = 1;

static ERROR_DIAGNOSTICS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["(?i)not yet implemented", "(?i)lifecycle hook is not supported"]
        .iter()
        .map(|p| Regex::new(p).expect("diagnostic pattern is valid"))
        .collect()
});

/// One diagnostic reported by the converter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Diagnostic {
    pub severity: u8,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == SEVERITY_ERROR
    }

    /// Some warnings mean the generated program is unusable; treat them as
    /// errors
    pub fn normalize(mut self) -> Self {
        let text = format!("{}: {}", self.summary, self.detail);
        if ERROR_DIAGNOSTICS.iter().any(|re| re.is_match(&text)) {
            self.severity = SEVERITY_ERROR;
        }
        self
    }
}

/// Join the error diagnostics of `diagnostics`, if there are any
pub fn error_summary(diagnostics: &[Diagnostic]) -> Option<String> {
    let errors: Vec<String> = diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| format!("{}: {}", d.summary, d.detail))
        .collect();
    (!errors.is_empty()).then(|| errors.join("; "))
}

/// An example translated to PCL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedExample {
    #[serde(default)]
    pub pcl: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Diagnostic>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Diagnostic>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Converts a batch of HCL examples to PCL in one call
#[cfg_attr(test, mockall::automock)]
pub trait BatchConverter {
    fn convert_batch(
        &self,
        examples: &Examples,
        mappings: &[ProviderInfo],
    ) -> Result<BTreeMap<String, TranslatedExample>>;
}

/// Files generated for one program, keyed by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedProgram {
    pub files: BTreeMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Renders a PCL program in a target language
#[cfg_attr(test, mockall::automock)]
pub trait ProgramConverter {
    fn convert_program(&self, pcl: &str, language: TargetLanguage) -> Result<GeneratedProgram>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translated_example_accepts_null_diagnostics() {
        let json = r#"{"e0": {"pcl": "resource x \"y\" {}", "diagnostics": null},
                       "e1": {"pcl": "", "diagnostics": [{"Severity": 1, "Summary": "bad", "Detail": "worse"}]}}"#;
        let parsed: BTreeMap<String, TranslatedExample> = serde_json::from_str(json).unwrap();
        assert!(parsed["e0"].diagnostics.is_empty());
        assert!(parsed["e1"].diagnostics[0].is_error());
        assert_eq!(
            error_summary(&parsed["e1"].diagnostics).as_deref(),
            Some("bad: worse")
        );
    }

    #[test]
    fn test_normalize_upgrades_unsupported_features() {
        let warning = Diagnostic {
            severity: 2,
            summary: "Function not yet implemented".to_string(),
            detail: String::new(),
        };
        assert!(warning.normalize().is_error());

        let harmless = Diagnostic {
            severity: 2,
            summary: "unused variable".to_string(),
            detail: String::new(),
        };
        assert!(!harmless.clone().normalize().is_error());
        assert_eq!(error_summary(&[harmless]), None);
    }

    #[test]
    fn test_minimal_repro_message() {
        let err = ConvertError::MinimalRepro {
            dir: PathBuf::from("/tmp/convert-examples-repro123"),
            source: Box::new(ConvertError::Output("boom".to_string())),
        };
        let message = err.to_string();
        assert!(message.starts_with("\n######\n  pulumi convert failed\n"));
        assert!(message.contains("minimal repro: /tmp/convert-examples-repro123"));
        assert!(message.ends_with("malformed converter output: boom"));
    }
}
