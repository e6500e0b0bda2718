//! Target languages for generated SDKs and converted examples

use crate::GeneratorError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The language a generation run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorLanguage {
    NodeJS,
    Python,
    CSharp,
    Golang,
    Pcl,
    /// The language-neutral package schema, which embeds examples for
    /// every target language
    Schema,
}

impl GeneratorLanguage {
    /// Languages examples must be converted to for this generator
    pub fn target_languages(&self) -> Vec<TargetLanguage> {
        match self {
            GeneratorLanguage::NodeJS => vec![TargetLanguage::TypeScript],
            GeneratorLanguage::Python => vec![TargetLanguage::Python],
            GeneratorLanguage::CSharp => vec![TargetLanguage::CSharp],
            GeneratorLanguage::Golang => vec![TargetLanguage::Go],
            GeneratorLanguage::Pcl => vec![TargetLanguage::Pcl],
            GeneratorLanguage::Schema => vec![
                TargetLanguage::TypeScript,
                TargetLanguage::Python,
                TargetLanguage::CSharp,
                TargetLanguage::Go,
                TargetLanguage::Yaml,
                TargetLanguage::Java,
            ],
        }
    }
}

/// A language an example can be converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    TypeScript,
    Python,
    CSharp,
    Go,
    Yaml,
    Java,
    Pcl,
}

impl TargetLanguage {
    /// Code fence hint used for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "typescript",
            TargetLanguage::Python => "python",
            TargetLanguage::CSharp => "csharp",
            TargetLanguage::Go => "go",
            TargetLanguage::Yaml => "yaml",
            TargetLanguage::Java => "java",
            TargetLanguage::Pcl => "pcl",
        }
    }

    /// Position among the languages shown first in docs
    fn preferred_rank(&self) -> Option<usize> {
        match self {
            TargetLanguage::TypeScript => Some(0),
            TargetLanguage::Python => Some(1),
            TargetLanguage::CSharp => Some(2),
            TargetLanguage::Go => Some(3),
            _ => None,
        }
    }

    /// Deterministic docs order: TypeScript, Python, C#, Go, then the rest
    /// alphabetically
    pub fn docs_order(&self, other: &TargetLanguage) -> Ordering {
        match (self.preferred_rank(), other.preferred_rank()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.as_str().cmp(other.as_str()),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typescript" | "nodejs" => Ok(TargetLanguage::TypeScript),
            "python" => Ok(TargetLanguage::Python),
            "csharp" | "dotnet" => Ok(TargetLanguage::CSharp),
            "go" => Ok(TargetLanguage::Go),
            "yaml" => Ok(TargetLanguage::Yaml),
            "java" => Ok(TargetLanguage::Java),
            "pcl" => Ok(TargetLanguage::Pcl),
            other => Err(GeneratorError::Config(format!(
                "unrecognized target language '{}'",
                other
            ))),
        }
    }
}
