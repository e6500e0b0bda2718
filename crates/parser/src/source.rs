//! Locating entity docs in an upstream provider checkout

use crate::markdown::{MarkdownParser, ParsedDoc};
use std::fs;
use std::path::{Path, PathBuf};
use tfgen_common::provider_info::without_package_name;
use tfgen_common::{DocKind, GeneratorError, GeneratorLanguage, ProviderInfo, ResourceInfo, Result};
use tracing::{debug, warn};

/// Environment variable that turns missing docs into an error
pub const MISSING_DOCS_ERROR_ENV: &str = "TFGEN_MISSING_DOCS_ERROR";

const MARKDOWN_EXTENSIONS: &[&str] = &[".html.markdown", ".markdown", ".html.md", ".md"];

/// Interpret an environment flag value the way shells usually do
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Docs of a provider checked out at `repo`
#[derive(Debug, Clone)]
pub struct DocSource<'a> {
    repo: PathBuf,
    provider: &'a ProviderInfo,
    language: GeneratorLanguage,
    missing_docs_error: bool,
}

impl<'a> DocSource<'a> {
    pub fn new(repo: impl Into<PathBuf>, provider: &'a ProviderInfo, language: GeneratorLanguage) -> Self {
        Self {
            repo: repo.into(),
            provider,
            language,
            missing_docs_error: false,
        }
    }

    /// Fail instead of warning when an entity has no docs
    pub fn missing_docs_error(mut self, enabled: bool) -> Self {
        self.missing_docs_error = enabled;
        self
    }

    /// Read the missing-docs policy from the environment
    pub fn with_env(self) -> Self {
        let enabled = std::env::var(MISSING_DOCS_ERROR_ENV)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);
        self.missing_docs_error(enabled)
    }

    /// Directory holding docs of `kind`. Checkouts with `docs/resources`
    /// use the current layout, older ones keep docs under `website/docs`.
    pub fn docs_dir(&self, kind: DocKind) -> PathBuf {
        let current = self.repo.join("docs");
        if current.join(DocKind::Resources.dir_name()).is_dir() {
            current.join(kind.dir_name())
        } else {
            self.repo
                .join("website")
                .join("docs")
                .join(kind.legacy_dir_name())
        }
    }

    /// File names that may hold the docs of `rawname`, in lookup order
    pub fn candidate_names(&self, rawname: &str, entity: Option<&ResourceInfo>) -> Vec<String> {
        let short = without_package_name(self.provider.resource_prefix(), rawname);
        let mut names: Vec<String> = MARKDOWN_EXTENSIONS
            .iter()
            .map(|ext| format!("{short}{ext}"))
            .chain(MARKDOWN_EXTENSIONS.iter().map(|ext| format!("{rawname}{ext}")))
            .collect();
        if let Some(source) = entity.and_then(|e| e.docs.as_ref()).and_then(|d| d.source.as_ref()) {
            names.push(source.clone());
        }
        names
    }

    /// Find the markdown of an entity, returning its text and file name
    pub fn find_markdown(
        &self,
        kind: DocKind,
        rawname: &str,
        entity: Option<&ResourceInfo>,
    ) -> Result<Option<(String, String)>> {
        if let Some(markdown) = entity
            .and_then(|e| e.docs.as_ref())
            .and_then(|d| d.markdown.as_ref())
        {
            return Ok(Some((markdown.clone(), String::new())));
        }

        let dir = self.docs_dir(kind);
        for name in self.candidate_names(rawname, entity) {
            let path = dir.join(&name);
            if !path.is_file() {
                continue;
            }
            let markdown = fs::read_to_string(&path).map_err(|e| {
                GeneratorError::Parse(format!("Failed to read docs {}: {}", path.display(), e))
            })?;
            debug!(entity = rawname, file = %path.display(), "found docs");
            return Ok(Some((markdown, name)));
        }
        Ok(None)
    }

    /// Parse the docs of an entity and apply its doc overlays
    pub fn docs_for(&self, kind: DocKind, rawname: &str) -> Result<ParsedDoc> {
        self.docs_for_entity(kind, rawname, self.provider.entity(kind, rawname))
    }

    fn docs_for_entity(
        &self,
        kind: DocKind,
        rawname: &str,
        entity: Option<&ResourceInfo>,
    ) -> Result<ParsedDoc> {
        let Some((markdown, file_name)) = self.find_markdown(kind, rawname, entity)? else {
            let message = format!(
                "could not find docs for {} {}; override the docs in the {} mapping",
                kind, rawname, kind
            );
            if self.missing_docs_error {
                return Err(GeneratorError::Parse(message));
            }
            warn!("{}", message);
            let mut parsed = ParsedDoc::default();
            parsed.stats.entities_missing_docs += 1;
            parsed.stats.warnings += 1;
            return Ok(parsed);
        };

        let mut parsed = MarkdownParser::new(self.provider, self.language, kind, rawname)
            .with_entity(entity)
            .with_file_name(file_name)
            .parse(&markdown);

        let Some(docs) = entity.and_then(|e| e.docs.as_ref()) else {
            return Ok(parsed);
        };

        // Overlay sources are parsed without their own mapping
        if let Some(from) = &docs.include_attributes_from {
            let source = self.docs_for_entity(kind, from, None)?;
            parsed.doc.overlay_attributes(&source.doc);
            parsed.stats.merge(&source.stats);
        }
        if let Some(from) = &docs.include_attributes_from_arguments {
            let source = self.docs_for_entity(kind, from, None)?;
            parsed.doc.overlay_arguments_to_attributes(&source.doc);
            parsed.stats.merge(&source.stats);
        }
        if let Some(from) = &docs.include_arguments_from {
            let source = self.docs_for_entity(kind, from, None)?;
            parsed.doc.overlay_arguments(&source.doc);
            parsed.stats.merge(&source.stats);
        }
        Ok(parsed)
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }
}
