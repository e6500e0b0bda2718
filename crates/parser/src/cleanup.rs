//! Rewriting of extracted doc text for the destination SDKs
//!
//! Text outside fenced code blocks has its Terraform-specific markup
//! normalized: note markers, links relative to the Terraform registry and
//! references to resources or properties, which are renamed to the form
//! the target language uses. Text that still talks about Terraform itself
//! is elided, since it cannot be rewritten reliably.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tfgen_common::naming::{camel_case, snake_case};
use tfgen_common::provider_info::TypeToken;
use tfgen_common::{ArgumentDoc, EntityDoc, GeneratorLanguage, ProviderInfo, Stats};
use tracing::{debug, warn};

const TERRAFORM_HOST: &str = "https://www.terraform.io";

static CODE_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)```[^\n]*?$.*?```\s*$").expect("code block pattern is valid")
});

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("markdown link pattern is valid")
});

static PAGE_REFERENCE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[1-9]+\]: /docs/providers(?:/[a-z1-9_]+)+\.[a-z]+")
        .expect("page reference pattern is valid")
});

static FOOTER_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\[\d+\]):\s(.*)").expect("footer link pattern is valid"));

static LINK_WITH_FOOTER_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\[[a-zA-Z?.! ]+\])(\[[0-9]+\])").expect("footer reference pattern is valid")
});

static CODE_LIKE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<open>[\s"`\[])(?P<name>(?:[0-9a-z]+_)+[0-9a-z]+)(?P<close>[\s"`\]])|`(?P<word>[0-9a-z]+)`"#,
    )
    .expect("code-like word pattern is valid")
});

/// Collect `[1]: https://...` footer link definitions
pub fn footer_links(markdown: &str) -> BTreeMap<String, String> {
    FOOTER_LINK
        .captures_iter(markdown)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Everything text cleanup needs to know about the target
#[derive(Debug, Clone)]
pub struct CleanupContext<'a> {
    pub language: GeneratorLanguage,
    pub info: &'a ProviderInfo,
    pub footer_links: BTreeMap<String, String>,
}

impl<'a> CleanupContext<'a> {
    pub fn new(language: GeneratorLanguage, info: &'a ProviderInfo) -> Self {
        Self {
            language,
            info,
            footer_links: BTreeMap::new(),
        }
    }

    pub fn with_footer_links(mut self, links: BTreeMap<String, String>) -> Self {
        self.footer_links = links;
        self
    }

    /// Clean up `text`, leaving fenced code blocks alone.
    ///
    /// Returns `None` when the text had to be elided.
    pub fn reformat_text(&self, text: &str) -> Option<String> {
        let mut parts = Vec::new();
        let mut start = 0;
        for block in CODE_BLOCKS.find_iter(text) {
            parts.push(self.cleanup_prose(&text[start..block.start()])?);
            parts.push(block.as_str().to_string());
            start = block.end();
        }
        if start != text.len() {
            parts.push(self.cleanup_prose(&text[start..])?);
        }
        Some(parts.concat().trim().to_string())
    }

    fn cleanup_prose(&self, text: &str) -> Option<String> {
        if text.contains("Terraform") || text.contains("terraform") {
            return None;
        }

        let text = text.replace("-> ", "> ").replace("~> ", "> ");
        let text = text
            .strip_prefix("-\n(Required)\n")
            .or_else(|| text.strip_prefix("-\n(Optional)\n"))
            .unwrap_or(&text);

        let text = PAGE_REFERENCE_LINK.replace_all(text, |caps: &Captures| {
            let link = &caps[0];
            match link.split_once(' ') {
                Some((label, path)) => format!("{label} {TERRAFORM_HOST}{path}"),
                None => link.to_string(),
            }
        });
        let text = self.replace_footer_links(&text);
        let text = MARKDOWN_LINK.replace_all(&text, |caps: &Captures| {
            let (label, url) = (&caps[1], &caps[2]);
            if url.starts_with("http") {
                caps[0].to_string()
            } else if url.starts_with('/') {
                format!("[{label}]({TERRAFORM_HOST}{url})")
            } else {
                // Anchors and page-relative links cannot be resolved
                label.to_string()
            }
        });
        Some(self.fixup_property_references(&text))
    }

    fn replace_footer_links(&self, text: &str) -> String {
        if self.footer_links.is_empty() {
            return text.to_string();
        }
        LINK_WITH_FOOTER_REF
            .replace_all(text, |caps: &Captures| match self.footer_links.get(&caps[2]) {
                Some(url) => format!("{}({})", &caps[1], url),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Rename resource, data source and property references to the form
    /// used by the target language
    pub fn fixup_property_references(&self, text: &str) -> String {
        CODE_LIKE_WORD
            .replace_all(text, |caps: &Captures| {
                let (open, name, close) = match caps.name("name") {
                    Some(name) => (&caps["open"], name.as_str(), &caps["close"]),
                    None => ("`", &caps["word"], "`"),
                };
                match self.rename_reference(name) {
                    Some(renamed) => format!("{open}{renamed}{close}"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn rename_reference(&self, name: &str) -> Option<String> {
        let pkg = &self.info.name;
        if let Some(tok) = self
            .info
            .resources
            .get(name)
            .and_then(|r| TypeToken::parse(&r.tok))
        {
            let module = module_prefix(&tok);
            return Some(match self.language {
                GeneratorLanguage::Golang | GeneratorLanguage::Python => {
                    format!("{module}{}", tok.name)
                }
                _ => format!("{pkg}.{module}{}", tok.name),
            });
        }

        if let Some(tok) = self
            .info
            .data_sources
            .get(name)
            .and_then(|d| TypeToken::parse(&d.tok))
        {
            let module = module_prefix(&tok);
            return Some(match self.language {
                GeneratorLanguage::Golang => format!("{module}{}", tok.name),
                GeneratorLanguage::Python => snake_case(&format!("{module}{}", tok.name)),
                _ => format!("{pkg}.{module}{}", tok.name),
            });
        }

        match self.language {
            GeneratorLanguage::NodeJS | GeneratorLanguage::Golang => Some(camel_case(name)),
            _ => None,
        }
    }

    /// Clean every text field of `doc`.
    ///
    /// Elided argument and attribute descriptions become empty. An elided
    /// description keeps its examples when they can be separated from the
    /// prose. The returned flag reports whether anything was elided.
    pub fn cleanup_doc(&self, name: &str, doc: EntityDoc, stats: &mut Stats) -> (EntityDoc, bool) {
        let mut elided = false;
        let mut arguments = BTreeMap::new();

        for (arg_name, arg) in doc.arguments {
            let description = self.cleanup_field(&arg.description, || {
                stats.elided_arguments += 1;
                warn!(entity = name, argument = %arg_name, "argument description elided");
                stats.warnings += 1;
                elided = true;
            });
            let mut nested_arguments = BTreeMap::new();
            for (nested_name, text) in arg.nested_arguments {
                let cleaned = self.cleanup_field(&text, || {
                    stats.elided_arguments += 1;
                    warn!(entity = name, argument = %format!("{arg_name}.{nested_name}"), "argument description elided");
                    stats.warnings += 1;
                    elided = true;
                });
                nested_arguments.insert(nested_name, cleaned);
            }
            arguments.insert(
                arg_name,
                ArgumentDoc {
                    description,
                    nested_arguments,
                    is_nested: arg.is_nested,
                },
            );
        }

        let mut attributes = BTreeMap::new();
        for (attr_name, text) in doc.attributes {
            let cleaned = self.cleanup_field(&text, || {
                stats.elided_attributes += 1;
                warn!(entity = name, attribute = %attr_name, "attribute description elided");
                stats.warnings += 1;
                elided = true;
            });
            attributes.insert(attr_name, cleaned);
        }

        debug!(entity = name, "cleaning up description");
        let description = match self.reformat_text(&doc.description) {
            Some(text) => text,
            None => match extract_examples(&doc.description).and_then(|e| self.reformat_text(e)) {
                Some(examples) => {
                    stats.elided_descriptions_only += 1;
                    warn!(entity = name, "description elided, examples kept");
                    stats.warnings += 1;
                    examples
                }
                None => {
                    stats.elided_descriptions += 1;
                    warn!(entity = name, "description and examples elided");
                    stats.warnings += 1;
                    elided = true;
                    String::new()
                }
            },
        };

        let doc = EntityDoc {
            description,
            arguments,
            attributes,
            import: doc.import,
        };
        (doc, elided)
    }

    fn cleanup_field(&self, text: &str, on_elided: impl FnOnce()) -> String {
        match self.reformat_text(text) {
            Some(cleaned) => cleaned,
            None => {
                on_elided();
                String::new()
            }
        }
    }
}

fn module_prefix(tok: &TypeToken<'_>) -> String {
    match tok.module_name() {
        "" => String::new(),
        module => format!("{module}."),
    }
}

/// The "## Example Usage" part of a description, when it can be cleanly
/// separated from the prose before it
pub fn extract_examples(description: &str) -> Option<&str> {
    const SEPARATOR: &str = "## Example Usage";
    if description.matches(SEPARATOR).count() != 1 {
        return None;
    }
    description.find(SEPARATOR).map(|start| &description[start..])
}
