//! Terraform provider markdown to [`EntityDoc`]
//!
//! A document is split into H2 sections, example sections are folded into
//! one, and each section is handled according to its header:
//!
//! - front matter and preamble text become the description
//! - argument and attribute references are scanned bullet by bullet
//! - import sections are rewritten for the destination CLI
//! - generated `## Schema` sections are parsed structurally
//! - everything else is appended to the description
//!
//! The collected text is then cleaned up for the target language.

pub mod arguments;
pub mod examples;
pub mod front_matter;
pub mod imports;
pub mod schema_section;
pub mod sections;
pub mod tokenizer;

use crate::cleanup::{footer_links, CleanupContext};
use arguments::{scan_attributes, ArgumentScanner};
use examples::reformat_examples;
use front_matter::{parse_front_matter, parse_preamble, FrontMatter};
use imports::{assemble_import, parse_import_lines, render_import};
use schema_section::{apply_schema, parse_schema_section};
use sections::{group_lines, is_blank, preprocess, reformat_subsection, split_group_lines, SectionKind};
use tfgen_common::{DocKind, EntityDoc, GeneratorLanguage, ProviderInfo, ResourceInfo, Stats};
use tracing::{debug, warn};

/// Output of a single parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    pub doc: EntityDoc,
    pub stats: Stats,
    /// Some text had to be dropped during cleanup
    pub elided: bool,
}

impl ParsedDoc {
    /// The doc as it is emitted: import placeholders expanded to line breaks
    pub fn rendered_doc(&self) -> EntityDoc {
        let mut doc = self.doc.clone();
        if !doc.import.is_empty() {
            doc.import = render_import(&doc.import);
        }
        doc
    }
}

/// Parser for one resource or data source document
pub struct MarkdownParser<'a> {
    provider: &'a ProviderInfo,
    language: GeneratorLanguage,
    kind: DocKind,
    rawname: &'a str,
    entity: Option<&'a ResourceInfo>,
    file_name: String,

    doc: EntityDoc,
    stats: Stats,
    import_parts: Vec<String>,
}

impl<'a> MarkdownParser<'a> {
    pub fn new(
        provider: &'a ProviderInfo,
        language: GeneratorLanguage,
        kind: DocKind,
        rawname: &'a str,
    ) -> Self {
        Self {
            provider,
            language,
            kind,
            rawname,
            entity: provider.entity(kind, rawname),
            file_name: String::new(),
            doc: EntityDoc::new(),
            stats: Stats::new(),
            import_parts: Vec::new(),
        }
    }

    /// Override the entity mapping; `None` parses without overrides
    pub fn with_entity(mut self, entity: Option<&'a ResourceInfo>) -> Self {
        self.entity = entity;
        self
    }

    /// Name of the file the markdown came from, used in messages
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn parse(mut self, markdown: &str) -> ParsedDoc {
        let markdown = preprocess(markdown);
        let sections = reformat_examples(split_group_lines(&markdown, "## "));
        for section in &sections {
            self.parse_section(section);
        }

        let import_details = self
            .entity
            .and_then(|e| e.docs.as_ref())
            .and_then(|d| d.import_details.as_deref());
        if let Some(import) = assemble_import(&self.import_parts, import_details) {
            self.doc.import = import;
        }

        let ctx = CleanupContext::new(self.language, self.provider)
            .with_footer_links(footer_links(&markdown));
        let (doc, elided) = ctx.cleanup_doc(self.rawname, self.doc, &mut self.stats);
        if elided {
            warn!(entity = self.rawname, "docs contain elided text that needs updating");
            self.stats.warnings += 1;
        }

        ParsedDoc {
            doc,
            stats: self.stats,
            elided,
        }
    }

    fn warn(&mut self, message: &str) {
        warn!(
            entity = self.rawname,
            kind = %self.kind,
            file = %self.file_name,
            "{}",
            message
        );
        self.stats.warnings += 1;
    }

    fn parse_section(&mut self, section: &[String]) {
        let Some(first) = section.first() else {
            // Documents that open with an H2 produce an empty first group
            return;
        };

        let kind = SectionKind::classify(first);
        let header = first.strip_prefix("## ").unwrap_or(first).trim().to_string();
        match kind {
            SectionKind::Ignored(header) => {
                debug!(entity = self.rawname, header = %header, "ignoring doc section");
                self.stats.ignore_header(&header);
            }
            SectionKind::FrontMatter => {
                let fm = parse_front_matter(&section[1..]);
                if !fm.found_delimiter {
                    self.warn("front matter has no closing '---' delimiter");
                }
                self.apply_description(fm);
            }
            SectionKind::Preamble => {
                let fm = parse_preamble(section);
                self.apply_description(fm);
            }
            SectionKind::Schema => {
                let schema = parse_schema_section(&section[1..]);
                if schema.is_empty() {
                    self.warn("failed to parse top-level Schema section");
                } else {
                    apply_schema(&schema, &mut self.doc, &mut self.stats);
                }
            }
            kind => self.parse_subsections(&kind, &header, &section[1..]),
        }
    }

    fn apply_description(&mut self, fm: FrontMatter) {
        if !fm.found_h1 {
            self.warn("document has no H1 title");
        }
        self.doc.description.push_str(&fm.description);
    }

    fn parse_subsections(&mut self, kind: &SectionKind, header: &str, body: &[String]) {
        let mut wrote_header = false;
        for h3 in group_lines(body, "### ") {
            if h3.is_empty() {
                continue;
            }
            if h3[0].trim() == "### Timeouts" {
                continue;
            }

            let sub = reformat_subsection(&h3);
            if sub.is_empty {
                continue;
            }
            if sub.has_examples
                && !matches!(kind, SectionKind::ExampleUsage | SectionKind::Imports)
            {
                self.warn(&format!(
                    "unexpected code snippets in section '{}'; the HCL will be converted if possible",
                    header
                ));
                self.stats.unexpected_snippets += 1;
            }

            match kind {
                SectionKind::ArgumentsReference => {
                    ArgumentScanner::new(&mut self.doc, &mut self.stats)
                        .for_entity(self.rawname, &self.file_name)
                        .scan(&sub.lines);
                }
                SectionKind::AttributesReference => scan_attributes(&sub.lines, &mut self.doc),
                SectionKind::Imports => {
                    let tok = self.entity.map(|e| e.tok.as_str());
                    self.import_parts
                        .extend(parse_import_lines(&sub.lines, tok));
                }
                _ => {
                    // Subsections titled after an argument ("### dead_letter_config")
                    // describe that argument's nested block.
                    let title = h3[0].strip_prefix("### ").unwrap_or(header);
                    if let Some(parent) = self.nested_parent_for(title) {
                        ArgumentScanner::new(&mut self.doc, &mut self.stats)
                            .for_entity(self.rawname, &self.file_name)
                            .within(&parent)
                            .scan(&sub.lines);
                    }

                    if !wrote_header {
                        self.doc.description.push_str(&format!("## {}\n", header));
                        wrote_header = true;
                        if !sub.lines.first().is_some_and(|l| is_blank(l)) {
                            self.doc.description.push('\n');
                        }
                    }
                    self.doc.description.push_str(&sub.lines.join("\n"));
                    self.doc.description.push('\n');
                }
            }
        }
    }

    /// The single argument a subsection title names, if any
    fn nested_parent_for(&mut self, title: &str) -> Option<String> {
        let mut matches = self.matching_arguments(&argument_name_from_header(title));
        match matches.len() {
            0 => None,
            1 => matches.pop(),
            _ => {
                self.stats.nested_arg_sections_multiple_matches += 1;
                let message = format!(
                    "section '{}' matches several arguments ({}); not parsed as arguments",
                    title,
                    matches.join(", ")
                );
                self.warn(&message);
                None
            }
        }
    }

    /// Paths of arguments named `name`, either top-level or nested in
    /// another argument's block
    fn matching_arguments(&self, name: &str) -> Vec<String> {
        let mut matches = Vec::new();
        if self.doc.arguments.get(name).is_some_and(|a| !a.is_nested) {
            matches.push(name.to_string());
        }
        for (parent, arg) in &self.doc.arguments {
            if arg.nested_arguments.contains_key(name) {
                matches.push(format!("{}.{}", parent, name));
            }
        }
        matches
    }
}

fn argument_name_from_header(title: &str) -> String {
    title.replace(" Configuration Block", "").trim().to_string()
}

/// Parse `markdown` for the entity `rawname`, using its mapping in `provider`
pub fn parse_tf_markdown(
    provider: &ProviderInfo,
    language: GeneratorLanguage,
    kind: DocKind,
    rawname: &str,
    markdown: &str,
) -> ParsedDoc {
    MarkdownParser::new(provider, language, kind, rawname).parse(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(markdown: &str) -> ParsedDoc {
        let provider = ProviderInfo {
            name: "aws".to_string(),
            ..Default::default()
        };
        parse_tf_markdown(
            &provider,
            GeneratorLanguage::Schema,
            DocKind::Resources,
            "aws_lambda_function",
            markdown,
        )
    }

    #[test]
    fn test_front_matter_description() {
        let parsed = parse("---\ntitle: X\n---\n# Foo\nBody text\n");
        assert_eq!(parsed.doc.description, "Body text");
        assert_eq!(parsed.stats.warnings, 0);
    }

    #[test]
    fn test_missing_h1_warns() {
        let parsed = parse("---\ntitle: X\n---\nBody text\n");
        assert_eq!(parsed.doc.description, "Body text");
        assert_eq!(parsed.stats.warnings, 1);
    }

    #[test]
    fn test_ignored_sections_are_counted() {
        let parsed = parse("## Timeouts\n\n* `create` - (Default `10m`)\n\n## User Project Overrides\n\nx");
        assert!(parsed.doc.arguments.is_empty());
        assert_eq!(parsed.stats.ignored_doc_headers["Timeouts"], 1);
        assert_eq!(parsed.stats.ignored_doc_headers["User Project Overrides"], 1);
    }

    #[test]
    fn test_argument_reference_h3_starts_top_level() {
        let parsed = parse(
            "## Argument Reference\n\n\
             * `dead_letter_config` - (Optional) Dead letter queue configuration.\n\
             * `name` - (Required) Function name.\n\n\
             ### dead_letter_config Configuration Block\n\n\
             * `target_arn` - (Required) ARN of an SNS topic or SQS queue.\n\n\
             ### name\n\n\
             * `runtime` - (Optional) Runtime identifier.\n",
        );
        let args = &parsed.doc.arguments;
        assert!(args["dead_letter_config"].nested_arguments.is_empty());
        assert!(args["name"].nested_arguments.is_empty());
        assert!(!args["target_arn"].is_nested);
        assert_eq!(args["runtime"].description, "Runtime identifier.");
        assert!(!args["runtime"].is_nested);
        assert_eq!(parsed.stats.total_arguments_from_docs, 4);
    }

    #[test]
    fn test_block_section_named_after_argument() {
        let parsed = parse(
            "## Argument Reference\n\n\
             * `dead_letter_config` - (Optional) Dead letter queue configuration.\n\n\
             ## dead_letter_config Configuration Block\n\n\
             * `target_arn` - (Required) ARN of an SNS topic or SQS queue.\n",
        );
        let dlc = &parsed.doc.arguments["dead_letter_config"];
        assert_eq!(dlc.nested_arguments["target_arn"], "ARN of an SNS topic or SQS queue.");
        assert!(parsed.doc.arguments["target_arn"].is_nested);
    }

    #[test]
    fn test_other_section_named_after_argument() {
        let parsed = parse(
            "## Argument Reference\n\n\
             * `tracing_config` - (Optional) Tracing settings.\n\n\
             ## tracing_config\n\n\
             * `mode` - (Required) Sampling mode.\n",
        );
        assert_eq!(
            parsed.doc.arguments["tracing_config"].nested_arguments["mode"],
            "Sampling mode."
        );
        assert!(parsed.doc.description.starts_with("## tracing_config"));
    }

    #[test]
    fn test_ambiguous_section_title() {
        let parsed = parse(
            "## Argument Reference\n\n\
             * `name` - (Required) Function name.\n\n\
             The `layer` block supports:\n\n\
             * `name` - (Required) Layer name.\n\n\
             ## name\n\n\
             * `suffix` - (Optional) Suffix.\n",
        );
        assert_eq!(parsed.stats.nested_arg_sections_multiple_matches, 1);
        assert!(!parsed.doc.arguments.contains_key("suffix"));
    }

    #[test]
    fn test_other_sections_join_description() {
        let parsed = parse("---\n---\n# T\nIntro.\n\n## Notes\nBe careful.\n");
        assert_eq!(parsed.doc.description, "Intro.\n## Notes\n\nBe careful.");
    }

    #[test]
    fn test_unexpected_snippets_are_counted() {
        let parsed = parse(
            "## Argument Reference\n\n* `name` - (Required) Name.\n\n```hcl\nname = \"x\"\n```\n",
        );
        assert_eq!(parsed.stats.unexpected_snippets, 1);
        assert_eq!(parsed.doc.arguments["name"].description, "Name.");
    }

    #[test]
    fn test_import_with_override() {
        let mut provider = ProviderInfo::default();
        provider.resources.insert(
            "aws_lambda_function".to_string(),
            ResourceInfo {
                tok: "aws:lambda/function:Function".to_string(),
                docs: Some(tfgen_common::DocInfo {
                    import_details: Some("Functions are imported by name.".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let parsed = parse_tf_markdown(
            &provider,
            GeneratorLanguage::Schema,
            DocKind::Resources,
            "aws_lambda_function",
            "## Import\n\n```\n$ terraform import aws_lambda_function.f my_function\n```\n",
        );
        assert_eq!(
            parsed.doc.import,
            "## Import\n\nFunctions are imported by name."
        );
    }
}
