//! Splitting markdown into heading-delimited sections

/// Marker left in generated docs by tfplugindocs
const TFPLUGINDOCS_MARKER: &str = "<!-- schema generated by tfplugindocs -->";

/// True for lines that contain only whitespace
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Normalize line endings and drop generator markers
pub fn preprocess(markdown: &str) -> String {
    markdown.replace("\r\n", "\n").replace(TFPLUGINDOCS_MARKER, "")
}

/// Group lines so that every line starting with `sep` opens a new group.
///
/// The first group holds whatever precedes the first separator and may
/// therefore be a preamble; it is empty when the text opens with a
/// separator. Later groups always begin with their separator line.
pub fn group_lines(lines: &[String], sep: &str) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut buffer: Vec<String> = Vec::new();
    for line in lines {
        if line.starts_with(sep) {
            groups.push(std::mem::take(&mut buffer));
        }
        buffer.push(line.clone());
    }
    if !buffer.is_empty() {
        groups.push(buffer);
    }
    groups
}

/// Split `text` on newlines, then group it by `sep`
pub fn split_group_lines(text: &str, sep: &str) -> Vec<Vec<String>> {
    let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    group_lines(&lines, sep)
}

/// How an H2 section is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// Content after the opening `---` of a document
    FrontMatter,
    /// Text before the first H2 in a document without front matter
    Preamble,
    ExampleUsage,
    ArgumentsReference,
    AttributesReference,
    Imports,
    /// Generated `## Schema` section
    Schema,
    /// Skipped entirely; the header is counted in the stats
    Ignored(String),
    Other,
}

impl SectionKind {
    /// Classify a section by its first line
    pub fn classify(first_line: &str) -> Self {
        let Some(header) = first_line.strip_prefix("## ") else {
            return if first_line.trim() == "---" {
                SectionKind::FrontMatter
            } else {
                SectionKind::Preamble
            };
        };

        match header.trim() {
            "Timeout" | "Timeouts" | "User Project Override" | "User Project Overrides" => {
                SectionKind::Ignored(header.trim().to_string())
            }
            "Example Usage" => SectionKind::ExampleUsage,
            "Arguments Reference" | "Argument Reference" | "Argument reference"
            | "Nested Blocks" | "Nested blocks" => SectionKind::ArgumentsReference,
            "Attributes Reference" | "Attribute Reference" | "Attribute reference" => {
                SectionKind::AttributesReference
            }
            "Import" | "Imports" => SectionKind::Imports,
            "Schema" => SectionKind::Schema,
            _ => SectionKind::Other,
        }
    }
}

/// A H3 subsection after cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub lines: Vec<String>,
    /// Contains a fenced code block
    pub has_examples: bool,
    /// Contains nothing but blank lines and fences
    pub is_empty: bool,
}

/// Remove "Open in Cloud Shell" button markup and record what the
/// subsection contains
pub fn reformat_subsection(lines: &[String]) -> Subsection {
    let mut kept = Vec::with_capacity(lines.len());
    let mut in_button = false;
    let mut has_examples = false;
    let mut is_empty = true;

    for line in lines {
        if in_button {
            if line.starts_with("</div") {
                in_button = false;
            }
            continue;
        }
        if line.starts_with("<div") && line.contains("oics-button") {
            in_button = true;
            continue;
        }

        if line.starts_with("```") {
            has_examples = true;
        } else if !is_blank(line) {
            is_empty = false;
        }
        kept.push(line.clone());
    }

    Subsection {
        lines: kept,
        has_examples,
        is_empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_group_lines_keeps_preamble() {
        let groups = group_lines(&lines("intro\n## A\na\n## B\nb"), "## ");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0], vec!["intro"]);
        assert_eq!(groups[1], vec!["## A", "a"]);
        assert_eq!(groups[2], vec!["## B", "b"]);
    }

    #[test]
    fn test_group_lines_round_trip() {
        let text = "---\ntitle: x\n---\n## A\n\na\n## B\n### C\nc\n";
        let joined = split_group_lines(text, "## ")
            .concat()
            .join("\n");
        assert_eq!(joined, text);
    }

    #[test]
    fn test_group_lines_leading_separator() {
        let groups = group_lines(&lines("## A\na"), "## ");
        assert_eq!(groups.len(), 2);
        assert!(groups[0].is_empty());
        assert_eq!(groups[1], vec!["## A", "a"]);
    }

    #[test]
    fn test_group_lines_does_not_split_deeper_headings() {
        let groups = split_group_lines("## A\n### B\nb", "## ");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].len(), 3);
    }

    #[test]
    fn test_preprocess() {
        let text = "a\r\n<!-- schema generated by tfplugindocs -->\r\nb";
        assert_eq!(preprocess(text), "a\n\nb");
    }

    #[test]
    fn test_classify() {
        assert_eq!(SectionKind::classify("---"), SectionKind::FrontMatter);
        assert_eq!(SectionKind::classify("# aws_s3_bucket"), SectionKind::Preamble);
        assert_eq!(
            SectionKind::classify("## Example Usage"),
            SectionKind::ExampleUsage
        );
        assert_eq!(
            SectionKind::classify("## Nested Blocks"),
            SectionKind::ArgumentsReference
        );
        assert_eq!(
            SectionKind::classify("## Attribute reference"),
            SectionKind::AttributesReference
        );
        assert_eq!(SectionKind::classify("## Imports"), SectionKind::Imports);
        assert_eq!(
            SectionKind::classify("## Timeouts"),
            SectionKind::Ignored("Timeouts".to_string())
        );
        assert_eq!(SectionKind::classify("## Notes"), SectionKind::Other);
    }

    #[test]
    fn test_reformat_subsection_strips_cloud_shell_button() {
        let input = lines(
            "### Basic\n<div class = \"oics-button\" style=\"float: right\">\n  <a href=\"x\">\n</div>\n```hcl\nresource {}\n```",
        );
        let sub = reformat_subsection(&input);
        assert_eq!(sub.lines, lines("### Basic\n```hcl\nresource {}\n```"));
        assert!(sub.has_examples);
        assert!(!sub.is_empty);
    }

    #[test]
    fn test_reformat_subsection_empty() {
        let sub = reformat_subsection(&lines("\n  \n```\n```"));
        assert!(sub.is_empty);
        assert!(sub.has_examples);
    }
}
