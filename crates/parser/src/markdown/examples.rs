//! Consolidation of example sections
//!
//! Provider docs scatter examples over several H2 sections such as
//! "Example Usage", "Example Usage - Private Bucket" or
//! "Example Usage for Lambda". These are folded into a single
//! "## Example Usage" section with one H3 per qualified example.

use super::sections::is_blank;
use regex::Regex;
use std::sync::LazyLock;
use tfgen_common::naming::title_case;

static EXAMPLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(## Example Usage\s*)(?:(?:(?:for|of|[\pP]+)\s*)?(.*?)\s*)?$")
        .expect("example header pattern is valid")
});

const CANONICAL_HEADER: &str = "## Example Usage";

/// Fold every example section into one canonical section.
///
/// The canonical section takes the position of the unqualified
/// "## Example Usage" section, or of the first example section when there
/// is none. With a single example section nothing is removed, only the
/// whitespace after its header is normalized.
pub fn reformat_examples(mut sections: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut canonical: Option<usize> = None;
    let mut merged: Vec<String> = Vec::new();
    let mut example_indices = Vec::new();

    for (i, section) in sections.iter().enumerate() {
        let Some(first) = section.first() else {
            continue;
        };
        let Some(caps) = EXAMPLE_HEADER.captures(first) else {
            continue;
        };
        let header_len = caps.get(1).map_or(0, |m| m.len());
        let qualifier = caps.get(2).map_or("", |m| m.as_str());
        let body = &section[1..];

        if header_len == first.len() {
            if canonical.is_none() {
                canonical = Some(i);
                let mut lead = vec![String::new(), String::new()];
                lead.extend(body.iter().skip_while(|l| is_blank(l)).cloned());
                lead.append(&mut merged);
                merged = lead;
            } else {
                merged.push(String::new());
                merged.push("### Additional Examples".to_string());
                merged.extend(body.iter().cloned());
            }
        } else {
            if !first.contains("## Example Usage -") {
                merged.push(String::new());
            }
            merged.push(format!("### {}", title_case(qualifier)));
            merged.extend(body.iter().cloned());
        }
        example_indices.push(i);
    }

    let Some(&first_example) = example_indices.first() else {
        return sections;
    };
    let canonical = match canonical {
        Some(index) => index,
        None => {
            merged.insert(0, String::new());
            first_example
        }
    };

    merged[0] = CANONICAL_HEADER.to_string();
    fix_example_titles(&mut merged);
    sections[canonical] = merged;

    if example_indices.len() == 1 {
        return sections;
    }

    sections
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i == canonical || !example_indices.contains(i))
        .map(|(_, section)| section)
        .collect()
}

/// Promote H4 headings that title a code block to H3.
///
/// A heading qualifies when only blank lines separate it from the opening
/// fence of the block.
pub fn fix_example_titles(lines: &mut [String]) {
    let mut pending: Option<usize> = None;
    for i in 0..lines.len() {
        let line = &lines[i];
        if line.starts_with("#### ") {
            pending = Some(i);
        } else if line.starts_with("```") {
            if let Some(heading) = pending.take() {
                lines[heading] = lines[heading].replacen("#### ", "### ", 1);
            }
        } else if !is_blank(line) {
            pending = None;
        }
    }
}
