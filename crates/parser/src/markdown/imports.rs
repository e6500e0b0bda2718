//! Import section rewriting
//!
//! `terraform import` commands are rewritten into the equivalent
//! `pulumi import` command for the mapped resource token. Line breaks
//! around the generated code block are carried as `<break>` placeholders
//! because the parts are joined with spaces; [`render_import`] expands
//! them once the final document is assembled.

use super::sections::is_blank;

/// Token used when the resource has no mapping
pub const MISSING_TOK: &str = "MISSING_TOK";

const BREAK: &str = "<break>";

const SKIPPED_MARKERS: &[&str] = &[
    "**NOTE:",
    "**Please Note:",
    "**Note:**",
    "Import is supported using the following syntax",
];

const FENCES: &[&str] = &["```shell", "```sh", "```"];

/// Rewrite the lines of an import section into placeholder-carrying parts
pub fn parse_import_lines<S: AsRef<str>>(lines: &[S], tok: Option<&str>) -> Vec<String> {
    let mut parts = Vec::new();
    for line in lines.iter().map(AsRef::as_ref) {
        if SKIPPED_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }

        let mut line = line.to_string();
        for fence in FENCES {
            line = line.replace(fence, "");
        }

        if line.contains("terraform import") {
            parts.push(format!("{BREAK}{BREAK}```sh{BREAK}"));
            parts.push(pulumi_import_command(&line, tok.unwrap_or(MISSING_TOK)));
            parts.push(format!("{BREAK}```{BREAK}{BREAK}"));
        } else if !is_blank(&line) {
            parts.push(line);
        }
    }
    parts
}

/// Build `$ pulumi import <tok> <name> <id...>` from a terraform command
fn pulumi_import_command(line: &str, tok: &str) -> String {
    let stripped = line.replace("$ ", "").replace("terraform import ", "");
    let mut words = stripped.split(' ').filter(|w| !is_blank(w));

    let mut command = format!("$ pulumi import {tok}");
    if let Some(address) = words.next() {
        // `aws_s3_bucket.my_bucket` names the resource `my_bucket`
        let name = address.rsplit('.').next().unwrap_or(address);
        command.push(' ');
        command.push_str(name);
    }
    for word in words {
        command.push(' ');
        command.push_str(word);
    }
    command
}

/// Assemble the final import text, or `None` when nothing was found
pub fn assemble_import(parts: &[String], import_details: Option<&str>) -> Option<String> {
    if let Some(details) = import_details {
        return Some(format!("## Import\n\n{details}"));
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("## Import\n\n{}", parts.join(" ")))
}

/// Expand `<break>` placeholders into line breaks and tidy whitespace.
///
/// ```
/// use tfgen_parser::markdown::imports::render_import;
///
/// let text = "## Import\n\n<break><break>```sh<break> $ pulumi import aws:s3/bucket:Bucket b name <break>```<break><break>";
/// assert_eq!(
///     render_import(text),
///     "## Import\n\n```sh\n$ pulumi import aws:s3/bucket:Bucket b name\n```"
/// );
/// ```
pub fn render_import(import: &str) -> String {
    let expanded = import.replace(BREAK, "\n");
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in expanded.lines().map(str::trim) {
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
