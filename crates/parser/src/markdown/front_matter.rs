//! Description extraction from the head of a document

use super::sections::is_blank;

/// Result of scanning the front matter
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// Prose following the H1, blank-line runs collapsed
    pub description: String,
    /// A closing `---` delimiter was found
    pub found_delimiter: bool,
    pub found_h1: bool,
}

/// Scan a front matter section, starting after the opening `---` line.
///
/// Everything up to and including the closing `---` is metadata and is
/// skipped.
pub fn parse_front_matter<S: AsRef<str>>(lines: &[S]) -> FrontMatter {
    let closing = lines.iter().position(|l| l.as_ref().trim() == "---");
    match closing {
        Some(index) => FrontMatter {
            found_delimiter: true,
            ..parse_preamble(&lines[index + 1..])
        },
        None => FrontMatter::default(),
    }
}

/// Scan prose that has no metadata block: the first H1 is dropped and the
/// rest, later H1 lines included, becomes the description
pub fn parse_preamble<S: AsRef<str>>(lines: &[S]) -> FrontMatter {
    let mut out = FrontMatter::default();
    let mut pending_blank = false;

    for line in lines.iter().map(AsRef::as_ref) {
        if !out.found_h1 && line.starts_with("# ") {
            out.found_h1 = true;
            pending_blank = false;
            continue;
        }
        if is_blank(line) {
            pending_blank = !out.description.is_empty();
            continue;
        }
        if pending_blank {
            out.description.push('\n');
            pending_blank = false;
        }
        out.description.push_str(line);
        out.description.push('\n');
    }
    out
}
