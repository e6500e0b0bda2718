//! Line tokenizer for argument and attribute reference sections
//!
//! Reference sections are bullet lists interleaved with continuation text
//! and the occasional line introducing a nested block
//! ("The `website` object supports the following:"). Each line is turned
//! into a [`LineToken`] so the scanners in `arguments` only deal with
//! typed input.

use regex::Regex;
use std::sync::LazyLock;

static ARGUMENT_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[*+-]\s+`([a-zA-Z0-9_]*)`\s*(\([a-zA-Z]*\)\s*)?[–-]?\s+(\([^)]*\)\s*)?(.*)")
        .expect("argument bullet pattern is valid")
});

static ATTRIBUTE_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[*+-]\s+`([a-zA-Z0-9_]*)`\s+[–-]?\s+(.*)")
        .expect("attribute bullet pattern is valid")
});

static NESTED_BLOCK_INTROS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"`([a-z_]+)`.*following",
        r"(?i)## ([a-z][a-z\d_]+).* argument reference",
        r"`([a-z_]+)`.*block supports:",
        r"`([a-z_.]+)`.*sublist supports:",
        r"`([a-z_.]+)`.*subblock supports:",
        r"`([a-z_.]+)`.*block.*supports:",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("nested block pattern is valid"))
    .collect()
});

/// Suffix of bullets that only introduce a nested list
const BLOCK_INTRO_SUFFIX: &str = "supports the following:";

/// One classified line of a reference section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineToken<'a> {
    /// `* `name` - description`
    Bullet {
        name: &'a str,
        description: &'a str,
        /// The bullet itself ends with "supports the following:"
        introduces_block: bool,
    },
    /// A line introducing the nested block of an argument, e.g.
    /// "The `website` object supports the following:"
    NestedIntro {
        /// Lower-cased argument name
        name: String,
        text: &'a str,
    },
    /// Any other non-blank line, trimmed
    Continuation(&'a str),
    Blank,
}

impl<'a> LineToken<'a> {
    /// Trimmed text of a non-bullet, non-blank line
    pub fn text(&self) -> Option<&'a str> {
        match self {
            LineToken::NestedIntro { text, .. } | LineToken::Continuation(text) => Some(*text),
            _ => None,
        }
    }
}

/// Find the argument a line introduces a nested block for, if any
pub fn nested_block_name(line: &str) -> Option<String> {
    NESTED_BLOCK_INTROS.iter().find_map(|re| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    })
}

/// Tokenize one line of an argument reference section
pub fn tokenize_argument_line(line: &str) -> LineToken<'_> {
    if let Some(caps) = ARGUMENT_BULLET.captures(line) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let description = caps.get(4).map_or("", |m| m.as_str());
        return LineToken::Bullet {
            name,
            description,
            introduces_block: line.trim_end().ends_with(BLOCK_INTRO_SUFFIX),
        };
    }
    text_or_blank(line, true)
}

/// Tokenize one line of an attribute reference section.
///
/// Attributes are flat, so no nested-block introductions are reported.
pub fn tokenize_attribute_line(line: &str) -> LineToken<'_> {
    if let Some(caps) = ATTRIBUTE_BULLET.captures(line) {
        return LineToken::Bullet {
            name: caps.get(1).map_or("", |m| m.as_str()),
            description: caps.get(2).map_or("", |m| m.as_str()),
            introduces_block: false,
        };
    }
    text_or_blank(line, false)
}

fn text_or_blank(line: &str, detect_nested: bool) -> LineToken<'_> {
    let text = line.trim();
    if text.is_empty() {
        return LineToken::Blank;
    }
    match nested_block_name(line).filter(|_| detect_nested) {
        Some(name) => LineToken::NestedIntro { name, text },
        None => LineToken::Continuation(text),
    }
}
