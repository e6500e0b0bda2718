//! State machines over tokenized reference sections

use super::tokenizer::{tokenize_argument_line, tokenize_attribute_line, LineToken};
use tfgen_common::{ArgumentDoc, EntityDoc, Stats};
use tracing::{debug, warn};

/// Scans an argument reference section into `doc.arguments`.
///
/// The scanner tracks the last bullet seen, so continuation lines can be
/// appended to it, and the nested block currently being described.
pub struct ArgumentScanner<'d> {
    doc: &'d mut EntityDoc,
    stats: &'d mut Stats,
    last_match: Option<String>,
    nested: Option<String>,
    entity: &'d str,
    file: &'d str,
}

impl<'d> ArgumentScanner<'d> {
    pub fn new(doc: &'d mut EntityDoc, stats: &'d mut Stats) -> Self {
        Self {
            doc,
            stats,
            last_match: None,
            nested: None,
            entity: "",
            file: "",
        }
    }

    /// Name the document being scanned in warnings
    pub fn for_entity(mut self, entity: &'d str, file: &'d str) -> Self {
        self.entity = entity;
        self.file = file;
        self
    }

    /// Start inside the nested block of `parent`, used when a whole
    /// subsection is titled after an argument
    pub fn within(mut self, parent: &str) -> Self {
        self.nested = Some(parent.to_string());
        self
    }

    pub fn scan<S: AsRef<str>>(mut self, lines: &[S]) {
        for line in lines {
            self.feed(line.as_ref());
        }
    }

    fn feed(&mut self, line: &str) {
        match tokenize_argument_line(line) {
            LineToken::Bullet {
                name,
                description,
                introduces_block,
            } => {
                match self.nested.clone() {
                    Some(parent) => self.record_nested(&parent, name, description),
                    None if introduces_block => {
                        debug!(argument = name, "skipping block introduction bullet");
                    }
                    None => {
                        let (arg, _) = self.doc.get_or_create_argument(name);
                        arg.description = description.to_string();
                        arg.is_nested = false;
                        self.stats.total_arguments_from_docs += 1;
                    }
                }
                self.last_match = Some(name.to_string());
            }
            token @ (LineToken::Continuation(_) | LineToken::NestedIntro { .. })
                if self.last_match.is_some() =>
            {
                if let Some(text) = token.text() {
                    self.append_continuation(text);
                }
            }
            LineToken::NestedIntro { name, .. } => {
                if !self.doc.arguments.contains_key(&name) {
                    self.stats.nested_args_with_no_previous_match += 1;
                    debug!(argument = %name, "nested block for an argument not yet seen");
                }
                self.nested = Some(name);
                self.last_match = None;
            }
            LineToken::Continuation(_) | LineToken::Blank => {
                self.last_match = None;
            }
        }
    }

    fn record_nested(&mut self, parent: &str, name: &str, description: &str) {
        let (parent_arg, _) = self.doc.get_or_create_argument(parent);
        parent_arg
            .nested_arguments
            .insert(name.to_string(), description.to_string());

        // Nested fields are also reachable by their bare name, unless a
        // top-level argument already owns it.
        if !self.doc.arguments.contains_key(name) {
            self.doc.arguments.insert(
                name.to_string(),
                ArgumentDoc {
                    description: description.to_string(),
                    is_nested: true,
                    ..Default::default()
                },
            );
        }
    }

    fn append_continuation(&mut self, text: &str) {
        let Some(last) = self.last_match.clone() else {
            return;
        };

        match self.nested.clone() {
            Some(parent) => {
                let (parent_arg, _) = self.doc.get_or_create_argument(&parent);
                if let Some(desc) = parent_arg.nested_arguments.get_mut(&last) {
                    push_line(desc, text);
                }
                if let Some(mirror) = self.doc.arguments.get_mut(&last) {
                    if mirror.is_nested {
                        push_line(&mut mirror.description, text);
                    }
                }
            }
            None => match self.doc.arguments.get_mut(&last) {
                Some(arg) => push_line(&mut arg.description, text),
                None => {
                    // The last bullet only introduced a block
                    warn!(
                        entity = self.entity,
                        file = self.file,
                        argument = %last,
                        "continuation text for a skipped bullet"
                    );
                    self.stats.warnings += 1;
                }
            },
        }
    }
}

/// Scan an attribute reference section into `doc.attributes`
pub fn scan_attributes<S: AsRef<str>>(lines: &[S], doc: &mut EntityDoc) {
    let mut last_match: Option<String> = None;
    for line in lines {
        match tokenize_attribute_line(line.as_ref()) {
            LineToken::Bullet {
                name, description, ..
            } => {
                doc.attributes
                    .insert(name.to_string(), description.to_string());
                last_match = Some(name.to_string());
            }
            LineToken::Continuation(text) | LineToken::NestedIntro { text, .. } => {
                if let Some(desc) = last_match.as_ref().and_then(|l| doc.attributes.get_mut(l)) {
                    push_line(desc, text);
                }
            }
            LineToken::Blank => last_match = None,
        }
    }
}

fn push_line(description: &mut String, text: &str) {
    description.push('\n');
    description.push_str(text);
}
