//! Run statistics
//!
//! Each parse or conversion call returns its own `Stats`; callers sum them
//! with [`Stats::merge`] to produce the end-of-run summary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters gathered while processing documentation and examples
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Skipped H2 headings (e.g. "Timeouts") and how often each was seen
    pub ignored_doc_headers: BTreeMap<String, usize>,
    /// Code snippets found outside example and import sections
    pub unexpected_snippets: usize,
    /// Top-level arguments recorded from argument bullets
    pub total_arguments_from_docs: usize,
    /// Nested-block introductions matching several known arguments
    pub nested_arg_sections_multiple_matches: usize,
    /// Nested-block introductions matching no known argument
    pub nested_args_with_no_previous_match: usize,
    pub elided_arguments: usize,
    pub elided_attributes: usize,
    pub elided_descriptions: usize,
    /// Descriptions dropped while their examples were kept
    pub elided_descriptions_only: usize,
    /// Entities for which no markdown could be found
    pub entities_missing_docs: usize,
    /// Examples that failed to convert to every requested language
    pub hcl_all_langs_conversion_failures: usize,
    /// Examples that failed for some, but not all, languages
    pub hcl_partial_conversion_failures: BTreeMap<String, usize>,
    /// Warnings raised in total
    pub warnings: usize,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every counter of `other` into `self`
    pub fn merge(&mut self, other: &Stats) {
        for (header, count) in &other.ignored_doc_headers {
            *self.ignored_doc_headers.entry(header.clone()).or_default() += count;
        }
        for (lang, count) in &other.hcl_partial_conversion_failures {
            *self
                .hcl_partial_conversion_failures
                .entry(lang.clone())
                .or_default() += count;
        }
        self.unexpected_snippets += other.unexpected_snippets;
        self.total_arguments_from_docs += other.total_arguments_from_docs;
        self.nested_arg_sections_multiple_matches += other.nested_arg_sections_multiple_matches;
        self.nested_args_with_no_previous_match += other.nested_args_with_no_previous_match;
        self.elided_arguments += other.elided_arguments;
        self.elided_attributes += other.elided_attributes;
        self.elided_descriptions += other.elided_descriptions;
        self.elided_descriptions_only += other.elided_descriptions_only;
        self.entities_missing_docs += other.entities_missing_docs;
        self.hcl_all_langs_conversion_failures += other.hcl_all_langs_conversion_failures;
        self.warnings += other.warnings;
    }

    pub fn ignore_header(&mut self, header: &str) {
        *self.ignored_doc_headers.entry(header.to_string()).or_default() += 1;
    }

    pub fn partial_conversion_failure(&mut self, language: &str) {
        *self
            .hcl_partial_conversion_failures
            .entry(language.to_string())
            .or_default() += 1;
    }
}

impl std::iter::Sum for Stats {
    fn sum<I: Iterator<Item = Stats>>(iter: I) -> Self {
        iter.fold(Stats::new(), |mut acc, s| {
            acc.merge(&s);
            acc
        })
    }
}
