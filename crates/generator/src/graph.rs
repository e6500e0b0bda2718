//! Candidate names for nested object types
//!
//! A nested type may be reached through several chains of parent
//! properties. The graph records, for every property name seen below an
//! entity root, each fully-qualified name it could take so the resolver can
//! choose among them.

use std::collections::BTreeMap;
use tfgen_common::naming::pascal_case;

/// Candidate names recorded for one property name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedTypeNode {
    /// Every qualified candidate, in the order they were synthesized
    pub paths: Vec<String>,
    /// The most qualified candidate
    pub longest_path_name: String,
}

/// Branches added below a root type name.
///
/// Branching returns a new graph, so sibling properties each extend their
/// parent's graph without seeing one another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedTypeGraph {
    pub root: String,
    /// All candidates produced so far, across every branch
    pub paths: Vec<String>,
    /// The most qualified candidate at each depth
    pub longest_path: Vec<String>,
    pub branches: BTreeMap<String, NestedTypeNode>,
}

impl NestedTypeGraph {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Add a branch for property `name`.
    ///
    /// Every existing candidate gets the new name appended, which models the
    /// property appearing under each ancestor chain seen so far.
    ///
    /// ```
    /// use tfgen_generator::NestedTypeGraph;
    ///
    /// let graph = NestedTypeGraph::new("Template")
    ///     .create_branch("definition")
    ///     .create_branch("analysisDefaults");
    /// assert_eq!(
    ///     graph.paths,
    ///     vec!["TemplateDefinition", "TemplateDefinitionAnalysisDefaults"]
    /// );
    /// ```
    pub fn create_branch(&self, name: &str) -> Self {
        if name == self.root {
            return self.clone();
        }

        let segment = pascal_case(name);
        let new_paths: Vec<String> = if self.paths.is_empty() {
            vec![format!("{}{}", self.root, segment)]
        } else {
            self.paths.iter().map(|p| format!("{p}{segment}")).collect()
        };

        let longest_parent = self.longest_path.last().unwrap_or(&self.root);
        let longest_path_name = format!("{longest_parent}{segment}");

        let mut next = self.clone();
        next.paths.extend(new_paths.iter().cloned());
        next.longest_path.push(longest_path_name.clone());
        next.branches.insert(
            name.to_string(),
            NestedTypeNode {
                paths: new_paths,
                longest_path_name,
            },
        );
        next
    }

    pub fn branch(&self, name: &str) -> Option<&NestedTypeNode> {
        self.branches.get(name)
    }
}
