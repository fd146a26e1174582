//! Divergence detection between two repository trees

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::RepositoryTree;

/// Content movement for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Content in the original tree. `None` for added paths.
    pub before: Option<String>,
    /// Content in the changed tree. `None` for removed paths.
    pub after: Option<String>,
}

/// Everything that differs between two trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeDiff {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
    /// Before and after content for every path in the three lists above.
    pub content: BTreeMap<String, FileChange>,
}

impl TreeDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// One-line change counts for logs and user output.
    pub fn summary(&self) -> String {
        format!(
            "{} added, {} modified, {} removed",
            self.added.len(),
            self.modified.len(),
            self.removed.len()
        )
    }
}

/// Compare `original` to `changed`.
///
/// Pure and total: no I/O, no project semantics, every input pair has a
/// diff. Comparing any tree to itself yields an empty diff. Path lists
/// come out sorted.
pub fn diff_trees(original: &RepositoryTree, changed: &RepositoryTree) -> TreeDiff {
    let mut diff = TreeDiff::default();

    for (path, before) in original.iter() {
        match changed.get(path) {
            None => {
                diff.removed.push(path.to_string());
                diff.content.insert(
                    path.to_string(),
                    FileChange {
                        before: Some(before.to_string()),
                        after: None,
                    },
                );
            }
            Some(after) if after != before => {
                diff.modified.push(path.to_string());
                diff.content.insert(
                    path.to_string(),
                    FileChange {
                        before: Some(before.to_string()),
                        after: Some(after.to_string()),
                    },
                );
            }
            Some(_) => {}
        }
    }

    for (path, after) in changed.iter() {
        if !original.contains(path) {
            diff.added.push(path.to_string());
            diff.content.insert(
                path.to_string(),
                FileChange {
                    before: None,
                    after: Some(after.to_string()),
                },
            );
        }
    }

    diff
}
