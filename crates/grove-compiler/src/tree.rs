//! The repository tree value

use std::collections::BTreeMap;

/// An ordered mapping from project-relative path to UTF-8 file content.
///
/// This is the unit both compilation directions work in: lowering produces
/// one, lifting consumes one, and divergence detection compares two. Paths
/// use `/` separators and never start with one. Equal projects lower to
/// equal trees, and equal trees are byte-identical file for file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryTree {
    files: BTreeMap<String, String>,
}

impl RepositoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the file at `path`.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// `(path, content)` pairs in sorted path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}

impl FromIterator<(String, String)> for RepositoryTree {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
