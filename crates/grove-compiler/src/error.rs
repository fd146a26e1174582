//! Compilation failure taxonomy

use grove_core::{BlockId, FileId, ValidationReport};

/// Why a lowering or lifting pass failed.
///
/// Validation failures carry the complete violation list. The rest are
/// structural inconsistencies: the tree (or graph) cannot describe a
/// whole project, so the pass stops without a partial result.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    /// The tree has no config document, so it cannot describe a project.
    #[error("tree has no config document at {path}")]
    MissingConfigDocument { path: String },

    /// The config document exists but cannot be parsed.
    #[error("config document is malformed: {source}")]
    MalformedConfigDocument {
        #[source]
        source: serde_yaml::Error,
    },

    /// The config document could not be serialized.
    #[error("could not encode config document: {source}")]
    EncodeConfigDocument {
        #[source]
        source: serde_yaml::Error,
    },

    /// A compute block with no recorded runtime.
    #[error("compute block {block} has no language")]
    MissingLanguage { block: BlockId },

    /// A compute block entry with no recorded code path.
    #[error("compute block {block} has no code path")]
    MissingCodePath { block: BlockId },

    /// The config document names a code file the tree does not contain.
    #[error("code file {path} for block {block} is missing from the tree")]
    MissingBlockCode { block: BlockId, path: String },

    /// The config document names a shared file the tree does not contain.
    #[error("shared file {file} is missing from the tree at {path}")]
    MissingSharedFile { file: FileId, path: String },
}
