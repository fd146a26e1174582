//! The project config document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use grove_core::{BlockConfig, BlockId, BlockKind, FileId, Language, RelationshipKind};

/// Per-block entry in the config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub name: String,
    pub kind: BlockKind,
    pub schema_version: String,
    /// Runtime. Required for compute blocks, absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    /// Tree path of the block's code file. Recorded for compute blocks;
    /// their code never appears in the document itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Inline source for block kinds that have no code file of their own.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub config: BlockConfig,
}

/// Per-shared-file entry in the config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFileEntry {
    /// Display name, which may differ from the slugged tree file name.
    pub name: String,
    /// Tree path the file body lives at.
    pub path: String,
}

/// One shared-file-to-block attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub file: FileId,
    pub block: BlockId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

/// The YAML document at the project tree root describing everything about
/// a project that does not live in a file of its own.
///
/// Maps are ordered so emission is deterministic. Relationship target
/// lists keep the order their edges were declared in; `links` are sorted
/// by `(file, block)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub name: String,
    #[serde(default)]
    pub blocks: BTreeMap<BlockId, BlockEntry>,
    /// Origin block to edge kind to ordered targets.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<BlockId, BTreeMap<RelationshipKind, Vec<BlockId>>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub shared_files: BTreeMap<FileId, SharedFileEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkEntry>,
}

impl ProjectDocument {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}
