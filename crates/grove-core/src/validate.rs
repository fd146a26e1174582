//! Whole-graph referential integrity checks

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::id::{BlockId, FileId, RelationshipId};
use crate::model::{BlockKind, Project};

/// A single integrity failure. The variant is the machine-readable reason;
/// the fields name the offending entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum Violation {
    /// A relationship whose origin block is not in the project.
    #[error("relationship {relationship} starts at missing block {block}")]
    DanglingRelationshipSource {
        relationship: RelationshipId,
        block: BlockId,
    },

    /// A relationship whose target block is not in the project.
    #[error("relationship {relationship} points at missing block {block}")]
    DanglingRelationshipTarget {
        relationship: RelationshipId,
        block: BlockId,
    },

    /// A link naming a shared file or block that is not in the project.
    #[error("link joins file {file} to block {block}, one of which is missing")]
    DanglingSharedFileLink { file: FileId, block: BlockId },

    /// The same file linked to the same block more than once.
    #[error("file {file} is linked to block {block} more than once")]
    DuplicateSharedFileLink { file: FileId, block: BlockId },

    /// A block kind tag this build does not recognize.
    #[error("block {block} has unknown kind {kind:?}")]
    UnknownBlockType { block: BlockId, kind: String },
}

/// Every violation found in one validation pass. Callers always see the
/// complete list, never just the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project failed validation ({} violations)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl Project {
    /// Check referential integrity of the whole graph.
    ///
    /// Reports every violation in one pass rather than stopping at the
    /// first, so a caller can surface the complete picture. A relationship
    /// dangling at both ends yields one violation per endpoint.
    pub fn validate(&self) -> Result<(), ValidationReport> {
        let block_ids: HashSet<BlockId> = self.blocks.iter().map(|b| b.id).collect();
        let file_ids: HashSet<FileId> = self.shared_files.iter().map(|f| f.id).collect();

        let mut violations = Vec::new();

        for block in &self.blocks {
            if let BlockKind::Unknown(tag) = &block.kind {
                violations.push(Violation::UnknownBlockType {
                    block: block.id,
                    kind: tag.clone(),
                });
            }
        }

        for rel in &self.relationships {
            if !block_ids.contains(&rel.from) {
                violations.push(Violation::DanglingRelationshipSource {
                    relationship: rel.id,
                    block: rel.from,
                });
            }
            if !block_ids.contains(&rel.to) {
                violations.push(Violation::DanglingRelationshipTarget {
                    relationship: rel.id,
                    block: rel.to,
                });
            }
        }

        let mut seen = HashSet::new();
        for link in &self.shared_file_links {
            if !file_ids.contains(&link.file_id) || !block_ids.contains(&link.block_id) {
                violations.push(Violation::DanglingSharedFileLink {
                    file: link.file_id,
                    block: link.block_id,
                });
                continue;
            }
            if !seen.insert((link.file_id, link.block_id)) {
                violations.push(Violation::DuplicateSharedFileLink {
                    file: link.file_id,
                    block: link.block_id,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { violations })
        }
    }
}
