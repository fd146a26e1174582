//! Identifier remapping for fork and reimport

use std::collections::HashMap;

use tracing::debug;

use crate::id::{BlockId, FileId, IdSource, ProjectId, RelationshipId};
use crate::model::Project;
use crate::validate::ValidationReport;

/// Which identifiers a remap regenerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapScope {
    /// Fresh project id and fresh entity ids: the copy is a new project.
    Fork,
    /// Fresh entity ids under the same project id: the project is being
    /// imported again into an existing slot.
    Reimport,
}

#[derive(Debug, thiserror::Error)]
pub enum RemapError {
    /// The input graph failed validation; nothing was remapped.
    #[error("cannot remap an invalid project: {0}")]
    InvalidInput(ValidationReport),

    /// The remapped graph failed validation. The input was valid, so this
    /// is a bug in the remapper, not a user-facing condition.
    #[error("remap produced an invalid project: {0}")]
    InternalInvariant(ValidationReport),
}

/// Rewrite every entity id in `project`, preserving the graph shape.
///
/// The replacement table is built in full before any reference is
/// rewritten, so the order blocks appear in never matters and cycles need
/// no special handling. Relationships always get fresh ids of their own.
/// The output is re-validated before being returned.
pub fn remap_ids(
    project: &Project,
    scope: RemapScope,
    ids: &mut dyn IdSource,
) -> Result<Project, RemapError> {
    project.validate().map_err(RemapError::InvalidInput)?;

    let mut out = project.clone();
    if scope == RemapScope::Fork {
        out.project_id = ProjectId(ids.next());
    }

    let block_table: HashMap<BlockId, BlockId> = project
        .blocks
        .iter()
        .map(|b| (b.id, BlockId(ids.next())))
        .collect();
    let file_table: HashMap<FileId, FileId> = project
        .shared_files
        .iter()
        .map(|f| (f.id, FileId(ids.next())))
        .collect();

    for block in &mut out.blocks {
        block.id = block_table.get(&block.id).copied().unwrap_or(block.id);
    }
    for rel in &mut out.relationships {
        rel.id = RelationshipId(ids.next());
        rel.from = block_table.get(&rel.from).copied().unwrap_or(rel.from);
        rel.to = block_table.get(&rel.to).copied().unwrap_or(rel.to);
    }
    for file in &mut out.shared_files {
        file.id = file_table.get(&file.id).copied().unwrap_or(file.id);
    }
    for link in &mut out.shared_file_links {
        link.file_id = file_table.get(&link.file_id).copied().unwrap_or(link.file_id);
        link.block_id = block_table
            .get(&link.block_id)
            .copied()
            .unwrap_or(link.block_id);
    }

    debug!(
        blocks = out.blocks.len(),
        relationships = out.relationships.len(),
        shared_files = out.shared_files.len(),
        "remapped project ids"
    );

    out.validate().map_err(RemapError::InternalInvariant)?;
    Ok(out)
}
