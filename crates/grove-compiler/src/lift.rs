//! Lifting: repository tree to project graph

use tracing::debug;

use grove_core::{
    Block, BlockKind, DEFAULT_SCHEMA_VERSION, IdSource, Project, ProjectId, Relationship,
    RelationshipId, SharedFile, SharedFileLink,
};

use crate::document::ProjectDocument;
use crate::error::CompileError;
use crate::layout;
use crate::readme;
use crate::tree::RepositoryTree;

/// Reconstruct a project graph from a repository tree.
///
/// The config document drives everything: blocks and shared files keep
/// the ids recorded there, while relationships get fresh ids from `ids`.
/// Trees do not carry a project id, so the caller assigns one. The
/// reconstructed graph is validated before being returned; a tree that
/// lifts into an inconsistent graph is rejected whole.
pub fn lift(
    tree: &RepositoryTree,
    project_id: ProjectId,
    ids: &mut dyn IdSource,
) -> Result<Project, CompileError> {
    let text =
        tree.get(layout::CONFIG_DOC_PATH)
            .ok_or_else(|| CompileError::MissingConfigDocument {
                path: layout::CONFIG_DOC_PATH.to_string(),
            })?;
    let doc = ProjectDocument::from_yaml(text)
        .map_err(|source| CompileError::MalformedConfigDocument { source })?;

    let mut blocks = Vec::with_capacity(doc.blocks.len());
    for (&id, entry) in &doc.blocks {
        let mut code = entry.code.clone();
        if entry.kind == BlockKind::ComputeFunction {
            if entry.language.is_none() {
                return Err(CompileError::MissingLanguage { block: id });
            }
            let path = entry
                .path
                .as_deref()
                .ok_or(CompileError::MissingCodePath { block: id })?;
            code = tree
                .get(path)
                .ok_or_else(|| CompileError::MissingBlockCode {
                    block: id,
                    path: path.to_string(),
                })?
                .to_string();
        }
        blocks.push(Block {
            id,
            kind: entry.kind.clone(),
            name: entry.name.clone(),
            schema_version: entry.schema_version.clone(),
            language: entry.language,
            code,
            config: entry.config.clone(),
        });
    }

    let mut relationships = Vec::new();
    for (&from, kinds) in &doc.relationships {
        for (&kind, targets) in kinds {
            for &to in targets {
                relationships.push(Relationship {
                    id: RelationshipId(ids.next()),
                    from,
                    to,
                    kind,
                    expression: None,
                    schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
                });
            }
        }
    }

    let mut shared_files = Vec::with_capacity(doc.shared_files.len());
    for (&id, entry) in &doc.shared_files {
        let body = tree
            .get(&entry.path)
            .ok_or_else(|| CompileError::MissingSharedFile {
                file: id,
                path: entry.path.clone(),
            })?;
        shared_files.push(SharedFile {
            id,
            name: entry.name.clone(),
            body: body.to_string(),
        });
    }

    let shared_file_links = doc
        .links
        .iter()
        .map(|l| SharedFileLink {
            file_id: l.file,
            block_id: l.block,
            path: l.path.clone(),
        })
        .collect();

    let readme_text = tree.get(layout::README_PATH).unwrap_or("");
    let readme = if readme::is_generated_readme(readme_text, &doc.name, project_id) {
        String::new()
    } else {
        readme_text.to_string()
    };

    let project = Project {
        project_id,
        name: doc.name,
        version: 1,
        readme,
        blocks,
        relationships,
        shared_files,
        shared_file_links,
    };
    project.validate()?;

    debug!(
        project = %project.project_id,
        blocks = project.blocks.len(),
        relationships = project.relationships.len(),
        "lifted project"
    );
    Ok(project)
}
