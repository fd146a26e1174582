//! Lowering: project graph to repository tree

use std::collections::BTreeSet;

use tracing::debug;

use grove_core::{BlockKind, Project, unique_directory, unique_file_name};

use crate::document::{BlockEntry, LinkEntry, ProjectDocument, SharedFileEntry};
use crate::error::CompileError;
use crate::layout;
use crate::readme;
use crate::tree::RepositoryTree;

/// Compile `project` into its repository tree.
///
/// Refuses invalid graphs up front. The output is a pure value; nothing
/// is written anywhere. Lowering the same project twice yields
/// byte-identical trees, which is what lets divergence detection compare
/// a freshly lowered tree against a remote checkout.
pub fn lower(project: &Project) -> Result<RepositoryTree, CompileError> {
    project.validate()?;

    let mut tree = RepositoryTree::new();
    let mut doc = ProjectDocument {
        name: project.name.clone(),
        blocks: Default::default(),
        relationships: Default::default(),
        shared_files: Default::default(),
        links: Vec::new(),
    };

    // One directory per compute block, holding exactly its code file.
    // Non-compute blocks live wholly in the config document.
    let mut taken_dirs = BTreeSet::new();
    for block in &project.blocks {
        let mut entry = BlockEntry {
            name: block.name.clone(),
            kind: block.kind.clone(),
            schema_version: block.schema_version.clone(),
            language: block.language,
            path: None,
            code: String::new(),
            config: block.config.clone(),
        };
        if block.kind == BlockKind::ComputeFunction {
            let language = block
                .language
                .ok_or(CompileError::MissingLanguage { block: block.id })?;
            let dir = unique_directory(&taken_dirs, &block.name, block.id.0);
            taken_dirs.insert(dir.clone());
            let path = layout::block_code_path(&dir, language);
            tree.insert(path.clone(), block.code.clone());
            entry.path = Some(path);
        } else {
            entry.code = block.code.clone();
        }
        doc.blocks.insert(block.id, entry);
    }

    for rel in &project.relationships {
        doc.relationships
            .entry(rel.from)
            .or_default()
            .entry(rel.kind)
            .or_default()
            .push(rel.to);
    }

    let mut taken_files = BTreeSet::new();
    for file in &project.shared_files {
        let file_name = unique_file_name(&taken_files, &file.name, file.id.0);
        taken_files.insert(file_name.clone());
        let path = layout::shared_file_path(&file_name);
        tree.insert(path.clone(), file.body.clone());
        doc.shared_files.insert(
            file.id,
            SharedFileEntry {
                name: file.name.clone(),
                path,
            },
        );
    }

    let mut links: Vec<LinkEntry> = project
        .shared_file_links
        .iter()
        .map(|l| LinkEntry {
            file: l.file_id,
            block: l.block_id,
            path: l.path.clone(),
        })
        .collect();
    links.sort_by_key(|l| (l.file, l.block));
    doc.links = links;

    let readme_body = if project.readme.is_empty() {
        readme::generated_readme(&project.name, project.project_id)
    } else {
        project.readme.clone()
    };
    tree.insert(layout::README_PATH, readme_body);

    let yaml = doc
        .to_yaml()
        .map_err(|source| CompileError::EncodeConfigDocument { source })?;
    tree.insert(layout::CONFIG_DOC_PATH, yaml);

    debug!(
        project = %project.project_id,
        blocks = project.blocks.len(),
        files = tree.len(),
        "lowered project"
    );
    Ok(tree)
}
