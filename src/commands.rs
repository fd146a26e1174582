//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;
use grove_core::{Project, ProjectId, RandomIdSource, RemapScope};
use grove_git::{LocalTreeStore, read_tree, write_tree};
use uuid::Uuid;

pub async fn lower(project_path: PathBuf, out: PathBuf) -> anyhow::Result<()> {
    let project = read_project(&project_path)?;
    let tree = grove_compiler::lower(&project)?;

    let store = LocalTreeStore::new(&out);
    write_tree(&store, "", &tree).await?;

    tracing::info!("Lowered {} files into {}", tree.len(), out.display());
    Ok(())
}

pub async fn lift(
    dir: PathBuf,
    project_id: Option<Uuid>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let store = LocalTreeStore::new(&dir);
    let tree = read_tree(&store, "").await?;

    let project_id = ProjectId(project_id.unwrap_or_else(Uuid::new_v4));
    let mut ids = RandomIdSource;
    let project = grove_compiler::lift(&tree, project_id, &mut ids)?;

    let json = serde_json::to_string_pretty(&project)?;
    match out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(
                "Lifted {} blocks into {}",
                project.blocks.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Prints one line per changed path and exits nonzero when the trees differ.
pub async fn diff(original: PathBuf, changed: PathBuf) -> anyhow::Result<()> {
    let before = read_tree(&LocalTreeStore::new(&original), "").await?;
    let after = read_tree(&LocalTreeStore::new(&changed), "").await?;

    let diff = grove_compiler::diff_trees(&before, &after);
    if diff.is_empty() {
        println!("Trees match");
        return Ok(());
    }

    for path in &diff.added {
        println!("A {path}");
    }
    for path in &diff.modified {
        println!("M {path}");
    }
    for path in &diff.removed {
        println!("D {path}");
    }
    println!("{}", diff.summary());
    std::process::exit(1);
}

pub fn validate(project_path: PathBuf) -> anyhow::Result<()> {
    let project = read_project(&project_path)?;
    match project.validate() {
        Ok(()) => {
            println!(
                "{}: {} blocks, {} relationships, {} shared files",
                project.name,
                project.blocks.len(),
                project.relationships.len(),
                project.shared_files.len()
            );
            Ok(())
        }
        Err(report) => {
            eprintln!("{report}");
            std::process::exit(1);
        }
    }
}

pub fn fork(project_path: PathBuf, out: PathBuf, keep_project_id: bool) -> anyhow::Result<()> {
    let project = read_project(&project_path)?;
    let scope = if keep_project_id {
        RemapScope::Reimport
    } else {
        RemapScope::Fork
    };

    let mut ids = RandomIdSource;
    let forked = grove_core::remap_ids(&project, scope, &mut ids)?;

    let json = serde_json::to_string_pretty(&forked)?;
    std::fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;

    tracing::info!(
        "Forked {} as {} into {}",
        project.project_id,
        forked.project_id,
        out.display()
    );
    Ok(())
}

fn read_project(path: &Path) -> anyhow::Result<Project> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let project =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(project)
}
