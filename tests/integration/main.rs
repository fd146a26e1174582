//! Integration tests for Grove
//!
//! These tests verify that the crates work together: projects lower to
//! trees, trees lift back to equivalent projects, and the push flow
//! guards remotes end to end.

use grove_compiler::{diff_trees, layout, lift, lower};
use grove_core::{
    Block, BlockConfig, BlockId, BlockKind, DEFAULT_SCHEMA_VERSION, FileId, Language, Project,
    ProjectId, Relationship, RelationshipId, RelationshipKind, RemapScope, SequenceIdSource,
    SharedFile, SharedFileLink, remap_ids,
};
use grove_git::{
    AuthConfig, MemoryRemote, PushCoordinator, PushOptions, PushOutcome, RepositoryProvider,
    read_tree,
};
use uuid::Uuid;

fn block(id: u128, kind: BlockKind, name: &str) -> Block {
    let language = matches!(kind, BlockKind::ComputeFunction).then_some(Language::Python36);
    let code = match language {
        Some(_) => format!("def main(event, context):\n    return {id}\n"),
        None => String::new(),
    };
    Block {
        id: BlockId(Uuid::from_u128(id)),
        config: BlockConfig::default_for(&kind),
        kind,
        name: name.to_string(),
        schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
        language,
        code,
    }
}

fn then(id: u128, from: &Block, to: &Block) -> Relationship {
    Relationship {
        id: RelationshipId(Uuid::from_u128(id)),
        from: from.id,
        to: to.id,
        kind: RelationshipKind::Then,
        expression: None,
        schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
    }
}

/// Three-step pipeline: an endpoint feeding a compute block feeding a
/// response.
fn order_pipeline() -> Project {
    let receive = block(0x01, BlockKind::ApiEndpoint, "Receive Order");
    let process = block(0x02, BlockKind::ComputeFunction, "Process Order");
    let reply = block(0x03, BlockKind::ApiResponse, "Order Reply");
    let edges = vec![then(0xa1, &receive, &process), then(0xa2, &process, &reply)];
    Project {
        project_id: ProjectId(Uuid::from_u128(0x77)),
        name: "Order Intake".to_string(),
        version: 4,
        readme: String::new(),
        blocks: vec![receive, process, reply],
        relationships: edges,
        shared_files: vec![],
        shared_file_links: vec![],
    }
}

/// Two compute blocks sharing one helper file, mounted at different
/// paths inside each block.
fn shared_helpers() -> Project {
    let first = block(0x01, BlockKind::ComputeFunction, "First Step");
    let second = block(0x02, BlockKind::ComputeFunction, "Second Step");
    let helpers = SharedFile {
        id: FileId(Uuid::from_u128(0xf1)),
        name: "helpers.py".to_string(),
        body: "def shared():\n    return 7\n".to_string(),
    };
    let links = vec![
        SharedFileLink {
            file_id: helpers.id,
            block_id: first.id,
            path: String::new(),
        },
        SharedFileLink {
            file_id: helpers.id,
            block_id: second.id,
            path: "lib".to_string(),
        },
    ];
    let edges = vec![then(0xa1, &first, &second)];
    Project {
        project_id: ProjectId(Uuid::from_u128(0x88)),
        name: "Shared Helpers".to_string(),
        version: 2,
        readme: String::new(),
        blocks: vec![first, second],
        relationships: edges,
        shared_files: vec![helpers],
        shared_file_links: links,
    }
}

/// Same blocks, edges, shared files, and links. Relationship ids are
/// regenerated across compilation, so edges compare as endpoint triples.
fn assert_equivalent(actual: &Project, expected: &Project) {
    assert_eq!(actual.name, expected.name);
    assert_eq!(actual.readme, expected.readme);

    let blocks = |p: &Project| {
        let mut rows: Vec<_> = p
            .blocks
            .iter()
            .map(|b| {
                (
                    b.id,
                    b.kind.clone(),
                    b.name.clone(),
                    b.language,
                    b.code.clone(),
                    b.config.clone(),
                )
            })
            .collect();
        rows.sort_by_key(|row| row.0);
        rows
    };
    assert_eq!(blocks(actual), blocks(expected));

    let edges = |p: &Project| {
        let mut rows: Vec<_> = p.edges().collect();
        rows.sort();
        rows
    };
    assert_eq!(edges(actual), edges(expected));

    let files = |p: &Project| {
        let mut rows: Vec<_> = p
            .shared_files
            .iter()
            .map(|f| (f.id, f.name.clone(), f.body.clone()))
            .collect();
        rows.sort_by_key(|row| row.0);
        rows
    };
    assert_eq!(files(actual), files(expected));

    let links = |p: &Project| {
        let mut rows: Vec<_> = p
            .shared_file_links
            .iter()
            .map(|l| (l.file_id, l.block_id, l.path.clone()))
            .collect();
        rows.sort();
        rows
    };
    assert_eq!(links(actual), links(expected));
}

/// Test that the CLI can be invoked
#[tokio::test]
async fn test_cli_invocation() {
    use std::process::Command;

    let output = Command::new("cargo")
        .args(["run", "--", "--help"])
        .current_dir(".")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("grove"));
    assert!(stdout.contains("Compile Grove projects"));
}

/// Test the on-disk CLI flow: lower a project file into a directory,
/// lift it back, and compare
#[test]
fn test_cli_disk_round_trip() {
    use std::process::Command;
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let project = order_pipeline();
    let project_path = dir.path().join("project.json");
    let tree_dir = dir.path().join("tree");
    let lifted_path = dir.path().join("lifted.json");
    std::fs::write(&project_path, serde_json::to_string(&project).unwrap()).unwrap();

    let lower_out = Command::new("cargo")
        .args(["run", "--", "lower"])
        .arg(&project_path)
        .arg("--out")
        .arg(&tree_dir)
        .current_dir(".")
        .output()
        .expect("Failed to execute command");
    assert!(lower_out.status.success());
    assert!(tree_dir.join("project.yaml").is_file());
    assert!(tree_dir.join("blocks/process-order/block_code.py").is_file());

    let lift_out = Command::new("cargo")
        .args(["run", "--", "lift"])
        .arg(&tree_dir)
        .arg("--project-id")
        .arg(project.project_id.to_string())
        .arg("--out")
        .arg(&lifted_path)
        .current_dir(".")
        .output()
        .expect("Failed to execute command");
    assert!(lift_out.status.success());

    let lifted: Project =
        serde_json::from_str(&std::fs::read_to_string(&lifted_path).unwrap()).unwrap();
    assert_equivalent(&lifted, &project);
    assert_eq!(lifted.version, 1);
}

/// Test that the diff command exits clean on matching trees and nonzero
/// on divergence
#[test]
fn test_cli_diff_exit_code() {
    use std::process::Command;
    use tempfile::TempDir;

    let dir = TempDir::new().unwrap();
    let project = order_pipeline();
    let project_path = dir.path().join("project.json");
    std::fs::write(&project_path, serde_json::to_string(&project).unwrap()).unwrap();

    for out in ["a", "b"] {
        let lower_out = Command::new("cargo")
            .args(["run", "--", "lower"])
            .arg(&project_path)
            .arg("--out")
            .arg(dir.path().join(out))
            .current_dir(".")
            .output()
            .expect("Failed to execute command");
        assert!(lower_out.status.success());
    }

    let clean = Command::new("cargo")
        .args(["run", "--", "diff"])
        .arg(dir.path().join("a"))
        .arg(dir.path().join("b"))
        .current_dir(".")
        .output()
        .expect("Failed to execute command");
    assert!(clean.status.success());
    assert!(String::from_utf8_lossy(&clean.stdout).contains("Trees match"));

    std::fs::write(dir.path().join("b/README.md"), "# Edited by hand\n").unwrap();
    let diverged = Command::new("cargo")
        .args(["run", "--", "diff"])
        .arg(dir.path().join("a"))
        .arg(dir.path().join("b"))
        .current_dir(".")
        .output()
        .expect("Failed to execute command");
    assert_eq!(diverged.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&diverged.stdout);
    assert!(stdout.contains("M README.md"));
    assert!(stdout.contains("1 modified"));
}

/// Test that a linear pipeline survives the round trip
#[test]
fn test_round_trip() {
    let project = order_pipeline();
    let tree = lower(&project).unwrap();

    let mut ids = SequenceIdSource::new();
    let lifted = lift(&tree, project.project_id, &mut ids).unwrap();

    assert_equivalent(&lifted, &project);
    assert_eq!(lifted.version, 1);
}

/// Test that shared files and their links survive the round trip
#[test]
fn test_shared_file_round_trip() {
    let project = shared_helpers();
    let tree = lower(&project).unwrap();

    assert_eq!(
        tree.get("shared-files/helpers.py"),
        Some("def shared():\n    return 7\n")
    );

    let mut ids = SequenceIdSource::new();
    let lifted = lift(&tree, project.project_id, &mut ids).unwrap();
    assert_equivalent(&lifted, &project);
}

/// Test that lowering the same project always produces the same bytes
#[test]
fn test_lowering_determinism() {
    let project = order_pipeline();
    let first = lower(&project).unwrap();

    // Block declaration order is not semantic; the tree must not depend
    // on it.
    let mut reordered = project.clone();
    reordered.blocks.reverse();
    let second = lower(&reordered).unwrap();

    assert_eq!(first, second);
    assert!(diff_trees(&first, &second).is_empty());
}

/// Test the full publish cycle: push, clone fresh, lift
#[tokio::test]
async fn test_push_clone_lift_cycle() {
    let registry = MemoryRemote::new();
    let coordinator = PushCoordinator::new();
    let project = shared_helpers();
    let url = "mem://cycle";

    let report = coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &project,
            &grove_compiler::RepositoryTree::new(),
            &PushOptions::default(),
        )
        .await
        .unwrap();
    assert!(matches!(report.outcome, PushOutcome::Completed { .. }));

    let root = layout::project_root(project.project_id);
    let clone = registry
        .clone_repository(url, &AuthConfig::default())
        .await
        .unwrap();
    let remote = read_tree(&clone, &root).await.unwrap();
    assert!(remote.contains("project.yaml"));

    let mut ids = SequenceIdSource::new();
    let lifted = lift(&remote, project.project_id, &mut ids).unwrap();
    assert_equivalent(&lifted, &project);
}

/// Test that an out-of-band edit surfaces as a conflict, and that lifting
/// the remote state resolves it
#[tokio::test]
async fn test_push_conflict_resolution() {
    let registry = MemoryRemote::new();
    let coordinator = PushCoordinator::new();
    let project = order_pipeline();
    let url = "mem://conflict";
    let root = layout::project_root(project.project_id);

    coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &project,
            &grove_compiler::RepositoryTree::new(),
            &PushOptions::default(),
        )
        .await
        .unwrap();
    let base = lower(&project).unwrap();

    // A human edits the README directly in the repository.
    let human_readme = "# Order Intake\n\nHand-written notes.\n";
    registry
        .seed(url, [(format!("{root}/README.md"), human_readme)])
        .await;

    // Pushing against the stale base refuses and names the edited file.
    let report = coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &project,
            &base,
            &PushOptions::default(),
        )
        .await
        .unwrap();
    match report.outcome {
        PushOutcome::Conflict(diff) => assert_eq!(diff.modified, vec!["README.md"]),
        other => panic!("expected a conflict, got {other:?}"),
    }

    // The editor resolves by lifting the remote state, which picks up the
    // human's README, then pushes an edit on top of it.
    let clone = registry
        .clone_repository(url, &AuthConfig::default())
        .await
        .unwrap();
    let remote = read_tree(&clone, &root).await.unwrap();

    let mut ids = SequenceIdSource::new();
    let mut resolved = lift(&remote, project.project_id, &mut ids).unwrap();
    assert_eq!(resolved.readme, human_readme);

    resolved.blocks[1].code = "def main(event, context):\n    return 'v2'\n".to_string();
    let report = coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &resolved,
            &remote,
            &PushOptions::default(),
        )
        .await
        .unwrap();
    assert!(matches!(report.outcome, PushOutcome::Completed { .. }));

    let readme = registry
        .file_text(url, &format!("{root}/README.md"))
        .await
        .unwrap();
    assert_eq!(readme, human_readme);
}

/// Test that a forked project publishes under its own root
#[tokio::test]
async fn test_fork_publishes_alongside_original() {
    let registry = MemoryRemote::new();
    let coordinator = PushCoordinator::new();
    let project = order_pipeline();
    let url = "mem://fork";

    coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &project,
            &grove_compiler::RepositoryTree::new(),
            &PushOptions::default(),
        )
        .await
        .unwrap();

    let mut ids = SequenceIdSource::starting_at(0x1000);
    let fork = remap_ids(&project, RemapScope::Fork, &mut ids).unwrap();
    assert_ne!(fork.project_id, project.project_id);

    let report = coordinator
        .push_project(
            &registry,
            url,
            &AuthConfig::default(),
            &fork,
            &grove_compiler::RepositoryTree::new(),
            &PushOptions::default(),
        )
        .await
        .unwrap();
    assert!(matches!(report.outcome, PushOutcome::Completed { .. }));

    let files = registry.files(url).await;
    let original_doc = format!("{}/project.yaml", layout::project_root(project.project_id));
    let fork_doc = format!("{}/project.yaml", layout::project_root(fork.project_id));
    assert!(files.contains_key(&original_doc));
    assert!(files.contains_key(&fork_doc));
}
