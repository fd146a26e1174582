//! Tree I/O over stores and the guarded push flow

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use grove_compiler::{CompileError, RepositoryTree, TreeDiff, diff_trees, layout, lower};
use grove_core::Project;

use crate::gateway::{
    AuthConfig, CommitAuthor, CommitId, EntryKind, GatewayError, RepositoryGateway,
    RepositoryProvider, TreeStore,
};

/// Message recorded when the caller does not supply one.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Compiled project from the Grove editor";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Trees are UTF-8 text by definition; a binary file under a project
    /// root means the tree was not produced by lowering.
    #[error("file {path} is not valid UTF-8")]
    NonUtf8 { path: String },
}

/// Read every file under `root` into a tree of root-relative paths.
///
/// A missing root reads as an empty tree, which is what a project that
/// was never pushed looks like.
pub async fn read_tree<S>(store: &S, root: &str) -> Result<RepositoryTree, SyncError>
where
    S: TreeStore + ?Sized,
{
    let prefix = if root.is_empty() {
        String::new()
    } else {
        format!("{root}/")
    };
    let mut tree = RepositoryTree::new();
    let mut stack = vec![root.to_string()];
    while let Some(dir) = stack.pop() {
        for entry in store.list_dir(&dir).await? {
            let path = if dir.is_empty() {
                entry.name.clone()
            } else {
                format!("{dir}/{}", entry.name)
            };
            match entry.kind {
                EntryKind::Directory => stack.push(path),
                EntryKind::File => {
                    let bytes = store.read_file(&path).await?;
                    let text = String::from_utf8(bytes)
                        .map_err(|_| SyncError::NonUtf8 { path: path.clone() })?;
                    let rel = path.strip_prefix(&prefix).unwrap_or(&path).to_string();
                    tree.insert(rel, text);
                }
            }
        }
    }
    Ok(tree)
}

/// Write every file of `tree` under `root`. Writes only; pruning stale
/// paths is the push flow's job, driven by a diff.
pub async fn write_tree<S>(store: &S, root: &str, tree: &RepositoryTree) -> Result<(), SyncError>
where
    S: TreeStore + ?Sized,
{
    for (path, content) in tree.iter() {
        let full = if root.is_empty() {
            path.to_string()
        } else {
            format!("{root}/{path}")
        };
        store.write_file(&full, content.as_bytes()).await?;
    }
    Ok(())
}

/// Knobs for one push.
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Skip the divergence gate and overwrite the remote even when it
    /// moved ahead.
    pub force: bool,
    /// Commit message. [`DEFAULT_COMMIT_MESSAGE`] when absent.
    pub message: Option<String>,
    pub author: CommitAuthor,
}

/// How one guarded push ended. Conflicts and rejections are ordinary
/// outcomes, not errors; only transport and compilation failures are.
#[derive(Debug)]
pub enum PushOutcome {
    /// Changes landed on the remote.
    Completed { commit: CommitId },
    /// The remote already matched the lowered tree; nothing to push.
    UpToDate,
    /// The remote diverged from the base tree. Nothing was written; the
    /// diff says exactly how the remote moved.
    Conflict(TreeDiff),
    /// The remote moved between comparing and pushing. Nothing landed;
    /// the caller may retry, or force.
    Rejected,
}

/// Outcome plus a one-line change summary for logs and UIs.
#[derive(Debug)]
pub struct PushReport {
    pub outcome: PushOutcome,
    pub summary: String,
}

/// Serializes pushes per remote url.
///
/// One logical push is lower, compare, write, commit, push. Two of them
/// interleaved against the same remote would waste one round trip and
/// surface a spurious rejection, so every caller holding a project open
/// funnels pushes through one coordinator.
#[derive(Debug, Default)]
pub struct PushCoordinator {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl PushCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, url: &str) -> Arc<Mutex<()>> {
        self.locks.entry(url.to_string()).or_default().clone()
    }

    /// Compile `project` and publish its tree to `url`.
    ///
    /// `base` is the tree of the last known-synced state of this project,
    /// used to decide whether the remote moved underneath us. Pass an
    /// empty tree for a project that was never pushed.
    pub async fn push_project<P: RepositoryProvider>(
        &self,
        provider: &P,
        url: &str,
        auth: &AuthConfig,
        project: &Project,
        base: &RepositoryTree,
        options: &PushOptions,
    ) -> Result<PushReport, SyncError> {
        let guard = self.lock_for(url);
        let _held = guard.lock().await;

        let lowered = lower(project)?;
        let root = layout::project_root(project.project_id);

        debug!(url, root, "cloning repository for push");
        let repo = provider.clone_repository(url, auth).await?;
        let remote = read_tree(&repo, &root).await?;

        if !options.force {
            let divergence = diff_trees(base, &remote);
            if !divergence.is_empty() {
                info!(
                    url,
                    summary = %divergence.summary(),
                    "remote diverged from base; refusing to push"
                );
                let summary = divergence.summary();
                return Ok(PushReport {
                    outcome: PushOutcome::Conflict(divergence),
                    summary,
                });
            }
        }

        let changes = diff_trees(&remote, &lowered);
        if changes.is_empty() {
            debug!(url, "remote already matches the lowered tree");
            return Ok(PushReport {
                outcome: PushOutcome::UpToDate,
                summary: changes.summary(),
            });
        }

        for path in &changes.removed {
            repo.delete_file(&format!("{root}/{path}")).await?;
        }
        for path in changes.added.iter().chain(&changes.modified) {
            if let Some(content) = lowered.get(path) {
                repo.write_file(&format!("{root}/{path}"), content.as_bytes())
                    .await?;
            }
        }

        let message = options.message.as_deref().unwrap_or(DEFAULT_COMMIT_MESSAGE);
        let commit = repo.commit(message, &options.author).await?;

        match repo.push(options.force).await {
            Ok(()) => {
                info!(url, summary = %changes.summary(), "pushed compiled project");
                Ok(PushReport {
                    outcome: PushOutcome::Completed { commit },
                    summary: changes.summary(),
                })
            }
            Err(GatewayError::RejectedNonFastForward) => {
                warn!(url, "push rejected: remote moved during the attempt");
                Ok(PushReport {
                    outcome: PushOutcome::Rejected,
                    summary: changes.summary(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
