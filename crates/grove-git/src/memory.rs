//! In-memory repositories for tests and local development

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::gateway::{
    AuthConfig, CommitAuthor, CommitId, DirEntry, EntryKind, GatewayError, RepositoryGateway,
    RepositoryProvider, Result, TreeStore,
};

/// One commit as the in-memory remote records it.
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub id: CommitId,
    pub message: String,
    pub author: CommitAuthor,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default, Clone)]
struct RemoteState {
    files: BTreeMap<String, Vec<u8>>,
    /// Bumped on every accepted push and every seed. A working copy may
    /// only fast-forward a remote whose head it cloned.
    head: u64,
    commits: Vec<CommitRecord>,
}

/// A registry of in-memory remotes, addressed by url.
///
/// Cloning snapshots the remote's files; pushing publishes them back and
/// refuses when someone else pushed in between. Urls never cloned before
/// behave as freshly created empty repositories.
#[derive(Debug, Default, Clone)]
pub struct MemoryRemote {
    remotes: Arc<RwLock<BTreeMap<String, RemoteState>>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put files on the remote out of band, as if another client pushed.
    pub async fn seed<P, C>(&self, url: &str, files: impl IntoIterator<Item = (P, C)>)
    where
        P: Into<String>,
        C: Into<Vec<u8>>,
    {
        let mut remotes = self.remotes.write().await;
        let state = remotes.entry(url.to_string()).or_default();
        for (path, content) in files {
            state.files.insert(path.into(), content.into());
        }
        state.head += 1;
    }

    /// Every file currently on the remote.
    pub async fn files(&self, url: &str) -> BTreeMap<String, Vec<u8>> {
        let remotes = self.remotes.read().await;
        remotes.get(url).map(|s| s.files.clone()).unwrap_or_default()
    }

    /// One remote file as text, if present and valid UTF-8.
    pub async fn file_text(&self, url: &str, path: &str) -> Option<String> {
        let remotes = self.remotes.read().await;
        let bytes = remotes.get(url)?.files.get(path)?.clone();
        String::from_utf8(bytes).ok()
    }

    /// Commits accepted so far, oldest first.
    pub async fn commits(&self, url: &str) -> Vec<CommitRecord> {
        let remotes = self.remotes.read().await;
        remotes.get(url).map(|s| s.commits.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RepositoryProvider for MemoryRemote {
    type Repo = MemoryRepository;

    async fn clone_repository(&self, url: &str, _auth: &AuthConfig) -> Result<MemoryRepository> {
        let remotes = self.remotes.read().await;
        let state = remotes.get(url).cloned().unwrap_or_default();
        Ok(MemoryRepository {
            registry: self.clone(),
            url: url.to_string(),
            base_head: RwLock::new(state.head),
            files: RwLock::new(state.files),
            pending: RwLock::new(Vec::new()),
        })
    }
}

/// One cloned working copy of an in-memory remote.
#[derive(Debug)]
pub struct MemoryRepository {
    registry: MemoryRemote,
    url: String,
    base_head: RwLock<u64>,
    files: RwLock<BTreeMap<String, Vec<u8>>>,
    pending: RwLock<Vec<CommitRecord>>,
}

#[async_trait]
impl TreeStore for MemoryRepository {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.read().await;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(path.to_string()))
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let mut files = self.files.write().await;
        files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let mut files = self.files.write().await;
        files.remove(path);
        Ok(())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let files = self.files.read().await;
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let mut seen: BTreeMap<String, EntryKind> = BTreeMap::new();
        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.split_once('/') {
                Some((first, _)) => {
                    seen.insert(first.to_string(), EntryKind::Directory);
                }
                None => {
                    seen.entry(rest.to_string()).or_insert(EntryKind::File);
                }
            }
        }
        Ok(seen
            .into_iter()
            .map(|(name, kind)| DirEntry { name, kind })
            .collect())
    }

    async fn exists(&self, path: &str) -> bool {
        let files = self.files.read().await;
        if files.contains_key(path) {
            return true;
        }
        let prefix = format!("{path}/");
        files.keys().any(|k| k.starts_with(&prefix))
    }
}

#[async_trait]
impl RepositoryGateway for MemoryRepository {
    async fn commit(&self, message: &str, author: &CommitAuthor) -> Result<CommitId> {
        let base = *self.base_head.read().await;
        let mut pending = self.pending.write().await;
        let seq = (u128::from(base) << 32) | (pending.len() as u128 + 1);
        let id = CommitId(format!("{seq:040x}"));
        pending.push(CommitRecord {
            id: id.clone(),
            message: message.to_string(),
            author: author.clone(),
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn push(&self, force: bool) -> Result<()> {
        let mut remotes = self.registry.remotes.write().await;
        let state = remotes.entry(self.url.clone()).or_default();
        let base = *self.base_head.read().await;
        if !force && state.head != base {
            return Err(GatewayError::RejectedNonFastForward);
        }
        state.files = self.files.read().await.clone();
        state.commits.extend(self.pending.write().await.drain(..));
        state.head += 1;
        *self.base_head.write().await = state.head;
        Ok(())
    }
}
