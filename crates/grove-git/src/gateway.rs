//! Capability traits for repository storage and transport

use async_trait::async_trait;

/// Kinds of entries a directory listing can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Identity recorded on commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl Default for CommitAuthor {
    /// The bot identity compiled commits are recorded under.
    fn default() -> Self {
        Self {
            name: "Grove Bot".to_string(),
            email: "donotreply@grove.dev".to_string(),
        }
    }
}

/// Opaque commit handle returned by [`RepositoryGateway::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(pub String);

/// Credentials for talking to a remote.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub username: String,
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("path not found: {0}")]
    NotFound(String),

    /// The path escapes the store root or is otherwise unusable.
    #[error("path refused: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Transport failures pass through untranslated; whether to retry is
    /// the caller's decision.
    #[error("transport: {0}")]
    Transport(String),

    /// The remote moved ahead, so a plain push cannot land.
    #[error("push rejected: remote is not a fast-forward")]
    RejectedNonFastForward,
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Read and write access to a file tree, independent of what backs it.
///
/// Paths are `/`-separated and relative to the store root. Listing a
/// directory that does not exist yields an empty vec, and deleting a file
/// that does not exist is a no-op; only reads distinguish missing paths.
#[async_trait]
pub trait TreeStore: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Write `content` at `path`, creating parent directories as needed.
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<()>;

    async fn delete_file(&self, path: &str) -> Result<()>;

    async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>>;

    async fn exists(&self, path: &str) -> bool;
}

/// A cloned working copy that can record commits and publish them.
#[async_trait]
pub trait RepositoryGateway: TreeStore {
    /// Record everything written so far as a commit.
    async fn commit(&self, message: &str, author: &CommitAuthor) -> Result<CommitId>;

    /// Publish recorded commits to the remote. Fails with
    /// [`GatewayError::RejectedNonFastForward`] when the remote moved
    /// since cloning; `force` overwrites it anyway.
    async fn push(&self, force: bool) -> Result<()>;
}

/// Opens working copies of remote repositories.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    type Repo: RepositoryGateway;

    async fn clone_repository(&self, url: &str, auth: &AuthConfig) -> Result<Self::Repo>;
}
