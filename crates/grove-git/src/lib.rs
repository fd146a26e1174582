//! Grove Git — repository gateways and the guarded push flow
//!
//! The compiler never talks to a real transport. This crate defines the
//! capability traits it goes through, an in-memory implementation for
//! tests and local development, a plain-directory store for the CLI, and
//! the serialized push flow that refuses to overwrite divergent remotes.

pub mod gateway;
pub mod local;
pub mod memory;
pub mod sync;

pub use gateway::{
    AuthConfig, CommitAuthor, CommitId, DirEntry, EntryKind, GatewayError, RepositoryGateway,
    RepositoryProvider, TreeStore,
};
pub use local::LocalTreeStore;
pub use memory::{MemoryRemote, MemoryRepository};
pub use sync::{
    PushCoordinator, PushOptions, PushOutcome, PushReport, SyncError, read_tree, write_tree,
};
