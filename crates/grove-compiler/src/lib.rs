//! Grove Compiler — lowering, lifting, and divergence detection
//!
//! Bidirectional mapping between the in-memory project graph and the
//! directory tree stored in a repository. Lowering is deterministic,
//! lifting reconstructs an equivalent graph, and tree diffing guards
//! pushes against divergent remotes.

pub mod diff;
pub mod document;
pub mod error;
pub mod layout;
pub mod lift;
pub mod lower;
pub mod readme;
pub mod tree;



pub use diff::{FileChange, TreeDiff, diff_trees};
pub use document::{BlockEntry, LinkEntry, ProjectDocument, SharedFileEntry};
pub use error::CompileError;
pub use lift::lift;
pub use lower::lower;
pub use readme::{generated_readme, is_generated_readme};
pub use tree::RepositoryTree;
