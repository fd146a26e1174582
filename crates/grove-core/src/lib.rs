//! Grove Core — project graph model, validation, and id remapping

pub mod id;
pub mod model;
pub mod remap;
pub mod slug;
pub mod validate;


#[cfg(test)]
pub mod test_utils;

pub use id::{BlockId, FileId, IdSource, ProjectId, RandomIdSource, RelationshipId, SequenceIdSource};
pub use model::{
    ApiEndpointConfig, Block, BlockConfig, BlockKind, ComputeConfig, DEFAULT_SCHEMA_VERSION,
    HttpMethod, Language, Project, QueueConfig, Relationship, RelationshipKind,
    ScheduleTriggerConfig, SharedFile, SharedFileLink,
};
pub use remap::{RemapError, RemapScope, remap_ids};
pub use slug::{slug, unique_directory, unique_file_name};
pub use validate::{ValidationReport, Violation};
