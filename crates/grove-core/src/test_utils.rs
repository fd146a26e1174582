//! Test fixtures for the project graph

use uuid::Uuid;

use crate::id::{BlockId, FileId, ProjectId, RelationshipId};
use crate::model::{
    Block, BlockConfig, BlockKind, DEFAULT_SCHEMA_VERSION, Language, Project, Relationship,
    RelationshipKind, SharedFile, SharedFileLink,
};

pub const SCHEMA: &str = DEFAULT_SCHEMA_VERSION;

/// Block with the given kind and a matching default config.
pub fn block(id: u128, kind: BlockKind, name: &str) -> Block {
    let language = match kind {
        BlockKind::ComputeFunction => Some(Language::Python36),
        _ => None,
    };
    Block {
        id: BlockId(Uuid::from_u128(id)),
        config: BlockConfig::default_for(&kind),
        kind,
        name: name.to_string(),
        schema_version: SCHEMA.to_string(),
        language,
        code: String::new(),
    }
}

/// Compute block carrying `code`.
pub fn compute_block(id: u128, name: &str, code: &str) -> Block {
    let mut b = block(id, BlockKind::ComputeFunction, name);
    b.code = code.to_string();
    b
}

pub fn relationship(id: u128, from: u128, kind: RelationshipKind, to: u128) -> Relationship {
    Relationship {
        id: RelationshipId(Uuid::from_u128(id)),
        from: BlockId(Uuid::from_u128(from)),
        to: BlockId(Uuid::from_u128(to)),
        kind,
        expression: None,
        schema_version: SCHEMA.to_string(),
    }
}

pub fn shared_file(id: u128, name: &str, body: &str) -> SharedFile {
    SharedFile {
        id: FileId(Uuid::from_u128(id)),
        name: name.to_string(),
        body: body.to_string(),
    }
}

pub fn link(file: u128, block: u128, path: &str) -> SharedFileLink {
    SharedFileLink {
        file_id: FileId(Uuid::from_u128(file)),
        block_id: BlockId(Uuid::from_u128(block)),
        path: path.to_string(),
    }
}

/// Linear three-block pipeline: endpoint, compute, response.
pub fn linear_project() -> Project {
    Project {
        project_id: ProjectId(Uuid::from_u128(0x10)),
        name: "Order Intake".to_string(),
        version: 1,
        readme: String::new(),
        blocks: vec![
            block(1, BlockKind::ApiEndpoint, "Receive Order"),
            compute_block(
                2,
                "Process Order",
                "def main(event, context):\n    return event\n",
            ),
            block(3, BlockKind::ApiResponse, "Order Reply"),
        ],
        relationships: vec![
            relationship(0xa1, 1, RelationshipKind::Then, 2),
            relationship(0xa2, 2, RelationshipKind::Then, 3),
        ],
        shared_files: vec![],
        shared_file_links: vec![],
    }
}

/// One shared file linked to two compute blocks at different paths.
pub fn shared_file_project() -> Project {
    Project {
        project_id: ProjectId(Uuid::from_u128(0x20)),
        name: "Shared Helpers".to_string(),
        version: 1,
        readme: String::new(),
        blocks: vec![
            compute_block(1, "First Step", "def main(event, context):\n    return 1\n"),
            compute_block(2, "Second Step", "def main(event, context):\n    return 2\n"),
        ],
        relationships: vec![relationship(0xa1, 1, RelationshipKind::Then, 2)],
        shared_files: vec![shared_file(0xf1, "helpers.py", "def helper():\n    pass\n")],
        shared_file_links: vec![link(0xf1, 1, ""), link(0xf1, 2, "lib")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        linear_project().validate().unwrap();
        shared_file_project().validate().unwrap();
    }
}
