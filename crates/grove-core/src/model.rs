//! Core data structures for the project graph

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{BlockId, FileId, ProjectId, RelationshipId};

/// Schema version stamped on entities this build creates.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

/// Discriminates what kind of workflow step a block represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    // ── Executable ──────────────────────────────────────────
    ComputeFunction,

    // ── Messaging ───────────────────────────────────────────
    Queue,
    Topic,

    // ── Triggers and HTTP surface ───────────────────────────
    ScheduleTrigger,
    ApiEndpoint,
    ApiResponse,

    // ── Fallback ────────────────────────────────────────────
    /// Kind tag this build does not recognize. Parses losslessly and is
    /// rejected by validation, so a foreign tree produces a violation
    /// report instead of a parse error.
    Unknown(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::ComputeFunction => "compute-function",
            BlockKind::Queue => "queue",
            BlockKind::Topic => "topic",
            BlockKind::ScheduleTrigger => "schedule-trigger",
            BlockKind::ApiEndpoint => "api-endpoint",
            BlockKind::ApiResponse => "api-response",
            BlockKind::Unknown(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BlockKind::Unknown(_))
    }
}

impl From<String> for BlockKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "compute-function" => BlockKind::ComputeFunction,
            "queue" => BlockKind::Queue,
            "topic" => BlockKind::Topic,
            "schedule-trigger" => BlockKind::ScheduleTrigger,
            "api-endpoint" => BlockKind::ApiEndpoint,
            "api-response" => BlockKind::ApiResponse,
            _ => BlockKind::Unknown(tag),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Supported runtimes for compute blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "python2.7")]
    Python27,
    #[serde(rename = "python3.6")]
    Python36,
    #[serde(rename = "nodejs8.10")]
    Node810,
    #[serde(rename = "nodejs10.16.3")]
    Node10163,
    #[serde(rename = "php7.3")]
    Php73,
    #[serde(rename = "go1.12")]
    Go112,
    #[serde(rename = "ruby2.6.4")]
    Ruby264,
}

impl Language {
    /// File extension for code written in this runtime.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::Python27 | Language::Python36 => "py",
            Language::Node810 | Language::Node10163 => "js",
            Language::Php73 => "php",
            Language::Go112 => "go",
            Language::Ruby264 => "rb",
        }
    }
}

/// HTTP methods an API endpoint block can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Head,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

/// Settings for a compute block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Free-form environment variables, sorted for stable output.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    pub memory_mb: u32,
    pub timeout_seconds: u32,
    #[serde(default)]
    pub libraries: Vec<String>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            environment: BTreeMap::new(),
            memory_mb: 512,
            timeout_seconds: 30,
            libraries: Vec::new(),
        }
    }
}

/// Settings for a queue block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub batch_size: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { batch_size: 1 }
    }
}

/// Settings for a schedule trigger block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleTriggerConfig {
    /// Rate or cron expression, e.g. `rate(2 minutes)`.
    pub schedule_expression: String,
    #[serde(default)]
    pub description: String,
    /// Payload handed to the first downstream block on each firing.
    #[serde(default)]
    pub payload: String,
}

/// Settings for an API endpoint block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpointConfig {
    pub api_path: String,
    pub http_method: HttpMethod,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            api_path: "/".to_string(),
            http_method: HttpMethod::Get,
        }
    }
}

/// Per-kind configuration payload.
///
/// Tagged so each block kind gets exactly the settings that apply to it;
/// free-form maps live only inside [`ComputeConfig::environment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockConfig {
    Compute(ComputeConfig),
    Queue(QueueConfig),
    Topic,
    ScheduleTrigger(ScheduleTriggerConfig),
    ApiEndpoint(ApiEndpointConfig),
    ApiResponse,
}

impl BlockConfig {
    /// Default configuration for a block of `kind`. Unknown kinds get the
    /// empty topic payload.
    pub fn default_for(kind: &BlockKind) -> Self {
        match kind {
            BlockKind::ComputeFunction => BlockConfig::Compute(ComputeConfig::default()),
            BlockKind::Queue => BlockConfig::Queue(QueueConfig::default()),
            BlockKind::Topic | BlockKind::Unknown(_) => BlockConfig::Topic,
            BlockKind::ScheduleTrigger => {
                BlockConfig::ScheduleTrigger(ScheduleTriggerConfig::default())
            }
            BlockKind::ApiEndpoint => BlockConfig::ApiEndpoint(ApiEndpointConfig::default()),
            BlockKind::ApiResponse => BlockConfig::ApiResponse,
        }
    }
}

/// A single workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub name: String,
    pub schema_version: String,
    /// Runtime for compute blocks. `None` for kinds that carry no code.
    pub language: Option<Language>,
    /// Source text for compute blocks. Empty for kinds that carry no code.
    #[serde(default)]
    pub code: String,
    pub config: BlockConfig,
}

/// What kind of edge joins two blocks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    Then,
    If,
    Else,
    FanOut,
    FanIn,
    Exception,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Then => "then",
            RelationshipKind::If => "if",
            RelationshipKind::Else => "else",
            RelationshipKind::FanOut => "fan-out",
            RelationshipKind::FanIn => "fan-in",
            RelationshipKind::Exception => "exception",
        }
    }
}

/// A directed, typed edge between two blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub from: BlockId,
    pub to: BlockId,
    pub kind: RelationshipKind,
    /// Branch condition, used by `If` edges.
    #[serde(default)]
    pub expression: Option<String>,
    pub schema_version: String,
}

/// A file shared across blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    pub id: FileId,
    pub name: String,
    pub body: String,
}

/// Attaches a shared file to a block at a path relative to the block root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFileLink {
    pub file_id: FileId,
    pub block_id: BlockId,
    /// Directory inside the block where the file appears. Empty means the
    /// block root.
    #[serde(default)]
    pub path: String,
}

/// A complete workflow project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    pub name: String,
    pub version: u64,
    /// User-authored README body. Empty when the project has none.
    #[serde(default)]
    pub readme: String,
    pub blocks: Vec<Block>,
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub shared_files: Vec<SharedFile>,
    #[serde(default)]
    pub shared_file_links: Vec<SharedFileLink>,
}

impl Project {
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn shared_file(&self, id: FileId) -> Option<&SharedFile> {
        self.shared_files.iter().find(|f| f.id == id)
    }

    /// Relationship endpoints as `(from, kind, to)` triples, in declaration
    /// order. Relationship ids are regenerated across compilation, so
    /// structural comparisons go through this view.
    pub fn edges(&self) -> impl Iterator<Item = (BlockId, RelationshipKind, BlockId)> + '_ {
        self.relationships.iter().map(|r| (r.from, r.kind, r.to))
    }
}
