//! Path conventions inside a lowered project tree

use grove_core::{Language, ProjectId};

/// Directory under the repository root holding one tree per project.
pub const PROJECTS_ROOT: &str = "grove";

/// The config document, at the project tree root.
pub const CONFIG_DOC_PATH: &str = "project.yaml";

/// Directory holding one subdirectory per compute block.
pub const BLOCKS_DIR: &str = "blocks";

/// Directory holding shared file bodies.
pub const SHARED_FILES_DIR: &str = "shared-files";

pub const README_PATH: &str = "README.md";

/// Base name of the code file inside a block directory.
pub const BLOCK_CODE_STEM: &str = "block_code";

/// Repository-relative root of one project's tree.
pub fn project_root(project: ProjectId) -> String {
    format!("{PROJECTS_ROOT}/{project}")
}

/// File name of a compute block's code file.
pub fn block_code_filename(language: Language) -> String {
    format!("{BLOCK_CODE_STEM}.{}", language.file_extension())
}

/// Tree path of the code file for a compute block in directory `dir`.
pub fn block_code_path(dir: &str, language: Language) -> String {
    format!("{BLOCKS_DIR}/{dir}/{}", block_code_filename(language))
}

/// Tree path of a shared file stored as `file_name`.
pub fn shared_file_path(file_name: &str) -> String {
    format!("{SHARED_FILES_DIR}/{file_name}")
}
