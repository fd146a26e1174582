//! Generated README for projects without a user-authored one

use grove_core::ProjectId;

/// README body written when the project carries no README of its own.
///
/// The import link names the project id; the repository URL is not known
/// at lowering time, so the link keeps a placeholder for it.
pub fn generated_readme(name: &str, project: ProjectId) -> String {
    format!(
        "# {name}

This repository holds a [Grove](https://github.com/grove-editor/grove) project.

## Import

[Open in Grove](https://app.grove.dev/import?i={project}&r=<repository-url>)

Replace `<repository-url>` with the URL this repository is served from, or
open the Grove editor, choose *Import from repository*, and paste the URL
there.

## Layout

- `project.yaml` describes every block and how they connect.
- `blocks/` holds one directory per compute block, each with its code file.
- `shared-files/` holds files reused across blocks.
"
    )
}

/// Whether `content` is exactly the README this build would generate for a
/// project called `name` with id `project`. Used when lifting, so a
/// placeholder README maps back to an empty one instead of becoming user
/// content.
pub fn is_generated_readme(content: &str, name: &str, project: ProjectId) -> bool {
    content == generated_readme(name, project)
}
