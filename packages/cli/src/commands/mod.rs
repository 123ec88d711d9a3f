pub mod add_page;
pub mod new;
pub mod pages;
pub mod tree;
pub mod validate;

pub use add_page::{add_page, AddPageArgs};
pub use new::{new, NewArgs};
pub use pages::{pages, PagesArgs};
pub use tree::{tree, TreeArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{Context, Result};
use pagecraft_document::Project;
use std::path::{Path, PathBuf};

/// Relative paths are taken from the working directory
fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn load_project(path: &Path) -> Result<Project> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Project::from_json(&source).with_context(|| format!("Invalid project {}", path.display()))
}
