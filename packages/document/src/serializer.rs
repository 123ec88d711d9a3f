//! # Project JSON
//!
//! Import and export of the project document. The same format is used for
//! save/load, file import/export and the enhancement round trip.
//!
//! Import runs in three stages so callers can tell failures apart:
//!
//! 1. parse: anything that is not JSON is [`ImportError::Malformed`]
//! 2. shape: required `id` / `name` / `pages` / `tree` fields
//! 3. invariants: Body-rooted trees, unique ids and slugs
//!
//! Stages 2 and 3 report [`ImportError::Structure`].

use crate::error::{ImportError, ImportResult};
use crate::node::Node;
use crate::project::Project;
use crate::slug::{slugify, unique_slug};
use crate::tree;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

impl Project {
    /// Parse and validate a project document
    pub fn from_json(source: &str) -> ImportResult<Project> {
        let value: Value = serde_json::from_str(source)?;
        Project::from_value(value)
    }

    /// Validate an already-parsed document
    pub fn from_value(value: Value) -> ImportResult<Project> {
        check_shape(&value)?;

        let mut project: Project = serde_json::from_value(value)
            .map_err(|e| ImportError::structure(e.to_string()))?;

        normalize(&mut project);
        validate_project(&project)?;

        debug!(
            project_id = %project.id,
            pages = project.pages.len(),
            "Imported project"
        );

        Ok(project)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn check_shape(value: &Value) -> ImportResult<()> {
    let project = value
        .as_object()
        .ok_or_else(|| ImportError::structure("project must be a JSON object"))?;

    for field in ["id", "name"] {
        if !project.get(field).map(Value::is_string).unwrap_or(false) {
            return Err(ImportError::structure(format!("project is missing `{}`", field)));
        }
    }

    let pages = project
        .get("pages")
        .and_then(Value::as_array)
        .ok_or_else(|| ImportError::structure("project is missing a `pages` array"))?;

    for (index, page) in pages.iter().enumerate() {
        let page = page
            .as_object()
            .ok_or_else(|| ImportError::structure(format!("page {} is not an object", index)))?;

        for field in ["id", "name"] {
            if !page.get(field).map(Value::is_string).unwrap_or(false) {
                return Err(ImportError::structure(format!(
                    "page {} is missing `{}`",
                    index, field
                )));
            }
        }

        if !page.get("tree").map(Value::is_array).unwrap_or(false) {
            return Err(ImportError::structure(format!(
                "page {} is missing a `tree` array",
                index
            )));
        }
    }

    Ok(())
}

/// Strip route slashes, derive slugs for pages that have none and drop
/// lock flags from Body roots
fn normalize(project: &mut Project) {
    for page in project.pages.iter_mut() {
        if let Some(stripped) = page.slug.strip_prefix('/') {
            page.slug = stripped.to_string();
        }
        for root in page.tree.iter_mut().filter(|root| root.is_body()) {
            unlock_body(root);
        }
    }

    for index in 0..project.pages.len() {
        if !project.pages[index].slug.is_empty() {
            continue;
        }

        let base = slugify(&project.pages[index].name);
        let taken: Vec<String> = project
            .pages
            .iter()
            .filter(|p| !p.slug.is_empty())
            .map(|p| p.slug.clone())
            .collect();

        project.pages[index].slug = unique_slug(&base, taken.iter().map(String::as_str));
    }
}

fn unlock_body(root: &mut std::sync::Arc<Node>) {
    let locked = root.metadata.as_ref().and_then(|m| m.locked).is_some();
    if !locked {
        return;
    }

    let root = std::sync::Arc::make_mut(root);
    if let Some(metadata) = root.metadata.as_mut() {
        metadata.locked = None;
        if metadata.is_empty() {
            root.metadata = None;
        }
    }
}

/// Check the structural invariants every live project must hold
pub fn validate_project(project: &Project) -> ImportResult<()> {
    if project.pages.is_empty() {
        return Err(ImportError::structure("project has no pages"));
    }

    let mut page_ids = HashSet::new();
    let mut slugs = HashSet::new();
    let mut node_ids = HashSet::new();

    for page in &project.pages {
        if !page_ids.insert(page.id.as_str()) {
            return Err(ImportError::structure(format!("duplicate page id `{}`", page.id)));
        }
        if !slugs.insert(page.slug.as_str()) {
            return Err(ImportError::structure(format!("duplicate slug `{}`", page.slug)));
        }

        if page.tree.len() > 1 {
            return Err(ImportError::structure(format!(
                "page `{}` has {} root nodes",
                page.id,
                page.tree.len()
            )));
        }

        if let Some(root) = page.tree.first() {
            if !root.is_body() {
                return Err(ImportError::structure(format!(
                    "page `{}` root is `{}`, expected `Body`",
                    page.id, root.kind
                )));
            }
            check_subtree(root, &mut node_ids)?;
        }
    }

    Ok(())
}

fn check_subtree(root: &Node, seen: &mut HashSet<String>) -> ImportResult<()> {
    if !seen.insert(root.id.clone()) {
        return Err(ImportError::structure(format!("duplicate node id `{}`", root.id)));
    }

    let mut result = Ok(());
    tree::walk(&root.children, &mut |node, _| {
        if result.is_err() {
            return;
        }
        if node.is_body() {
            result = Err(ImportError::structure(format!(
                "nested `Body` node `{}`",
                node.id
            )));
        } else if !seen.insert(node.id.clone()) {
            result = Err(ImportError::structure(format!(
                "duplicate node id `{}`",
                node.id
            )));
        }
    });
    result
}
