use crate::node::Node;
use crate::tree;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Position in the page list, rewritten on reorder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

/// A routable page holding one Body-rooted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub name: String,

    /// Unique within a project, stored without the leading `/`.
    /// Derived from `name` on import when absent.
    #[serde(default)]
    pub slug: String,

    /// Empty, or exactly one `Body` node
    pub tree: Vec<Arc<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
}

impl Page {
    /// New page with an empty tree
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            tree: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_root(mut self, root: Node) -> Self {
        self.tree = vec![Arc::new(root)];
        self
    }

    /// Routing path, e.g. `/about`
    pub fn route(&self) -> String {
        format!("/{}", self.slug)
    }

    pub fn body(&self) -> Option<&Arc<Node>> {
        tree::body(&self.tree)
    }

    pub fn find_node(&self, id: &str) -> Option<&Arc<Node>> {
        tree::find_node(&self.tree, id)
    }

    pub fn order(&self) -> Option<usize> {
        self.metadata.as_ref().and_then(|m| m.order)
    }

    pub fn set_order(&mut self, order: usize) {
        self.metadata.get_or_insert_with(PageMetadata::default).order = Some(order);
    }
}
