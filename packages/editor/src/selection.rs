//! Active page, selected node and the single-slot clipboard.

use pagecraft_document::{tree, IdGenerator, Node, Project};

/// What the user is looking at and what they have selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active_page_id: Option<String>,
    selected_node_id: Option<String>,
}

impl Selection {
    pub fn new(active_page_id: Option<String>) -> Self {
        Self {
            active_page_id,
            selected_node_id: None,
        }
    }

    pub fn active_page_id(&self) -> Option<&str> {
        self.active_page_id.as_deref()
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selected_node_id.as_deref()
    }

    /// Switch pages; node selection never carries across pages
    pub fn set_active_page(&mut self, page_id: impl Into<String>) {
        self.active_page_id = Some(page_id.into());
        self.selected_node_id = None;
    }

    pub fn select(&mut self, node_id: Option<String>) {
        self.selected_node_id = node_id;
    }

    pub fn clear(&mut self) {
        self.selected_node_id = None;
    }

    /// Make the selection valid for `project` again.
    ///
    /// A missing active page falls back to the first page; a selected node
    /// that no longer exists on the active page is dropped.
    pub fn repair(&mut self, project: &Project) {
        let page_exists = self
            .active_page_id
            .as_deref()
            .map(|id| project.page(id).is_some())
            .unwrap_or(false);

        if !page_exists {
            self.active_page_id = project.pages.first().map(|p| p.id.clone());
            self.selected_node_id = None;
        }

        let node_exists = match (&self.active_page_id, &self.selected_node_id) {
            (Some(page_id), Some(node_id)) => project
                .page(page_id)
                .map(|page| tree::contains(&page.tree, node_id))
                .unwrap_or(false),
            _ => true,
        };

        if !node_exists {
            self.selected_node_id = None;
        }
    }
}

/// Holds one copied subtree
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entry: Option<Node>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `node`, with ids regenerated at copy time
    pub fn copy(&mut self, node: &Node, ids: &mut IdGenerator) {
        self.entry = Some(tree::regenerate_ids(node, ids));
    }

    /// A fresh copy of the clipboard content for insertion.
    ///
    /// Every call regenerates ids, so pasting twice never collides.
    pub fn paste(&self, ids: &mut IdGenerator) -> Option<Node> {
        self.entry
            .as_ref()
            .map(|node| tree::regenerate_ids(node, ids))
    }

    pub fn peek(&self) -> Option<&Node> {
        self.entry.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
