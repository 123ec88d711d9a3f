//! # Tree Mutations
//!
//! Structural edits on a single page tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: every operation reads `&[Arc<Node>]` and returns a new tree
//!    inside an [`Edit`]; the input is never touched
//! 2. **Path copying**: only nodes between the root and the edited node are
//!    cloned (`Arc::make_mut`), everything else stays shared
//! 3. **Validated**: invariants are checked before anything is rebuilt, so a
//!    rejected mutation has no partial effect
//!
//! ## Invariants
//!
//! - A tree is empty or a single `Body` root; no other `Body` exists
//! - The `Body` root is never deleted, moved, duplicated, wrapped, renamed
//!   or (un)locked
//! - A node never ends up inside its own subtree
//! - Locked nodes accept nothing except unlock and cosmetic hints, and
//!   can't receive new children
//! - Ids survive every edit that doesn't create a node

use pagecraft_document::{tree, ComponentKind, IdGenerator, Node, NodeMetadata, Props, Styles};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Semantic mutations on the active page tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Create a node with its kind's defaults. `None` parent means the Body.
    AddNode {
        parent_id: Option<String>,
        kind: ComponentKind,
        index: Option<usize>,
    },

    /// Remove a node and its subtree
    DeleteNode { node_id: String },

    /// Deep copy placed directly after the source
    DuplicateNode { node_id: String },

    /// Re-parent a subtree. `None` parent means the Body.
    MoveNode {
        node_id: String,
        new_parent_id: Option<String>,
        index: usize,
    },

    /// Shallow-merge into props
    UpdateProps { node_id: String, props: Props },

    /// Shallow-merge into styles
    UpdateStyles { node_id: String, styles: Styles },

    /// Shallow-merge into metadata
    UpdateMetadata {
        node_id: String,
        metadata: NodeMetadata,
    },

    RenameNode { node_id: String, name: String },

    LockNode { node_id: String, locked: bool },

    /// Replace a node with a new container holding it
    WrapInContainer {
        node_id: String,
        container: ComponentKind,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Moving {node_id} into {parent_id} would create a cycle")]
    CycleDetected { node_id: String, parent_id: String },

    #[error("Body root {0} cannot be changed this way")]
    BodyProtected(String),

    #[error("Node is locked: {0}")]
    Locked(String),

    #[error("Cannot wrap in {0}")]
    InvalidContainer(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("No active page")]
    NoActivePage,

    #[error("Clipboard is empty")]
    ClipboardEmpty,
}

/// Outcome of a successful mutation
#[derive(Debug, Clone)]
pub struct Edit {
    /// The new page tree
    pub tree: Vec<Arc<Node>>,

    /// Node to select afterwards; `None` leaves the selection alone
    pub selection: Option<String>,

    /// False when the request resolved to nothing to do
    pub changed: bool,
}

impl Edit {
    fn changed(tree: Vec<Arc<Node>>, selection: Option<String>) -> Self {
        Self {
            tree,
            selection,
            changed: true,
        }
    }

    fn unchanged(tree: &[Arc<Node>], selection: Option<String>) -> Self {
        Self {
            tree: tree.to_vec(),
            selection,
            changed: false,
        }
    }
}

impl Mutation {
    /// Apply to `tree` with validation
    pub fn apply(&self, tree: &[Arc<Node>], ids: &mut IdGenerator) -> Result<Edit, MutationError> {
        match self {
            Mutation::AddNode {
                parent_id,
                kind,
                index,
            } => add_node(tree, parent_id.as_deref(), kind.clone(), *index, ids),

            Mutation::DeleteNode { node_id } => delete_node(tree, node_id),

            Mutation::DuplicateNode { node_id } => duplicate_node(tree, node_id, ids),

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => move_node(tree, node_id, new_parent_id.as_deref(), *index),

            Mutation::UpdateProps { node_id, props } => update_node_props(tree, node_id, props),

            Mutation::UpdateStyles { node_id, styles } => {
                update_node_styles(tree, node_id, styles)
            }

            Mutation::UpdateMetadata { node_id, metadata } => {
                update_node_metadata(tree, node_id, metadata)
            }

            Mutation::RenameNode { node_id, name } => rename_node(tree, node_id, name),

            Mutation::LockNode { node_id, locked } => lock_node(tree, node_id, *locked),

            Mutation::WrapInContainer { node_id, container } => {
                wrap_in_container(tree, node_id, container.clone(), ids)
            }
        }
    }

    /// Whether a committed application deserves its own undo step.
    ///
    /// Tree-view collapse and inline-editor toggles are UI state and never
    /// get a snapshot of their own.
    pub fn is_undo_significant(&self) -> bool {
        match self {
            Mutation::UpdateMetadata { metadata, .. } => !metadata.is_cosmetic(),
            _ => true,
        }
    }

    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddNode { .. } => "add_node",
            Mutation::DeleteNode { .. } => "delete_node",
            Mutation::DuplicateNode { .. } => "duplicate_node",
            Mutation::MoveNode { .. } => "move_node",
            Mutation::UpdateProps { .. } => "update_props",
            Mutation::UpdateStyles { .. } => "update_styles",
            Mutation::UpdateMetadata { .. } => "update_metadata",
            Mutation::RenameNode { .. } => "rename_node",
            Mutation::LockNode { .. } => "lock_node",
            Mutation::WrapInContainer { .. } => "wrap_in_container",
        }
    }
}

/// Create a node of `kind` under `parent_id` (or the Body).
///
/// An empty tree gets its Body root first. A request for a second Body
/// resolves to the existing one: nothing is inserted and the Body becomes
/// the selection.
pub fn add_node(
    tree: &[Arc<Node>],
    parent_id: Option<&str>,
    kind: ComponentKind,
    index: Option<usize>,
    ids: &mut IdGenerator,
) -> Result<Edit, MutationError> {
    if kind.is_body() {
        if let Some(body) = tree::body(tree) {
            return Ok(Edit::unchanged(tree, Some(body.id.clone())));
        }
        ensure_empty_or_rooted(tree)?;

        let root = Node::new(ids.new_id(kind.as_str()), kind);
        let root_id = root.id.clone();
        return Ok(Edit::changed(vec![Arc::new(root)], Some(root_id)));
    }

    let node = Node::new(ids.new_id(kind.as_str()), kind);
    insert_subtree(tree, parent_id, node, index, ids)
}

/// Insert an already-built subtree under `parent_id` (or the Body),
/// creating the Body root when the tree is empty. Selects the inserted node.
pub fn insert_subtree(
    tree: &[Arc<Node>],
    parent_id: Option<&str>,
    node: Node,
    index: Option<usize>,
    ids: &mut IdGenerator,
) -> Result<Edit, MutationError> {
    if node.is_body() {
        return Err(MutationError::InvalidStructure(
            "a page can only have one Body".to_string(),
        ));
    }

    let mut next = tree.to_vec();

    let parent_id = match parent_id {
        Some(id) => id.to_string(),
        None => match tree::body(tree) {
            Some(body) => body.id.clone(),
            None => {
                ensure_empty_or_rooted(tree)?;
                let root = Node::new(ids.new_id("body"), ComponentKind::Body);
                let root_id = root.id.clone();
                next.push(Arc::new(root));
                root_id
            }
        },
    };

    let parent = find_node_mut(&mut next, &parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    if parent.is_locked() {
        return Err(MutationError::Locked(parent_id));
    }

    let node_id = node.id.clone();
    let at = index
        .unwrap_or(parent.children.len())
        .min(parent.children.len());
    parent.children.insert(at, Arc::new(node));

    Ok(Edit::changed(next, Some(node_id)))
}

/// Remove a node and everything below it
pub fn delete_node(tree: &[Arc<Node>], node_id: &str) -> Result<Edit, MutationError> {
    let node = find_editable(tree, node_id)?;
    if node.is_body() {
        return Err(MutationError::BodyProtected(node_id.to_string()));
    }

    let mut next = tree.to_vec();
    detach(&mut next, node_id)?;

    Ok(Edit::changed(next, None))
}

/// Deep copy with fresh ids, inserted right after the source
pub fn duplicate_node(
    tree: &[Arc<Node>],
    node_id: &str,
    ids: &mut IdGenerator,
) -> Result<Edit, MutationError> {
    let node = tree::find_node(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    if node.is_body() {
        return Err(MutationError::BodyProtected(node_id.to_string()));
    }

    let location = tree::locate(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    let parent_id = location.parent_id.ok_or_else(|| {
        MutationError::InvalidStructure(format!("{} sits beside the Body root", node_id))
    })?;

    let clone = tree::regenerate_ids(node, ids);
    let clone_id = clone.id.clone();

    let mut next = tree.to_vec();
    let parent = find_node_mut(&mut next, &parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    if parent.is_locked() {
        return Err(MutationError::Locked(parent_id));
    }
    parent.children.insert(location.index + 1, Arc::new(clone));

    Ok(Edit::changed(next, Some(clone_id)))
}

/// Re-parent `node_id` under `new_parent_id` (or the Body) at `index`.
///
/// `index` is a position among the new parent's children after the node
/// has been detached, clamped to the end.
pub fn move_node(
    tree: &[Arc<Node>],
    node_id: &str,
    new_parent_id: Option<&str>,
    index: usize,
) -> Result<Edit, MutationError> {
    let node = find_editable(tree, node_id)?;
    if node.is_body() {
        return Err(MutationError::BodyProtected(node_id.to_string()));
    }

    let parent_id = match new_parent_id {
        Some(id) => id.to_string(),
        None => tree::body(tree)
            .map(|body| body.id.clone())
            .ok_or_else(|| MutationError::InvalidStructure("tree has no Body".to_string()))?,
    };

    if parent_id == node_id || tree::descendant_ids(node).contains(&parent_id) {
        return Err(MutationError::CycleDetected {
            node_id: node_id.to_string(),
            parent_id,
        });
    }

    let parent = tree::find_node(tree, &parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    if parent.is_locked() {
        return Err(MutationError::Locked(parent_id));
    }

    let source = tree::locate(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    if source.parent_id.as_deref() == Some(parent_id.as_str()) {
        let remaining = parent.children.len().saturating_sub(1);
        if index.min(remaining) == source.index {
            return Ok(Edit::unchanged(tree, Some(node_id.to_string())));
        }
    }

    let mut next = tree.to_vec();
    let moved = detach(&mut next, node_id)?;

    let parent = find_node_mut(&mut next, &parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    let at = index.min(parent.children.len());
    parent.children.insert(at, moved);

    Ok(Edit::changed(next, Some(node_id.to_string())))
}

pub fn update_node_props(
    tree: &[Arc<Node>],
    node_id: &str,
    props: &Props,
) -> Result<Edit, MutationError> {
    find_editable(tree, node_id)?;

    let mut next = tree.to_vec();
    let node = find_node_mut(&mut next, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    node.props
        .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(Edit::changed(next, None))
}

pub fn update_node_styles(
    tree: &[Arc<Node>],
    node_id: &str,
    styles: &Styles,
) -> Result<Edit, MutationError> {
    find_editable(tree, node_id)?;

    let mut next = tree.to_vec();
    let node = find_node_mut(&mut next, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    node.styles
        .extend(styles.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(Edit::changed(next, None))
}

/// Shallow-merge `patch` into the node's metadata.
///
/// Locked nodes only take `locked` and cosmetic hints. The Body keeps its
/// name and lock state.
pub fn update_node_metadata(
    tree: &[Arc<Node>],
    node_id: &str,
    patch: &NodeMetadata,
) -> Result<Edit, MutationError> {
    let node = tree::find_node(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

    if patch.is_empty() {
        return Ok(Edit::unchanged(tree, None));
    }
    if node.is_body() && (patch.name.is_some() || patch.locked.is_some()) {
        return Err(MutationError::BodyProtected(node_id.to_string()));
    }
    if node.is_locked() && !patch.only_lock_or_cosmetic() {
        return Err(MutationError::Locked(node_id.to_string()));
    }

    let mut next = tree.to_vec();
    let node = find_node_mut(&mut next, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    node.merge_metadata(patch);

    Ok(Edit::changed(next, None))
}

pub fn rename_node(tree: &[Arc<Node>], node_id: &str, name: &str) -> Result<Edit, MutationError> {
    let patch = NodeMetadata {
        name: Some(name.to_string()),
        ..Default::default()
    };
    update_node_metadata(tree, node_id, &patch)
}

pub fn lock_node(tree: &[Arc<Node>], node_id: &str, locked: bool) -> Result<Edit, MutationError> {
    let patch = NodeMetadata {
        locked: Some(locked),
        ..Default::default()
    };
    update_node_metadata(tree, node_id, &patch)
}

/// Put a new `container` where `node_id` is and move the node inside it.
/// The wrapped subtree keeps its ids. Selects the container.
pub fn wrap_in_container(
    tree: &[Arc<Node>],
    node_id: &str,
    container: ComponentKind,
    ids: &mut IdGenerator,
) -> Result<Edit, MutationError> {
    if container.is_body() {
        return Err(MutationError::InvalidContainer(container.to_string()));
    }

    let node = find_editable(tree, node_id)?;
    if node.is_body() {
        return Err(MutationError::BodyProtected(node_id.to_string()));
    }

    let location = tree::locate(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    let parent_id = location.parent_id.ok_or_else(|| {
        MutationError::InvalidStructure(format!("{} sits beside the Body root", node_id))
    })?;

    let mut wrapper = Node::new(ids.new_id(container.as_str()), container);
    wrapper.children.push(Arc::clone(node));
    let wrapper_id = wrapper.id.clone();

    let mut next = tree.to_vec();
    let parent = find_node_mut(&mut next, &parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
    if parent.is_locked() {
        return Err(MutationError::Locked(parent_id));
    }
    parent.children[location.index] = Arc::new(wrapper);

    Ok(Edit::changed(next, Some(wrapper_id)))
}

/// Look up a node that may be changed: present and not locked
fn find_editable<'a>(tree: &'a [Arc<Node>], node_id: &str) -> Result<&'a Arc<Node>, MutationError> {
    let node = tree::find_node(tree, node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    if node.is_locked() {
        return Err(MutationError::Locked(node_id.to_string()));
    }
    Ok(node)
}

fn ensure_empty_or_rooted(tree: &[Arc<Node>]) -> Result<(), MutationError> {
    if tree.is_empty() || tree::body(tree).is_some() {
        Ok(())
    } else {
        Err(MutationError::InvalidStructure(
            "tree root is not a Body".to_string(),
        ))
    }
}

/// Mutable access to `id`, cloning each shared node along the way
fn find_node_mut<'a>(nodes: &'a mut [Arc<Node>], id: &str) -> Option<&'a mut Node> {
    let path = tree::node_path(nodes, id)?;
    let (first, rest) = path.split_first()?;

    let mut slot = nodes.get_mut(*first)?;
    for index in rest {
        slot = Arc::make_mut(slot).children.get_mut(*index)?;
    }
    Some(Arc::make_mut(slot))
}

/// Unlink `id` from its parent and hand back the subtree
fn detach(nodes: &mut Vec<Arc<Node>>, id: &str) -> Result<Arc<Node>, MutationError> {
    let location =
        tree::locate(nodes, id).ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;

    match location.parent_id {
        None => Ok(nodes.remove(location.index)),
        Some(parent_id) => {
            let parent = find_node_mut(nodes, &parent_id)
                .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
            Ok(parent.children.remove(location.index))
        }
    }
}
