//! # Tree Queries
//!
//! Read-only helpers over a page tree (`&[Arc<Node>]`). Lookups are by node
//! id; every helper walks depth-first in child order.

use crate::id_generator::IdGenerator;
use crate::node::Node;
use std::sync::Arc;

/// Position of a node: its parent (`None` at root level) and sibling index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub parent_id: Option<String>,
    pub index: usize,
}

/// The Body root, if the tree has one
pub fn body(tree: &[Arc<Node>]) -> Option<&Arc<Node>> {
    tree.first().filter(|node| node.is_body())
}

pub fn find_node<'a>(tree: &'a [Arc<Node>], id: &str) -> Option<&'a Arc<Node>> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(tree: &[Arc<Node>], id: &str) -> bool {
    find_node(tree, id).is_some()
}

/// Where `id` sits in the tree
pub fn locate(tree: &[Arc<Node>], id: &str) -> Option<Location> {
    if let Some(index) = tree.iter().position(|n| n.id == id) {
        return Some(Location {
            parent_id: None,
            index,
        });
    }
    locate_in_children(tree, id)
}

fn locate_in_children(nodes: &[Arc<Node>], id: &str) -> Option<Location> {
    for node in nodes {
        if let Some(index) = node.children.iter().position(|c| c.id == id) {
            return Some(Location {
                parent_id: Some(node.id.clone()),
                index,
            });
        }
        if let Some(found) = locate_in_children(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Sibling indices from the root down to `id`
pub fn node_path(tree: &[Arc<Node>], id: &str) -> Option<Vec<usize>> {
    for (index, node) in tree.iter().enumerate() {
        if node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = node_path(&node.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Ids of every node below `node` (not including `node` itself)
pub fn descendant_ids(node: &Node) -> Vec<String> {
    let mut ids = Vec::new();
    walk(&node.children, &mut |child, _| ids.push(child.id.clone()));
    ids
}

/// True if `candidate_id` lies strictly inside the subtree of `ancestor_id`
pub fn is_descendant(tree: &[Arc<Node>], ancestor_id: &str, candidate_id: &str) -> bool {
    match find_node(tree, ancestor_id) {
        Some(ancestor) => find_node(&ancestor.children, candidate_id).is_some(),
        None => false,
    }
}

pub fn count_nodes(tree: &[Arc<Node>]) -> usize {
    let mut count = 0;
    walk(tree, &mut |_, _| count += 1);
    count
}

/// Pre-order traversal; the callback receives each node and its depth
pub fn walk<F>(tree: &[Arc<Node>], visit: &mut F)
where
    F: FnMut(&Node, usize),
{
    walk_at(tree, 0, visit);
}

fn walk_at<F>(nodes: &[Arc<Node>], depth: usize, visit: &mut F)
where
    F: FnMut(&Node, usize),
{
    for node in nodes {
        visit(node, depth);
        walk_at(&node.children, depth + 1, visit);
    }
}

/// Deep copy of `node` with a fresh id on every node of the subtree.
///
/// Kinds, props, styles, metadata and child order are preserved.
pub fn regenerate_ids(node: &Node, ids: &mut IdGenerator) -> Node {
    Node {
        id: ids.new_id(node.kind.as_str()),
        kind: node.kind.clone(),
        props: node.props.clone(),
        styles: node.styles.clone(),
        metadata: node.metadata.clone(),
        children: node
            .children
            .iter()
            .map(|child| Arc::new(regenerate_ids(child, ids)))
            .collect(),
    }
}

/// Structural equality that ignores ids
pub fn same_shape(a: &Node, b: &Node) -> bool {
    a.kind == b.kind
        && a.props == b.props
        && a.styles == b.styles
        && a.metadata == b.metadata
        && a.children.len() == b.children.len()
        && a.children
            .iter()
            .zip(&b.children)
            .all(|(x, y)| same_shape(x, y))
}
