//! Long mutation sequences against the store
//!
//! This tests:
//! - Document invariants after every step of random edit sequences
//! - Selection always pointing at something that exists
//! - Undo all the way back / redo all the way forward
//! - Cycle rejection for every ancestor/descendant pair

use pagecraft_document::{tree, validate_project, ComponentKind, IdGenerator, Project};
use pagecraft_editor::{BuilderStore, EditorConfig, MutationError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

const KINDS: [ComponentKind; 7] = [
    ComponentKind::Section,
    ComponentKind::Div,
    ComponentKind::Text,
    ComponentKind::Image,
    ComponentKind::Button,
    ComponentKind::Container,
    ComponentKind::Body,
];

fn store(seed: &str) -> BuilderStore {
    let mut ids = IdGenerator::sequential(seed);
    let project = Project::blank("Site", &mut ids);
    BuilderStore::new(project, EditorConfig::default()).with_ids(ids)
}

fn active_ids(store: &BuilderStore) -> Vec<String> {
    let mut ids = Vec::new();
    if let Some(page) = store.active_page() {
        tree::walk(&page.tree, &mut |node, _| ids.push(node.id.clone()));
    }
    ids
}

fn pick(rng: &mut StdRng, ids: &[String]) -> Option<String> {
    ids.choose(rng).cloned()
}

/// One random command; rejections are expected and ignored
fn random_step(store: &mut BuilderStore, rng: &mut StdRng) {
    let ids = active_ids(store);
    let kind = KINDS[rng.gen_range(0..KINDS.len())].clone();

    match rng.gen_range(0..14) {
        0 | 1 | 2 => {
            let parent = if rng.gen_bool(0.3) { None } else { pick(rng, &ids) };
            let _ = store.add_node(parent.as_deref(), kind, None);
        }
        3 => {
            if let Some(id) = pick(rng, &ids) {
                let _ = store.delete_node(&id);
            }
        }
        4 => {
            if let Some(id) = pick(rng, &ids) {
                let _ = store.duplicate_node(&id);
            }
        }
        5 | 6 => {
            if let (Some(node), Some(parent)) = (pick(rng, &ids), pick(rng, &ids)) {
                let _ = store.move_node(&node, Some(&parent), rng.gen_range(0..4));
            }
        }
        7 => {
            if let Some(id) = pick(rng, &ids) {
                let _ = store.wrap_in_container(&id, kind);
            }
        }
        8 => {
            if let Some(id) = pick(rng, &ids) {
                let _ = store.lock_node(&id, rng.gen_bool(0.5));
            }
        }
        9 => {
            if let Some(id) = pick(rng, &ids) {
                let mut props = serde_json::Map::new();
                props.insert("text".to_string(), json!(rng.gen::<u32>()));
                let _ = store.update_node_props(&id, props);
            }
        }
        10 => {
            store.undo();
        }
        11 => {
            store.redo();
        }
        12 => {
            if let Some(id) = pick(rng, &ids) {
                let _ = store.copy_node(&id);
            }
            let parent = pick(rng, &ids);
            let _ = store.paste_node(parent.as_deref(), None);
        }
        _ => {
            if rng.gen_bool(0.5) {
                let _ = store.add_page("Page", None);
            } else {
                let pages: Vec<String> = store.project().pages.iter().map(|p| p.id.clone()).collect();
                if let Some(id) = pick(rng, &pages) {
                    let _ = store.set_active_page(&id);
                }
            }
        }
    }
}

fn assert_consistent(store: &BuilderStore) {
    validate_project(store.project()).unwrap();

    let page = store.active_page().expect("an active page always exists");
    if let Some(node_id) = store.selection().selected_node_id() {
        assert!(page.find_node(node_id).is_some(), "dangling selection {}", node_id);
    }
    assert!(store.history().len() <= store.config().max_history_size);
}

#[test]
fn test_random_sequences_preserve_invariants() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = store(&format!("s{}", seed));

        for _ in 0..150 {
            random_step(&mut store, &mut rng);
            assert_consistent(&store);
        }
    }
}

#[test]
fn test_undo_everything_then_redo_everything() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut store = store("u");
    let initial = store.project().clone();

    // Fewer commits than the history bound, so nothing is evicted
    for _ in 0..30 {
        random_step(&mut store, &mut rng);
    }

    while store.undo() {
        assert_consistent(&store);
    }
    assert_eq!(store.project(), &initial);

    while store.redo() {
        assert_consistent(&store);
    }
    assert_eq!(Some(store.project()), store.history().entries().last());
}

#[test]
fn test_no_node_moves_into_its_subtree() {
    let mut store = store("c");
    let section = store.add_node(None, ComponentKind::Section, None).unwrap().unwrap();
    let div = store.add_node(Some(&section), ComponentKind::Div, None).unwrap().unwrap();
    let inner = store.add_node(Some(&div), ComponentKind::Container, None).unwrap().unwrap();
    store.add_node(Some(&inner), ComponentKind::Text, None).unwrap();
    store.add_node(Some(&div), ComponentKind::Button, None).unwrap();

    let before = store.project().clone();
    let page = before.pages[0].clone();
    let mut nodes = Vec::new();
    tree::walk(&page.tree, &mut |node, _| nodes.push(node.clone()));

    for node in nodes.iter().filter(|n| !n.is_body()) {
        let mut targets = tree::descendant_ids(node);
        targets.push(node.id.clone());

        for target in targets {
            let result = store.move_node(&node.id, Some(&target), 0);
            assert!(
                matches!(result, Err(MutationError::CycleDetected { .. })),
                "{} into {}",
                node.id,
                target
            );
            assert_eq!(store.project(), &before);
        }
    }
}

#[test]
fn test_move_then_delete_sequence() {
    let mut store = store("m");
    let first = store.add_node(None, ComponentKind::Div, None).unwrap().unwrap();
    let second = store.add_node(None, ComponentKind::Div, None).unwrap().unwrap();
    let text = store.add_node(Some(&second), ComponentKind::Text, None).unwrap().unwrap();

    store.move_node(&second, Some(&first), 0).unwrap();
    store.delete_node(&first).unwrap();

    let page = store.active_page().unwrap();
    assert!(page.find_node(&second).is_none());
    assert!(page.find_node(&text).is_none());

    // Undo the delete, then the move
    store.undo();
    assert!(store.active_page().unwrap().find_node(&text).is_some());
    store.undo();
    let body = store.active_page().unwrap().body().unwrap();
    assert_eq!(body.children.len(), 2);
    assert_eq!(body.children[1].id, second);
}
