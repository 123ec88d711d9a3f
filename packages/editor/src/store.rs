//! # Builder Store
//!
//! The single owner of editor state: the live project, selection,
//! clipboard, undo history, id generator and subscribed observers.
//!
//! Every command follows the same path:
//!
//! ```text
//! command -> pure edit (mutations / pages) -> commit -> history -> observers
//!                 |
//!                 +-- Err: logged, state untouched
//! ```
//!
//! A commit stamps `updatedAt`, replaces the project, records a snapshot
//! when the change is undo-significant, repairs the selection and then
//! notifies observers.

use crate::collaborators::{
    EnhancementOutcome, EnhancementRequest, EnhancementTicket, Enhancer, ExportArtifact, Exporter,
    ProjectObserver, ProjectSink, SaveResult,
};
use crate::config::EditorConfig;
use crate::mutations::{self, Edit, Mutation, MutationError};
use crate::pages::{self, PageEdit, PageError};
use crate::selection::{Clipboard, Selection};
use crate::undo_stack::UndoStack;
use pagecraft_document::{
    slugify, tree, validate_project, ComponentKind, IdGenerator, ImportError, Node, NodeMetadata,
    Page, PageMetadata, Project, Props, Styles,
};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Editing façade over one project
pub struct BuilderStore {
    project: Project,
    selection: Selection,
    clipboard: Clipboard,
    history: UndoStack,
    ids: IdGenerator,
    config: EditorConfig,
    observers: Vec<Box<dyn ProjectObserver>>,

    /// Bumped by every begin/abandon so late responses can be recognised
    enhancement_generation: u64,
    pending_enhancement: Option<u64>,
}

impl BuilderStore {
    /// Open `project`; the first page becomes active
    pub fn new(project: Project, config: EditorConfig) -> Self {
        let mut selection = Selection::default();
        selection.repair(&project);

        Self {
            history: UndoStack::new(project.clone(), config.max_history_size),
            project,
            selection,
            clipboard: Clipboard::new(),
            ids: IdGenerator::new(),
            config,
            observers: Vec::new(),
            enhancement_generation: 0,
            pending_enhancement: None,
        }
    }

    /// Start from the starter template, naming the first page after
    /// `config.default_page_name`
    pub fn with_template(name: &str, config: EditorConfig) -> Self {
        let mut ids = IdGenerator::new();
        let project = Project::from_template(name, &mut ids);
        Self::seeded(project, config, ids)
    }

    /// Start from a single empty page named after `config.default_page_name`
    pub fn blank(name: &str, config: EditorConfig) -> Self {
        let mut ids = IdGenerator::new();
        let project = Project::blank(name, &mut ids);
        Self::seeded(project, config, ids)
    }

    fn seeded(mut project: Project, config: EditorConfig, ids: IdGenerator) -> Self {
        if let Some(home) = project.pages.first_mut() {
            home.name = config.default_page_name.clone();
            home.slug = slugify(&config.default_page_name);
        }
        Self::new(project, config).with_ids(ids)
    }

    /// Swap the id generator, e.g. for deterministic ids
    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.selection
            .active_page_id()
            .and_then(|id| self.project.page(id))
    }

    pub fn selected_node(&self) -> Option<&Arc<Node>> {
        let node_id = self.selection.selected_node_id()?;
        self.active_page()?.find_node(node_id)
    }

    pub fn subscribe(&mut self, observer: Box<dyn ProjectObserver>) {
        self.observers.push(observer);
    }

    // Node commands. All of them act on the active page.

    /// Apply any mutation to the active page.
    ///
    /// Returns the node selected afterwards, if the mutation selects one.
    #[instrument(skip(self, mutation), fields(mutation = mutation.name()))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<Option<String>, MutationError> {
        let significant = mutation.is_undo_significant();
        self.edit_active(mutation.name(), significant, |tree, ids| {
            mutation.apply(tree, ids)
        })
    }

    pub fn add_node(
        &mut self,
        parent_id: Option<&str>,
        kind: ComponentKind,
        index: Option<usize>,
    ) -> Result<Option<String>, MutationError> {
        self.apply(Mutation::AddNode {
            parent_id: parent_id.map(str::to_string),
            kind,
            index,
        })
    }

    pub fn delete_node(&mut self, node_id: &str) -> Result<(), MutationError> {
        self.apply(Mutation::DeleteNode {
            node_id: node_id.to_string(),
        })
        .map(|_| ())
    }

    pub fn duplicate_node(&mut self, node_id: &str) -> Result<Option<String>, MutationError> {
        self.apply(Mutation::DuplicateNode {
            node_id: node_id.to_string(),
        })
    }

    pub fn move_node(
        &mut self,
        node_id: &str,
        new_parent_id: Option<&str>,
        index: usize,
    ) -> Result<(), MutationError> {
        self.apply(Mutation::MoveNode {
            node_id: node_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            index,
        })
        .map(|_| ())
    }

    pub fn update_node_props(&mut self, node_id: &str, props: Props) -> Result<(), MutationError> {
        self.apply(Mutation::UpdateProps {
            node_id: node_id.to_string(),
            props,
        })
        .map(|_| ())
    }

    pub fn update_node_styles(&mut self, node_id: &str, styles: Styles) -> Result<(), MutationError> {
        self.apply(Mutation::UpdateStyles {
            node_id: node_id.to_string(),
            styles,
        })
        .map(|_| ())
    }

    pub fn update_node_metadata(
        &mut self,
        node_id: &str,
        metadata: NodeMetadata,
    ) -> Result<(), MutationError> {
        self.apply(Mutation::UpdateMetadata {
            node_id: node_id.to_string(),
            metadata,
        })
        .map(|_| ())
    }

    pub fn rename_node(&mut self, node_id: &str, name: &str) -> Result<(), MutationError> {
        self.apply(Mutation::RenameNode {
            node_id: node_id.to_string(),
            name: name.to_string(),
        })
        .map(|_| ())
    }

    pub fn lock_node(&mut self, node_id: &str, locked: bool) -> Result<(), MutationError> {
        self.apply(Mutation::LockNode {
            node_id: node_id.to_string(),
            locked,
        })
        .map(|_| ())
    }

    pub fn wrap_in_container(
        &mut self,
        node_id: &str,
        container: ComponentKind,
    ) -> Result<Option<String>, MutationError> {
        self.apply(Mutation::WrapInContainer {
            node_id: node_id.to_string(),
            container,
        })
    }

    /// Select a node on the active page, or clear with `None`
    pub fn select_node(&mut self, node_id: Option<&str>) -> Result<(), MutationError> {
        match node_id {
            None => self.selection.clear(),
            Some(id) => {
                self.active_node(id)?;
                self.selection.select(Some(id.to_string()));
            }
        }
        Ok(())
    }

    /// Put a copy of a node (and its subtree) on the clipboard
    pub fn copy_node(&mut self, node_id: &str) -> Result<(), MutationError> {
        let node = Arc::clone(self.active_node(node_id)?);
        self.clipboard.copy(&node, &mut self.ids);
        debug!(node_id, "Copied node");
        Ok(())
    }

    /// Copy then delete; the clipboard is only filled if the delete succeeds
    pub fn cut_node(&mut self, node_id: &str) -> Result<(), MutationError> {
        let node = Arc::clone(self.active_node(node_id)?);
        self.delete_node(node_id)?;
        self.clipboard.copy(&node, &mut self.ids);
        Ok(())
    }

    /// Insert the clipboard content under `parent_id` (or the Body).
    ///
    /// Each paste gets fresh ids. A copied Body pastes its children in order.
    pub fn paste_node(
        &mut self,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<Option<String>, MutationError> {
        let node = self
            .clipboard
            .paste(&mut self.ids)
            .ok_or(MutationError::ClipboardEmpty)?;

        self.edit_active("paste_node", true, |tree, ids| {
            if !node.is_body() {
                return mutations::insert_subtree(tree, parent_id, node, index, ids);
            }

            let mut edit = Edit {
                tree: tree.to_vec(),
                selection: None,
                changed: false,
            };
            for (offset, child) in node.children.iter().enumerate() {
                let at = index.map(|i| i.saturating_add(offset));
                let next = mutations::insert_subtree(&edit.tree, parent_id, (**child).clone(), at, ids)?;
                edit = Edit {
                    selection: edit.selection.or(next.selection),
                    ..next
                };
            }
            Ok(edit)
        })
    }

    // Page commands

    /// Append a page and make it active. Returns the new page id.
    pub fn add_page(&mut self, name: &str, slug: Option<&str>) -> Result<String, PageError> {
        let edit = pages::add_page(&self.project, name, slug, &mut self.ids)
            .map_err(|err| rejected("add_page", err))?;
        let page_id = edit.activate.clone().unwrap_or_default();
        self.commit_pages(edit);
        info!(page_id = %page_id, "Page added");
        Ok(page_id)
    }

    pub fn delete_page(&mut self, page_id: &str) -> Result<(), PageError> {
        let edit = pages::delete_page(&self.project, page_id).map_err(|err| rejected("delete_page", err))?;
        self.commit_pages(edit);
        Ok(())
    }

    /// Copy a page in place after the original. Returns the copy's id.
    pub fn duplicate_page(&mut self, page_id: &str) -> Result<String, PageError> {
        let edit = pages::duplicate_page(&self.project, page_id, &mut self.ids)
            .map_err(|err| rejected("duplicate_page", err))?;
        self.commit_pages(edit);

        self.project
            .page_index(page_id)
            .and_then(|index| self.project.pages.get(index + 1))
            .map(|page| page.id.clone())
            .ok_or_else(|| PageError::PageNotFound(page_id.to_string()))
    }

    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), PageError> {
        let edit = pages::reorder_pages(&self.project, from, to).map_err(|err| rejected("reorder_pages", err))?;
        self.commit_pages(edit);
        Ok(())
    }

    pub fn rename_page(&mut self, page_id: &str, name: &str, slug: Option<&str>) -> Result<(), PageError> {
        let edit = pages::rename_page(&self.project, page_id, name, slug)
            .map_err(|err| rejected("rename_page", err))?;
        self.commit_pages(edit);
        Ok(())
    }

    pub fn update_page_metadata(&mut self, page_id: &str, patch: &PageMetadata) -> Result<(), PageError> {
        let edit = pages::update_page_metadata(&self.project, page_id, patch)
            .map_err(|err| rejected("update_page_metadata", err))?;
        self.commit_pages(edit);
        Ok(())
    }

    /// Switch the active page. Not an edit: nothing is recorded.
    pub fn set_active_page(&mut self, page_id: &str) -> Result<(), PageError> {
        if self.project.page(page_id).is_none() {
            return Err(rejected("set_active_page", PageError::PageNotFound(page_id.to_string())));
        }
        self.selection.set_active_page(page_id);
        Ok(())
    }

    // History

    /// Restore the previous snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        debug!(index = self.history.index(), "Undo");
        true
    }

    /// Re-apply the next snapshot. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        debug!(index = self.history.index(), "Redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace the whole project, e.g. after loading a file.
    ///
    /// The project must satisfy the document invariants. History starts over.
    #[instrument(skip(self, project), fields(project_id = %project.id, pages = project.pages.len()))]
    pub fn set_project(&mut self, project: Project) -> Result<(), ImportError> {
        validate_project(&project).map_err(|err| rejected("set_project", err))?;

        self.project = project;
        self.history.reset(self.project.clone());
        self.selection.repair(&self.project);
        self.notify();

        info!("Project replaced");
        Ok(())
    }

    // Collaborators

    /// Save the live project through `sink`
    pub fn save_with(&self, sink: &dyn ProjectSink) -> SaveResult {
        let result = sink.save(&self.project);
        if !result.success {
            warn!(message = ?result.message, "Save failed");
        }
        result
    }

    /// Run `exporter` over the project, or only the active page
    pub fn export_with(
        &self,
        exporter: &dyn Exporter,
        active_page_only: bool,
    ) -> Result<Vec<ExportArtifact>, String> {
        let page = if active_page_only {
            self.active_page()
        } else {
            None
        };
        exporter.export(&self.project, page)
    }

    /// Snapshot the project for an enhancement round trip.
    ///
    /// Only the most recent request can complete; starting a new one makes
    /// any earlier ticket stale.
    pub fn begin_enhancement(&mut self, prompt: impl Into<String>) -> EnhancementRequest {
        self.enhancement_generation += 1;
        self.pending_enhancement = Some(self.enhancement_generation);

        EnhancementRequest {
            ticket: EnhancementTicket(self.enhancement_generation),
            project: self.project.clone(),
            prompt: prompt.into(),
        }
    }

    /// Forget the pending request; its response will be ignored
    pub fn abandon_enhancement(&mut self) {
        self.enhancement_generation += 1;
        self.pending_enhancement = None;
    }

    /// Accept the response for `ticket`.
    ///
    /// The returned JSON goes through the same validation as an import. An
    /// accepted project replaces the live one as an undoable change.
    #[instrument(skip(self, response))]
    pub fn complete_enhancement(
        &mut self,
        ticket: EnhancementTicket,
        response: Result<String, String>,
    ) -> EnhancementOutcome {
        if self.pending_enhancement != Some(ticket.0) {
            debug!("Ignoring stale enhancement response");
            return EnhancementOutcome::failed("Enhancement request is no longer current");
        }
        self.pending_enhancement = None;

        let json = match response {
            Ok(json) => json,
            Err(message) => {
                warn!(error = %message, "Enhancement failed");
                return EnhancementOutcome::failed(message);
            }
        };

        match Project::from_json(&json) {
            Ok(project) => {
                self.commit(project, true);
                info!("Enhanced project applied");
                EnhancementOutcome::applied()
            }
            Err(err) => {
                warn!(error = %err, "Enhanced project rejected");
                EnhancementOutcome::failed(format!("Enhanced project rejected: {}", err))
            }
        }
    }

    /// Begin, call `enhancer` and complete in one go
    pub fn enhance_with(&mut self, enhancer: &dyn Enhancer, prompt: &str) -> EnhancementOutcome {
        let request = self.begin_enhancement(prompt);
        let response = enhancer.enhance(&request);
        self.complete_enhancement(request.ticket, response)
    }

    fn active_node(&self, node_id: &str) -> Result<&Arc<Node>, MutationError> {
        let page = self.active_page().ok_or(MutationError::NoActivePage)?;
        tree::find_node(&page.tree, node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))
    }

    /// Run a tree edit against the active page and commit the result
    fn edit_active<F>(
        &mut self,
        operation: &'static str,
        significant: bool,
        edit: F,
    ) -> Result<Option<String>, MutationError>
    where
        F: FnOnce(&[Arc<Node>], &mut IdGenerator) -> Result<Edit, MutationError>,
    {
        let Some(page_id) = self.selection.active_page_id().map(str::to_string) else {
            return Err(rejected(operation, MutationError::NoActivePage));
        };
        let page = self
            .project
            .page(&page_id)
            .ok_or_else(|| rejected(operation, MutationError::NoActivePage))?;

        let edit = edit(&page.tree, &mut self.ids).map_err(|err| rejected(operation, err))?;
        let selected = edit.selection.clone();

        if edit.changed {
            let mut next = self.project.clone();
            if let Some(page) = next.page_mut(&page_id) {
                page.tree = edit.tree;
            }
            self.commit(next, significant);
            debug!(operation, significant, "Mutation applied");
        }

        if let Some(node_id) = &selected {
            self.selection.select(Some(node_id.clone()));
        }
        Ok(selected)
    }

    fn commit_pages(&mut self, edit: PageEdit) {
        if let Some(page_id) = &edit.activate {
            self.selection.set_active_page(page_id.clone());
        }
        self.commit(edit.project, true);
    }

    fn commit(&mut self, mut next: Project, significant: bool) {
        next.touch();
        self.project = next;
        if significant {
            self.history.record(self.project.clone());
        } else {
            self.history.replace_current(self.project.clone());
        }
        self.selection.repair(&self.project);
        self.notify();
    }

    fn restore(&mut self, snapshot: Project) {
        self.project = snapshot;
        self.selection.repair(&self.project);
        self.notify();
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.project_changed(&self.project);
        }
    }
}

fn rejected<E: Display>(operation: &str, err: E) -> E {
    warn!(operation, error = %err, "Rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn blank_store() -> BuilderStore {
        let mut ids = IdGenerator::sequential("t");
        let project = Project::blank("Site", &mut ids);
        BuilderStore::new(project, EditorConfig::default()).with_ids(ids)
    }

    struct CountingObserver(Rc<RefCell<usize>>);

    impl ProjectObserver for CountingObserver {
        fn project_changed(&self, _project: &Project) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_new_activates_first_page() {
        let store = blank_store();
        assert_eq!(store.active_page().unwrap().slug, "home");
        assert!(store.selected_node().is_none());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_with_template_uses_default_page_name() {
        let config = EditorConfig {
            default_page_name: "Start Here".to_string(),
            ..Default::default()
        };
        let store = BuilderStore::with_template("Site", config);

        let page = store.active_page().unwrap();
        assert_eq!(page.name, "Start Here");
        assert_eq!(page.slug, "start-here");
        assert!(page.body().is_some());
    }

    #[test]
    fn test_blank_has_empty_tree() {
        let store = BuilderStore::blank("Site", EditorConfig::default());

        let page = store.active_page().unwrap();
        assert_eq!(page.name, "Home");
        assert!(page.tree.is_empty());
    }

    #[test]
    fn test_add_node_selects_and_records() {
        let mut store = blank_store();

        let text_id = store.add_node(None, ComponentKind::Text, None).unwrap().unwrap();

        assert_eq!(store.selected_node().unwrap().id, text_id);
        assert_eq!(store.history().len(), 2);
        assert!(store.can_undo());
    }

    #[test]
    fn test_rejected_mutation_leaves_state() {
        let mut store = blank_store();
        let before = store.project().clone();

        let err = store.delete_node("missing").unwrap_err();

        assert_eq!(err, MutationError::NodeNotFound("missing".to_string()));
        assert_eq!(store.project(), &before);
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_observers_see_commits_and_undo() {
        let mut store = blank_store();
        let count = Rc::new(RefCell::new(0));
        store.subscribe(Box::new(CountingObserver(count.clone())));

        store.add_node(None, ComponentKind::Div, None).unwrap();
        store.undo();
        let _ = store.delete_node("missing");

        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut store = blank_store();
        let div = store.add_node(None, ComponentKind::Div, None).unwrap().unwrap();

        store.delete_node(&div).unwrap();

        assert!(store.selection().selected_node_id().is_none());
    }

    #[test]
    fn test_select_missing_node() {
        let mut store = blank_store();
        assert!(matches!(
            store.select_node(Some("nope")),
            Err(MutationError::NodeNotFound(_))
        ));
        store.select_node(None).unwrap();
    }

    #[test]
    fn test_cut_of_body_keeps_clipboard_empty() {
        let mut store = blank_store();
        store.add_node(None, ComponentKind::Text, None).unwrap();
        let body_id = store.active_page().unwrap().body().unwrap().id.clone();

        assert!(store.cut_node(&body_id).is_err());
        assert!(store.clipboard().is_empty());
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut store = blank_store();
        assert_eq!(
            store.paste_node(None, None).unwrap_err(),
            MutationError::ClipboardEmpty
        );
    }

    #[test]
    fn test_set_active_page_unknown() {
        let mut store = blank_store();
        assert!(matches!(
            store.set_active_page("nope"),
            Err(PageError::PageNotFound(_))
        ));
    }

    #[test]
    fn test_commit_touches_updated_at() {
        let mut store = blank_store();
        let mut project = store.project().clone();
        if let Some(metadata) = project.metadata.as_mut() {
            metadata.updated_at = None;
        }
        store.set_project(project).unwrap();

        store.add_node(None, ComponentKind::Text, None).unwrap();

        assert!(store.project().metadata.as_ref().unwrap().updated_at.is_some());
    }
}
