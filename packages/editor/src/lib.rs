//! # Pagecraft Editor
//!
//! Editing engine for Pagecraft projects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: Project / Page / Node + JSON      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: BuilderStore                        │
//! │  - Tree mutations with validation           │
//! │  - Page management                          │
//! │  - Selection and clipboard                  │
//! │  - Undo/redo snapshots                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ observers: autosave, previews, exporters    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Project is the source of truth**: everything else is derived
//! 2. **Edits are pure**: mutations return a new tree, the store commits it
//! 3. **Rejected edits are no-ops**: errors leave state and history untouched
//! 4. **No hidden effects**: persistence happens through subscribed observers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{BuilderStore, EditorConfig, JsonFileSink};
//! use pagecraft_document::ComponentKind;
//!
//! let mut store = BuilderStore::with_template("My Site", EditorConfig::default());
//!
//! let text_id = store.add_node(None, ComponentKind::Text, None)?;
//! store.undo();
//! store.redo();
//!
//! store.save_with(&JsonFileSink::new("site.json"));
//! ```
//!
//! ### Autosave
//!
//! ```rust,ignore
//! let (handle, mut results) = Autosave::spawn(Arc::new(sink), config.autosave_debounce());
//! store.subscribe(Box::new(handle));
//! ```

mod autosave;
mod collaborators;
mod config;
mod errors;
pub mod mutations;
pub mod pages;
mod selection;
mod store;
mod undo_stack;

pub use autosave::{Autosave, AutosaveHandle};
pub use collaborators::{
    EnhancementOutcome, EnhancementRequest, EnhancementTicket, Enhancer, ExportArtifact, Exporter,
    JsonFileSink, ProjectObserver, ProjectSink, SaveResult,
};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::{EditorError, EditorResult};
pub use mutations::{Edit, Mutation, MutationError};
pub use pages::{PageEdit, PageError};
pub use selection::{Clipboard, Selection};
pub use store::BuilderStore;
pub use undo_stack::{UndoStack, DEFAULT_MAX_HISTORY};
