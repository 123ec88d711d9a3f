//! # Pagecraft Document
//!
//! The data model of a Pagecraft site: a [`Project`] holds ordered
//! [`Page`]s, each page holds one `Body`-rooted tree of [`Node`]s.
//!
//! ## Representation
//!
//! Children are stored as `Vec<Arc<Node>>`. Editing clones only the nodes on
//! the path from the root to the edited node (`Arc::make_mut`); untouched
//! subtrees stay shared between the live project and every undo snapshot.
//!
//! ```text
//! Project
//!  └─ Page (slug: "home")
//!      └─ Body
//!          ├─ Section
//!          │   ├─ Text
//!          │   └─ Button
//!          └─ Form
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_document::{IdGenerator, Project};
//!
//! let mut ids = IdGenerator::new();
//! let project = Project::from_template("My Site", &mut ids);
//!
//! let json = project.to_json_pretty()?;
//! let restored = Project::from_json(&json)?;
//! assert_eq!(project, restored);
//! ```

pub mod error;
pub mod id_generator;
pub mod kind;
pub mod node;
pub mod page;
pub mod project;
pub mod serializer;
pub mod slug;
pub mod tree;

pub use error::{ImportError, ImportResult};
pub use id_generator::IdGenerator;
pub use kind::ComponentKind;
pub use node::{Node, NodeMetadata, Props, StyleValue, Styles};
pub use page::{Page, PageMetadata};
pub use project::{Project, ProjectMetadata};
pub use serializer::validate_project;
pub use slug::{slugify, unique_slug};
