//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Page error: {0}")]
    Page(#[from] crate::pages::PageError),

    #[error("Import error: {0}")]
    Import(#[from] pagecraft_document::ImportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EditorResult<T> = Result<T, EditorError>;
