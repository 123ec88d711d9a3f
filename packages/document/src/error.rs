use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

/// Why a project document was refused
#[derive(Error, Debug)]
pub enum ImportError {
    /// Not JSON at all
    #[error("Malformed project JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not a usable project
    #[error("Invalid project structure: {0}")]
    Structure(String),
}

impl ImportError {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ImportError::Malformed(_))
    }
}
