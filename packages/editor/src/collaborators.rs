//! # Collaborator Contracts
//!
//! Boundaries to the systems the engine talks to but doesn't own:
//!
//! - [`ProjectObserver`]: told about every committed change (autosave, live preview)
//! - [`ProjectSink`]: persists a whole project, reports success or failure
//! - [`Enhancer`]: round-trips a project through an external transform
//! - [`Exporter`]: reads a project and produces derived artifacts
//!
//! None of these may fail the engine. I/O problems come back as values.

use crate::errors::EditorError;
use pagecraft_document::{Page, Project};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Notified after every committed change to the live project
pub trait ProjectObserver {
    fn project_changed(&self, project: &Project);
}

/// Outcome of a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Persists whole projects
pub trait ProjectSink: Send + Sync {
    fn save(&self, project: &Project) -> SaveResult;
}

/// Saves the project as pretty-printed JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate a project previously written by a sink
    pub fn load(path: impl AsRef<Path>) -> Result<Project, EditorError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Ok(Project::from_json(&source)?)
    }

    fn write(&self, project: &Project) -> Result<(), EditorError> {
        let json = project.to_json_pretty()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ProjectSink for JsonFileSink {
    fn save(&self, project: &Project) -> SaveResult {
        match self.write(project) {
            Ok(()) => {
                debug!(path = %self.path.display(), project_id = %project.id, "Project saved");
                SaveResult::ok()
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Project save failed");
                SaveResult::failed(err.to_string())
            }
        }
    }
}

/// Identifies one enhancement round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnhancementTicket(pub(crate) u64);

/// What gets sent to the enhancement service
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    pub ticket: EnhancementTicket,
    pub project: Project,
    pub prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhancementBody<'a> {
    project: &'a Project,
    enhancement_prompt: &'a str,
}

impl EnhancementRequest {
    /// Wire body: `{ "project": ..., "enhancementPrompt": ... }`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&EnhancementBody {
            project: &self.project,
            enhancement_prompt: &self.prompt,
        })
    }
}

/// Outcome of an enhancement round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementOutcome {
    pub success: bool,
    pub message: String,
}

impl EnhancementOutcome {
    pub fn applied() -> Self {
        Self {
            success: true,
            message: "Project enhanced".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// External whole-project transform. Returns replacement project JSON.
pub trait Enhancer {
    fn enhance(&self, request: &EnhancementRequest) -> Result<String, String>;
}

/// A derived file produced by an exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: String,
    pub contents: String,
}

/// Read-only consumer producing derived artifacts (HTML, code, ...)
pub trait Exporter {
    fn export(&self, project: &Project, page: Option<&Page>) -> Result<Vec<ExportArtifact>, String>;
}
