//! # Debounced Autosave
//!
//! A background task that persists the latest project once edits go quiet.
//!
//! ```text
//! BuilderStore --project_changed--> AutosaveHandle --watch--> task --save--> ProjectSink
//!                                                               |
//!                                                               +--SaveResult--> mpsc
//! ```
//!
//! The watch channel only ever holds the newest project, so a burst of
//! edits collapses into a single save. Dropping (or shutting down) the
//! handle flushes a pending project before the task exits.

use crate::collaborators::{ProjectObserver, ProjectSink, SaveResult};
use pagecraft_document::Project;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct Autosave;

impl Autosave {
    /// Start the autosave task on the current tokio runtime
    pub fn spawn<S>(
        sink: Arc<S>,
        debounce: Duration,
    ) -> (AutosaveHandle, mpsc::UnboundedReceiver<SaveResult>)
    where
        S: ProjectSink + ?Sized + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(sink, debounce, rx, results_tx));
        info!(debounce_ms = debounce.as_millis() as u64, "Autosave started");

        (AutosaveHandle { tx, task }, results_rx)
    }
}

/// Feeds projects to the autosave task
pub struct AutosaveHandle {
    tx: watch::Sender<Option<Project>>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Queue `project` for saving, replacing anything not yet saved
    pub fn publish(&self, project: Project) {
        self.tx.send_replace(Some(project));
    }

    /// Flush any pending project and wait for the task to finish
    pub async fn shutdown(self) {
        let AutosaveHandle { tx, task } = self;
        drop(tx);
        if let Err(err) = task.await {
            warn!(error = %err, "Autosave task ended abnormally");
        }
    }
}

impl ProjectObserver for AutosaveHandle {
    fn project_changed(&self, project: &Project) {
        self.publish(project.clone());
    }
}

async fn run<S>(
    sink: Arc<S>,
    debounce: Duration,
    mut rx: watch::Receiver<Option<Project>>,
    results: mpsc::UnboundedSender<SaveResult>,
) where
    S: ProjectSink + ?Sized,
{
    while rx.changed().await.is_ok() {
        // Restart the quiet period on every new value
        let mut closed = false;
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        closed = true;
                        break;
                    }
                }
                _ = tokio::time::sleep(debounce) => break,
            }
        }

        let latest = rx.borrow_and_update().clone();
        if let Some(project) = latest {
            let result = sink.save(&project);
            debug!(project_id = %project.id, success = result.success, "Autosave finished");
            if results.send(result).is_err() {
                debug!("Autosave results receiver dropped");
            }
        }

        if closed {
            break;
        }
    }

    debug!("Autosave stopped");
}
