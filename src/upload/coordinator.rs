use super::client::Uploader;
use super::state::BatchState;
use super::types::{BatchReport, FileId, ProgressFn, SelectedFile};
use crate::notify::{Notification, Notifier};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const NOTHING_SELECTED: &str = "Please select files to upload";
pub const BATCH_IN_FLIGHT: &str = "An upload is already in progress";

/// Owns the selection and result gallery and runs upload batches.
///
/// Cloning is cheap; clones share the same batch. Observers read snapshots
/// through [`BatchCoordinator::snapshot`] or a [`watch::Receiver`].
pub struct BatchCoordinator<U> {
    inner: Arc<Inner<U>>,
}

impl<U> Clone for BatchCoordinator<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<U> {
    uploader: U,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<BatchState>,
}

enum Start {
    Empty,
    Busy,
    Started(Vec<SelectedFile>),
}

impl<U: Uploader + 'static> BatchCoordinator<U> {
    pub fn new(uploader: U, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(BatchState::default());
        Self {
            inner: Arc::new(Inner {
                uploader,
                notifier,
                state,
            }),
        }
    }

    pub fn snapshot(&self) -> BatchState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.inner.state.subscribe()
    }

    pub fn summary(&self) -> String {
        self.inner.state.borrow().summary()
    }

    /// Replaces the whole selection. Refused while a batch is in flight.
    ///
    /// Gallery entries whose file is no longer a Done entry go with it.
    pub fn set_selection(&self, files: Vec<SelectedFile>) -> bool {
        let count = files.len();
        let replaced = self.inner.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            *state = state.with_selection(files);
            true
        });

        if replaced {
            info!("Selection replaced: {}", self.summary());
        } else {
            warn!(count, "Selection change refused while uploading");
            self.inner
                .notifier
                .notify(Notification::warning(BATCH_IN_FLIGHT));
        }
        replaced
    }

    /// Uploads every selected file at once and waits for all of them.
    ///
    /// Returns `None` without touching the batch when nothing is selected
    /// or another batch is still running.
    pub async fn submit_batch(&self) -> Option<BatchReport> {
        let mut start = Start::Empty;
        self.inner.state.send_if_modified(|state| {
            if state.is_submitting {
                start = Start::Busy;
                return false;
            }
            if state.selection.is_empty() {
                return false;
            }
            start = Start::Started(state.selection.clone());
            *state = BatchState {
                selection: state.selection.clone(),
                results: state.results.clone(),
                is_submitting: true,
            };
            true
        });

        let files = match start {
            Start::Started(files) => files,
            Start::Empty => {
                warn!("Upload requested with an empty selection");
                self.inner
                    .notifier
                    .notify(Notification::warning(NOTHING_SELECTED));
                return None;
            }
            Start::Busy => {
                warn!("Upload requested while a batch is in flight");
                self.inner
                    .notifier
                    .notify(Notification::warning(BATCH_IN_FLIGHT));
                return None;
            }
        };

        info!("Starting upload of {} files", files.len());

        let outcomes = join_all(files.into_iter().map(|file| self.upload_one(file))).await;
        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        let report = BatchReport {
            succeeded,
            failed: outcomes.len() - succeeded,
        };

        self.inner.state.send_modify(|state| {
            *state = BatchState {
                selection: state.selection.clone(),
                results: state.results.clone(),
                is_submitting: false,
            };
        });

        info!(
            "Upload batch finished: {} succeeded, {} failed",
            report.succeeded, report.failed
        );
        Some(report)
    }

    /// Empties selection and gallery. Refused while a batch is in flight.
    pub fn reset_batch(&self) -> bool {
        let cleared = self.inner.state.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            *state = BatchState::default();
            true
        });

        if cleared {
            info!("Selection and results cleared");
        } else {
            warn!("Reset refused while uploading");
            self.inner
                .notifier
                .notify(Notification::warning(BATCH_IN_FLIGHT));
        }
        cleared
    }

    async fn upload_one(&self, file: SelectedFile) -> bool {
        let id = file.id;
        self.inner.publish(|state| state.with_uploading(id));

        let inner = Arc::clone(&self.inner);
        let progress: ProgressFn =
            Arc::new(move |sent: u64, total: u64| inner.record_progress(id, sent, total));

        match self.inner.uploader.upload(&file, progress).await {
            Ok(receipt) => {
                info!(file = %file.name, url = %receipt.url, "Upload succeeded");
                self.inner
                    .publish(|state| state.with_done(id, receipt.url.clone()));
                self.inner.notifier.notify(Notification::success(format!(
                    "{} uploaded successfully",
                    file.name
                )));
                true
            }
            Err(e) if e.is_rejection() => {
                warn!(file = %file.name, error = %e, "Upload rejected");
                self.inner.publish(|state| state.with_error(id));
                self.inner
                    .notifier
                    .notify(Notification::error(format!("{} upload failed", file.name)));
                false
            }
            Err(e) => {
                error!(file = %file.name, error = %e, "Upload error");
                self.inner.publish(|state| state.with_error(id));
                self.inner
                    .notifier
                    .notify(Notification::error(format!("Upload error: {}", file.name)));
                false
            }
        }
    }
}

impl<U> Inner<U> {
    fn publish(&self, transition: impl FnOnce(&BatchState) -> BatchState) {
        self.state.send_modify(|state| *state = transition(state));
    }

    fn record_progress(&self, id: FileId, sent: u64, total: u64) {
        self.state.send_if_modified(|state| match state.with_progress(id, sent, total) {
            Some(next) => {
                debug!(?id, sent, total, "Upload progress");
                *state = next;
                true
            }
            None => false,
        });
    }
}
