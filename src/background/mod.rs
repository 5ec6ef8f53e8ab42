//! Background coordinator: remembers the last detected repository

use crate::messaging::{Envelope, Inbox};
use crate::models::{DetectionRecord, Message};
use crate::storage::{LocalStorage, StorageError};
use tracing::{debug, info, warn};

/// What the coordinator did with one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    Stored(DetectionRecord),
    /// `repoDetected` that did not come from a tab
    MissingTab,
    Ignored,
}

/// Long-lived listener persisting `repoDetected` announcements
#[derive(Debug, Clone)]
pub struct BackgroundCoordinator {
    storage: LocalStorage,
}

impl BackgroundCoordinator {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Process one message. Only the action tag is looked at.
    pub fn handle(&self, envelope: Envelope) -> Result<Handled, StorageError> {
        let Envelope { message, sender, .. } = envelope;

        match message {
            Message::RepoDetected { repo_info } => {
                let Some(tab_id) = sender.tab_id else {
                    return Ok(Handled::MissingTab);
                };

                let record = DetectionRecord::new(repo_info, tab_id);
                record.store(&self.storage)?;
                Ok(Handled::Stored(record))
            }
            other => {
                debug!(action = other.action(), "background ignoring message");
                Ok(Handled::Ignored)
            }
        }
    }

    /// Serve until every port to `inbox` is dropped
    pub async fn run(self, mut inbox: Inbox) {
        while let Some(envelope) = inbox.recv().await {
            match self.handle(envelope) {
                Ok(Handled::Stored(record)) => {
                    let repo = record
                        .current_repo
                        .repository()
                        .map(|r| r.full_name())
                        .unwrap_or_default();
                    info!(tab_id = record.tab_id, repo = %repo, "detection record stored");
                }
                Ok(Handled::MissingTab) => warn!("repoDetected message without a sender tab"),
                Ok(Handled::Ignored) => {}
                Err(e) => warn!(error = %e, "failed to store detection record"),
            }
        }
        debug!("background coordinator stopped");
    }
}
