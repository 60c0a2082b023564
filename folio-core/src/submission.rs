//! Durable offline queue for contact-form submissions.
//!
//! At most one pending submission exists at any time. It is persisted only
//! when a send fails because connectivity is gone, overwritten by each new
//! offline failure, and cleared only after a confirmed successful send, so
//! a submission is never lost silently: it is either in flight, persisted,
//! or confirmed. Failures unrelated to connectivity (remote rejection,
//! transport error while online) are not queued; they would fail the same
//! way on replay.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::store::{KvStore, PENDING_SUBMISSION_KEY};

/// A contact-form payload awaiting (or undergoing) delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// How a single delivery attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The host has no network connectivity. The only queueable failure.
    #[error("no network connectivity")]
    Offline,

    /// The endpoint was reachable but rejected the submission. The message
    /// is surfaced to the user verbatim and never retried.
    #[error("{0}")]
    Rejected(String),

    /// Transport-level failure while online (timeout, DNS, TLS).
    #[error("network error: {0}")]
    Transport(String),
}

/// Outcome of a [`SubmissionQueue::try_submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Delivered; any persisted pending record has been cleared.
    Sent,
    /// Saved locally, will replay when connectivity returns.
    QueuedOffline,
    /// Remote rejected the submission; nothing persisted.
    Rejected(String),
    /// Online transport failure; nothing persisted.
    Failed(String),
}

/// The actual network POST, supplied by the caller.
#[async_trait]
pub trait ContactSubmitter: Send + Sync {
    async fn submit(&self, payload: &PendingSubmission) -> std::result::Result<(), SubmitError>;
}

/// Owns the single persisted pending-submission slot.
pub struct SubmissionQueue<S: ContactSubmitter> {
    store: Arc<KvStore>,
    submitter: S,
}

impl<S: ContactSubmitter> SubmissionQueue<S> {
    pub fn new(store: Arc<KvStore>, submitter: S) -> Self {
        Self { store, submitter }
    }

    /// Attempt delivery, persisting the payload only on offline failure.
    pub async fn try_submit(&self, payload: &PendingSubmission) -> Result<SubmitOutcome> {
        match self.submitter.submit(payload).await {
            Ok(()) => {
                self.store.remove(PENDING_SUBMISSION_KEY)?;
                Ok(SubmitOutcome::Sent)
            }
            Err(SubmitError::Offline) => {
                self.store.set(PENDING_SUBMISSION_KEY, payload)?;
                info!("offline, submission saved for replay");
                Ok(SubmitOutcome::QueuedOffline)
            }
            Err(SubmitError::Rejected(message)) => Ok(SubmitOutcome::Rejected(message)),
            Err(SubmitError::Transport(detail)) => {
                warn!(error = %detail, "contact submission failed");
                Ok(SubmitOutcome::Failed("Network error. Please try again.".to_string()))
            }
        }
    }

    /// The persisted pending submission, if any.
    ///
    /// An undecodable record cannot be replayed; it is dropped with a
    /// diagnostic rather than wedging the queue.
    pub fn pending(&self) -> Result<Option<PendingSubmission>> {
        match self.store.get::<PendingSubmission>(PENDING_SUBMISSION_KEY) {
            Ok(pending) => Ok(pending),
            Err(err) => {
                warn!(error = %err, "dropping undecodable pending submission");
                self.store.remove(PENDING_SUBMISSION_KEY)?;
                Ok(None)
            }
        }
    }

    /// Replay the pending submission exactly once on an offline→online edge.
    ///
    /// No retry loop: if the replay fails again, the record stays (or is
    /// re-persisted by the offline path) and waits for the next edge.
    pub async fn on_connectivity_restored(&self) -> Result<Option<SubmitOutcome>> {
        let Some(pending) = self.pending()? else {
            return Ok(None);
        };
        info!("connectivity restored, replaying saved submission");
        self.try_submit(&pending).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted submitter: pops one result per call, records payloads.
    struct FakeSubmitter {
        script: Mutex<VecDeque<std::result::Result<(), SubmitError>>>,
        calls: Mutex<Vec<PendingSubmission>>,
    }

    impl FakeSubmitter {
        fn new(script: Vec<std::result::Result<(), SubmitError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<PendingSubmission> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContactSubmitter for FakeSubmitter {
        async fn submit(
            &self,
            payload: &PendingSubmission,
        ) -> std::result::Result<(), SubmitError> {
            self.calls.lock().unwrap().push(payload.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(SubmitError::Offline))
        }
    }

    fn payload() -> PendingSubmission {
        PendingSubmission {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            message: "hi".into(),
        }
    }

    fn queue(
        script: Vec<std::result::Result<(), SubmitError>>,
    ) -> (tempfile::TempDir, SubmissionQueue<FakeSubmitter>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(dir.path().join("store.json")).unwrap());
        (dir, SubmissionQueue::new(store, FakeSubmitter::new(script)))
    }

    #[tokio::test]
    async fn offline_failure_persists_exact_payload() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Offline)]);

        let outcome = queue.try_submit(&payload()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::QueuedOffline);
        assert_eq!(queue.pending().unwrap(), Some(payload()));
    }

    #[tokio::test]
    async fn replay_on_reconnect_sends_once_and_clears() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Offline), Ok(())]);

        queue.try_submit(&payload()).await.unwrap();
        let outcome = queue.on_connectivity_restored().await.unwrap();

        assert_eq!(outcome, Some(SubmitOutcome::Sent));
        assert_eq!(queue.pending().unwrap(), None);
        assert_eq!(queue.submitter.calls(), vec![payload(), payload()]);
    }

    #[tokio::test]
    async fn reconnect_with_nothing_pending_is_a_no_op() {
        let (_dir, queue) = queue(vec![]);

        let outcome = queue.on_connectivity_restored().await.unwrap();
        assert_eq!(outcome, None);
        assert!(queue.submitter.calls().is_empty());
    }

    #[tokio::test]
    async fn rejection_is_not_queued() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Rejected("Email looks wrong".into()))]);

        let outcome = queue.try_submit(&payload()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected("Email looks wrong".into()));
        assert_eq!(queue.pending().unwrap(), None);
    }

    #[tokio::test]
    async fn online_transport_failure_is_not_queued() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Transport("timeout".into()))]);

        let outcome = queue.try_submit(&payload()).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(queue.pending().unwrap(), None);
    }

    #[tokio::test]
    async fn success_clears_prior_pending_record() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Offline), Ok(())]);

        queue.try_submit(&payload()).await.unwrap();
        assert!(queue.pending().unwrap().is_some());

        let outcome = queue.try_submit(&payload()).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(queue.pending().unwrap(), None);
    }

    #[tokio::test]
    async fn newer_offline_failure_overwrites_older_record() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Offline), Err(SubmitError::Offline)]);

        queue.try_submit(&payload()).await.unwrap();
        let second = PendingSubmission {
            message: "updated".into(),
            ..payload()
        };
        queue.try_submit(&second).await.unwrap();

        assert_eq!(queue.pending().unwrap(), Some(second));
    }

    #[tokio::test]
    async fn failed_replay_keeps_record_for_next_edge() {
        let (_dir, queue) = queue(vec![Err(SubmitError::Offline), Err(SubmitError::Offline)]);

        queue.try_submit(&payload()).await.unwrap();
        let outcome = queue.on_connectivity_restored().await.unwrap();

        assert_eq!(outcome, Some(SubmitOutcome::QueuedOffline));
        assert_eq!(queue.pending().unwrap(), Some(payload()));
        // Exactly one replay attempt happened, no retry loop.
        assert_eq!(queue.submitter.calls().len(), 2);
    }
}
