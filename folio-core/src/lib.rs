//! Core state and protocol logic for the folio portfolio client.
//!
//! Holds everything that carries invariants: typed errors, configuration,
//! the persistent key/value store, the retry backoff policy, the offline
//! submission queue, and the connectivity signal. UI concerns live in
//! `folio-tui`; network transports live in `folio-client`.

pub mod backoff;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod store;
pub mod submission;

pub use backoff::BackoffPolicy;
pub use config::{AssistConfig, EndpointsConfig, FolioConfig};
pub use connectivity::Connectivity;
pub use error::{FolioError, Result};
pub use store::KvStore;
pub use submission::{ContactSubmitter, PendingSubmission, SubmissionQueue, SubmitError, SubmitOutcome};
