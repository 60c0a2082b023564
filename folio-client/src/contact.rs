//! Contact-form delivery over HTTP.
//!
//! Form POST of `name`, `email`, `message` with `Accept: application/json`.
//! A non-success response is expected to carry `{"errors":[{"message":…}]}`;
//! those messages are surfaced verbatim as a rejection. Connection-level
//! failures are classified as offline so the submission queue can persist
//! the payload for replay.

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::warn;

use folio_core::{ContactSubmitter, PendingSubmission, SubmitError};

/// Real submitter talking to the configured form-handler endpoint.
pub struct HttpContactSubmitter {
    http: reqwest::Client,
    url: String,
}

impl HttpContactSubmitter {
    pub fn new(url: impl Into<String>) -> Result<Self, SubmitError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ContactSubmitter for HttpContactSubmitter {
    async fn submit(&self, payload: &PendingSubmission) -> Result<(), SubmitError> {
        let form = Form::new()
            .text("name", payload.name.clone())
            .text("email", payload.email.clone())
            .text("message", payload.message.clone());

        let response = self
            .http
            .post(&self.url)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(classify_send_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(%status, "contact endpoint rejected submission");
        Err(SubmitError::Rejected(rejection_message(&body)))
    }
}

/// Only connection-level failures count as offline; a reachable endpoint
/// that misbehaves is a transport error and must not queue the payload.
fn classify_send_error(err: reqwest::Error) -> SubmitError {
    if err.is_connect() {
        SubmitError::Offline
    } else {
        SubmitError::Transport(err.to_string())
    }
}

/// Lightweight reachability probe used while offline. Any HTTP answer at
/// all means the network path is back; only connection-level failures keep
/// us offline.
pub async fn endpoint_reachable(http: &reqwest::Client, url: &str) -> bool {
    match http.head(url).send().await {
        Ok(_) => true,
        Err(err) => !err.is_connect(),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Join the endpoint's error messages, falling back to a generic line when
/// the body does not match the expected shape.
fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .into_iter()
            .map(|entry| entry.message)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "Something went wrong!".to_string(),
    }
}
