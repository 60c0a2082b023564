//! HTTP clients for the portfolio's external services.
//!
//! [`GenerationClient`] performs a best-effort call to a text-generation
//! proxy with bounded exponential-backoff retry; [`contact`] holds the
//! contact-form submitter. Both keep the transport behind a trait so the
//! retry and classification logic is testable without a network.

pub mod contact;
pub mod prompts;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use folio_core::{AssistConfig, BackoffPolicy};

pub use contact::{endpoint_reachable, HttpContactSubmitter};

/// Terminal outcome of one logical generation request.
///
/// Never an `Err`: failures are normalized into a user-safe message at this
/// boundary, raw detail goes to tracing only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success { text: String },
    Failure { message: String },
}

/// Why a single attempt failed. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    /// Request never completed (DNS, connect, timeout).
    Transport(String),
    /// Endpoint answered with a non-success status.
    Status(u16),
    /// Success status but the candidate text field was missing.
    MalformedResponse(String),
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(detail) => write!(f, "transport error: {detail}"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::MalformedResponse(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

/// Gemini-shaped request body: prompt and system instruction as parts.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl GenerateRequest {
    pub fn new(prompt: &str, system_instruction: &str) -> Self {
        let part = |text: &str| Content {
            parts: vec![Part {
                text: text.to_string(),
            }],
        };
        Self {
            contents: vec![part(prompt)],
            system_instruction: part(system_instruction),
        }
    }
}

/// Response body; only the nested candidate text is interesting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// First candidate's first non-empty text part, if any.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()
            .map(|part| part.text.as_str())
            .filter(|text| !text.is_empty())
    }
}

/// One wire round-trip, behind a seam so retries are testable offline.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn send(&self, request: &GenerateRequest) -> Result<GenerateResponse, AttemptError>;
}

/// Real transport: POST to the configured proxy endpoint.
///
/// The endpoint holds the actual API credential server-side; this client
/// never carries a key.
pub struct HttpGenerationTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpGenerationTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, AttemptError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| AttemptError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GenerationTransport for HttpGenerationTransport {
    async fn send(&self, request: &GenerateRequest) -> Result<GenerateResponse, AttemptError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|err| AttemptError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|err| AttemptError::MalformedResponse(err.to_string()))
    }
}

/// Issues one logical generation request with sequential backoff retries.
pub struct GenerationClient<T: GenerationTransport> {
    transport: T,
    max_retries: u32,
    backoff: BackoffPolicy,
}

impl GenerationClient<HttpGenerationTransport> {
    pub fn over_http(url: impl Into<String>, assist: &AssistConfig) -> Result<Self, AttemptError> {
        Ok(Self::new(HttpGenerationTransport::new(url)?, assist))
    }
}

impl<T: GenerationTransport> GenerationClient<T> {
    pub fn new(transport: T, assist: &AssistConfig) -> Self {
        Self {
            transport,
            max_retries: assist.max_retries.max(1),
            backoff: BackoffPolicy::from_millis(assist.base_delay_ms),
        }
    }

    /// Run up to `max_retries` attempts, waiting `backoff.delay(i)` between
    /// them. Attempts are strictly sequential; the first well-formed
    /// response wins immediately.
    pub async fn generate(&self, prompt: &str, system_instruction: &str) -> GenerationResult {
        let request = GenerateRequest::new(prompt, system_instruction);

        for attempt in 0..self.max_retries {
            let error = match self.transport.send(&request).await {
                Ok(response) => match response.text() {
                    Some(text) => {
                        debug!(attempt, "generation succeeded");
                        return GenerationResult::Success {
                            text: text.to_string(),
                        };
                    }
                    None => AttemptError::MalformedResponse("no candidate text".to_string()),
                },
                Err(error) => error,
            };

            if attempt + 1 == self.max_retries {
                warn!(attempt, error = %error, "generation failed, retries exhausted");
                break;
            }

            let delay = self.backoff.delay(attempt);
            debug!(attempt, ?delay, error = %error, "generation attempt failed, retrying");
            tokio::time::sleep(delay).await;
        }

        GenerationResult::Failure {
            message: "Unable to get a response at this time.".to_string(),
        }
    }
}
