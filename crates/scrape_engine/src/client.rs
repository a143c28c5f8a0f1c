use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scrape_core::PropertyRule;
use scrape_logging::{scrape_debug, scrape_warn};

use crate::wire::{ExtractionRequestBody, ExtractionResponseBody};
use crate::{ExtractionError, ExtractionOutcome, FailureKind};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Extraction endpoint receiving one POST per page.
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/scrape".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Performs exactly one extraction attempt per call.
#[async_trait::async_trait]
pub trait ExtractionClient: Send + Sync {
    async fn extract(&self, url: &str, rules: &[PropertyRule]) -> ExtractionOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestExtractionClient {
    settings: ClientSettings,
}

impl ReqwestExtractionClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, ExtractionError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| ExtractionError::new(FailureKind::Network, err.to_string()))
    }

    async fn send(
        &self,
        url: &str,
        rules: &[PropertyRule],
    ) -> Result<ExtractionResponseBody, ExtractionError> {
        let client = self.build_client()?;
        let body = serde_json::to_vec(&ExtractionRequestBody::new(url, rules))
            .map_err(|err| ExtractionError::new(FailureKind::InvalidRequest, err.to_string()))?;

        scrape_debug!(
            "POST {} url={} properties={}",
            self.settings.endpoint,
            url,
            rules.len()
        );
        let response = client
            .post(&self.settings.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        // The service reports its own status in the body; the HTTP status
        // only matters when the body is not an extraction response.
        serde_json::from_slice::<ExtractionResponseBody>(&bytes).map_err(|err| {
            if status.is_success() {
                ExtractionError::new(FailureKind::InvalidResponse, err.to_string())
            } else {
                ExtractionError::new(
                    FailureKind::Remote {
                        status_code: status.as_u16(),
                    },
                    status.to_string(),
                )
            }
        })
    }
}

#[async_trait::async_trait]
impl ExtractionClient for ReqwestExtractionClient {
    async fn extract(&self, url: &str, rules: &[PropertyRule]) -> ExtractionOutcome {
        let outcome = match self.send(url, rules).await {
            Ok(body) => classify(body),
            Err(err) => ExtractionOutcome::Failure(err),
        };
        if let ExtractionOutcome::Failure(err) = &outcome {
            scrape_warn!("Extraction of {} failed: {}", url, err);
        }
        outcome
    }
}

/// Map a decoded service response onto the three extraction outcomes.
pub(crate) fn classify(body: ExtractionResponseBody) -> ExtractionOutcome {
    if !body.is_success() {
        let status_code = body.status_code;
        let message = body
            .error
            .unwrap_or_else(|| format!("extraction service reported status {status_code}"));
        return ExtractionOutcome::Failure(ExtractionError::new(
            FailureKind::Remote { status_code },
            message,
        ));
    }
    if body.result.is_empty() {
        return ExtractionOutcome::EmptyMatch(body.html.unwrap_or_default());
    }
    ExtractionOutcome::Success(body.result)
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> ExtractionError {
    ExtractionError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ExtractionError {
    if err.is_timeout() {
        return ExtractionError::new(FailureKind::Timeout, err.to_string());
    }
    ExtractionError::new(FailureKind::Network, err.to_string())
}
