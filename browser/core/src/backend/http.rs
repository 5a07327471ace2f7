//! HTTP Backend Implementation
//!
//! Talks to the recommendation service over plain HTTP/JSON.
//!
//! # Service API
//!
//! - `GET /bookrcm?query=<text>&k=<limit>` - ranked recommendations,
//!   answered with `{"results": [...]}` or, on failure, `{"error": "..."}`
//! - `POST /explain` - body `{"title", "authors", "description"}`,
//!   answered with `{"reason": "..."}`
//! - `GET /docs` - used as a liveness check

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::traits::{BackendError, BackendResult, BookBackend};
use crate::book::{BookRecord, BookSummary};
use crate::config::ServiceConfig;

/// Longest response body kept in a [`BackendError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Body of the recommendation endpoint
#[derive(Debug, Deserialize)]
struct RecommendationResponse {
    #[serde(default)]
    results: Option<Vec<BookRecord>>,
    #[serde(default)]
    error: Option<String>,
}

/// Body of the explanation endpoint; every other field is ignored
#[derive(Debug, Deserialize)]
struct ExplanationResponse {
    #[serde(default)]
    reason: Option<String>,
}

/// HTTP backend client
#[derive(Clone)]
pub struct HttpBackend {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend
    ///
    /// `timeout` is the transport-level request timeout.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> BackendResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::ClientBuild(e.to_string()))?;

        Ok(Self {
            host: host.into(),
            port,
            http_client,
        })
    }

    /// Create from `ServiceConfig`
    pub fn from_config(config: &ServiceConfig) -> BackendResult<Self> {
        Self::new(
            config.host.clone(),
            config.port,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Get the base URL
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn recommend_url(&self) -> String {
        format!("{}/bookrcm", self.base_url())
    }

    fn explain_url(&self) -> String {
        format!("{}/explain", self.base_url())
    }

    fn docs_url(&self) -> String {
        format!("{}/docs", self.base_url())
    }

    /// Turn a non-success response into a `Status` error
    async fn check_status(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(BackendError::Status { status, body })
    }
}

#[async_trait]
impl BookBackend for HttpBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.docs_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn search(&self, query: &str, limit: usize) -> BackendResult<Vec<BookRecord>> {
        let response = self
            .http_client
            .get(self.recommend_url())
            .query(&[("query", query.to_string()), ("k", limit.to_string())])
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        parse_recommendations(&body)
    }

    async fn explain(&self, book: &BookSummary) -> BackendResult<String> {
        let response = self
            .http_client
            .post(self.explain_url())
            .json(book)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        parse_rationale(&body)
    }
}

/// Decode the recommendation body
///
/// A missing or `null` result list is an empty result, not an error. That
/// includes the service's `{"error": "..."}` body; its message is logged.
fn parse_recommendations(body: &str) -> BackendResult<Vec<BookRecord>> {
    let parsed: RecommendationResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    if let Some(results) = parsed.results {
        return Ok(results);
    }
    if let Some(error) = parsed.error {
        tracing::warn!(error = %error, "Recommendation service reported an error; no results");
    }
    Ok(Vec::new())
}

/// Decode the explanation body, reading only `reason`
fn parse_rationale(body: &str) -> BackendResult<String> {
    let parsed: ExplanationResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    match parsed.reason {
        Some(reason) if !reason.trim().is_empty() => Ok(reason.trim().to_string()),
        _ => Err(BackendError::EmptyRationale),
    }
}
