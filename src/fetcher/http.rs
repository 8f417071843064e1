//! Shared HTTP runner for all source adapters.
//!
//! Owns the reqwest clients, the per-source [`Throttle`], and the
//! [`RetryPolicy`], so every adapter gets identical resilience behavior:
//! throttle before each attempt, retry transport failures and retryable
//! statuses with jittered backoff, return any other completed exchange
//! as-is.

use crate::downloader::config::RETRYABLE_STATUS_CODES;
use crate::downloader::retry::{retry_with_backoff, RetryPolicy};
use crate::downloader::throttle::Throttle;
use crate::fetcher::{FetchError, FetchResult};
use crate::SourceType;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default per-call timeout; OECD overrides this to 45s.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One planned HTTP call, fully described before execution.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    /// Source the call belongs to (drives throttling)
    pub source_type: SourceType,
    /// HTTP method
    pub method: Method,
    /// Request URL (query string may already be embedded)
    pub url: String,
    /// Query parameters appended to the URL
    pub query: Vec<(&'static str, String)>,
    /// JSON body for POST requests
    pub json_body: Option<Value>,
    /// Extra request headers
    pub headers: Vec<(&'static str, &'static str)>,
    /// Per-call timeout
    pub timeout: Duration,
    /// Skip TLS certificate verification (OECD only; upstream certificate
    /// issues are tolerated by design)
    pub insecure: bool,
}

impl RequestPlan {
    /// A GET plan with defaults.
    pub fn get(source_type: SourceType, url: impl Into<String>) -> Self {
        Self {
            source_type,
            method: Method::GET,
            url: url.into(),
            query: Vec::new(),
            json_body: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }

    /// A POST plan carrying a JSON body.
    pub fn post_json(source_type: SourceType, url: impl Into<String>, body: Value) -> Self {
        Self {
            source_type,
            method: Method::POST,
            url: url.into(),
            query: Vec::new(),
            json_body: Some(body),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }

    /// Set query parameters.
    pub fn with_query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route the call through the certificate-tolerant client.
    pub fn insecure(mut self) -> Self {
        self.insecure = true;
        self
    }
}

/// A completed HTTP exchange, decoded.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    /// Final status code
    pub status_code: u16,
    /// Effective URL after query serialization and redirects
    pub url: String,
    /// Decoded JSON body, or the raw-text fallback object
    pub payload: Value,
}

/// Throttled, retrying HTTP executor shared by every adapter.
pub struct HttpRunner {
    client: Client,
    insecure_client: Client,
    throttle: Throttle,
    policy: RetryPolicy,
}

impl HttpRunner {
    /// Runner with production throttle delays and retry budget.
    pub fn new() -> FetchResult<Self> {
        let client = Client::builder().build()?;
        let insecure_client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            insecure_client,
            throttle: Throttle::new(),
            policy: RetryPolicy::default(),
        })
    }

    /// Replace the retry policy (tests shrink the waits).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the throttle (tests shrink the delays).
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Execute one plan: throttle, send, retry retryable failures, decode.
    ///
    /// A completed exchange with a non-retryable status - success or not -
    /// is authoritative and returned without retry. On a retryable status
    /// the attempt raises [`FetchError::RetryableStatus`] so the retry loop
    /// and, after exhaustion, the classifier both see the code.
    pub async fn execute(&self, plan: &RequestPlan) -> FetchResult<HttpExchange> {
        let client = if plan.insecure {
            &self.insecure_client
        } else {
            &self.client
        };

        debug!(
            source = %plan.source_type,
            method = %plan.method,
            url = %plan.url,
            "executing request"
        );

        let response = retry_with_backoff(&self.policy, || async {
            // Throttling applies to every attempt, retries included, so
            // backoff and pacing compose instead of racing.
            self.throttle.wait_turn(plan.source_type).await;

            let mut request = client
                .request(plan.method.clone(), &plan.url)
                .timeout(plan.timeout);
            if !plan.query.is_empty() {
                request = request.query(&plan.query);
            }
            for (name, value) in &plan.headers {
                request = request.header(*name, *value);
            }
            if let Some(body) = &plan.json_body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            if RETRYABLE_STATUS_CODES.contains(&status) {
                return Err(FetchError::RetryableStatus { status });
            }
            Ok(response)
        })
        .await?;

        let status_code = response.status().as_u16();
        let url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response.text().await?;

        Ok(HttpExchange {
            status_code,
            url,
            payload: decode_payload(&text, &content_type),
        })
    }
}

/// Decode a response body as JSON, falling back to an object that carries
/// the raw text and content type so non-JSON errors are still persisted.
fn decode_payload(text: &str, content_type: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => json!({
            "non_json_response": text,
            "content_type": content_type,
        }),
    }
}
