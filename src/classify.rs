//! Response classification.
//!
//! Turns the raw outcome of one (dataset, year) request — status code,
//! decoded payload, captured error — into a small taxonomy of actionable
//! statuses. [`classify`] is a pure function of its inputs: no hidden state,
//! fully deterministic, so every branch is unit-testable without a network.

use crate::fetcher::FetchError;
use crate::SourceType;
use serde_json::Value;

/// Overall outcome of one download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Request completed and returned usable data
    Ok,
    /// Anything else, detailed by [`ErrorKind`]
    Error,
}

impl Status {
    /// String form used in artifacts ("ok" / "error").
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Error => "error",
        }
    }
}

/// Error taxonomy for failed download attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 429 persisted through the retry budget (or retries were bypassed)
    RateLimited,
    /// 5xx persisted through the retry budget (or retries were bypassed)
    UpstreamServerError,
    /// Transport-level failure that exhausted all retry attempts
    TransientRetriesExhausted,
    /// No HTTP call was attempted (blank or unusable dataset configuration)
    MalformedOrMissingConfig,
    /// 2xx response whose payload contains no observations for the year
    NoDataInRange,
    /// 400 - the API rejected the request shape
    MalformedRequest,
    /// 401/403 - authentication or authorization failure
    AuthOrAccess,
    /// 404 - series or endpoint does not exist
    DatasetNotFound,
    /// Any status code outside the known taxonomy
    UnexpectedStatus,
}

impl ErrorKind {
    /// Snake-case identifier written into artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::UpstreamServerError => "upstream_server_error",
            ErrorKind::TransientRetriesExhausted => "transient_retries_exhausted",
            ErrorKind::MalformedOrMissingConfig => "malformed_or_missing_config",
            ErrorKind::NoDataInRange => "no_data_in_range",
            ErrorKind::MalformedRequest => "malformed_request",
            ErrorKind::AuthOrAccess => "auth_or_access",
            ErrorKind::DatasetNotFound => "dataset_not_found",
            ErrorKind::UnexpectedStatus => "unexpected_status",
        }
    }
}

/// Suggested operator response for a classified outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendedAction {
    /// Transient upstream condition, re-run later
    RetryLater,
    /// Dataset identifier or request parameters need correction
    FixRequest,
    /// The year genuinely has no data, or the range should change
    AcceptOrChangeTimeRange,
    /// API key missing, wrong, or lacking permissions
    CheckApiKeyOrPermissions,
    /// Unrecognized response, needs a human look
    InspectResponse,
    /// Nothing to do
    None,
}

impl RecommendedAction {
    /// Snake-case identifier written into artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::RetryLater => "retry_later",
            RecommendedAction::FixRequest => "fix_request",
            RecommendedAction::AcceptOrChangeTimeRange => "accept_or_change_time_range",
            RecommendedAction::CheckApiKeyOrPermissions => "check_api_key_or_permissions",
            RecommendedAction::InspectResponse => "inspect_response",
            RecommendedAction::None => "none",
        }
    }
}

/// Derived status for one request outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Overall outcome
    pub status: Status,
    /// Error detail, absent on success
    pub error_type: Option<ErrorKind>,
    /// Suggested operator response
    pub recommended_action: RecommendedAction,
    /// Human-readable explanation
    pub message: String,
}

impl Classification {
    fn ok() -> Self {
        Self {
            status: Status::Ok,
            error_type: None,
            recommended_action: RecommendedAction::None,
            message: "Success".to_string(),
        }
    }

    fn error(kind: ErrorKind, action: RecommendedAction, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error_type: Some(kind),
            recommended_action: action,
            message: message.into(),
        }
    }

    /// Artifact string for `error_type` (empty on success).
    pub fn error_type_str(&self) -> &'static str {
        self.error_type.map(|k| k.as_str()).unwrap_or("")
    }

    /// True when the outcome is [`Status::Ok`].
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Per-source heuristic for a 2xx response that carries no observations.
///
/// OECD, ECB, and IMF payloads are never considered empty here: their SDMX
/// shapes are too irregular to introspect generically.
fn is_no_data_response(source_type: SourceType, payload: Option<&Value>) -> bool {
    let Some(payload) = payload else {
        return false;
    };

    match source_type {
        SourceType::Fred => payload
            .get("observations")
            .and_then(Value::as_array)
            .is_some_and(|obs| obs.is_empty()),
        SourceType::Bls => {
            let series = payload
                .get("Results")
                .and_then(|r| r.get("series"))
                .and_then(Value::as_array);
            match series {
                None => true,
                Some(series) if series.is_empty() => true,
                // A series element without a data array carries no
                // observations, same as an explicitly empty one.
                Some(series) => series[0]
                    .get("data")
                    .and_then(Value::as_array)
                    .map_or(true, |data| data.is_empty()),
            }
        }
        SourceType::Coingecko => payload
            .get("prices")
            .and_then(Value::as_array)
            .is_some_and(|prices| prices.is_empty()),
        SourceType::Census => payload.as_array().is_some_and(|rows| rows.len() <= 1),
        SourceType::Oecd | SourceType::Ecb | SourceType::Imf => false,
    }
}

/// Classify one request outcome.
///
/// Decision order is a priority list: a captured error always wins over
/// status-code inspection, and an absent status code (no call attempted)
/// wins over payload inspection.
pub fn classify(
    source_type: SourceType,
    status_code: Option<u16>,
    payload: Option<&Value>,
    error: Option<&FetchError>,
) -> Classification {
    if let Some(error) = error {
        if let FetchError::RetryableStatus { status } = error {
            if *status == 429 {
                return Classification::error(
                    ErrorKind::RateLimited,
                    RecommendedAction::RetryLater,
                    "Rate limit persisted after retries.",
                );
            }
            if matches!(status, 500 | 502 | 503 | 504) {
                return Classification::error(
                    ErrorKind::UpstreamServerError,
                    RecommendedAction::RetryLater,
                    "Upstream server errors persisted after retries.",
                );
            }
        }
        return Classification::error(
            ErrorKind::TransientRetriesExhausted,
            RecommendedAction::RetryLater,
            error.to_string(),
        );
    }

    let Some(status_code) = status_code else {
        return Classification::error(
            ErrorKind::MalformedOrMissingConfig,
            RecommendedAction::FixRequest,
            "Missing required dataset URL or configuration.",
        );
    };

    if (200..300).contains(&status_code) {
        if is_no_data_response(source_type, payload) {
            return Classification::error(
                ErrorKind::NoDataInRange,
                RecommendedAction::AcceptOrChangeTimeRange,
                "Request succeeded but the API returned no data for this year.",
            );
        }
        return Classification::ok();
    }

    if status_code == 400 {
        return Classification::error(
            ErrorKind::MalformedRequest,
            RecommendedAction::FixRequest,
            "API rejected request format or parameters.",
        );
    }

    if matches!(status_code, 401 | 403) {
        return Classification::error(
            ErrorKind::AuthOrAccess,
            RecommendedAction::CheckApiKeyOrPermissions,
            "Authentication/authorization failed.",
        );
    }

    if status_code == 404 {
        return Classification::error(
            ErrorKind::DatasetNotFound,
            RecommendedAction::FixRequest,
            "Dataset endpoint or series was not found.",
        );
    }

    // Reachable when retries were bypassed or the budget was spent elsewhere.
    if status_code == 429 {
        return Classification::error(
            ErrorKind::RateLimited,
            RecommendedAction::RetryLater,
            "Rate limit hit after retries.",
        );
    }

    if (500..600).contains(&status_code) {
        return Classification::error(
            ErrorKind::UpstreamServerError,
            RecommendedAction::RetryLater,
            "Upstream server error after retries.",
        );
    }

    Classification::error(
        ErrorKind::UnexpectedStatus,
        RecommendedAction::InspectResponse,
        format!("Unexpected status code {status_code}"),
    )
}
