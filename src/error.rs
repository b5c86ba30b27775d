use crate::RateLimitInfo;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum AgilePlaceError {
    /// Missing or malformed base URL, token, or HTTP client setup.
    #[error("configuration error: {0}")]
    Config(String),
    /// The API rejected the credentials (401) or the caller lacks access (403).
    #[error("authentication failed with status {status}: {message}")]
    Auth { status: u16, message: String },
    /// Every attempt was answered with 429.
    #[error("rate limit exceeded after {attempts} attempt(s), last status {status}")]
    RateLimitExceeded {
        /// Status of the last response.
        status: u16,
        /// Number of network attempts made for the logical call.
        attempts: usize,
        /// Rate-limit headers observed on the last response.
        rate_limit: RateLimitInfo,
    },
    /// 5xx response with a leading excerpt of the raw body.
    #[error("server error {status}: {body}")]
    ApiServer { status: u16, body: String },
    /// Non-retryable 4xx response (other than 401/403/429).
    #[error("request rejected with status {status}: {body}")]
    ApiRequest {
        status: u16,
        /// `message` field of the JSON error body, when there is one.
        message: Option<String>,
        /// Leading excerpt of the raw body.
        body: String,
    },
    /// Success status with a body that is not valid JSON.
    #[error("decode error: {message}; body: {body}")]
    Decode {
        message: String,
        /// Leading excerpt of the raw body.
        body: String,
    },
    /// Network or request execution error from `reqwest`, after retries.
    #[error("transport error after {attempts} attempt(s): {source}")]
    Transport {
        attempts: usize,
        source: reqwest::Error,
    },
    /// The caller cancelled the request while it was in flight or backing off.
    #[error("request cancelled")]
    Cancelled,
    /// Request body could not be serialized to JSON, or a path identifier is unusable.
    #[error("encode error: {0}")]
    Encode(String),
}

impl AgilePlaceError {
    /// HTTP status attached to the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::RateLimitExceeded { status, .. }
            | Self::ApiServer { status, .. }
            | Self::ApiRequest { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether this kind of failure is retried by the client before surfacing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. } | Self::Transport { .. })
    }
}
