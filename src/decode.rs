use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::{AgilePlaceError, Result};

const BODY_SNIPPET_CHARS: usize = 512;

/// Decodes a 2xx body. Empty bodies (204, bare 200) become an empty object.
pub(crate) fn decode_success(body: &str) -> Result<JsonValue> {
    if body.trim().is_empty() {
        return Ok(JsonValue::Object(Map::new()));
    }
    serde_json::from_str(body).map_err(|err| AgilePlaceError::Decode {
        message: format!("invalid response JSON: {err}"),
        body: snippet(body),
    })
}

/// Maps a non-success, non-429 status to its error kind.
pub(crate) fn status_error(status: u16, body: &str) -> AgilePlaceError {
    match status {
        401 | 403 => {
            let detail = error_message(body).unwrap_or_else(|| {
                if status == 401 {
                    "invalid or expired API token".to_owned()
                } else {
                    "access denied".to_owned()
                }
            });
            AgilePlaceError::Auth {
                status,
                message: format!(
                    "{detail}; check AGILEPLACE_API_TOKEN and AGILEPLACE_DOMAIN"
                ),
            }
        }
        500..=599 => AgilePlaceError::ApiServer {
            status,
            body: snippet(body),
        },
        _ => AgilePlaceError::ApiRequest {
            status,
            message: error_message(body),
            body: snippet(body),
        },
    }
}

pub(crate) fn is_transient_server_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

/// Parses `Retry-After` as delta seconds or an HTTP-date, capped at `cap`.
pub(crate) fn parse_retry_after(value: &str, cap: Duration) -> Option<Duration> {
    retry_after_from(value, Utc::now(), cap)
}

fn retry_after_from(value: &str, now: DateTime<Utc>, cap: Duration) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<f64>() {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        return Some(Duration::from_secs_f64(seconds.min(cap.as_secs_f64())));
    }
    // A date already in the past means retry now.
    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = (at.with_timezone(&Utc) - now)
        .to_std()
        .unwrap_or(Duration::ZERO);
    Some(wait.min(cap))
}

/// `message` field of a JSON error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
}

/// Extracts a list field from a response object, defaulting to `[]`.
pub(crate) fn take_list(mut response: JsonValue, field: &str) -> JsonValue {
    response
        .get_mut(field)
        .map(JsonValue::take)
        .filter(|value| !value.is_null())
        .unwrap_or_else(|| JsonValue::Array(Vec::new()))
}

pub(crate) fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_owned(),
    }
}
