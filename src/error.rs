//! Failure kinds for a single fetch.
//!
//! A fetch either produces a complete [`crate::report::AqiReport`] or one of
//! these errors; there is no partial result. Retry policy belongs to the
//! caller, not here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure or a non-200 upstream status.
    #[error("{}", transport_msg(.status, .reason))]
    Transport { status: Option<u16>, reason: String },

    /// Response body is not the expected `{fields: [...], data: [[...]]}`
    /// shape, or a row is missing a value that must be present.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Every candidate row fell below the confidence threshold.
    #[error("no sensors met the confidence threshold")]
    NoQualifiedSensors,

    /// No confident sensor reported the requested PM2.5 field.
    #[error("no qualifying sensor reported PM2.5 data")]
    NoPollutantData,
}

fn transport_msg(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("transport error (HTTP {code}): {reason}"),
        None => format!("transport error: {reason}"),
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport {
            status: err.status().map(|s| s.as_u16()),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_includes_status() {
        let err = FetchError::Transport {
            status: Some(503),
            reason: "service unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("service unavailable"));
    }

    #[test]
    fn test_transport_display_without_status() {
        let err = FetchError::Transport {
            status: None,
            reason: "connection refused".to_string(),
        };
        assert!(!err.to_string().contains("HTTP"));
    }
}
