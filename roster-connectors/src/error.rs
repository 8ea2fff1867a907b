//! Error types for roster-connectors.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use roster_core::EmployeeId;

/// All errors a connector can return.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The request never got an HTTP response (DNS, TLS, timeout...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A non-success HTTP status other than a validation rejection.
    #[error("{url} returned HTTP {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// The hosted app refused the record (HTTP 400 with an `errors` list).
    #[error("record rejected: {}", .messages.join("; "))]
    Rejected { messages: Vec<String> },

    /// A response or file could not be decoded.
    #[error("could not decode {what}: {message}")]
    Decode { what: String, message: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid connector configuration: {0}")]
    Config(String),

    /// A write addressed an employee the last fetch did not return.
    #[error("no hosted-app record for employee {0}")]
    UnknownRecord(EmployeeId),
}

/// Convenience constructor for [`ConnectorError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConnectorError {
    ConnectorError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn decode_err(what: impl Into<String>, err: impl std::fmt::Display) -> ConnectorError {
    ConnectorError::Decode {
        what: what.into(),
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// HTTP response mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    errors: Vec<ValidationMessage>,
}

#[derive(Debug, Deserialize)]
struct ValidationMessage {
    message: String,
}

/// Map a `ureq` failure onto [`ConnectorError`].
///
/// A 400 whose body lists `errors[].message` becomes
/// [`ConnectorError::Rejected`] so each message reaches the run report.
pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> ConnectorError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            if status == 400 {
                if let Some(messages) = validation_messages(&body) {
                    return ConnectorError::Rejected { messages };
                }
            }
            ConnectorError::Http {
                url: url.to_string(),
                status,
                body,
            }
        }
        ureq::Error::Transport(transport) => ConnectorError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

/// `errors[].message` from a validation response, if the body has any.
pub fn validation_messages(body: &str) -> Option<Vec<String>> {
    let parsed: ValidationBody = serde_json::from_str(body).ok()?;
    if parsed.errors.is_empty() {
        return None;
    }
    Some(parsed.errors.into_iter().map(|e| e.message).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_collected_in_order() {
        let body = r#"{"errors":[{"message":"Email is required"},{"message":"Password too short"}]}"#;
        assert_eq!(
            validation_messages(body),
            Some(vec![
                "Email is required".to_string(),
                "Password too short".to_string()
            ])
        );
    }

    #[test]
    fn non_validation_bodies_are_ignored() {
        assert_eq!(validation_messages("<html>bad gateway</html>"), None);
        assert_eq!(validation_messages(r#"{"errors":[]}"#), None);
    }

    #[test]
    fn rejected_display_joins_messages() {
        let err = ConnectorError::Rejected {
            messages: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "record rejected: a; b");
    }
}
