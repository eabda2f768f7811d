//! Errors raised by the ARM client.

use serde::Deserialize;
use thiserror::Error;

/// Error talking to Azure Resource Manager.
#[derive(Debug, Error)]
pub enum ArmError {
    /// ARM answered with a non-success status.
    #[error("({code}) {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body did not match the expected shape.
    #[error("Invalid response at '{path}': {message}")]
    InvalidResponse { path: String, message: String },

    #[error("Pagination error: {0}")]
    Pagination(String),
}

/// Result type for ARM operations
pub type ArmResult<T> = Result<T, ArmError>;

impl ArmError {
    /// HTTP status when the error came back from ARM.
    pub fn status(&self) -> Option<u16> {
        match self {
            ArmError::Api { status, .. } => Some(*status),
            ArmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Build an `Api` error from a status and raw response body.
    ///
    /// Bodies that are not the ARM error envelope are kept verbatim.
    pub fn from_response(status: u16, body: &str) -> ArmError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => ArmError::Api {
                status,
                code: envelope.error.code,
                message: envelope.error.message,
            },
            Err(_) => ArmError::Api {
                status,
                code: format!("HTTP{status}"),
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// Message without the error code, as surfaced in module failures.
    pub fn message(&self) -> String {
        match self {
            ArmError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}
