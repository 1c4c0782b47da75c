//! Error types for calls against the PropConnect backend.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Fallback text when the backend gives no usable message.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred";

const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Please check your connection.";

/// Category of a failed call, inferred once at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Conflict,
    NotApproved,
    Suspended,
    Server,
    Decode,
    Other,
}

impl ErrorKind {
    /// Classify a response. A 401 is always `Unauthorized`; otherwise known
    /// business phrases win over the remaining status codes.
    pub fn infer(status: StatusCode, message: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ErrorKind::Unauthorized;
        }

        let lowered = message.to_lowercase();
        if lowered.contains("not approved")
            || lowered.contains("pending approval")
            || lowered.contains("awaiting approval")
        {
            return ErrorKind::NotApproved;
        }
        if lowered.contains("suspended") {
            return ErrorKind::Suspended;
        }

        match status {
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            status if status.is_server_error() => ErrorKind::Server,
            _ => ErrorKind::Other,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Http {
        status: u16,
        kind: ErrorKind,
        message: String,
    },

    #[error("invalid backend response: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Http { kind, .. } => *kind,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::InvalidUrl(_) => ErrorKind::Other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Text suitable for showing to the person using the client.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Decode(_) | ApiError::InvalidUrl(_) => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    pub(crate) fn from_response_parts(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());
        let kind = ErrorKind::infer(status, &message);
        ApiError::Http {
            status: status.as_u16(),
            kind,
            message,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Pull the human-readable message out of an error body.
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    [parsed.error, parsed.message]
        .into_iter()
        .flatten()
        .map(|message| message.trim().to_string())
        .find(|message| !message.is_empty())
}

pub type ApiResult<T> = Result<T, ApiError>;
