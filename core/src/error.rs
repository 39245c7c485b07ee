//! Error taxonomy for the inventory API client.
//!
//! # Design
//! One closed enum covers every way an operation can fail, so callers branch
//! on the variant instead of parsing messages. Transport and JSON library
//! errors are converted to text at the boundary and never exposed.
//!
//! A 404 means different things per endpoint: on the collection it points at
//! a wrong base URL (`EndpointNotFound`), on an item it means the product does
//! not exist (`NotFound`). Other non-success statuses land in `Api` with the
//! raw status and body.

use thiserror::Error;

/// Errors returned by `ProductClient` parse methods and `InventoryService`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained: connection refused, DNS failure, timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The response body is not valid UTF-8 or not valid JSON.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The body is valid JSON but not the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// The collection endpoint returned 404.
    #[error("endpoint not found, check the configured base URL")]
    EndpointNotFound,

    /// The requested product does not exist.
    #[error("product not found")]
    NotFound,

    /// Any other non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("could not encode request: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status behind the error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::EndpointNotFound | ApiError::NotFound => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_http_failures_only() {
        assert_eq!(ApiError::EndpointNotFound.status(), Some(404));
        assert_eq!(
            ApiError::Api {
                status: 503,
                body: String::new()
            }
            .status(),
            Some(503)
        );
        assert_eq!(ApiError::Network("refused".into()).status(), None);
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
    }

    #[test]
    fn api_error_message_carries_status_and_body() {
        let err = ApiError::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: boom");
    }
}
