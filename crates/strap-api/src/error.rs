//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use strap_core::IngestError;

/// API error type that converts to HTTP responses
///
/// Every variant answers `500` with `{"detail": <message>}`. The variants
/// exist so logs keep the failure kind; callers only see the message, whose
/// wording is not a stable format.
#[derive(Debug)]
pub enum ApiError {
    /// The upload could not be read from the request
    Upload(String),
    /// The upload could not be staged
    Staging(String),
    /// The staged upload could not be decoded
    Decode(String),
    /// The staged upload could not be removed
    Cleanup(String),
    /// Anything else
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Upload(_) => "upload",
            ApiError::Staging(_) => "staging",
            ApiError::Decode(_) => "decode",
            ApiError::Cleanup(_) => "cleanup",
            ApiError::Internal(_) => "internal",
        }
    }

    /// Message returned to the caller
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Upload(msg)
            | ApiError::Staging(msg)
            | ApiError::Decode(msg)
            | ApiError::Cleanup(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind(), self.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let kind = self.kind();
        let detail = self.detail().to_string();

        // Bad input is the caller's problem; everything else is ours
        if matches!(self, ApiError::Upload(_) | ApiError::Decode(_)) {
            tracing::warn!(error = kind, %detail, "API error");
        } else {
            tracing::error!(error = kind, %detail, "API error");
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        let msg = err.to_string();
        match err {
            IngestError::Upload(_) => ApiError::Upload(msg),
            IngestError::Staging(_) => ApiError::Staging(msg),
            IngestError::Decode(_) => ApiError::Decode(msg),
            IngestError::Cleanup { .. } => ApiError::Cleanup(msg),
            IngestError::Internal(_) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::DecodeError;

    #[test]
    fn test_ingest_error_mapping_keeps_kind_and_message() {
        let err = ApiError::from(IngestError::from(DecodeError::Empty));
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.detail(), "history file is empty");

        let err = ApiError::from(IngestError::Staging(std::io::Error::other("disk full")));
        assert!(matches!(err, ApiError::Staging(_)));
        assert!(err.detail().contains("disk full"));

        let err = ApiError::from(IngestError::Upload("missing multipart field 'file'".into()));
        assert!(matches!(err, ApiError::Upload(_)));
        assert_eq!(err.detail(), "upload failed: missing multipart field 'file'");

        let err = ApiError::from(IngestError::Internal("decode task failed: panic".into()));
        assert!(matches!(err, ApiError::Internal(_)));
        assert!(err.detail().contains("decode task failed"));
    }

    #[test]
    fn test_every_kind_is_server_error() {
        let errors = [
            ApiError::Upload("a".into()),
            ApiError::Staging("b".into()),
            ApiError::Decode("c".into()),
            ApiError::Cleanup("d".into()),
            ApiError::Internal("e".into()),
        ];
        for err in errors {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
