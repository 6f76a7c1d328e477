//! Error types shared by both services.
//!
//! Every failure is rendered as the same JSON envelope:
//! `{"error": {"kind": ..., "message": ...}}`. Success responses are not
//! wrapped.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for request handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request rejected at the handler boundary, before any statement
    /// is issued.
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// No connection could be acquired from the pool.
    #[error("database unavailable: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// A statement failed after a connection was acquired.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// The database round trip exceeded the request timeout.
    #[error("database operation timed out after {0}s")]
    Timeout(u64),

    /// The blocking worker was cancelled before the statement finished.
    #[error("blocking task failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

impl ApiError {
    /// Stable machine-readable discriminant carried in the envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "bad_request",
            ApiError::Pool(_) => "service_unavailable",
            ApiError::Database(_) => "internal",
            ApiError::Timeout(_) => "timeout",
            ApiError::Blocking(_) => "internal",
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(kind = self.kind(), "request failed: {self}");
        }
        HttpResponse::build(self.status_code()).json(ErrorEnvelope {
            error: ErrorBody {
                kind: self.kind(),
                message: self.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_codes_match_kinds() {
        let cases = [
            (ApiError::validation("name", "is required"), 400, "bad_request"),
            (ApiError::Timeout(10), 504, "timeout"),
            (
                ApiError::Database(diesel::result::Error::NotFound),
                500,
                "internal",
            ),
        ];
        for (err, status, kind) in cases {
            assert_eq!(err.status_code().as_u16(), status);
            assert_eq!(err.kind(), kind);
        }
    }

    #[actix_web::test]
    async fn envelope_shape_is_stable() {
        let resp = ApiError::validation("age", "must be between 0 and 150")
            .error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["kind"], "bad_request");
        assert_eq!(json["error"]["message"], "age: must be between 0 and 150");
    }
}
