//! Error taxonomy module
//!
//! Every failure a handler can produce is one of these variants, and each
//! variant maps to exactly one HTTP status code. Parse failures are
//! classified as validation errors, not storage faults.

use hyper::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Request-level error returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong API key
    #[error("Invalid API key")]
    Unauthorized,

    /// Malformed body or wrong shape
    #[error("{0}")]
    Validation(String),

    /// No snapshot stored yet
    #[error("{0}")]
    NotFound(String),

    /// Key-value store access failed
    #[error("{0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
