use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::error::{AddressError, LedgerError};

/// Errors surfaced by HTTP handlers, rendered as JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("{0}")]
    BadRequest(String),

    #[error("mining worker failed: {0}")]
    Worker(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::Mining(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Ledger(LedgerError::StaleTip) => StatusCode::CONFLICT,
            ApiError::Ledger(LedgerError::EmptyChain) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Address(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.to_string(),
        })
    }
}
