//! Domain error → HTTP response mapping.
//!
//! Every domain error is terminal and user-visible (4xx); infrastructure
//! faults surface as a generic 500 without leaking internals. The engine
//! guarantees no partial commit either way.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openswap_types::ExchangeError;
use serde::Serialize;

/// Wrapper turning [`ExchangeError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ExchangeError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ExchangeError::RequestNotFound(_)
            | ExchangeError::OfferNotFound(_)
            | ExchangeError::UserNotFound(_)
            | ExchangeError::OfferRequestMismatch { .. } => StatusCode::NOT_FOUND,

            ExchangeError::Forbidden { .. } | ExchangeError::SelfBidForbidden => {
                StatusCode::FORBIDDEN
            }

            ExchangeError::InvalidStateTransition { .. } => StatusCode::CONFLICT,

            ExchangeError::DuplicateActiveRequest { .. }
            | ExchangeError::RequestNotActive(_)
            | ExchangeError::OpenOfferLimitExceeded { .. }
            | ExchangeError::InsufficientBalance { .. }
            | ExchangeError::BalanceUnderflow
            | ExchangeError::ValidationError { .. }
            | ExchangeError::InvalidCurrency { .. } => StatusCode::BAD_REQUEST,

            ExchangeError::SupplyInvariantViolation { .. }
            | ExchangeError::Internal(_)
            | ExchangeError::Serialization(_)
            | ExchangeError::Configuration(_)
            | ExchangeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal fault");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        Self(err)
    }
}
