//! Error types for the OpenSwap exchange engine.
//!
//! All errors use the `OSW_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Request errors
//! - 2xx: Offer errors
//! - 3xx: Ledger / balance errors
//! - 4xx: Authorization / state errors
//! - 5xx: Validation errors
//! - 6xx: Directory errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{CurrencyPair, OfferId, RequestId, UserId};

/// Central error enum for all OpenSwap operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    // =================================================================
    // Request Errors (1xx)
    // =================================================================
    /// The requested exchange request was not found.
    #[error("OSW_ERR_100: Exchange request not found: {0}")]
    RequestNotFound(RequestId),

    /// The owner already has an active request for this currency pair.
    #[error("OSW_ERR_101: Duplicate active request for {pair} by user {owner}")]
    DuplicateActiveRequest { owner: UserId, pair: CurrencyPair },

    /// The target request is no longer accepting offers.
    #[error("OSW_ERR_102: Exchange request is not active: {0}")]
    RequestNotActive(RequestId),

    // =================================================================
    // Offer Errors (2xx)
    // =================================================================
    /// The requested rate offer was not found.
    #[error("OSW_ERR_200: Rate offer not found: {0}")]
    OfferNotFound(OfferId),

    /// A user attempted to bid on their own exchange request.
    #[error("OSW_ERR_201: Self-bid forbidden: bidder owns the exchange request")]
    SelfBidForbidden,

    /// The offer does not belong to the request named in the call.
    #[error("OSW_ERR_202: Offer {offer} does not belong to request {request}")]
    OfferRequestMismatch { offer: OfferId, request: RequestId },

    /// Too many open offers on a single request.
    #[error("OSW_ERR_203: Open offer limit reached ({limit}) for this request")]
    OpenOfferLimitExceeded { limit: usize },

    // =================================================================
    // Ledger / Balance Errors (3xx)
    // =================================================================
    /// Not enough balance to perform the debit.
    #[error("OSW_ERR_300: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A balance operation would produce a negative value.
    #[error("OSW_ERR_301: Balance underflow")]
    BalanceUnderflow,

    /// Supply conservation invariant violated — critical safety alert.
    #[error("OSW_ERR_302: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Authorization / State Errors (4xx)
    // =================================================================
    /// The caller is not authorized for this operation.
    #[error("OSW_ERR_400: Forbidden: {reason}")]
    Forbidden { reason: String },

    /// The entity is not in the required state for the requested transition.
    #[error("OSW_ERR_401: Invalid state transition: {entity} is {current}, expected {expected}")]
    InvalidStateTransition {
        entity: &'static str,
        current: String,
        expected: &'static str,
    },

    // =================================================================
    // Validation Errors (5xx)
    // =================================================================
    /// A request or offer payload failed boundary validation.
    #[error("OSW_ERR_500: Validation failed: {reason}")]
    ValidationError { reason: String },

    /// A currency code is malformed or unsupported.
    #[error("OSW_ERR_501: Invalid currency code: {code:?}")]
    InvalidCurrency { code: String },

    // =================================================================
    // Directory Errors (6xx)
    // =================================================================
    /// The referenced user does not exist in the account directory.
    #[error("OSW_ERR_600: User not found: {0}")]
    UserNotFound(UserId),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OSW_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OSW_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid listen address, missing fields, etc.).
    #[error("OSW_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("OSW_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ExchangeError>;

// Conversion from std::io::Error
impl From<std::io::Error> for ExchangeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
