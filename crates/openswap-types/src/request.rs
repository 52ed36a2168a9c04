//! Exchange request types.
//!
//! An [`ExchangeRequest`] is a posted intent to convert an amount of one
//! currency into another. Its status only ever moves forward through the
//! state machine: ACTIVE → COMPLETED or ACTIVE → CANCELLED.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CurrencyPair, ExchangeError, OfferId, RequestId, Result, UserId};

/// Informational urgency tag chosen by the requester. Has no effect on
/// matching or settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Standard,
    Urgent,
    Express,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::Urgent => write!(f, "URGENT"),
            Self::Express => write!(f, "EXPRESS"),
        }
    }
}

/// Lifecycle status of an exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A posted intent to convert `amount` of `pair.from` into `pair.to`.
///
/// Requests are never deleted, only status-transitioned. The status and
/// `selected_offer` fields are mutated exclusively through
/// [`mark_completed`](ExchangeRequest::mark_completed) and
/// [`mark_cancelled`](ExchangeRequest::mark_cancelled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: RequestId,
    pub owner: UserId,
    pub pair: CurrencyPair,
    /// Amount of `pair.from` the owner wants to convert. Always > 0.
    pub amount: Decimal,
    /// The rate the owner hopes for, quoted as `to` per `from`. Advisory only.
    pub desired_rate: Option<Decimal>,
    pub priority: Priority,
    pub status: RequestStatus,
    /// Set exactly once, when an offer is accepted.
    pub selected_offer: Option<OfferId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRequest {
    /// Create a new ACTIVE request. Field validation happens upstream in the
    /// admission gate; this constructor only assembles the record.
    #[must_use]
    pub fn new(
        owner: UserId,
        pair: CurrencyPair,
        amount: Decimal,
        desired_rate: Option<Decimal>,
        priority: Priority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RequestId::new(),
            owner,
            pair,
            amount,
            desired_rate,
            priority,
            status: RequestStatus::Active,
            selected_offer: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RequestStatus::Active
    }

    /// Transition ACTIVE → COMPLETED, recording the winning offer.
    ///
    /// # Errors
    /// Returns `InvalidStateTransition` unless the request is ACTIVE.
    pub fn mark_completed(&mut self, selected_offer: OfferId) -> Result<()> {
        if !self.is_active() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "request",
                current: self.status.to_string(),
                expected: "ACTIVE",
            });
        }
        self.status = RequestStatus::Completed;
        self.selected_offer = Some(selected_offer);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition ACTIVE → CANCELLED. Ownership is checked by the registry.
    ///
    /// # Errors
    /// Returns `InvalidStateTransition` unless the request is ACTIVE.
    pub fn mark_cancelled(&mut self) -> Result<()> {
        if !self.is_active() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "request",
                current: self.status.to_string(),
                expected: "ACTIVE",
            });
        }
        self.status = RequestStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl std::fmt::Display for ExchangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Request[{}] {} {} {} ({})",
            self.id, self.amount, self.pair, self.status, self.priority,
        )
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl ExchangeRequest {
    pub fn dummy(owner: UserId) -> Self {
        Self::new(
            owner,
            CurrencyPair::parse("USD", "UGX").unwrap(),
            Decimal::new(100, 0),
            None,
            Priority::Standard,
        )
    }

    pub fn dummy_pair(owner: UserId, from: &str, to: &str, amount: Decimal) -> Self {
        Self::new(
            owner,
            CurrencyPair::parse(from, to).unwrap(),
            amount,
            None,
            Priority::Standard,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_is_active() {
        let req = ExchangeRequest::dummy(UserId::new());
        assert!(req.is_active());
        assert!(req.selected_offer.is_none());
    }

    #[test]
    fn complete_records_offer() {
        let mut req = ExchangeRequest::dummy(UserId::new());
        let offer = OfferId::new();
        req.mark_completed(offer).unwrap();
        assert_eq!(req.status, RequestStatus::Completed);
        assert_eq!(req.selected_offer, Some(offer));
    }

    #[test]
    fn complete_twice_fails() {
        let mut req = ExchangeRequest::dummy(UserId::new());
        req.mark_completed(OfferId::new()).unwrap();
        let err = req.mark_completed(OfferId::new()).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidStateTransition { .. }));
    }

    #[test]
    fn cancel_completed_fails() {
        let mut req = ExchangeRequest::dummy(UserId::new());
        req.mark_completed(OfferId::new()).unwrap();
        let err = req.mark_cancelled().unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidStateTransition { .. }));
    }

    #[test]
    fn cancelled_request_keeps_no_offer() {
        let mut req = ExchangeRequest::dummy(UserId::new());
        req.mark_cancelled().unwrap();
        assert_eq!(req.status, RequestStatus::Cancelled);
        assert!(req.selected_offer.is_none());
    }

    #[test]
    fn priority_display() {
        assert_eq!(format!("{}", Priority::Standard), "STANDARD");
        assert_eq!(format!("{}", Priority::Express), "EXPRESS");
    }

    #[test]
    fn status_serde_is_snake_case() {
        let json = serde_json::to_string(&RequestStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }

    #[test]
    fn request_serde_roundtrip() {
        let req = ExchangeRequest::dummy(UserId::new());
        let json = serde_json::to_string(&req).unwrap();
        let back: ExchangeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.id, back.id);
        assert_eq!(req.amount, back.amount);
        assert_eq!(req.status, back.status);
    }
}
