//! Rate offer types.
//!
//! A [`RateOffer`] is a bidder's proposed conversion rate against a specific
//! exchange request. At most one offer per request ever reaches ACCEPTED.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ExchangeError, OfferId, RequestId, Result, UserId};

/// Lifecycle status of a rate offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A bidder's competing quote against an exchange request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateOffer {
    pub id: OfferId,
    /// The request this offer competes on.
    pub request_id: RequestId,
    /// Never the request owner (enforced at submission).
    pub bidder: UserId,
    /// Quoted as `to` currency per unit of `from` currency. Always > 0.
    pub rate: Decimal,
    /// `request.amount × rate`. Redundant with `rate`, kept for audit.
    pub total_amount: Decimal,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RateOffer {
    /// Create a new PENDING offer. Validation happens upstream in the
    /// admission gate.
    #[must_use]
    pub fn new(request_id: RequestId, bidder: UserId, rate: Decimal, total_amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: OfferId::new(),
            request_id,
            bidder,
            rate,
            total_amount,
            status: OfferStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OfferStatus::Pending
    }

    /// Transition PENDING → ACCEPTED.
    ///
    /// # Errors
    /// Returns `InvalidStateTransition` unless the offer is PENDING.
    pub fn mark_accepted(&mut self) -> Result<()> {
        if !self.is_pending() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "offer",
                current: self.status.to_string(),
                expected: "PENDING",
            });
        }
        self.status = OfferStatus::Accepted;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition PENDING → REJECTED.
    ///
    /// # Errors
    /// Returns `InvalidStateTransition` unless the offer is PENDING.
    pub fn mark_rejected(&mut self) -> Result<()> {
        if !self.is_pending() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "offer",
                current: self.status.to_string(),
                expected: "PENDING",
            });
        }
        self.status = OfferStatus::Rejected;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl std::fmt::Display for RateOffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Offer[{}] on {} @ {} = {} ({})",
            self.id, self.request_id, self.rate, self.total_amount, self.status,
        )
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl RateOffer {
    pub fn dummy_for(request_id: RequestId, bidder: UserId) -> Self {
        // 100 units at rate 3700 — matches ExchangeRequest::dummy.
        Self::new(
            request_id,
            bidder,
            Decimal::new(3700, 0),
            Decimal::new(370_000, 0),
        )
    }
}
