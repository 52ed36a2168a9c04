//! Settlement receipts for the OpenSwap audit trail.
//!
//! Every settled trade produces a [`SettlementReceipt`] whose SHA-256
//! payload hash can be independently recomputed and verified.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{CurrencyPair, ExchangeRequest, OfferId, RateOffer, RequestId, UserId};

/// Immutable record of a settled trade.
///
/// Receipts form an append-only audit trail. The hash covers every economic
/// field, so any later tampering with a stored receipt is detectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub request_id: RequestId,
    pub offer_id: OfferId,
    /// The request owner: paid `amount` of `pair.from`, received `total_amount`.
    pub owner: UserId,
    /// The winning bidder: mirrored movement.
    pub bidder: UserId,
    pub pair: CurrencyPair,
    pub amount: Decimal,
    pub rate: Decimal,
    pub total_amount: Decimal,
    /// SHA-256 over the canonical payload of the fields above + `settled_at`.
    pub payload_hash: [u8; 32],
    pub settled_at: DateTime<Utc>,
}

/// Canonical hash input. Kept private so the wire layout of the hash payload
/// cannot drift apart from `compute_hash`.
#[derive(Serialize)]
struct HashPayload<'a> {
    request_id: &'a RequestId,
    offer_id: &'a OfferId,
    owner: &'a UserId,
    bidder: &'a UserId,
    pair: &'a CurrencyPair,
    amount: &'a Decimal,
    rate: &'a Decimal,
    total_amount: &'a Decimal,
    settled_at: &'a DateTime<Utc>,
}

impl SettlementReceipt {
    /// Record a settled trade from its request and winning offer.
    #[must_use]
    pub fn record(request: &ExchangeRequest, offer: &RateOffer) -> Self {
        let mut receipt = Self {
            request_id: request.id,
            offer_id: offer.id,
            owner: request.owner,
            bidder: offer.bidder,
            pair: request.pair.clone(),
            amount: request.amount,
            rate: offer.rate,
            total_amount: offer.total_amount,
            payload_hash: [0u8; 32],
            settled_at: Utc::now(),
        };
        receipt.payload_hash = receipt.compute_hash();
        receipt
    }

    /// Recompute the canonical payload hash from the receipt's fields.
    #[must_use]
    pub fn compute_hash(&self) -> [u8; 32] {
        let payload = HashPayload {
            request_id: &self.request_id,
            offer_id: &self.offer_id,
            owner: &self.owner,
            bidder: &self.bidder,
            pair: &self.pair,
            amount: &self.amount,
            rate: &self.rate,
            total_amount: &self.total_amount,
            settled_at: &self.settled_at,
        };
        let bytes = serde_json::to_vec(&payload).expect("receipt payload serializes");
        let mut hasher = Sha256::new();
        hasher.update(b"openswap:receipt:v1:");
        hasher.update(&bytes);
        hasher.finalize().into()
    }

    /// Whether the stored hash still matches the receipt's fields.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.payload_hash == self.compute_hash()
    }

    /// Hex form of the payload hash, for logs and API responses.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.payload_hash)
    }
}

impl std::fmt::Display for SettlementReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Receipt[{}] {} {} @ {} = {} ({})",
            self.offer_id,
            self.amount,
            self.pair,
            self.rate,
            self.total_amount,
            &self.hash_hex()[..8],
        )
    }
}
