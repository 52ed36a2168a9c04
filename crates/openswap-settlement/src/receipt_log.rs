//! Append-only settlement receipt log.
//!
//! One receipt per settled trade, in settlement order. Receipts carry their
//! own payload hash, so the whole log can be re-verified at any time.

use openswap_types::{ExchangeError, Result, SettlementReceipt, UserId};

/// Audit trail of settled trades.
pub struct ReceiptLog {
    receipts: Vec<SettlementReceipt>,
}

impl ReceiptLog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            receipts: Vec::new(),
        }
    }

    /// Append a receipt. Receipts are never removed or rewritten.
    pub fn append(&mut self, receipt: SettlementReceipt) {
        tracing::debug!(offer_id = %receipt.offer_id, hash = %receipt.hash_hex(), "receipt appended");
        self.receipts.push(receipt);
    }

    /// All receipts, oldest first.
    #[must_use]
    pub fn all(&self) -> &[SettlementReceipt] {
        &self.receipts
    }

    /// Receipts where the user was either side of the trade.
    #[must_use]
    pub fn for_user(&self, user: UserId) -> Vec<SettlementReceipt> {
        self.receipts
            .iter()
            .filter(|r| r.owner == user || r.bidder == user)
            .cloned()
            .collect()
    }

    /// Re-verify every receipt's payload hash.
    ///
    /// # Errors
    /// Returns `Internal` naming the first corrupt receipt.
    pub fn verify_all(&self) -> Result<()> {
        for receipt in &self.receipts {
            if !receipt.verify() {
                return Err(ExchangeError::Internal(format!(
                    "receipt hash mismatch for offer {}",
                    receipt.offer_id
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

impl Default for ReceiptLog {
    fn default() -> Self {
        Self::new()
    }
}
