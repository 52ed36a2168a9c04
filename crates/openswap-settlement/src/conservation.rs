//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced over the ledger:
//! ```text
//! ∀ currency: Σ(balances) == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! Settlement only moves value between the two parties of a trade, so it can
//! never change a currency's total supply. If this invariant ever breaks,
//! something has gone catastrophically wrong.

use std::collections::HashMap;

use openswap_types::{CurrencyCode, ExchangeError, Result};
use rust_decimal::Decimal;

/// Tracks per-currency supply totals and validates conservation.
pub struct SupplyConservation {
    /// Total deposits per currency since genesis.
    deposits: HashMap<CurrencyCode, Decimal>,
    /// Total withdrawals per currency since genesis.
    withdrawals: HashMap<CurrencyCode, Decimal>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: HashMap::new(),
            withdrawals: HashMap::new(),
        }
    }

    /// Record a deposit.
    pub fn record_deposit(&mut self, currency: &CurrencyCode, amount: Decimal) {
        *self
            .deposits
            .entry(currency.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Record a withdrawal.
    pub fn record_withdrawal(&mut self, currency: &CurrencyCode, amount: Decimal) {
        *self
            .withdrawals
            .entry(currency.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Expected total supply for a currency: deposits - withdrawals.
    #[must_use]
    pub fn expected_supply(&self, currency: &CurrencyCode) -> Decimal {
        let deposited = self
            .deposits
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let withdrawn = self
            .withdrawals
            .get(currency)
            .copied()
            .unwrap_or(Decimal::ZERO);
        deposited - withdrawn
    }

    /// Verify that the actual supply (sum of all user balances) matches the
    /// expected supply for a currency.
    ///
    /// # Errors
    /// Returns [`ExchangeError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, currency: &CurrencyCode, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(currency);
        if actual_supply != expected {
            return Err(ExchangeError::SupplyInvariantViolation {
                reason: format!(
                    "Currency {currency}: actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.deposits
                        .get(currency)
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                    self.withdrawals
                        .get(currency)
                        .copied()
                        .unwrap_or(Decimal::ZERO),
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self::new()
    }
}
