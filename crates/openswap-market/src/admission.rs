//! Admission gate — hard validation at the marketplace boundary.
//!
//! Every request and offer payload passes through the gate before anything
//! enters the core. Fail-closed: if any check errors, the payload is
//! rejected and no state changes.

use openswap_types::{
    CurrencyPair, ExchangeError, ExchangeRequest, MarketRules, Result,
};
use rust_decimal::Decimal;

/// Validates request and offer payloads against the marketplace rules.
pub struct AdmissionGate {
    rules: MarketRules,
}

impl AdmissionGate {
    /// Create a gate with default rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: MarketRules::default(),
        }
    }

    /// Create a gate with custom rules.
    #[must_use]
    pub fn with_rules(rules: MarketRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &MarketRules {
        &self.rules
    }

    /// Validate the economic fields of a new exchange request.
    ///
    /// # Errors
    /// Returns `InvalidCurrency` for untraded codes and `ValidationError`
    /// for out-of-range amounts or rates.
    pub fn check_request(
        &self,
        pair: &CurrencyPair,
        amount: Decimal,
        desired_rate: Option<Decimal>,
    ) -> Result<()> {
        self.check_traded(pair)?;
        Self::check_amount("amount", amount, self.rules.max_amount_scale)?;
        if let Some(rate) = desired_rate {
            Self::check_amount("desired rate", rate, self.rules.max_rate_scale)?;
        }
        Ok(())
    }

    /// Validate the economic fields of a new rate offer against its target
    /// request, including the audit redundancy `total_amount = amount × rate`.
    pub fn check_offer(
        &self,
        request: &ExchangeRequest,
        rate: Decimal,
        total_amount: Decimal,
    ) -> Result<()> {
        Self::check_amount("rate", rate, self.rules.max_rate_scale)?;
        let implied = (request.amount * rate).normalize();
        if total_amount.normalize() != implied {
            return Err(ExchangeError::ValidationError {
                reason: format!(
                    "total amount {total_amount} does not equal amount {} x rate {rate} = {implied}",
                    request.amount
                ),
            });
        }
        Ok(())
    }

    fn check_traded(&self, pair: &CurrencyPair) -> Result<()> {
        for code in [&pair.from, &pair.to] {
            if !self.rules.supports(code) {
                return Err(ExchangeError::InvalidCurrency {
                    code: code.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_amount(field: &str, value: Decimal, max_scale: u32) -> Result<()> {
        if value <= Decimal::ZERO {
            return Err(ExchangeError::ValidationError {
                reason: format!("{field} must be positive, got {value}"),
            });
        }
        if value.normalize().scale() > max_scale {
            return Err(ExchangeError::ValidationError {
                reason: format!("{field} exceeds {max_scale} decimal places: {value}"),
            });
        }
        Ok(())
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}
