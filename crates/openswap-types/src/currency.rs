//! Currency codes and pairs.
//!
//! Codes are validated at construction: exactly three ASCII uppercase
//! letters (ISO 4217 style). Malformed codes are rejected at the boundary
//! and never reach the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{constants, ExchangeError, Result};

// ---------------------------------------------------------------------------
// CurrencyCode
// ---------------------------------------------------------------------------

/// A validated ISO-style currency code (e.g., "USD", "UGX", "EUR").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and validate a currency code.
    ///
    /// # Errors
    /// Returns `InvalidCurrency` unless the input is exactly
    /// [`constants::CURRENCY_CODE_LEN`] ASCII uppercase letters.
    pub fn parse(code: &str) -> Result<Self> {
        if code.len() == constants::CURRENCY_CODE_LEN
            && code.bytes().all(|b| b.is_ascii_uppercase())
        {
            Ok(Self(code.to_string()))
        } else {
            Err(ExchangeError::InvalidCurrency {
                code: code.to_string(),
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ExchangeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CurrencyPair
// ---------------------------------------------------------------------------

/// The directed currency pair of an exchange request: the owner converts
/// `from` into `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    /// Build a pair from two validated codes.
    ///
    /// # Errors
    /// Returns `ValidationError` if both sides are the same currency.
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Result<Self> {
        if from == to {
            return Err(ExchangeError::ValidationError {
                reason: format!("cannot exchange {from} into itself"),
            });
        }
        Ok(Self { from, to })
    }

    /// Parse a pair from raw strings, validating both codes.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::new(CurrencyCode::parse(from)?, CurrencyCode::parse(to)?)
    }

    /// The opposite direction of this pair (e.g., USD/UGX → UGX/USD).
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.from, self.to)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}
