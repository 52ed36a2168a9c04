//! Configuration types for the OpenSwap service.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::{constants, CurrencyCode, ExchangeError, Result};

/// Configuration for a single OpenSwap service instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address to listen on for the REST/WS API.
    pub listen_addr: SocketAddr,
    /// Marketplace admission rules.
    pub rules: MarketRules,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                constants::DEFAULT_API_PORT,
            ),
            rules: MarketRules::default(),
        }
    }
}

impl ServiceConfig {
    /// Build a config from defaults plus environment overrides
    /// (`OPENSWAP_LISTEN_ADDR`).
    ///
    /// # Errors
    /// Returns `Configuration` if an override is present but unparseable.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var(constants::ENV_LISTEN_ADDR) {
            config.listen_addr = addr.parse().map_err(|_| {
                ExchangeError::Configuration(format!(
                    "{} is not a valid socket address: {addr:?}",
                    constants::ENV_LISTEN_ADDR
                ))
            })?;
        }
        Ok(config)
    }
}

/// Admission rules applied to every request and offer entering the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRules {
    /// Maximum open (pending) offers per exchange request.
    pub max_open_offers: usize,
    /// Maximum decimal places accepted for amounts.
    pub max_amount_scale: u32,
    /// Maximum decimal places accepted for rates.
    pub max_rate_scale: u32,
    /// Currencies this marketplace trades. Empty = any well-formed code.
    pub currencies: Vec<CurrencyCode>,
}

impl Default for MarketRules {
    fn default() -> Self {
        Self {
            max_open_offers: constants::DEFAULT_MAX_OPEN_OFFERS,
            max_amount_scale: constants::MAX_AMOUNT_SCALE,
            max_rate_scale: constants::MAX_RATE_SCALE,
            currencies: Vec::new(),
        }
    }
}

impl MarketRules {
    /// Whether `code` is tradeable under these rules.
    #[must_use]
    pub fn supports(&self, code: &CurrencyCode) -> bool {
        self.currencies.is_empty() || self.currencies.contains(code)
    }
}
