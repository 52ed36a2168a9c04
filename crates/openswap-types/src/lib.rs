//! # openswap-types
//!
//! Shared types, errors, and configuration for the **OpenSwap** exchange
//! marketplace engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`RequestId`], [`OfferId`], [`UserId`], [`SubscriberId`]
//! - **Currency model**: [`CurrencyCode`], [`CurrencyPair`]
//! - **Request model**: [`ExchangeRequest`], [`RequestStatus`], [`Priority`]
//! - **Offer model**: [`RateOffer`], [`OfferStatus`]
//! - **Event model**: [`MarketEvent`], [`EventKind`], [`EventTarget`]
//! - **Receipt model**: [`SettlementReceipt`]
//! - **Configuration**: [`ServiceConfig`], [`MarketRules`]
//! - **Errors**: [`ExchangeError`] with `OSW_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod event;
pub mod ids;
pub mod offer;
pub mod receipt;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use openswap_types::{ExchangeRequest, RateOffer, MarketEvent, ...};

pub use config::*;
pub use currency::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use offer::*;
pub use receipt::*;
pub use request::*;

// Constants are accessed via `openswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
