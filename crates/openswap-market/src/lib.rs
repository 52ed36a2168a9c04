//! # openswap-market
//!
//! **Marketplace plane**: user directory, exchange-request registry, rate-offer
//! book, and the admission gate that validates everything at the boundary.
//!
//! ## Architecture
//!
//! The marketplace plane sits between the API layer and the settlement engine:
//! 1. **UserDirectory**: identity surface for the external account collaborator
//! 2. **AdmissionGate**: hard gate — rejects malformed amounts, rates, and codes
//! 3. **RequestRegistry**: owns the `ExchangeRequest` lifecycle and enforces
//!    one-active-request-per-currency-pair-per-owner
//! 4. **OfferBook**: owns the `RateOffer` lifecycle, scoped to a request
//!
//! ## Flow
//!
//! ```text
//! API → AdmissionGate.check_*() → RequestRegistry.create() / OfferBook.submit()
//!     → SettlementEngine (accept/decline) → status transitions back through here
//! ```
//!
//! Nothing in this crate touches balances; that is the settlement plane's job.

pub mod admission;
pub mod directory;
pub mod offer_book;
pub mod registry;

pub use admission::AdmissionGate;
pub use directory::{UserDirectory, UserProfile};
pub use offer_book::OfferBook;
pub use registry::RequestRegistry;
