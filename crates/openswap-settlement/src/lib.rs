//! # openswap-settlement
//!
//! **Settlement plane**: atomic balance transfers, per-request mutual
//! exclusion, the audit receipt log, and the [`SettlementEngine`] that
//! coordinates the accept/decline state machine.
//!
//! ## Architecture
//!
//! The engine receives validated calls from the API layer and:
//! 1. Acquires the per-request lock ([`RequestLockTable`])
//! 2. Re-checks request and offer state under the lock
//! 3. Executes the two-leg balance swap ([`AccountLedger`]) — all-or-nothing
//! 4. Transitions the offer, its siblings, and the request
//! 5. Appends a [`SettlementReceipt`](openswap_types::SettlementReceipt) to
//!    the [`ReceiptLog`]
//! 6. Emits events into the notification channel
//!
//! Any failure before step 4 leaves every component exactly as it was.

pub mod conservation;
pub mod engine;
pub mod ledger;
pub mod receipt_log;
pub mod request_lock;

pub use conservation::SupplyConservation;
pub use engine::{OfferView, RequestView, SettlementEngine, SettlementOutcome};
pub use ledger::AccountLedger;
pub use receipt_log::ReceiptLog;
pub use request_lock::RequestLockTable;
