//! # openswap-notify
//!
//! **Notification plane**: the event channel the settlement engine writes to,
//! and the [`NotificationBus`] that fans events out to live subscribers.
//!
//! Settlement logic never talks to a connection. It publishes
//! [`MarketEvent`](openswap_types::MarketEvent)s into an [`EventSender`]; the
//! bus pump consumes the channel and delivers wire [`Envelope`]s to every
//! matching subscriber. Both sides are independently testable.
//!
//! Delivery is best-effort and at-most-once per connected subscriber. A
//! durable notification log is a separate collaborator, outside this crate.

pub mod bus;
pub mod envelope;

pub use bus::{event_channel, EventReceiver, EventSender, NotificationBus};
pub use envelope::{Envelope, EnvelopeData};
