//! # openswap-api
//!
//! REST + websocket surface for the OpenSwap marketplace.
//!
//! The API layer owns nothing but translation: camelCase DTOs in, typed
//! domain calls into the [`SettlementEngine`], domain errors out as HTTP
//! statuses, and one websocket route that bridges the notification bus to
//! live connections.
//!
//! Authentication is an external collaborator; the caller's identity arrives
//! as an `x-user-id` header that the upstream layer is trusted to have
//! established.

use std::sync::Arc;

use openswap_notify::{event_channel, EventReceiver, NotificationBus};
use openswap_settlement::SettlementEngine;
use openswap_types::MarketRules;
use tokio::task::JoinHandle;

pub mod dto;
pub mod error;
pub mod routes;
pub mod ws;

pub use routes::router;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SettlementEngine>,
    pub bus: Arc<NotificationBus>,
}

impl AppState {
    /// Wire up an engine and bus around a fresh event channel. The caller
    /// spawns the pump (or drives the receiver directly in tests).
    #[must_use]
    pub fn new(rules: MarketRules) -> (Self, EventReceiver) {
        let (sender, receiver) = event_channel();
        let state = Self {
            engine: Arc::new(SettlementEngine::with_rules(rules, sender)),
            bus: Arc::new(NotificationBus::new()),
        };
        (state, receiver)
    }

    /// Start the bus pump consuming the engine's event channel.
    pub fn spawn_pump(&self, receiver: EventReceiver) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.bus).run(receiver))
    }
}
