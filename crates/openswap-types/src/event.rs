//! Domain events emitted by the settlement engine.
//!
//! Events are transient: the engine writes them to a channel, the
//! notification bus fans them out to live subscribers. Durable copies are the
//! responsibility of the chat/notification collaborator, not the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OfferId, RequestId, UserId};

/// The kind of marketplace activity an event announces.
///
/// Serialized form is the wire `type` tag (`new_request`, `new_offer`,
/// `bid_accepted`, `bid_rejected`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewRequest,
    NewOffer,
    BidAccepted,
    BidRejected,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewRequest => write!(f, "NEW_REQUEST"),
            Self::NewOffer => write!(f, "NEW_OFFER"),
            Self::BidAccepted => write!(f, "BID_ACCEPTED"),
            Self::BidRejected => write!(f, "BID_REJECTED"),
        }
    }
}

/// Who an event is intended for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTarget {
    /// Every connected subscriber (the marketplace feed).
    Broadcast,
    /// Subscribers bound to one specific user.
    User(UserId),
}

/// A single marketplace event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    pub kind: EventKind,
    pub target: EventTarget,
    pub request_id: RequestId,
    pub offer_id: Option<OfferId>,
    pub occurred_at: DateTime<Utc>,
}

impl MarketEvent {
    /// An event for the general activity feed.
    #[must_use]
    pub fn broadcast(kind: EventKind, request_id: RequestId, offer_id: Option<OfferId>) -> Self {
        Self {
            kind,
            target: EventTarget::Broadcast,
            request_id,
            offer_id,
            occurred_at: Utc::now(),
        }
    }

    /// An event addressed to one user's connections.
    #[must_use]
    pub fn targeted(
        kind: EventKind,
        user: UserId,
        request_id: RequestId,
        offer_id: Option<OfferId>,
    ) -> Self {
        Self {
            kind,
            target: EventTarget::User(user),
            request_id,
            offer_id,
            occurred_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.target == EventTarget::Broadcast
    }

    /// The user this event is addressed to, if targeted.
    #[must_use]
    pub fn target_user(&self) -> Option<UserId> {
        match self.target {
            EventTarget::Broadcast => None,
            EventTarget::User(user) => Some(user),
        }
    }
}
