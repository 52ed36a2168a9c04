//! Wire envelopes for the real-time channel.
//!
//! Clients receive JSON of the form `{"type": ..., "data": ...}`. Targeted
//! events additionally carry `targetUserId`; clients filter client-side.

use chrono::{DateTime, Utc};
use openswap_types::{EventKind, MarketEvent, OfferId, RequestId, Result, UserId};
use serde::{Deserialize, Serialize};

/// The JSON frame delivered over a live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: EnvelopeData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<UserId>,
}

/// Event payload: entity references only, no embedded records. Clients fetch
/// current state through the HTTP listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    pub request_id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<OfferId>,
    pub occurred_at: DateTime<Utc>,
}

impl Envelope {
    /// Serialize to the wire string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&MarketEvent> for Envelope {
    fn from(event: &MarketEvent) -> Self {
        Self {
            kind: event.kind,
            data: EnvelopeData {
                request_id: event.request_id,
                offer_id: event.offer_id,
                occurred_at: event.occurred_at,
            },
            target_user_id: event.target_user(),
        }
    }
}
