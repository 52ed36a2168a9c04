//! Wire DTOs for the REST surface.
//!
//! The boundary speaks camelCase JSON; everything is converted into typed
//! domain values (validated currency codes, checked decimals) before the
//! engine sees it.

use chrono::{DateTime, Utc};
use openswap_market::UserProfile;
use openswap_settlement::{OfferView, RequestView, SettlementOutcome};
use openswap_types::{
    ExchangeRequest, OfferId, OfferStatus, Priority, RateOffer, RequestId, RequestStatus,
    SettlementReceipt, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositBody {
    pub currency: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    pub desired_rate: Option<Decimal>,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOfferBody {
    pub exchange_request_id: RequestId,
    pub rate: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptOfferBody {
    pub exchange_request_id: RequestId,
    pub terms_accepted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineOfferBody {
    pub exchange_request_id: RequestId,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: UserId,
    pub display_name: String,
}

impl From<&UserProfile> for ProfileDto {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub currency: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequestDto {
    pub id: RequestId,
    pub owner_id: UserId,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_rate: Option<Decimal>,
    pub priority: Priority,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_offer_id: Option<OfferId>,
    pub created_at: DateTime<Utc>,
}

impl From<&ExchangeRequest> for ExchangeRequestDto {
    fn from(request: &ExchangeRequest) -> Self {
        Self {
            id: request.id,
            owner_id: request.owner,
            from_currency: request.pair.from.to_string(),
            to_currency: request.pair.to.to_string(),
            amount: request.amount,
            desired_rate: request.desired_rate,
            priority: request.priority,
            status: request.status,
            selected_offer_id: request.selected_offer,
            created_at: request.created_at,
        }
    }
}

/// Feed entry: request plus owner identity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFeedItemDto {
    #[serde(flatten)]
    pub request: ExchangeRequestDto,
    pub owner: ProfileDto,
}

impl From<&RequestView> for RequestFeedItemDto {
    fn from(view: &RequestView) -> Self {
        Self {
            request: ExchangeRequestDto::from(&view.request),
            owner: ProfileDto::from(&view.owner),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOfferDto {
    pub id: OfferId,
    pub exchange_request_id: RequestId,
    pub bidder_id: UserId,
    pub rate: Decimal,
    pub total_amount: Decimal,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&RateOffer> for RateOfferDto {
    fn from(offer: &RateOffer) -> Self {
        Self {
            id: offer.id,
            exchange_request_id: offer.request_id,
            bidder_id: offer.bidder,
            rate: offer.rate,
            total_amount: offer.total_amount,
            status: offer.status,
            created_at: offer.created_at,
        }
    }
}

/// Offer listing entry: offer plus bidder identity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferListItemDto {
    #[serde(flatten)]
    pub offer: RateOfferDto,
    pub bidder: ProfileDto,
}

impl From<&OfferView> for OfferListItemDto {
    fn from(view: &OfferView) -> Self {
        Self {
            offer: RateOfferDto::from(&view.offer),
            bidder: ProfileDto::from(&view.bidder),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementDto {
    pub request_id: RequestId,
    pub offer_id: OfferId,
    pub owner_id: UserId,
    pub bidder_id: UserId,
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub total_amount: Decimal,
    pub payload_hash: String,
    pub settled_at: DateTime<Utc>,
}

impl From<&SettlementReceipt> for SettlementDto {
    fn from(receipt: &SettlementReceipt) -> Self {
        Self {
            request_id: receipt.request_id,
            offer_id: receipt.offer_id,
            owner_id: receipt.owner,
            bidder_id: receipt.bidder,
            from_currency: receipt.pair.from.to_string(),
            to_currency: receipt.pair.to.to_string(),
            amount: receipt.amount,
            rate: receipt.rate,
            total_amount: receipt.total_amount,
            payload_hash: receipt.hash_hex(),
            settled_at: receipt.settled_at,
        }
    }
}

/// Everything a successful accept returns to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponseDto {
    pub request: ExchangeRequestDto,
    pub offer: RateOfferDto,
    pub receipt: SettlementDto,
}

impl From<&SettlementOutcome> for AcceptResponseDto {
    fn from(outcome: &SettlementOutcome) -> Self {
        Self {
            request: ExchangeRequestDto::from(&outcome.request),
            offer: RateOfferDto::from(&outcome.offer),
            receipt: SettlementDto::from(&outcome.receipt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_parses_camel_case() {
        let body: CreateRequestBody = serde_json::from_str(
            r#"{"fromCurrency":"USD","toCurrency":"UGX","amount":"100","priority":"urgent"}"#,
        )
        .unwrap();
        assert_eq!(body.from_currency, "USD");
        assert_eq!(body.amount, Decimal::new(100, 0));
        assert_eq!(body.priority, Priority::Urgent);
        assert!(body.desired_rate.is_none());
    }

    #[test]
    fn priority_defaults_to_standard() {
        let body: CreateRequestBody = serde_json::from_str(
            r#"{"fromCurrency":"USD","toCurrency":"UGX","amount":100}"#,
        )
        .unwrap();
        assert_eq!(body.priority, Priority::Standard);
    }

    #[test]
    fn accept_body_parses_terms_flag() {
        let id = RequestId::new();
        let json = format!(r#"{{"exchangeRequestId":"{}","termsAccepted":false}}"#, id.0);
        let body: AcceptOfferBody = serde_json::from_str(&json).unwrap();
        assert_eq!(body.exchange_request_id, id);
        assert!(!body.terms_accepted);
    }
}
