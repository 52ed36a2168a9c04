//! REST handlers and the router.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use openswap_types::{CurrencyCode, CurrencyPair, ExchangeError, OfferId, RequestId, UserId};
use uuid::Uuid;

use crate::dto::{
    AcceptOfferBody, AcceptResponseDto, BalanceDto, CreateRequestBody, DeclineOfferBody,
    DepositBody, ExchangeRequestDto, OfferListItemDto, ProfileDto, RateOfferDto, RegisterBody,
    RequestFeedItemDto, SettlementDto, SubmitOfferBody,
};
use crate::error::ApiError;
use crate::{ws, AppState};

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(register))
        .route("/accounts/deposits", post(deposit))
        .route("/accounts/balances/:currency", get(balance))
        .route("/exchange-requests", post(create_request).get(list_requests))
        .route("/exchange-requests/:id/cancel", post(cancel_request))
        .route("/rate-offers", post(submit_offer))
        .route("/rate-offers/:id", get(list_offers))
        .route("/rate-offers/:id/accept", post(accept_offer))
        .route("/rate-offers/:id/decline", post(decline_offer))
        .route("/settlements", get(list_settlements))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

/// Resolve the caller from the `x-user-id` header established by the
/// upstream authentication collaborator.
fn caller(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let raw = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError(ExchangeError::ValidationError {
                reason: "missing x-user-id header".to_string(),
            })
        })?;
    let id = raw.parse::<Uuid>().map_err(|_| {
        ApiError(ExchangeError::ValidationError {
            reason: format!("x-user-id is not a valid UUID: {raw:?}"),
        })
    })?;
    Ok(UserId(id))
}

// ---------------------------------------------------------------------------
// Accounts (external collaborator surface)
// ---------------------------------------------------------------------------

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<ProfileDto>), ApiError> {
    let profile = state.engine.register_user(&body.display_name)?;
    Ok((StatusCode::CREATED, Json(ProfileDto::from(&profile))))
}

async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<DepositBody>,
) -> Result<Json<BalanceDto>, ApiError> {
    let user = caller(&headers)?;
    let currency = CurrencyCode::parse(&body.currency)?;
    state.engine.deposit(user, &currency, body.amount)?;
    Ok(Json(BalanceDto {
        amount: state.engine.balance(user, &currency),
        currency: currency.to_string(),
    }))
}

async fn balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(currency): Path<String>,
) -> Result<Json<BalanceDto>, ApiError> {
    let user = caller(&headers)?;
    let currency = CurrencyCode::parse(&currency)?;
    Ok(Json(BalanceDto {
        amount: state.engine.balance(user, &currency),
        currency: currency.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Exchange requests
// ---------------------------------------------------------------------------

async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<ExchangeRequestDto>), ApiError> {
    let owner = caller(&headers)?;
    let pair = CurrencyPair::parse(&body.from_currency, &body.to_currency)?;
    let request = state.engine.create_request(
        owner,
        pair,
        body.amount,
        body.desired_rate,
        body.priority,
    )?;
    Ok((StatusCode::CREATED, Json(ExchangeRequestDto::from(&request))))
}

async fn list_requests(State(state): State<AppState>) -> Json<Vec<RequestFeedItemDto>> {
    let feed = state.engine.market_feed();
    Json(feed.iter().map(RequestFeedItemDto::from).collect())
}

async fn cancel_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ExchangeRequestDto>, ApiError> {
    let user = caller(&headers)?;
    let request = state.engine.cancel_request(RequestId(id), user)?;
    Ok(Json(ExchangeRequestDto::from(&request)))
}

// ---------------------------------------------------------------------------
// Rate offers
// ---------------------------------------------------------------------------

async fn submit_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitOfferBody>,
) -> Result<(StatusCode, Json<RateOfferDto>), ApiError> {
    let bidder = caller(&headers)?;
    let offer = state.engine.submit_offer(
        bidder,
        body.exchange_request_id,
        body.rate,
        body.total_amount,
    )?;
    Ok((StatusCode::CREATED, Json(RateOfferDto::from(&offer))))
}

async fn list_offers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OfferListItemDto>>, ApiError> {
    let views = state.engine.offers_for(RequestId(id))?;
    Ok(Json(views.iter().map(OfferListItemDto::from).collect()))
}

async fn accept_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<AcceptOfferBody>,
) -> Result<Json<AcceptResponseDto>, ApiError> {
    let user = caller(&headers)?;
    // Checked before any state is touched.
    if !body.terms_accepted {
        return Err(ApiError(ExchangeError::ValidationError {
            reason: "terms must be accepted".to_string(),
        }));
    }
    let outcome = state
        .engine
        .accept_offer(body.exchange_request_id, OfferId(id), user)?;
    Ok(Json(AcceptResponseDto::from(&outcome)))
}

async fn decline_offer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<DeclineOfferBody>,
) -> Result<Json<RateOfferDto>, ApiError> {
    let user = caller(&headers)?;
    let offer = state
        .engine
        .decline_offer(body.exchange_request_id, OfferId(id), user)?;
    Ok(Json(RateOfferDto::from(&offer)))
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

async fn list_settlements(State(state): State<AppState>) -> Json<Vec<SettlementDto>> {
    let receipts = state.engine.receipts();
    Json(receipts.iter().map(SettlementDto::from).collect())
}
