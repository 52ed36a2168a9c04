//! Settlement engine — the coordination state machine.
//!
//! Accepting an offer is a check-then-commit sequence over three components
//! (registry, offer book, ledger). The engine serializes every mutating call
//! for a given request behind that request's lock, so at most one accept per
//! request can ever succeed, and a losing submission or decline observes the
//! committed state instead of racing it.
//!
//! Commit order inside an accept:
//! 1. validate (authorization, linkage, statuses) under the request lock
//! 2. ledger transfer — the only step that can still fail; all-or-nothing
//! 3. offer → ACCEPTED, pending siblings → REJECTED, request → COMPLETED
//! 4. receipt appended, events emitted
//!
//! Steps 3–4 operate on state that step 1 validated while holding the same
//! lock, so they cannot fail; any error before step 3 leaves every component
//! untouched.

use openswap_market::{AdmissionGate, OfferBook, RequestRegistry, UserDirectory, UserProfile};
use openswap_notify::EventSender;
use openswap_types::{
    CurrencyCode, CurrencyPair, EventKind, ExchangeError, ExchangeRequest, MarketEvent,
    MarketRules, OfferId, Priority, RateOffer, RequestId, Result, SettlementReceipt, UserId,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::AccountLedger;
use crate::receipt_log::ReceiptLog;
use crate::request_lock::RequestLockTable;

/// An active request joined with its owner's identity, for the feed.
#[derive(Debug, Clone, Serialize)]
pub struct RequestView {
    pub request: ExchangeRequest,
    pub owner: UserProfile,
}

/// An offer joined with its bidder's identity.
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub offer: RateOffer,
    pub bidder: UserProfile,
}

/// Everything a successful accept produced.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementOutcome {
    pub request: ExchangeRequest,
    pub offer: RateOffer,
    pub receipt: SettlementReceipt,
    /// Sibling offers auto-rejected by the accept.
    pub rejected_siblings: Vec<RateOffer>,
}

/// The coordination point between marketplace state, the ledger, and the
/// notification channel.
pub struct SettlementEngine {
    directory: RwLock<UserDirectory>,
    registry: RwLock<RequestRegistry>,
    offers: RwLock<OfferBook>,
    ledger: AccountLedger,
    receipts: RwLock<ReceiptLog>,
    locks: RequestLockTable,
    admission: AdmissionGate,
    events: EventSender,
}

impl SettlementEngine {
    /// Build an engine with default marketplace rules.
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self::with_rules(MarketRules::default(), events)
    }

    /// Build an engine with custom marketplace rules.
    #[must_use]
    pub fn with_rules(rules: MarketRules, events: EventSender) -> Self {
        Self {
            directory: RwLock::new(UserDirectory::new()),
            registry: RwLock::new(RequestRegistry::new()),
            offers: RwLock::new(OfferBook::with_limit(rules.max_open_offers)),
            ledger: AccountLedger::new(),
            receipts: RwLock::new(ReceiptLog::new()),
            locks: RequestLockTable::new(),
            admission: AdmissionGate::with_rules(rules),
            events,
        }
    }

    // =====================================================================
    // Account directory surface (external collaborator boundary)
    // =====================================================================

    /// Register a marketplace participant.
    pub fn register_user(&self, display_name: &str) -> Result<UserProfile> {
        self.directory.write().register(display_name)
    }

    /// Resolve a user's public profile.
    pub fn profile(&self, user: UserId) -> Result<UserProfile> {
        self.directory.read().require(user).cloned()
    }

    /// Fund a user's balance from outside the marketplace.
    pub fn deposit(&self, user: UserId, currency: &CurrencyCode, amount: Decimal) -> Result<()> {
        self.directory.read().require(user)?;
        self.ledger.deposit(user, currency, amount)
    }

    /// Move funds back out of the marketplace.
    pub fn withdraw(&self, user: UserId, currency: &CurrencyCode, amount: Decimal) -> Result<()> {
        self.directory.read().require(user)?;
        self.ledger.withdraw(user, currency, amount)
    }

    /// Current balance for a (user, currency) pair.
    #[must_use]
    pub fn balance(&self, user: UserId, currency: &CurrencyCode) -> Decimal {
        self.ledger.balance(user, currency)
    }

    // =====================================================================
    // Marketplace surface
    // =====================================================================

    /// Post a new exchange request and announce it to the feed.
    pub fn create_request(
        &self,
        owner: UserId,
        pair: CurrencyPair,
        amount: Decimal,
        desired_rate: Option<Decimal>,
        priority: Priority,
    ) -> Result<ExchangeRequest> {
        self.directory.read().require(owner)?;
        self.admission.check_request(&pair, amount, desired_rate)?;

        let request = ExchangeRequest::new(owner, pair, amount, desired_rate, priority);
        self.registry.write().create(request.clone())?;

        tracing::info!(request_id = %request.id, pair = %request.pair, amount = %request.amount, "request created");
        self.events
            .publish(MarketEvent::broadcast(EventKind::NewRequest, request.id, None));
        Ok(request)
    }

    /// The marketplace feed: active requests, newest first, with owner
    /// identity joined.
    #[must_use]
    pub fn market_feed(&self) -> Vec<RequestView> {
        let active = self.registry.read().active();
        let directory = self.directory.read();
        active
            .into_iter()
            .filter_map(|request| {
                directory.get(request.owner).map(|owner| RequestView {
                    owner: owner.clone(),
                    request,
                })
            })
            .collect()
    }

    /// Look up a single request.
    pub fn get_request(&self, request_id: RequestId) -> Result<ExchangeRequest> {
        self.registry.read().get(request_id).cloned()
    }

    /// Cancel an active request. Owner only; runs under the request lock so
    /// it cannot interleave with an in-flight accept.
    pub fn cancel_request(
        &self,
        request_id: RequestId,
        acting_user: UserId,
    ) -> Result<ExchangeRequest> {
        let lock = self.locks.handle(request_id);
        let _guard = lock.lock();

        let request = self.registry.write().mark_cancelled(request_id, acting_user)?;
        tracing::info!(%request_id, "request cancelled");
        Ok(request)
    }

    /// Submit a competing offer against an active request.
    pub fn submit_offer(
        &self,
        bidder: UserId,
        request_id: RequestId,
        rate: Decimal,
        total_amount: Decimal,
    ) -> Result<RateOffer> {
        self.directory.read().require(bidder)?;

        let lock = self.locks.handle(request_id);
        let _guard = lock.lock();

        let request = self.registry.read().get(request_id)?.clone();
        self.admission.check_offer(&request, rate, total_amount)?;

        let offer = RateOffer::new(request_id, bidder, rate, total_amount);
        self.offers.write().submit(offer.clone(), &request)?;

        tracing::info!(offer_id = %offer.id, %request_id, rate = %rate, "offer submitted");
        self.events.publish(MarketEvent::broadcast(
            EventKind::NewOffer,
            request_id,
            Some(offer.id),
        ));
        self.events.publish(MarketEvent::targeted(
            EventKind::NewOffer,
            request.owner,
            request_id,
            Some(offer.id),
        ));
        Ok(offer)
    }

    /// All offers on a request, newest first, with bidder identity joined.
    pub fn offers_for(&self, request_id: RequestId) -> Result<Vec<OfferView>> {
        self.registry.read().get(request_id)?;
        let listing = self.offers.read().offers_for(request_id);
        let directory = self.directory.read();
        Ok(listing
            .into_iter()
            .filter_map(|offer| {
                directory.get(offer.bidder).map(|bidder| OfferView {
                    bidder: bidder.clone(),
                    offer,
                })
            })
            .collect())
    }

    // =====================================================================
    // Accept / decline — the state machine
    // =====================================================================

    /// Accept one offer: settle the trade and close the request.
    ///
    /// # Errors
    /// - `RequestNotFound` / `OfferNotFound` if either is missing
    /// - `OfferRequestMismatch` if the offer belongs to a different request
    /// - `Forbidden` unless the caller owns the request
    /// - `InvalidStateTransition` unless request ACTIVE and offer PENDING
    /// - `InsufficientBalance` if either party cannot cover their leg
    ///
    /// Every failure leaves all components exactly as they were.
    pub fn accept_offer(
        &self,
        request_id: RequestId,
        offer_id: OfferId,
        acting_user: UserId,
    ) -> Result<SettlementOutcome> {
        let lock = self.locks.handle(request_id);
        let _guard = lock.lock();

        // Load and validate under the lock; a concurrent accept of a
        // different offer on this request is excluded by the guard above.
        let request = self.registry.read().get(request_id)?.clone();
        let offer = self.offers.read().get(offer_id)?.clone();
        if offer.request_id != request_id {
            return Err(ExchangeError::OfferRequestMismatch {
                offer: offer_id,
                request: request_id,
            });
        }
        if acting_user != request.owner {
            return Err(ExchangeError::Forbidden {
                reason: "only the request owner may accept an offer".to_string(),
            });
        }
        if !request.is_active() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "request",
                current: request.status.to_string(),
                expected: "ACTIVE",
            });
        }
        if !offer.is_pending() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "offer",
                current: offer.status.to_string(),
                expected: "PENDING",
            });
        }

        // Settle: owner pays `amount` of `from`, bidder pays `total_amount`
        // of `to`. The one step that can still fail; all four legs or none.
        self.ledger.transfer(
            request.owner,
            &request.pair.from,
            request.amount,
            offer.bidder,
            &request.pair.to,
            offer.total_amount,
        )?;

        // Commit the transitions. Validated above under the same lock, so
        // these cannot fail.
        let offer = self.offers.write().mark_accepted(offer_id)?;
        let rejected_siblings = self.offers.write().reject_siblings(request_id, offer_id);
        let request = self.registry.write().mark_completed(request_id, offer_id)?;

        let receipt = SettlementReceipt::record(&request, &offer);
        self.receipts.write().append(receipt.clone());

        tracing::info!(
            %request_id, %offer_id,
            amount = %request.amount, pair = %request.pair, rate = %offer.rate,
            "trade settled"
        );

        self.events.publish(MarketEvent::targeted(
            EventKind::BidAccepted,
            offer.bidder,
            request_id,
            Some(offer_id),
        ));
        self.events.publish(MarketEvent::broadcast(
            EventKind::BidAccepted,
            request_id,
            Some(offer_id),
        ));
        for sibling in &rejected_siblings {
            self.events.publish(MarketEvent::targeted(
                EventKind::BidRejected,
                sibling.bidder,
                request_id,
                Some(sibling.id),
            ));
        }

        Ok(SettlementOutcome {
            request,
            offer,
            receipt,
            rejected_siblings,
        })
    }

    /// Decline one offer: PENDING → REJECTED, nothing else changes.
    ///
    /// Same authorization and state checks as an accept, but the request and
    /// the ledger are never touched.
    pub fn decline_offer(
        &self,
        request_id: RequestId,
        offer_id: OfferId,
        acting_user: UserId,
    ) -> Result<RateOffer> {
        let lock = self.locks.handle(request_id);
        let _guard = lock.lock();

        let request = self.registry.read().get(request_id)?.clone();
        let offer = self.offers.read().get(offer_id)?.clone();
        if offer.request_id != request_id {
            return Err(ExchangeError::OfferRequestMismatch {
                offer: offer_id,
                request: request_id,
            });
        }
        if acting_user != request.owner {
            return Err(ExchangeError::Forbidden {
                reason: "only the request owner may decline an offer".to_string(),
            });
        }
        if !request.is_active() {
            return Err(ExchangeError::InvalidStateTransition {
                entity: "request",
                current: request.status.to_string(),
                expected: "ACTIVE",
            });
        }

        let offer = self.offers.write().mark_rejected(offer_id)?;

        tracing::info!(%request_id, %offer_id, "offer declined");
        self.events.publish(MarketEvent::targeted(
            EventKind::BidRejected,
            offer.bidder,
            request_id,
            Some(offer_id),
        ));
        self.events.publish(MarketEvent::broadcast(
            EventKind::BidRejected,
            request_id,
            Some(offer_id),
        ));
        Ok(offer)
    }

    // =====================================================================
    // Audit surface
    // =====================================================================

    /// All settlement receipts, oldest first.
    #[must_use]
    pub fn receipts(&self) -> Vec<SettlementReceipt> {
        self.receipts.read().all().to_vec()
    }

    /// Verify the conservation invariant for one currency.
    pub fn verify_supply(&self, currency: &CurrencyCode) -> Result<()> {
        self.ledger.verify_supply(currency)
    }
}
