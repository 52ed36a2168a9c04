//! Rate offer book.
//!
//! Owns the `RateOffer` lifecycle, scoped to a request. Submission checks
//! (request active, no self-bid, open-offer cap) live here; the atomic
//! accept/settle sequence is the settlement engine's job.

use std::collections::HashMap;

use openswap_types::{
    constants, ExchangeError, ExchangeRequest, OfferId, RateOffer, RequestId, Result,
};

/// Source of truth for all rate offers.
pub struct OfferBook {
    /// Every offer ever submitted, by ID.
    offers: HashMap<OfferId, RateOffer>,
    /// request → offers on it, in submission order.
    by_request: HashMap<RequestId, Vec<OfferId>>,
    /// Cap on PENDING offers per request.
    max_open_offers: usize,
}

impl OfferBook {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(constants::DEFAULT_MAX_OPEN_OFFERS)
    }

    /// Build a book with a custom open-offer cap.
    #[must_use]
    pub fn with_limit(max_open_offers: usize) -> Self {
        Self {
            offers: HashMap::new(),
            by_request: HashMap::new(),
            max_open_offers,
        }
    }

    /// Admit a freshly created offer against its target request.
    ///
    /// # Errors
    /// - `RequestNotActive` if the request is no longer accepting offers
    /// - `SelfBidForbidden` if the bidder owns the request
    /// - `OfferRequestMismatch` if the offer references a different request
    /// - `OpenOfferLimitExceeded` above the per-request cap
    pub fn submit(&mut self, offer: RateOffer, request: &ExchangeRequest) -> Result<()> {
        if offer.request_id != request.id {
            return Err(ExchangeError::OfferRequestMismatch {
                offer: offer.id,
                request: request.id,
            });
        }
        if !request.is_active() {
            return Err(ExchangeError::RequestNotActive(request.id));
        }
        if offer.bidder == request.owner {
            return Err(ExchangeError::SelfBidForbidden);
        }
        if self.pending_count(request.id) >= self.max_open_offers {
            return Err(ExchangeError::OpenOfferLimitExceeded {
                limit: self.max_open_offers,
            });
        }
        tracing::debug!(offer_id = %offer.id, request_id = %request.id, rate = %offer.rate, "offer admitted");
        self.by_request.entry(request.id).or_default().push(offer.id);
        self.offers.insert(offer.id, offer);
        Ok(())
    }

    /// Look up an offer by ID.
    pub fn get(&self, offer_id: OfferId) -> Result<&RateOffer> {
        self.offers
            .get(&offer_id)
            .ok_or(ExchangeError::OfferNotFound(offer_id))
    }

    /// All offers on a request, newest first.
    #[must_use]
    pub fn offers_for(&self, request_id: RequestId) -> Vec<RateOffer> {
        let mut listing: Vec<RateOffer> = self
            .by_request
            .get(&request_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.offers.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        listing.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        listing
    }

    /// Number of PENDING offers on a request.
    #[must_use]
    pub fn pending_count(&self, request_id: RequestId) -> usize {
        self.by_request
            .get(&request_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.offers.get(id))
                    .filter(|offer| offer.is_pending())
                    .count()
            })
            .unwrap_or(0)
    }

    /// Transition PENDING → ACCEPTED.
    ///
    /// # Errors
    /// - `OfferNotFound` if the offer doesn't exist
    /// - `InvalidStateTransition` unless it is PENDING
    pub fn mark_accepted(&mut self, offer_id: OfferId) -> Result<RateOffer> {
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(ExchangeError::OfferNotFound(offer_id))?;
        offer.mark_accepted()?;
        Ok(offer.clone())
    }

    /// Transition PENDING → REJECTED.
    ///
    /// # Errors
    /// - `OfferNotFound` if the offer doesn't exist
    /// - `InvalidStateTransition` unless it is PENDING
    pub fn mark_rejected(&mut self, offer_id: OfferId) -> Result<RateOffer> {
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(ExchangeError::OfferNotFound(offer_id))?;
        offer.mark_rejected()?;
        Ok(offer.clone())
    }

    /// Reject every still-PENDING sibling of the accepted offer, returning
    /// the rejected offers so their bidders can be notified.
    pub fn reject_siblings(&mut self, request_id: RequestId, accepted: OfferId) -> Vec<RateOffer> {
        let Some(ids) = self.by_request.get(&request_id).cloned() else {
            return Vec::new();
        };
        let mut rejected = Vec::new();
        for id in ids {
            if id == accepted {
                continue;
            }
            if let Some(offer) = self.offers.get_mut(&id) {
                if offer.is_pending() && offer.mark_rejected().is_ok() {
                    rejected.push(offer.clone());
                }
            }
        }
        rejected
    }

    /// Total number of offers ever submitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

impl Default for OfferBook {
    fn default() -> Self {
        Self::new()
    }
}
