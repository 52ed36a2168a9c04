//! Exchange request registry.
//!
//! Owns the `ExchangeRequest` lifecycle and enforces the uniqueness
//! invariant: at most one ACTIVE request per (owner, currency pair) tuple.
//! Requests are never removed, only status-transitioned.

use std::collections::HashMap;

use openswap_types::{
    CurrencyPair, ExchangeError, ExchangeRequest, OfferId, RequestId, Result, UserId,
};

/// Source of truth for all exchange requests.
pub struct RequestRegistry {
    /// Every request ever created, by ID.
    requests: HashMap<RequestId, ExchangeRequest>,
    /// (owner, pair) → the one ACTIVE request for that tuple.
    active_index: HashMap<(UserId, CurrencyPair), RequestId>,
}

impl RequestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            active_index: HashMap::new(),
        }
    }

    /// Admit a freshly created request.
    ///
    /// # Errors
    /// Returns `DuplicateActiveRequest` if the owner already has an ACTIVE
    /// request for the same pair.
    pub fn create(&mut self, request: ExchangeRequest) -> Result<()> {
        let key = (request.owner, request.pair.clone());
        if self.active_index.contains_key(&key) {
            return Err(ExchangeError::DuplicateActiveRequest {
                owner: request.owner,
                pair: request.pair.clone(),
            });
        }
        tracing::debug!(request_id = %request.id, pair = %request.pair, "request admitted");
        self.active_index.insert(key, request.id);
        self.requests.insert(request.id, request);
        Ok(())
    }

    /// Look up a request by ID.
    pub fn get(&self, request_id: RequestId) -> Result<&ExchangeRequest> {
        self.requests
            .get(&request_id)
            .ok_or(ExchangeError::RequestNotFound(request_id))
    }

    /// All ACTIVE requests, newest first — the marketplace feed.
    #[must_use]
    pub fn active(&self) -> Vec<ExchangeRequest> {
        let mut feed: Vec<ExchangeRequest> = self
            .active_index
            .values()
            .filter_map(|id| self.requests.get(id))
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        feed
    }

    /// Transition ACTIVE → COMPLETED, recording the winning offer, and drop
    /// the request from the active index.
    ///
    /// # Errors
    /// - `RequestNotFound` if the request doesn't exist
    /// - `InvalidStateTransition` unless it is ACTIVE
    pub fn mark_completed(
        &mut self,
        request_id: RequestId,
        selected_offer: OfferId,
    ) -> Result<ExchangeRequest> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(ExchangeError::RequestNotFound(request_id))?;
        request.mark_completed(selected_offer)?;
        let request = request.clone();
        self.active_index
            .remove(&(request.owner, request.pair.clone()));
        Ok(request)
    }

    /// Transition ACTIVE → CANCELLED on behalf of the owner.
    ///
    /// # Errors
    /// - `RequestNotFound` if the request doesn't exist
    /// - `Forbidden` if `acting_user` is not the owner
    /// - `InvalidStateTransition` unless it is ACTIVE
    pub fn mark_cancelled(
        &mut self,
        request_id: RequestId,
        acting_user: UserId,
    ) -> Result<ExchangeRequest> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(ExchangeError::RequestNotFound(request_id))?;
        if request.owner != acting_user {
            return Err(ExchangeError::Forbidden {
                reason: "only the request owner may cancel".to_string(),
            });
        }
        request.mark_cancelled()?;
        let request = request.clone();
        self.active_index
            .remove(&(request.owner, request.pair.clone()));
        Ok(request)
    }

    /// Total number of requests ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Number of currently ACTIVE requests.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_index.len()
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
