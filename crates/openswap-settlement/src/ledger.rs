//! Account ledger — per-(user, currency) balances.
//!
//! Balances are non-negative decimals sharded across lock stripes. A trade
//! transfer touches up to four (user, currency) entries; the ledger locks the
//! involved stripes in ascending index order (so concurrent transfers can
//! never deadlock), checks both debits, then applies all four legs. Transfers
//! on disjoint stripes proceed in parallel; anything touching the same
//! (user, currency) serializes.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use openswap_types::{constants, CurrencyCode, ExchangeError, Result, UserId};
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;

use crate::conservation::SupplyConservation;

type BalanceKey = (UserId, CurrencyCode);
type Stripe = HashMap<BalanceKey, Decimal>;

/// Source of truth for all account balances.
pub struct AccountLedger {
    stripes: Vec<Mutex<Stripe>>,
    /// Locked after stripes, never before (lock-order invariant).
    conservation: Mutex<SupplyConservation>,
}

impl AccountLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_stripes(constants::LEDGER_STRIPES)
    }

    /// Build a ledger with a custom stripe count.
    #[must_use]
    pub fn with_stripes(stripes: usize) -> Self {
        assert!(stripes > 0, "AccountLedger needs at least one stripe");
        Self {
            stripes: (0..stripes).map(|_| Mutex::new(HashMap::new())).collect(),
            conservation: Mutex::new(SupplyConservation::new()),
        }
    }

    /// Credit a user's balance from outside the marketplace (the bank/account
    /// collaborator surface).
    ///
    /// # Errors
    /// Returns `ValidationError` unless the amount is positive.
    pub fn deposit(&self, user: UserId, currency: &CurrencyCode, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::ValidationError {
                reason: format!("deposit must be positive, got {amount}"),
            });
        }
        let key = (user, currency.clone());
        let mut stripe = self.stripes[self.stripe_of(&key)].lock();
        *stripe.entry(key).or_insert(Decimal::ZERO) += amount;
        // Recorded while the stripe is held so supply checks stay consistent.
        self.conservation.lock().record_deposit(currency, amount);
        Ok(())
    }

    /// Debit a user's balance back out of the marketplace.
    ///
    /// # Errors
    /// - `ValidationError` unless the amount is positive
    /// - `InsufficientBalance` if the balance would go negative
    pub fn withdraw(&self, user: UserId, currency: &CurrencyCode, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::ValidationError {
                reason: format!("withdrawal must be positive, got {amount}"),
            });
        }
        let key = (user, currency.clone());
        let mut stripe = self.stripes[self.stripe_of(&key)].lock();
        let available = stripe.get(&key).copied().unwrap_or(Decimal::ZERO);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        *stripe.entry(key).or_insert(Decimal::ZERO) -= amount;
        self.conservation.lock().record_withdrawal(currency, amount);
        Ok(())
    }

    /// Current balance for a (user, currency) pair. Always non-negative.
    #[must_use]
    pub fn balance(&self, user: UserId, currency: &CurrencyCode) -> Decimal {
        let key = (user, currency.clone());
        self.stripes[self.stripe_of(&key)]
            .lock()
            .get(&key)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Execute a settled trade: `from_user` sends `from_amount` of
    /// `from_currency` to `to_user`, and `to_user` sends `to_amount` of
    /// `to_currency` back. All four legs commit together or not at all.
    ///
    /// # Errors
    /// - `ValidationError` unless both amounts are positive
    /// - `InsufficientBalance` if either debited party cannot cover their leg
    pub fn transfer(
        &self,
        from_user: UserId,
        from_currency: &CurrencyCode,
        from_amount: Decimal,
        to_user: UserId,
        to_currency: &CurrencyCode,
        to_amount: Decimal,
    ) -> Result<()> {
        if from_amount <= Decimal::ZERO || to_amount <= Decimal::ZERO {
            return Err(ExchangeError::ValidationError {
                reason: "transfer amounts must be positive".to_string(),
            });
        }

        let debit_from = (from_user, from_currency.clone());
        let credit_from = (to_user, from_currency.clone());
        let debit_to = (to_user, to_currency.clone());
        let credit_to = (from_user, to_currency.clone());

        let legs = [&debit_from, &credit_from, &debit_to, &credit_to];
        let stripes: Vec<usize> = legs.iter().map(|key| self.stripe_of(key)).collect();

        let mut indices = stripes.clone();
        indices.sort_unstable();
        indices.dedup();

        // Ascending lock order keeps concurrent transfers deadlock-free.
        let mut guards: Vec<(usize, MutexGuard<'_, Stripe>)> = indices
            .into_iter()
            .map(|i| (i, self.stripes[i].lock()))
            .collect();

        // Check both debits before touching anything.
        Self::check_debit(&guards, stripes[0], &debit_from, from_amount)?;
        Self::check_debit(&guards, stripes[2], &debit_to, to_amount)?;

        // Apply all four legs under the same guards.
        Self::apply(&mut guards, stripes[0], &debit_from, -from_amount);
        Self::apply(&mut guards, stripes[1], &credit_from, from_amount);
        Self::apply(&mut guards, stripes[2], &debit_to, -to_amount);
        Self::apply(&mut guards, stripes[3], &credit_to, to_amount);

        tracing::debug!(
            %from_user, %to_user,
            sent = %format!("{from_amount} {from_currency}"),
            received = %format!("{to_amount} {to_currency}"),
            "transfer applied"
        );
        Ok(())
    }

    /// Total supply of a currency across all users (consistent snapshot).
    #[must_use]
    pub fn total_supply(&self, currency: &CurrencyCode) -> Decimal {
        let guards: Vec<MutexGuard<'_, Stripe>> =
            self.stripes.iter().map(Mutex::lock).collect();
        Self::sum_currency(&guards, currency)
    }

    /// Verify the conservation invariant for a currency:
    /// Σ balances == Σ deposits − Σ withdrawals.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` on mismatch.
    pub fn verify_supply(&self, currency: &CurrencyCode) -> Result<()> {
        let guards: Vec<MutexGuard<'_, Stripe>> =
            self.stripes.iter().map(Mutex::lock).collect();
        let actual = Self::sum_currency(&guards, currency);
        // Stripes → conservation, same order as deposit/withdraw.
        self.conservation.lock().verify(currency, actual)
    }

    fn sum_currency(guards: &[MutexGuard<'_, Stripe>], currency: &CurrencyCode) -> Decimal {
        guards
            .iter()
            .flat_map(|stripe| stripe.iter())
            .filter(|((_, c), _)| c == currency)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn check_debit(
        guards: &[(usize, MutexGuard<'_, Stripe>)],
        stripe: usize,
        key: &BalanceKey,
        needed: Decimal,
    ) -> Result<()> {
        let available = guards
            .iter()
            .find(|(i, _)| *i == stripe)
            .and_then(|(_, guard)| guard.get(key).copied())
            .unwrap_or(Decimal::ZERO);
        if available < needed {
            return Err(ExchangeError::InsufficientBalance { needed, available });
        }
        Ok(())
    }

    fn apply(
        guards: &mut [(usize, MutexGuard<'_, Stripe>)],
        stripe: usize,
        key: &BalanceKey,
        delta: Decimal,
    ) {
        if let Some((_, guard)) = guards.iter_mut().find(|(i, _)| *i == stripe) {
            *guard.entry(key.clone()).or_insert(Decimal::ZERO) += delta;
        }
    }

    fn stripe_of(&self, key: &BalanceKey) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        #[allow(clippy::cast_possible_truncation)]
        let index = hasher.finish() as usize % self.stripes.len();
        index
    }
}

impl Default for AccountLedger {
    fn default() -> Self {
        Self::new()
    }
}
