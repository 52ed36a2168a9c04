//! User directory — the identity surface of the external account collaborator.
//!
//! Authentication and profile workflows live outside the core; the engine
//! only needs to resolve a `UserId` to a display identity when building the
//! marketplace feed and offer listings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openswap_types::{ExchangeError, Result, UserId};
use serde::{Deserialize, Serialize};

/// Public identity of a marketplace participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// In-memory registry of known users.
pub struct UserDirectory {
    profiles: HashMap<UserId, UserProfile>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Register a new user and return the created profile.
    ///
    /// # Errors
    /// Returns `ValidationError` if the display name is blank.
    pub fn register(&mut self, display_name: &str) -> Result<UserProfile> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(ExchangeError::ValidationError {
                reason: "display name must not be blank".to_string(),
            });
        }
        let profile = UserProfile {
            id: UserId::new(),
            display_name: name.to_string(),
            joined_at: Utc::now(),
        };
        self.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    /// Look up a profile by ID.
    #[must_use]
    pub fn get(&self, user: UserId) -> Option<&UserProfile> {
        self.profiles.get(&user)
    }

    /// Look up a profile, failing with `UserNotFound` on a miss.
    pub fn require(&self, user: UserId) -> Result<&UserProfile> {
        self.profiles
            .get(&user)
            .ok_or(ExchangeError::UserNotFound(user))
    }

    /// Whether the user is known to the directory.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.profiles.contains_key(&user)
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
