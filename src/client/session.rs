//! The client's authentication state machine.
//!
//! [`Session`] is the single owner of the token store: login, logout and the
//! per-navigation guard are the only things that write to it. Consumers get the
//! session passed in explicitly instead of reaching for shared state.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::identity::{Credentials, IdentityProvider, LoginError};
use super::store::{StoreError, StoreKey, TokenStore};
use super::token::is_token_expired_at;
use crate::models::UserProfile;

/// Where unauthenticated users end up.
pub const LANDING_ROUTE: &str = "/home";
pub const PROFILE_ROUTE: &str = "/profile";
const ROUTES: [&str; 2] = [LANDING_ROUTE, PROFILE_ROUTE];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// What a navigation check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Already authenticated, nothing changed.
    Unchanged,
    /// The runtime session was rebuilt from the stored token and profile.
    Restored,
    /// No usable session; the client is now at the landing route.
    Redirected,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Session {
    store: Box<dyn TokenStore>,
    state: AuthState,
    profile: Option<UserProfile>,
    location: String,
}

/// Maps a path onto a known front-end route; anything else is the landing route.
pub fn resolve_route(path: &str) -> &'static str {
    let path = path.trim_end_matches('/');
    ROUTES
        .iter()
        .copied()
        .find(|route| *route == path)
        .unwrap_or(LANDING_ROUTE)
}

impl Session {
    /// A fresh session always starts unauthenticated; the first navigation
    /// decides whether the stored token is good enough to resume.
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Session {
            store,
            state: AuthState::Unauthenticated,
            profile: None,
            location: LANDING_ROUTE.to_string(),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// The route the client is currently on.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The stored session token, if any.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(StoreKey::Token)
    }

    pub fn navigate(&mut self, path: &str) -> Result<GuardOutcome, StoreError> {
        self.navigate_at(path, Utc::now().timestamp())
    }

    /// Runs the guard for a navigation to `path` at time `now` (epoch seconds).
    ///
    /// Safe to call on every route change: with a valid token and an
    /// authenticated runtime it only updates the location.
    pub fn navigate_at(&mut self, path: &str, now: i64) -> Result<GuardOutcome, StoreError> {
        let route = resolve_route(path);

        let token = match self.store.get(StoreKey::Token)? {
            Some(token) => token,
            None => {
                debug!("No stored token, navigating to {}", LANDING_ROUTE);
                self.clear()?;
                return Ok(GuardOutcome::Redirected);
            }
        };

        if is_token_expired_at(&token, now) {
            info!("Stored token has expired, ending session");
            self.clear()?;
            return Ok(GuardOutcome::Redirected);
        }

        if self.is_authenticated() {
            self.location = route.to_string();
            return Ok(GuardOutcome::Unchanged);
        }

        match self.stored_profile()? {
            Some(profile) => {
                info!(user = ?profile.user_id(), "Session restored from store");
                self.profile = Some(profile);
                self.state = AuthState::Authenticated;
                self.location = route.to_string();
                Ok(GuardOutcome::Restored)
            }
            None => {
                warn!("Stored token has no usable profile, ending session");
                self.clear()?;
                Ok(GuardOutcome::Redirected)
            }
        }
    }

    /// Logs in through `provider`. On success the profile and token are stored
    /// together and the client goes to the landing route. A provider failure
    /// changes nothing; a failed store write ends the session with both keys cleared.
    pub async fn login(
        &mut self,
        provider: &dyn IdentityProvider,
        credentials: &Credentials,
    ) -> Result<(), SessionError> {
        let success = match provider.authenticate(credentials).await {
            Ok(success) => success,
            Err(e) => {
                warn!("Login through '{}' failed: {}", provider.get_name(), e);
                return Err(e.into());
            }
        };

        let profile_json = serde_json::to_string(&success.profile).map_err(StoreError::from)?;
        let written = self
            .store
            .set(StoreKey::Profile, &profile_json)
            .and_then(|_| self.store.set(StoreKey::Token, &success.token));
        if let Err(e) = written {
            warn!("Could not store the new session: {}", e);
            // never leave one key behind without the other
            if let Err(clear_err) = self.clear() {
                warn!("Clearing the partial session failed too: {}", clear_err);
            }
            return Err(e.into());
        }

        info!(user = ?success.profile.user_id(), "Logged in");
        self.profile = Some(success.profile);
        self.state = AuthState::Authenticated;
        self.location = LANDING_ROUTE.to_string();
        Ok(())
    }

    /// Ends the session: stored profile and token, runtime flag, location.
    /// Calling it again is harmless.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        if self.is_authenticated() {
            info!("Logging out");
        }
        self.clear()
    }

    /// [`logout`](Self::logout), then tells the provider.
    pub async fn sign_out(&mut self, provider: &dyn IdentityProvider) -> Result<(), StoreError> {
        self.logout()?;
        if let Err(e) = provider.signout().await {
            warn!("Provider '{}' signout failed: {}", provider.get_name(), e);
        }
        Ok(())
    }

    fn stored_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(raw) = self.store.get(StoreKey::Profile)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Stored profile is unreadable: {}", e);
                Ok(None)
            }
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.state = AuthState::Unauthenticated;
        self.profile = None;
        self.location = LANDING_ROUTE.to_string();
        let profile = self.store.remove(StoreKey::Profile);
        let token = self.store.remove(StoreKey::Token);
        profile.and(token)
    }
}
