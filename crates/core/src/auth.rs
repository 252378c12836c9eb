//! Single-admin session gate.
//!
//! One credential pair is configured at deploy time. A successful
//! [`SessionAuthGate::login`] sets a persisted flag that stays set until
//! [`SessionAuthGate::logout`]; there is no expiry, lockout or attempt
//! counting at this layer.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::store::{self, PreferenceStore};

/// Storage key for the authenticated flag (`"true"` / `"false"`).
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";

/// Error building [`AdminCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("admin username must not be empty")]
    EmptyUsername,
    #[error("admin password must not be empty")]
    EmptyPassword,
}

/// The configured admin username and password.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    /// Build the credential pair.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError`] if either value is empty, since an empty
    /// pair is a deployment mistake rather than a usable configuration.
    pub fn new(username: impl Into<String>, password: SecretString) -> Result<Self, CredentialsError> {
        let username = username.into();
        if username.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        if password.expose_secret().is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self { username, password })
    }

    /// Whether the submitted pair equals the configured one.
    ///
    /// Both fields are always compared, over fixed-length digests, so the
    /// running time does not reveal which field was wrong or how long the
    /// configured values are.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = digest_eq(username, &self.username);
        let pass_ok = digest_eq(password, self.password.expose_secret());
        user_ok & pass_ok
    }
}

/// Constant-time equality of the SHA-256 digests of `a` and `b`.
fn digest_eq(a: &str, b: &str) -> bool {
    let a = Sha256::digest(a.as_bytes());
    let b = Sha256::digest(b.as_bytes());

    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Authentication state for one visitor session.
#[derive(Debug)]
pub struct SessionAuthGate<'a, S> {
    credentials: &'a AdminCredentials,
    store: S,
    authenticated: bool,
}

impl<'a, S: PreferenceStore> SessionAuthGate<'a, S> {
    /// Load the session flag from `store`; missing or unreadable means
    /// logged out.
    pub fn initialize(credentials: &'a AdminCredentials, store: S) -> Self {
        let authenticated = store::load(&store, AUTHENTICATED_KEY).unwrap_or(false);
        Self {
            credentials,
            store,
            authenticated,
        }
    }

    /// Check the submitted pair and mark the session authenticated on success.
    ///
    /// A mismatch leaves the state untouched and does not say which field was
    /// wrong.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if !self.credentials.matches(username, password) {
            tracing::warn!("admin login rejected");
            return false;
        }

        self.authenticated = true;
        store::persist(&mut self.store, AUTHENTICATED_KEY, true);
        tracing::info!(username, "admin logged in");
        true
    }

    /// Clear the session flag. Idempotent.
    pub fn logout(&mut self) {
        self.authenticated = false;
        store::persist(&mut self.store, AUTHENTICATED_KEY, false);
    }

    /// Whether the session may see the admin view.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
