use std::sync::Arc;

use crate::{
    core::{
        Credential,
        MemoError,
    },
    persistence::KeyValueStore,
};

pub mod auth;
pub mod credentials;
pub mod navigator;

pub use auth::login;
pub use credentials::CredentialStore;
pub use navigator::{
    LoginRedirect,
    Navigator,
};

/// Authentication context shared by everything that talks to the backend.
///
/// Created once at startup; `logout` and `expire` are the only ways out of an
/// authenticated session, and both clear storage before navigating.
pub struct Session {
    credentials: CredentialStore,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        let session = Self { credentials: CredentialStore::new(store), navigator };
        match session.credential() {
            Some(credential) => tracing::info!(username = %credential.username, "session restored"),
            None => tracing::debug!("no stored session"),
        }
        session
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credentials.load()
    }

    pub fn token(&self) -> Option<String> {
        self.credential().map(|c| c.token)
    }

    pub fn username(&self) -> Option<String> {
        self.credential().map(|c| c.username)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    pub fn establish(&self, username: &str, token: &str) -> Result<Credential, MemoError> {
        self.credentials.save(username, token)?;
        tracing::info!(username, "logged in");
        Ok(Credential { username: username.to_string(), token: token.to_string() })
    }

    pub fn logout(&self) {
        self.clear_credentials();
        tracing::info!("logged out");
        self.navigator.redirect_to_login();
    }

    /// Forced logout after the backend rejected (or we never had) a token.
    pub fn expire(&self) {
        self.clear_credentials();
        tracing::warn!("session expired, redirecting to login");
        self.navigator.redirect_to_login();
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!("Failed to clear stored credentials: {}", e);
        }
    }
}
