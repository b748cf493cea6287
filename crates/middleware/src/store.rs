//! In-process implementations of the credential store and login redirect ports.

use std::sync::RwLock;

use tracing::{info, warn};

use domain::{AccessToken, CredentialStore, LoginRedirect, LOGIN_PATH};

/// A [`CredentialStore`] held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<AccessToken>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            slot: RwLock::new(Some(token)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<AccessToken> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: AccessToken) {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
        info!("Credential stored");
    }

    fn clear(&self) {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
    }
}

/// A [`LoginRedirect`] for headless clients: it can only tell the user to
/// sign in again.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self) {
        warn!(location = LOGIN_PATH, "Login required; redirecting to the login entry point");
    }
}
