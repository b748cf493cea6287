//! Demo accounts and opaque bearer sessions.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use domain::{AccessToken, LoginResponse, RawUser, UserId, Username};

use crate::error::BackendError;

struct Account {
    id: u64,
    username: &'static str,
    password: &'static str,
    email: &'static str,
}

const ACCOUNTS: [Account; 2] = [
    Account {
        id: 1,
        username: "admin",
        password: "admin123",
        email: "admin@example.com",
    },
    Account {
        id: 2,
        username: "user",
        password: "user123",
        email: "user@example.com",
    },
];

/// Issued tokens and the user each one authenticates.
///
/// Tokens never expire; they live until the process exits.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, RawUser>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the credentials against the demo accounts and issues a token.
    ///
    /// # Errors
    ///
    /// [`BackendError::Unauthorized`] for an unknown user or wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let Some(account) = ACCOUNTS
            .iter()
            .find(|a| a.username == username && a.password == password)
        else {
            warn!(username, "Login rejected");
            return Err(BackendError::Unauthorized("Invalid credentials".into()));
        };

        let user = RawUser {
            id: UserId::new(account.id),
            username: Username::new(account.username)
                .ok_or_else(|| BackendError::Unauthorized("Invalid credentials".into()))?,
            email: account.email.to_string(),
        };
        let token = Uuid::new_v4().to_string();
        let access_token = AccessToken::new(token.clone())
            .ok_or_else(|| BackendError::Unauthorized("Invalid credentials".into()))?;

        self.sessions.write().await.insert(token, user.clone());
        info!(username, user_id = account.id, "Session issued");

        Ok(LoginResponse { access_token, user })
    }

    /// The user a token was issued to.
    pub async fn user_for(&self, token: &str) -> Option<RawUser> {
        self.sessions.read().await.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_issues_distinct_tokens() {
        let sessions = SessionStore::new();

        let first = sessions.login("admin", "admin123").await.unwrap();
        let second = sessions.login("admin", "admin123").await.unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_eq!(first.user.username.as_str(), "admin");
        let resolved = sessions.user_for(first.access_token.expose()).await.unwrap();
        assert_eq!(resolved.id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let sessions = SessionStore::new();

        let err = sessions.login("user", "admin123").await.unwrap_err();

        assert!(matches!(err, BackendError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unknown_token_has_no_user() {
        let sessions = SessionStore::new();
        assert!(sessions.user_for("nope").await.is_none());
    }
}
