//! Port traits implemented by infrastructure crates.
//!
//! The BFF layer depends only on these traits. `middleware` supplies the
//! credential store, `services` supplies [`AuthApi`] and [`QueryApi`] over
//! HTTP, and tests supply fakes.

use async_trait::async_trait;

use crate::{AccessToken, ApiError, Correlated, LoginResponse, QueryFilter, QueryRecord, RawUser};

/// Entry point the client is sent to after an unauthorized response.
pub const LOGIN_PATH: &str = "/login";

/// The single-slot store holding the current bearer credential.
///
/// Each operation is atomic on its own; no transactional semantics.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential, if any.
    fn get(&self) -> Option<AccessToken>;

    /// Replaces the stored credential.
    fn set(&self, token: AccessToken);

    /// Removes the stored credential. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// Forces navigation to [`LOGIN_PATH`] after the session is rejected.
pub trait LoginRedirect: Send + Sync {
    /// Sends the user to the login entry point.
    fn redirect_to_login(&self);
}

/// Typed access to the auth collaborator.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`.
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Correlated<LoginResponse>, ApiError>;

    /// `GET /auth/profile` for the stored credential.
    async fn profile(&self) -> Result<Correlated<RawUser>, ApiError>;
}

/// Typed access to the query endpoints.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// `GET /query/categories`.
    async fn categories(&self) -> Result<Correlated<Vec<String>>, ApiError>;

    /// `GET /query/statuses`.
    async fn statuses(&self) -> Result<Correlated<Vec<String>>, ApiError>;

    /// `GET /query/types`.
    async fn types(&self) -> Result<Correlated<Vec<String>>, ApiError>;

    /// `GET /query/search` with the filter's active predicates.
    async fn search(&self, filter: &QueryFilter) -> Result<Correlated<Vec<QueryRecord>>, ApiError>;

    /// `POST /query/test-data`. Returns the data set as it was before the append.
    async fn post_test_data(&self, num: i64) -> Result<Correlated<Vec<QueryRecord>>, ApiError>;
}
