//! Typed accessors for the auth collaborator.

use async_trait::async_trait;
use serde_json::json;

use domain::{ApiError, AuthApi, Correlated, LoginResponse, RawUser};
use middleware::{HttpMiddleware, RequestConfig};

pub const LOGIN_PATH: &str = "/auth/login";
pub const PROFILE_PATH: &str = "/auth/profile";

/// [`AuthApi`] over the HTTP middleware.
#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpMiddleware,
}

impl AuthService {
    /// Creates a service sharing `http`'s transport and credential store.
    pub fn new(http: HttpMiddleware) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Correlated<LoginResponse>, ApiError> {
        // A stale token must not ride along with a fresh login.
        let config = RequestConfig::new().skip_auth();
        self.http
            .post(
                LOGIN_PATH,
                Some(json!({ "username": username, "password": password })),
                config,
            )
            .await?
            .decode()
    }

    async fn profile(&self) -> Result<Correlated<RawUser>, ApiError> {
        self.http.get(PROFILE_PATH, RequestConfig::new()).await?.decode()
    }
}
