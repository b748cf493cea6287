//! The middleware pipeline wrapped around the transport client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use domain::{ApiError, CredentialStore, LoginRedirect, Timestamp};

use crate::request::{Method, RequestConfig, RequestDescriptor};
use crate::response::ResponseBody;
use crate::stages::{self, ClientInfo, RequestContext};
use crate::store::{LogRedirect, MemoryCredentialStore};

/// Upper bound on every request's lifetime. Not configurable per call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Failure to construct an [`HttpMiddleware`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The base URL does not parse.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client with request, response and error interceptors.
///
/// Cheap to clone; clones share the transport connection pool, the
/// credential store and the login redirect.
#[derive(Clone)]
pub struct HttpMiddleware {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    redirect: Arc<dyn LoginRedirect>,
    client_info: ClientInfo,
}

impl std::fmt::Debug for HttpMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMiddleware")
            .field("base_url", &self.base_url)
            .field("client_info", &self.client_info)
            .finish_non_exhaustive()
    }
}

impl HttpMiddleware {
    /// Starts building a middleware for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> HttpMiddlewareBuilder {
        HttpMiddlewareBuilder::new(base_url)
    }

    /// The base URL every path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected credential store.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// `GET path`.
    pub async fn get(&self, path: &str, config: RequestConfig) -> Result<ResponseBody, ApiError> {
        self.request(RequestDescriptor::new(Method::Get, path, None, config))
            .await
    }

    /// `POST path` with an optional JSON body.
    pub async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Result<ResponseBody, ApiError> {
        self.request(RequestDescriptor::new(Method::Post, path, body, config))
            .await
    }

    /// `PUT path` with an optional JSON body.
    pub async fn put(
        &self,
        path: &str,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Result<ResponseBody, ApiError> {
        self.request(RequestDescriptor::new(Method::Put, path, body, config))
            .await
    }

    /// `DELETE path`.
    pub async fn delete(&self, path: &str, config: RequestConfig) -> Result<ResponseBody, ApiError> {
        self.request(RequestDescriptor::new(Method::Delete, path, None, config))
            .await
    }

    /// Runs one request through the interceptor chain.
    ///
    /// # Errors
    ///
    /// Every failure is classified, logged and returned; an
    /// [`ApiError::Unauthorized`] additionally clears the stored credential
    /// and triggers the login redirect before being returned.
    pub async fn request(&self, descriptor: RequestDescriptor) -> Result<ResponseBody, ApiError> {
        let url = self.url_for(&descriptor.path);

        // Request interception.
        let ctx = RequestContext::generate();
        let authorization =
            stages::auth::authorization_header(&descriptor.config, self.credentials.as_ref());
        if !descriptor.config.skip_logging {
            stages::logging::log_request(
                &ctx,
                descriptor.method,
                &url,
                &descriptor.config,
                authorization.as_deref(),
                descriptor.body.is_some(),
            );
        }
        let body = descriptor
            .body
            .as_ref()
            .map(|b| stages::client_info::with_client_info(b, &self.client_info, Timestamp::now()));

        let mut builder = self
            .client
            .request(descriptor.method.to_reqwest(), &url)
            .query(&descriptor.config.params);
        for (name, value) in ctx.headers() {
            builder = builder.header(name, value);
        }
        if let Some(value) = authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, value);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                return Err(self.intercept_error(
                    &ctx,
                    descriptor.method,
                    &url,
                    stages::classify::from_transport(&err),
                    None,
                ))
            }
        };

        let status = response.status();
        let payload = match response.bytes().await {
            Ok(bytes) => stages::normalize::parse_body(&bytes),
            Err(err) => {
                return Err(self.intercept_error(
                    &ctx,
                    descriptor.method,
                    &url,
                    stages::classify::from_transport(&err),
                    None,
                ))
            }
        };

        if !status.is_success() {
            let failure = stages::classify::from_response(status, &payload);
            return Err(self.intercept_error(&ctx, descriptor.method, &url, failure, Some(&payload)));
        }

        // Response interception.
        stages::logging::log_response(&ctx, descriptor.method, &url, status.as_u16(), &payload);
        Ok(stages::normalize::normalize(payload, &ctx))
    }

    fn intercept_error(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: &str,
        failure: ApiError,
        body: Option<&Value>,
    ) -> ApiError {
        stages::logging::log_error(ctx, method, url, &failure, body);
        stages::classify::apply(&failure, self.credentials.as_ref(), self.redirect.as_ref());
        failure
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Builder for [`HttpMiddleware`].
pub struct HttpMiddlewareBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialStore>>,
    redirect: Option<Arc<dyn LoginRedirect>>,
    client_info: ClientInfo,
}

impl HttpMiddlewareBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
            redirect: None,
            client_info: ClientInfo::default(),
        }
    }

    /// Injects the credential store. Defaults to an empty [`MemoryCredentialStore`].
    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Injects the login redirect. Defaults to [`LogRedirect`].
    #[must_use]
    pub fn login_redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Overrides the client metadata added to object bodies.
    #[must_use]
    pub fn client_info(mut self, info: ClientInfo) -> Self {
        self.client_info = info;
        self
    }

    /// Builds the middleware.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL does not parse,
    /// or [`BuildError::Client`] if the transport cannot be created.
    pub fn build(self) -> Result<HttpMiddleware, BuildError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| BuildError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(self.client_info.user_agent.clone())
            .build()?;

        Ok(HttpMiddleware {
            client,
            base_url,
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new())),
            redirect: self.redirect.unwrap_or_else(|| Arc::new(LogRedirect)),
            client_info: self.client_info,
        })
    }
}
