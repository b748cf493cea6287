//! QueryDesk HTTP middleware pipeline.
//!
//! [`HttpMiddleware`] wraps a `reqwest` client (fixed base URL, fixed
//! 10 000 ms timeout) with three interceptor phases:
//!
//! - **request**: tag the request with a fresh [`RequestContext`], attach the
//!   stored bearer credential unless `skip_auth`, log the request unless
//!   `skip_logging`, and add client metadata to object bodies;
//! - **response**: log status, payload length and elapsed time, then wrap
//!   object bodies in an [`domain::Envelope`];
//! - **error**: log, classify, clear the credential on 401, and re-raise.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, header handling and body parsing all live
//! here. Callers see [`ResponseBody`] and [`domain::ApiError`] only.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use middleware::{HttpMiddleware, MemoryCredentialStore, RequestConfig};
//!
//! let store = Arc::new(MemoryCredentialStore::new());
//! let http = HttpMiddleware::builder("http://localhost:3001")
//!     .credential_store(store)
//!     .build()?;
//! let categories = http.get("/query/categories", RequestConfig::new()).await?;
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod stages;
pub mod store;

pub use client::{BuildError, HttpMiddleware, HttpMiddlewareBuilder, REQUEST_TIMEOUT};
pub use request::{Method, RequestConfig, RequestDescriptor};
pub use response::ResponseBody;
pub use stages::{
    ClientInfo, RequestContext, CLIENT_INFO_KEY, CLIENT_VERSION, CLIENT_VERSION_HEADER,
    REQUEST_ID_HEADER, TIMESTAMP_HEADER,
};
pub use store::{LogRedirect, MemoryCredentialStore};
