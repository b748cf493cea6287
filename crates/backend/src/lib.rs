//! QueryDesk lookup backend.
//!
//! Serves the fixture query data set and a minimal demo authentication
//! collaborator over HTTP. Responses are bare JSON (arrays for lookups and
//! searches, objects for login and profile); enveloping happens on the
//! client side.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** The axum router, session table and in-memory store
//! all live here. Shared value types come from [`domain`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`store`] | `QueryStore`: fixture records, lookups, search, test-record append |
//! | [`auth`] | `SessionStore`: demo accounts and issued bearer tokens |
//! | [`routes`] | `AppState`, the router and the bearer guard |
//! | [`server`] | CORS policy, binding and background serving |
//! | [`error`] | `BackendError` and its HTTP mapping |

pub mod auth;
pub mod error;
pub mod routes;
pub mod server;
pub mod store;

pub use auth::SessionStore;
pub use error::BackendError;
pub use routes::{router, AppState};
pub use server::{cors_layer, start, RunningBackend, ServeError};
pub use store::QueryStore;
