//! Interceptor stages.
//!
//! The middleware runs these in a fixed order for every request:
//!
//! ```text
//! request:  context → auth → logging → client_info → [transport]
//! success:  logging → normalize
//! failure:  logging → classify → (re-raise)
//! ```
//!
//! Each stage is a plain function so it can be tested without a transport.

pub mod auth;
pub mod classify;
pub mod client_info;
pub mod context;
pub mod logging;
pub mod normalize;

pub use client_info::{ClientInfo, CLIENT_INFO_KEY};
pub use context::{
    RequestContext, CLIENT_VERSION, CLIENT_VERSION_HEADER, REQUEST_ID_HEADER, TIMESTAMP_HEADER,
};
