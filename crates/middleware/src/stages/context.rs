//! Request context stage.
//!
//! Runs first for every request. Generates the [`RequestContext`] (a fresh
//! request id and the dispatch timestamp) and renders it as outbound headers
//! together with the fixed client-version marker.

use domain::{RequestId, Timestamp};

/// Correlation header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Dispatch time in RFC 3339.
pub const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Fixed protocol-version marker.
pub const CLIENT_VERSION_HEADER: &str = "X-Client-Version";

/// Value sent in [`CLIENT_VERSION_HEADER`].
pub const CLIENT_VERSION: &str = "1.0.0";

/// Per-request correlation data.
///
/// Exactly one context exists per dispatched request; every log line for the
/// request's response or error carries its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub dispatched_at: Timestamp,
}

impl RequestContext {
    /// Creates a context with a new random id, stamped now.
    pub fn generate() -> Self {
        Self {
            request_id: RequestId::new_random(),
            dispatched_at: Timestamp::now(),
        }
    }

    /// Outbound metadata headers for this context.
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (REQUEST_ID_HEADER, self.request_id.to_string()),
            (TIMESTAMP_HEADER, self.dispatched_at.to_string()),
            (CLIENT_VERSION_HEADER, CLIENT_VERSION.to_string()),
        ]
    }

    /// Milliseconds since dispatch.
    pub fn elapsed_millis(&self) -> i64 {
        self.dispatched_at.elapsed_millis()
    }
}
