//! Structured request, response and error log lines.
//!
//! All three carry the request id of the originating [`RequestContext`] so a
//! request can be followed from dispatch to outcome.

use serde_json::Value;
use tracing::{error, info};

use domain::ApiError;

use super::auth::redacted;
use super::context::RequestContext;
use crate::request::{Method, RequestConfig};

/// Sentinel logged when a payload length cannot be measured.
pub const UNMEASURED: &str = "N/A";

/// Length indicator for a response payload: the element count of an array,
/// [`UNMEASURED`] for anything else.
pub fn payload_length(body: &Value) -> String {
    match body {
        Value::Array(items) => items.len().to_string(),
        _ => UNMEASURED.to_string(),
    }
}

/// Logs an outbound request. The authorization header is reduced to its presence.
pub fn log_request(
    ctx: &RequestContext,
    method: Method,
    url: &str,
    config: &RequestConfig,
    authorization: Option<&str>,
    has_body: bool,
) {
    info!(
        request_id = %ctx.request_id,
        method = %method,
        url = %url,
        params = ?config.params,
        has_body,
        authorization = redacted(authorization),
        timestamp = %ctx.dispatched_at,
        "Sending request"
    );
}

/// Logs a successful response with its status, size and elapsed time.
pub fn log_response(ctx: &RequestContext, method: Method, url: &str, status: u16, body: &Value) {
    info!(
        request_id = %ctx.request_id,
        method = %method,
        url = %url,
        status,
        data_length = %payload_length(body),
        response_time_ms = ctx.elapsed_millis(),
        "Request succeeded"
    );
}

/// Logs a failed request.
pub fn log_error(
    ctx: &RequestContext,
    method: Method,
    url: &str,
    failure: &ApiError,
    body: Option<&Value>,
) {
    error!(
        request_id = %ctx.request_id,
        method = %method,
        url = %url,
        status = ?failure.status(),
        error = %failure,
        data = ?body,
        "Request failed"
    );
}
