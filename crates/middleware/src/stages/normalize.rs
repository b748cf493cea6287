//! Response normalization stage.
//!
//! JSON object bodies are rewrapped as
//! `{ data: <raw>, success: true, timestamp: now, requestId }`. Anything else
//! (arrays, strings, numbers, empty bodies) is returned as-is. Endpoints such
//! as `/query/categories` therefore come back unwrapped; the asymmetry is
//! kept and made explicit by [`ResponseBody`].

use serde_json::Value;

use domain::Envelope;

use super::context::RequestContext;
use crate::response::ResponseBody;

/// Normalizes a successful response body.
pub fn normalize(body: Value, ctx: &RequestContext) -> ResponseBody {
    if body.is_object() {
        ResponseBody::Enveloped(Envelope::correlated(body, ctx.request_id))
    } else {
        ResponseBody::Bare(body)
    }
}

/// Parses raw response bytes. Empty bodies become `null`, non-JSON bodies
/// become a JSON string.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
