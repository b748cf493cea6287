//! Error classification stage.
//!
//! Maps transport outcomes onto [`ApiError`] and applies the per-class side
//! effects. Only [`ErrorClass::Unauthorized`] has side effects beyond
//! logging: the stored credential is cleared and the client is sent to the
//! login entry point. Classification never suppresses the error.

use serde_json::Value;
use tracing::warn;

use domain::{ApiError, CredentialStore, ErrorClass, LoginRedirect, LOGIN_PATH};

/// Builds the error for a non-2xx response.
///
/// The message is taken from the body's `message` field (a string or the
/// first string of an array), a plain-string body, or the status reason.
pub fn from_response(status: reqwest::StatusCode, body: &Value) -> ApiError {
    let message = message_from_body(body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    ApiError::from_status(status.as_u16(), message)
}

/// Builds the error for a request that produced no response.
pub fn from_transport(err: &reqwest::Error) -> ApiError {
    ApiError::Network {
        message: err.to_string(),
        timed_out: err.is_timeout(),
    }
}

fn message_from_body(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(fields) => match fields.get("message") {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Array(items)) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
            _ => None,
        },
        _ => None,
    }
}

/// Applies the side effects for `failure`'s class and returns the class.
pub fn apply(
    failure: &ApiError,
    store: &dyn CredentialStore,
    redirect: &dyn LoginRedirect,
) -> ErrorClass {
    let class = failure.class();
    match class {
        ErrorClass::Unauthorized => {
            store.clear();
            redirect.redirect_to_login();
            warn!(login_path = LOGIN_PATH, "Session rejected; credential cleared");
        }
        ErrorClass::ServerFault => warn!("Server error, please try again later"),
        ErrorClass::ClientFault => warn!("Request error, please check the parameters"),
        ErrorClass::Network => warn!("Network error, please check the connection"),
        ErrorClass::Validation | ErrorClass::Payload => {}
    }
    class
}
