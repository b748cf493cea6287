//! Client metadata stage.
//!
//! Every JSON object body leaves the client with a `clientInfo` member
//! describing the calling environment. The stage is unconditional (no flag
//! disables it) and pure: it returns a new body and leaves the descriptor's
//! body untouched.

use serde::Serialize;
use serde_json::Value;

use domain::Timestamp;

/// Key under which client metadata is added to object bodies.
pub const CLIENT_INFO_KEY: &str = "clientInfo";

/// Description of the calling environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: String,
    /// The page or origin the client is running from.
    pub url: String,
    pub platform: String,
    pub language: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            user_agent: format!("querydesk-client/{}", env!("CARGO_PKG_VERSION")),
            url: String::new(),
            platform: std::env::consts::OS.to_string(),
            language: "zh-CN".to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfoPayload<'a> {
    user_agent: &'a str,
    timestamp: Timestamp,
    url: &'a str,
    platform: &'a str,
    language: &'a str,
}

/// Returns `body` with client metadata added if it is a JSON object.
///
/// Arrays, scalars and `null` are returned unchanged.
pub fn with_client_info(body: &Value, info: &ClientInfo, now: Timestamp) -> Value {
    let Value::Object(fields) = body else {
        return body.clone();
    };

    let payload = ClientInfoPayload {
        user_agent: &info.user_agent,
        timestamp: now,
        url: &info.url,
        platform: &info.platform,
        language: &info.language,
    };
    let mut fields = fields.clone();
    // Serialising a struct of strings and a timestamp cannot fail.
    if let Ok(value) = serde_json::to_value(payload) {
        fields.insert(CLIENT_INFO_KEY.to_string(), value);
    }
    Value::Object(fields)
}
