//! Credential injection stage.

use domain::CredentialStore;

use crate::request::RequestConfig;

/// Returns the `Authorization` header value to attach, if any.
///
/// `None` when the request opts out with `skip_auth` or when the store is
/// empty. An empty store is not an error; the request goes out
/// unauthenticated and any rejection is handled by the error stage.
pub fn authorization_header(config: &RequestConfig, store: &dyn CredentialStore) -> Option<String> {
    if config.skip_auth {
        return None;
    }
    store.get().map(|token| token.bearer_header())
}

/// Log-safe view of an `Authorization` header: presence only.
pub fn redacted(authorization: Option<&str>) -> &'static str {
    match authorization {
        Some(_) => "Bearer ***",
        None => "None",
    }
}
