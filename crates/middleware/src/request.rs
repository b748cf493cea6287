//! Request descriptors and per-request configuration.

use serde_json::Value;

/// HTTP methods exposed by the middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case method name, as logged.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request flags and query parameters.
///
/// `retry_count` is accepted for compatibility with callers that set it, but
/// the middleware never retries: every request is dispatched exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Do not attach the stored bearer credential.
    pub skip_auth: bool,
    /// Do not emit the outbound request log line.
    pub skip_logging: bool,
    /// Inert.
    pub retry_count: u32,
    /// Query string parameters, in order.
    pub params: Vec<(String, String)>,
}

impl RequestConfig {
    /// Default configuration: authenticated, logged, no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends the request without an `Authorization` header.
    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Suppresses the outbound request log line.
    #[must_use]
    pub fn skip_logging(mut self) -> Self {
        self.skip_logging = true;
        self
    }

    /// Records a retry count. Has no effect on dispatch.
    #[must_use]
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }
}

/// Everything needed to dispatch one request.
///
/// Built per call and never mutated once handed to the middleware; the
/// client-metadata stage produces a new body rather than editing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the middleware's base URL, e.g. `/query/search`.
    pub path: String,
    pub body: Option<Value>,
    pub config: RequestConfig,
}

impl RequestDescriptor {
    /// Creates a descriptor.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            config,
        }
    }
}
