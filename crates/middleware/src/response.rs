//! Normalized response bodies.

use serde::de::DeserializeOwned;
use serde_json::Value;

use domain::{ApiError, Correlated, Envelope, RequestId};

/// What the middleware hands back on success.
///
/// Only JSON object bodies are wrapped in an [`Envelope`]; arrays, scalars and
/// empty bodies come back [`ResponseBody::Bare`]. Callers that only want the
/// payload use [`ResponseBody::into_payload`] or [`ResponseBody::decode`],
/// which treat both shapes uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The raw object body, wrapped with `success`, `timestamp` and `requestId`.
    Enveloped(Envelope<Value>),
    /// The raw body, untouched.
    Bare(Value),
}

impl ResponseBody {
    /// Returns `true` if the body was wrapped in an envelope.
    pub fn is_enveloped(&self) -> bool {
        matches!(self, Self::Enveloped(_))
    }

    /// The request id recorded in the envelope, if the body was wrapped.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Enveloped(envelope) => RequestId::parse(&envelope.request_id),
            Self::Bare(_) => None,
        }
    }

    /// The raw payload, whichever shape it arrived in.
    pub fn into_payload(self) -> Value {
        match self {
            Self::Enveloped(envelope) => envelope.data.unwrap_or(Value::Null),
            Self::Bare(value) => value,
        }
    }

    /// Decodes the raw payload into `T`, keeping the request id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Payload`] if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Correlated<T>, ApiError> {
        let request_id = self.request_id();
        let data = serde_json::from_value(self.into_payload())
            .map_err(|e| ApiError::payload(e.to_string()))?;
        Ok(Correlated::new(data, request_id))
    }
}
