//! The uniform response envelope and the BFF's tagged result type.
//!
//! Every BFF operation returns [`BffResult<T>`]: the success variant is an
//! [`Envelope`] carrying data, the failure variant is a [`BffFailure`] carrying
//! the operation's fixed human-readable message. A failure converts into a
//! failed envelope for callers that want the wire shape.

use serde::{Deserialize, Serialize};

use crate::{RequestId, Timestamp};

/// `{ success, data, message?, timestamp, requestId }`.
///
/// ## Invariants
///
/// - `success == true` implies `data.is_some()`.
/// - `success == false` implies `data.is_none()` and a non-empty `message`.
///
/// The invariants hold for envelopes built through [`Envelope::success`],
/// [`Envelope::correlated`] and [`BffFailure::into_envelope`]. The fields are
/// public and the type is deserializable, so a hand-built or decoded envelope
/// is not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: Timestamp,
    /// Empty when no request id is known for the outcome.
    pub request_id: String,
}

impl<T> Envelope<T> {
    /// A successful envelope stamped with the current time.
    pub fn success(data: T, request_id: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Timestamp::now(),
            request_id: request_id.into(),
        }
    }

    /// Like [`Envelope::success`], correlated with a middleware request id.
    pub fn correlated(data: T, request_id: RequestId) -> Self {
        Self::success(data, request_id.to_string())
    }

    /// Attaches a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns `true` for a successful envelope.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Consumes the envelope and returns its data.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// The failure variant of every BFF operation.
///
/// Carries only the operation's fixed message; the underlying error's detail
/// is deliberately discarded so callers can tell *that* an operation failed,
/// not why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct BffFailure {
    pub message: String,
    pub timestamp: Timestamp,
    pub request_id: String,
}

impl BffFailure {
    /// Creates a failure with a fixed, non-empty message.
    pub fn new(message: &'static str) -> Self {
        debug_assert!(!message.is_empty(), "failure messages must be non-empty");
        Self {
            message: message.to_string(),
            timestamp: Timestamp::now(),
            request_id: String::new(),
        }
    }

    /// Renders the failure as a failed [`Envelope`] (`data: null`).
    pub fn into_envelope<T>(self) -> Envelope<T> {
        Envelope {
            success: false,
            data: None,
            message: Some(self.message),
            timestamp: self.timestamp,
            request_id: self.request_id,
        }
    }
}

/// Result type of every BFF operation.
pub type BffResult<T> = Result<Envelope<T>, BffFailure>;
