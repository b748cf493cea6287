//! Error taxonomy for calls that cross the HTTP boundary.
//!
//! [`ApiError`] is what the middleware and the domain services raise.
//! Classification ([`ErrorClass`]) is by observable cause, not by
//! representation: the middleware attaches side effects to a class (credential
//! eviction for [`ErrorClass::Unauthorized`]) but always propagates the error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse class of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// HTTP 401. Triggers credential eviction and a login redirect.
    Unauthorized,
    /// HTTP 5xx.
    ServerFault,
    /// HTTP 4xx other than 401.
    ClientFault,
    /// No response received, including timeouts.
    Network,
    /// Rejected locally before any transport activity.
    Validation,
    /// A response arrived but its payload had an unexpected shape.
    Payload,
}

/// Failure of an HTTP-backed operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the credential (or its absence).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message extracted from the response, or the status reason.
        message: String,
    },

    /// The backend rejected the request (4xx other than 401).
    #[error("Client error {status}: {message}")]
    ClientFault {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response, or the status reason.
        message: String,
    },

    /// The backend failed while handling the request (5xx).
    #[error("Server error {status}: {message}")]
    ServerFault {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response, or the status reason.
        message: String,
    },

    /// No response was received.
    #[error("Network error: {message}")]
    Network {
        /// Transport-level description.
        message: String,
        /// `true` if the fixed request timeout elapsed.
        timed_out: bool,
    },

    /// An argument failed a domain rule; nothing was sent.
    #[error("Validation failed: {message}")]
    Validation {
        /// Which rule was violated.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Unexpected response payload: {message}")]
    Payload {
        /// Decoder message.
        message: String,
    },
}

impl ApiError {
    /// Builds the error for a non-2xx HTTP status.
    ///
    /// 401 is [`ApiError::Unauthorized`], 5xx is [`ApiError::ServerFault`],
    /// everything else is [`ApiError::ClientFault`].
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized { message },
            s if s >= 500 => Self::ServerFault { status, message },
            _ => Self::ClientFault { status, message },
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a payload decoding error.
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    /// Returns the class this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Unauthorized { .. } => ErrorClass::Unauthorized,
            Self::ClientFault { .. } => ErrorClass::ClientFault,
            Self::ServerFault { .. } => ErrorClass::ServerFault,
            Self::Network { .. } => ErrorClass::Network,
            Self::Validation { .. } => ErrorClass::Validation,
            Self::Payload { .. } => ErrorClass::Payload,
        }
    }

    /// Returns the HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::ClientFault { status, .. } | Self::ServerFault { status, .. } => Some(*status),
            _ => None,
        }
    }
}
