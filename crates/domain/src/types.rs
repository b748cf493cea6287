//! Shared value types for the QueryDesk domain.
//!
//! Raw types ([`QueryRecord`], [`RawUser`], [`LoginResponse`]) mirror what the
//! backend sends. Enriched types ([`EnrichedRecord`], [`UserInfo`]) are built
//! by the BFF layer and never travel back to the backend.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccessToken, RecordId, RequestId, UserId, Username};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Serialises as an RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 string (the `X-Timestamp` header format).
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds elapsed from `self` until now. Negative if `self` is in the future.
    pub fn elapsed_millis(self) -> i64 {
        (Utc::now() - self.0).num_milliseconds()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// A typed payload together with the request id of the round trip that
/// produced it, when the middleware enveloped the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlated<T> {
    /// The decoded payload.
    pub data: T,
    /// `None` when the response body was left unwrapped by the middleware.
    pub request_id: Option<RequestId>,
}

impl<T> Correlated<T> {
    /// Pairs a payload with an optional request id.
    pub fn new(data: T, request_id: Option<RequestId>) -> Self {
        Self { data, request_id }
    }

    /// Transforms the payload, keeping the correlation.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Correlated<U> {
        Correlated {
            data: f(self.data),
            request_id: self.request_id,
        }
    }

    /// Returns the request id as a string, empty when absent.
    pub fn request_id_string(&self) -> String {
        self.request_id.map(|id| id.to_string()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Query data
// ---------------------------------------------------------------------------

/// One row of the backend's lookup data set, exactly as transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Creation date as stored by the backend (`YYYY-MM-DD`).
    pub created_at: String,
}

/// Search filter. Each present, non-empty field is an exact-match predicate;
/// predicates are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl QueryFilter {
    /// A filter matching every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the filter to one category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Restricts the filter to one type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Returns `true` if `record` satisfies every active predicate.
    ///
    /// Empty strings are treated as absent, matching how an unselected
    /// drop-down arrives from a form.
    pub fn matches(&self, record: &QueryRecord) -> bool {
        fn accepts(wanted: &Option<String>, actual: &str) -> bool {
            match wanted.as_deref() {
                None | Some("") => true,
                Some(w) => w == actual,
            }
        }
        accepts(&self.category, &record.category)
            && accepts(&self.status, &record.status)
            && accepts(&self.kind, &record.kind)
    }

    /// The active predicates as `(name, value)` query parameters.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        [
            ("category", &self.category),
            ("status", &self.status),
            ("type", &self.kind),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value.as_deref() {
            None | Some("") => None,
            Some(v) => Some((key.to_string(), v.to_string())),
        })
        .collect()
    }
}

/// The three lookup lists used to populate the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub statuses: Vec<String>,
    pub types: Vec<String>,
}

/// Payload of a successful `get_query_options` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub filters: FilterOptions,
}

/// A [`QueryRecord`] extended with fields derived at adaptation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: QueryRecord,
    /// Time the record passed through the BFF, not the backend's own field.
    pub updated_at: Timestamp,
    /// Lower means more urgent; see [`crate::derive::calculate_priority`].
    pub priority: u32,
    /// Non-empty values among category, status and type, in that order.
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A user as returned by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub id: UserId,
    pub username: Username,
    pub email: String,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: AccessToken,
    pub user: RawUser,
}

/// Coarse role derived from the username; never transmitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// A single capability granted to a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Manage,
}

/// A [`RawUser`] enriched with derived role and permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub username: Username,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub last_login_time: Timestamp,
}

/// Payload of a successful BFF login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginSession {
    pub user: UserInfo,
    pub token: AccessToken,
}
