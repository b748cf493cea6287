//! Core domain for QueryDesk.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, derivation rule and error type used across the workspace.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RequestId`, `RecordId`, `AccessToken`, etc.) |
//! | [`types`] | Raw and enriched value types (`QueryRecord`, `UserInfo`, etc.) |
//! | [`envelope`] | `Envelope<T>` and the BFF's tagged result type |
//! | [`derive`] | Priority, tag, role and permission derivation |
//! | [`errors`] | `ApiError` and its `ErrorClass` taxonomy |
//! | [`ports`] | Credential store, login redirect and API port traits |

pub mod derive;
pub mod envelope;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use derive::{
    calculate_priority, determine_role, enrich_record, enrich_user, generate_tags,
    permissions_for, status_weight, type_weight, PriorityLevel, ADMIN_USERNAME,
};
pub use envelope::{BffFailure, BffResult, Envelope};
pub use errors::{ApiError, ErrorClass};
pub use identifiers::{AccessToken, RecordId, RequestId, UserId, Username};
pub use ports::{AuthApi, CredentialStore, LoginRedirect, QueryApi, LOGIN_PATH};
pub use types::{
    Correlated, EnrichedRecord, FilterOptions, LoginResponse, LoginSession, Permission,
    QueryFilter, QueryOptions, QueryRecord, RawUser, Role, Timestamp, UserInfo,
};
