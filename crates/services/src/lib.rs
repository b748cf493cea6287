//! QueryDesk domain services.
//!
//! Thin typed accessors that call fixed backend paths through
//! [`middleware::HttpMiddleware`] and decode the payloads into domain types.
//! [`QueryService`] implements [`domain::QueryApi`] and [`AuthService`]
//! implements [`domain::AuthApi`]; the BFF layer sees only the traits.
//!
//! ## Architectural Layer
//!
//! **Orchestration over infrastructure.** The only domain rule enforced here
//! is the test-data guard: `post_test_data` rejects any `num` other than 100
//! before anything is sent.

pub mod auth;
pub mod query;

pub use auth::AuthService;
pub use query::{validate_test_data, QueryService, TEST_DATA_NUM};
