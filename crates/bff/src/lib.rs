//! QueryDesk Backend-For-Frontend.
//!
//! Sits between the presentation layer and the domain services. Each
//! operation calls one or more [`domain`] ports, enriches the raw results
//! with derived fields, and wraps the outcome in an [`domain::Envelope`] or
//! a [`domain::BffFailure`] carrying a fixed user-facing message.
//!
//! ## Architectural Layer
//!
//! **Application.** Depends only on the port traits in [`domain`]; the HTTP
//! transport is wired in by the composition root.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`service`] | `BffService` and its five operations |
//! | [`messages`] | Fixed success and failure messages |
//! | [`insights`] | Tag, grouping and trend summaries over enriched records |

pub mod insights;
pub mod messages;
pub mod service;

pub use insights::{all_tags, group_by, summarize, trends, QueryInsights, Trends};
pub use service::BffService;
