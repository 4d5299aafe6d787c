//! Canonical pagination and response-envelope shapes.
//!
//! Backend list endpoints disagree about their pagination envelope: most wrap
//! results as `{ok, data: {contents, cursor: {hasMore, nextCursor,
//! totalCount}}}`, some omit the `cursor` sub-object entirely, and a few
//! return the contents array directly. This crate folds every shape into one
//! canonical [`Page`] and maps every transport outcome onto one [`ApiError`]
//! taxonomy, so the fetch and write layers above never see the inconsistency.

#![warn(missing_docs)]

mod envelope;
mod error;
mod normalize;
mod page;

pub use envelope::{ApiEnvelope, failure_message};
pub use error::{ApiError, Result};
pub use normalize::normalize;
pub use page::{Cursor, Page};
