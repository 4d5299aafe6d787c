//! Cursor-paginated list synchronization.
//!
//! Every paginated view repeats the same small protocol: fetch a page,
//! remember the continuation cursor, append further pages in order, and never
//! let two fetches race. This crate is that protocol written once:
//!
//! * [`ListSyncState`] and [`Phase`] — the explicit per-list state,
//! * [`guard`] — the transition functions enforcing at most one in-flight
//!   request and reset-vs-append semantics,
//! * [`ListController`] — the driver a view holds, parameterized by a
//!   [`PageSource`],
//! * [`EndpointSource`] — the provided source over a REST list endpoint.
//!
//! A controller is created when a view becomes active and dropped on
//! teardown; its state is never shared or persisted.

#![warn(missing_docs)]

mod controller;
pub mod guard;
mod source;
mod state;

pub use controller::{ListController, LoadMore};
pub use source::{EndpointSource, PageSource};
pub use state::{ListSyncState, Phase};
