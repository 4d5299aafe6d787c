//! Fetch guard: transition functions over [`ListSyncState`].
//!
//! The guard enforces the two rules every list shares: at most one in-flight
//! request per list, and reset-vs-append semantics on completion. Both the
//! explicit "load more" action and scroll-proximity triggers go through
//! [`can_start`]/[`begin`], so simultaneous triggers collapse to one request.

use cursory_envelope::{ApiError, Page};

use crate::state::{ListSyncState, Phase};

/// Whether a new fetch may start. False whenever one is already in flight.
#[must_use]
pub fn can_start<T>(state: &ListSyncState<T>) -> bool {
	!state.phase.in_flight()
}

/// Ticket returned by [`begin`], required to apply the matching completion.
///
/// A completion whose ticket no longer matches the state's generation raced a
/// reset (or a teardown) and must be discarded instead of mutating state it
/// no longer owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
	generation: u64,
	reset: bool,
}

/// Start a fetch cycle.
///
/// With `reset`, the accumulated items and cursor are discarded and the state
/// enters [`Phase::Loading`]; a continuation keeps them and enters
/// [`Phase::LoadingMore`]. Calling `begin` while a fetch is in flight is a
/// programming error: the call is rejected and logged, never silently raced.
pub fn begin<T>(state: &mut ListSyncState<T>, reset: bool) -> Option<FetchTicket> {
	if !can_start(state) {
		tracing::warn!(phase = ?state.phase, reset, "fetch rejected: request already in flight");
		return None;
	}
	if reset {
		state.items.clear();
		state.cursor = None;
		state.has_more = false;
		state.last_error = None;
		state.phase = Phase::Loading;
		Some(FetchTicket {
			generation: state.bump_generation(),
			reset: true,
		})
	} else {
		state.phase = Phase::LoadingMore;
		Some(FetchTicket {
			generation: state.generation(),
			reset: false,
		})
	}
}

/// Apply a successful page for the cycle identified by `ticket`.
///
/// A reset cycle replaces the items; a continuation appends in server order,
/// never reordering or dropping already-fetched items (even if the server
/// returned overlapping pages). Cursor and `has_more` are taken from the
/// page. Returns `false` when the ticket is stale and nothing was applied.
pub fn complete<T>(state: &mut ListSyncState<T>, ticket: FetchTicket, page: Page<T>) -> bool {
	if ticket.generation != state.generation() {
		tracing::debug!(
			ticket = ticket.generation,
			current = state.generation(),
			"discarding completion from a superseded fetch cycle"
		);
		return false;
	}
	if ticket.reset {
		state.items = page.items;
	} else {
		state.items.extend(page.items);
	}
	state.cursor = page.next_cursor;
	state.has_more = page.has_more;
	state.phase = Phase::Loaded;
	state.last_error = None;
	true
}

/// Record a failed fetch for the cycle identified by `ticket`.
///
/// Items and cursor are left untouched so partial results stay visible after
/// a failed continuation. Returns `false` when the ticket is stale.
pub fn fail<T>(state: &mut ListSyncState<T>, ticket: FetchTicket, error: ApiError) -> bool {
	if ticket.generation != state.generation() {
		tracing::debug!(
			ticket = ticket.generation,
			current = state.generation(),
			"discarding failure from a superseded fetch cycle"
		);
		return false;
	}
	state.phase = Phase::Error;
	state.last_error = Some(error);
	true
}
