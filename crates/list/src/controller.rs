//! Per-list sync controller.

use cursory_envelope::Result;

use crate::guard;
use crate::source::PageSource;
use crate::state::{ListSyncState, Phase};

/// Outcome of a [`ListController::load_more`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
	/// A continuation was dispatched and applied.
	Fetched,
	/// The list is exhausted (`has_more` is false); nothing was dispatched.
	Exhausted,
	/// Not in a continuable phase (no initial load yet, fetch in flight, or
	/// last fetch failed); nothing was dispatched.
	NotReady,
}

/// Drives one paginated list: initial and refresh loads, guarded
/// continuations, and error bookkeeping.
///
/// One controller exclusively owns one [`ListSyncState`]; create it when the
/// view becomes active and drop it on teardown. Both the explicit "load more"
/// action and scroll-proximity detection should call
/// [`load_more`](Self::load_more): the guard collapses redundant triggers
/// into at most one request, and a redundant trigger is a no-op, not an
/// error.
pub struct ListController<T, S> {
	state: ListSyncState<T>,
	source: S,
	page_size: u32,
}

impl<T, S: PageSource<T>> ListController<T, S> {
	/// Create an idle controller fetching `page_size` items per page.
	#[must_use]
	pub fn new(source: S, page_size: u32) -> Self {
		Self {
			state: ListSyncState::new(),
			source,
			page_size,
		}
	}

	/// Current list state.
	#[must_use]
	pub fn state(&self) -> &ListSyncState<T> {
		&self.state
	}

	/// Accumulated items, in fetch order.
	#[must_use]
	pub fn items(&self) -> &[T] {
		&self.state.items
	}

	/// Load the first page, discarding any accumulated items and cursor.
	///
	/// Always reset semantics: valid as the initial load from [`Phase::Idle`]
	/// and as an explicit refresh from [`Phase::Loaded`] or [`Phase::Error`].
	/// On failure the state holds an empty error list (no stale items) and
	/// the classified error is both recorded and returned.
	pub async fn load_initial(&mut self) -> Result<()> {
		let Some(ticket) = guard::begin(&mut self.state, true) else {
			return Ok(());
		};
		match self.source.fetch(None, self.page_size).await {
			Ok(page) => {
				guard::complete(&mut self.state, ticket, page);
				Ok(())
			}
			Err(error) => {
				guard::fail(&mut self.state, ticket, error.clone());
				Err(error)
			}
		}
	}

	/// Fetch the next page and append it to the accumulated items.
	///
	/// Dispatches only from [`Phase::Loaded`] with `has_more` set; anything
	/// else is a quiet no-op so scroll events firing close together cost at
	/// most one request. Once the list is exhausted, no further continuation
	/// is ever dispatched until an intervening
	/// [`load_initial`](Self::load_initial).
	pub async fn load_more(&mut self) -> Result<LoadMore> {
		if self.state.phase != Phase::Loaded {
			return Ok(LoadMore::NotReady);
		}
		if !self.state.has_more {
			return Ok(LoadMore::Exhausted);
		}
		let Some(ticket) = guard::begin(&mut self.state, false) else {
			return Ok(LoadMore::NotReady);
		};
		let cursor = self.state.cursor.clone();
		match self.source.fetch(cursor.as_ref(), self.page_size).await {
			Ok(page) => {
				guard::complete(&mut self.state, ticket, page);
				Ok(LoadMore::Fetched)
			}
			Err(error) => {
				guard::fail(&mut self.state, ticket, error.clone());
				Err(error)
			}
		}
	}
}
