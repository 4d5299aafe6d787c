//! Per-list synchronization state.

use cursory_envelope::{ApiError, Cursor};

/// Lifecycle phase of one synchronized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Created; nothing fetched yet.
	Idle,
	/// Initial or refresh fetch in flight.
	Loading,
	/// Continuation fetch in flight.
	LoadingMore,
	/// Last fetch applied successfully.
	Loaded,
	/// Last fetch failed; `last_error` is set.
	Error,
}

impl Phase {
	/// Whether a fetch is currently in flight.
	#[must_use]
	pub fn in_flight(self) -> bool {
		matches!(self, Self::Loading | Self::LoadingMore)
	}
}

/// Accumulated state of one paginated list.
///
/// Owned exclusively by one controller (equivalently, one view instance);
/// never shared between views and never persisted. The generation counter
/// identifies the current reset cycle so a completion that raced a reset can
/// be recognized and discarded instead of resurrecting stale items.
#[derive(Debug, Clone)]
pub struct ListSyncState<T> {
	/// Items accumulated across pages, in fetch order.
	pub items: Vec<T>,
	/// Continuation cursor from the most recent page.
	pub cursor: Option<Cursor>,
	/// Whether the server reports further pages.
	pub has_more: bool,
	/// Current lifecycle phase.
	pub phase: Phase,
	/// Classification of the most recent failure.
	pub last_error: Option<ApiError>,
	generation: u64,
}

impl<T> ListSyncState<T> {
	/// Fresh idle state.
	#[must_use]
	pub fn new() -> Self {
		Self {
			items: Vec::new(),
			cursor: None,
			has_more: false,
			phase: Phase::Idle,
			last_error: None,
			generation: 0,
		}
	}

	/// The current reset-cycle identifier.
	#[must_use]
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub(crate) fn bump_generation(&mut self) -> u64 {
		self.generation = self.generation.wrapping_add(1);
		self.generation
	}
}

impl<T> Default for ListSyncState<T> {
	fn default() -> Self {
		Self::new()
	}
}
