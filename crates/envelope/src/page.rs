//! Canonical pagination result.

use serde::{Deserialize, Serialize};

/// Opaque, server-issued continuation marker.
///
/// A cursor is forwarded verbatim on the next page request. It is never
/// parsed, compared for ordering, or constructed client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
	/// Wrap a server-issued cursor value.
	#[must_use]
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// The raw cursor value, for query-string forwarding.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for Cursor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// One fetched batch of items plus continuation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
	/// Items in server order. Never deduplicated or reordered by the core.
	pub items: Vec<T>,
	/// Whether a further page exists.
	pub has_more: bool,
	/// Continuation marker for the next fetch; absent on the last page.
	pub next_cursor: Option<Cursor>,
	/// Advisory total element count. Never used for termination; `None` when
	/// the envelope omits it. Display callers wanting the conventional zero
	/// for an absent count use `total_count.unwrap_or(0)`.
	pub total_count: Option<u64>,
}

impl<T> Page<T> {
	/// An empty terminal page: the safe default for absent or malformed
	/// pagination envelopes.
	#[must_use]
	pub fn terminal() -> Self {
		Self {
			items: Vec::new(),
			has_more: false,
			next_cursor: None,
			total_count: None,
		}
	}

	/// Enforce the continuation invariant.
	///
	/// A page may only continue when the server provided both `has_more =
	/// true` and a cursor. Any other combination is coerced to `has_more =
	/// false, next_cursor = None` (items kept) so a contradictory envelope can
	/// never drive an endless fetch loop.
	#[must_use]
	pub fn coerced(mut self) -> Self {
		if self.has_more != self.next_cursor.is_some() {
			tracing::debug!(
				has_more = self.has_more,
				cursor = self.next_cursor.is_some(),
				"contradictory continuation metadata, coercing page to terminal"
			);
			self.has_more = false;
			self.next_cursor = None;
		}
		self
	}

	/// Number of items in this page.
	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether this page carries no items.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

impl<T> Default for Page<T> {
	fn default() -> Self {
		Self::terminal()
	}
}
