//! Total normalization of heterogeneous pagination envelopes.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::page::{Cursor, Page};

/// Normalize a raw response body into a canonical [`Page`].
///
/// Total: any JSON-like input yields a well-formed page satisfying the
/// continuation invariant. Recognized shapes, most to least structured:
///
/// * `{ok, data: {contents: [...], cursor: {hasMore, nextCursor, totalCount}}}`
/// * `{data: {contents: [...]}}` or `{contents: [...]}` (no cursor object —
///   treated as a single terminal page)
/// * a bare contents array
///
/// Anything else degrades to an empty terminal page: a transient malformed
/// payload must never corrupt accumulated list state. Elements that fail to
/// deserialize as `T` are dropped individually rather than failing the page.
#[must_use]
pub fn normalize<T: DeserializeOwned>(raw: Value) -> Page<T> {
	let mut root = match raw {
		Value::Object(map) => map,
		Value::Array(items) => {
			let mut page = Page::terminal();
			page.items = decode_items(items);
			return page;
		}
		_ => return Page::terminal(),
	};

	// Most endpoints wrap the payload in `data`; tolerate its absence.
	let data = match root.remove("data") {
		Some(value @ (Value::Object(_) | Value::Array(_))) => value,
		_ => Value::Object(root),
	};

	let (raw_items, meta) = match data {
		Value::Array(items) => (items, None),
		Value::Object(mut map) => {
			let items = match map.remove("contents") {
				Some(Value::Array(items)) => items,
				_ => Vec::new(),
			};
			(items, Some(map))
		}
		_ => (Vec::new(), None),
	};

	let (has_more, next_cursor, total_count) = match meta {
		Some(map) => continuation_meta(map),
		None => (false, None, None),
	};

	Page {
		items: decode_items(raw_items),
		has_more,
		next_cursor,
		total_count,
	}
	.coerced()
}

/// Read continuation metadata from the payload object.
///
/// The canonical location is the `cursor` sub-object; endpoints that inline
/// the fields next to `contents` are tolerated. Missing fields default to the
/// terminal page.
fn continuation_meta(mut data: Map<String, Value>) -> (bool, Option<Cursor>, Option<u64>) {
	let meta = match data.remove("cursor") {
		Some(Value::Object(map)) => map,
		_ => data,
	};
	let has_more = bool_field(&meta, &["hasMore", "has_more"]).unwrap_or(false);
	let next_cursor = string_field(&meta, &["nextCursor", "next_cursor"]).map(Cursor::new);
	let total_count = u64_field(&meta, &["totalCount", "total_count"]);
	(has_more, next_cursor, total_count)
}

fn decode_items<T: DeserializeOwned>(raw_items: Vec<Value>) -> Vec<T> {
	let total = raw_items.len();
	let items: Vec<T> = raw_items
		.into_iter()
		.filter_map(|value| serde_json::from_value(value).ok())
		.collect();
	let dropped = total - items.len();
	if dropped > 0 {
		tracing::debug!(dropped, total, "dropped undecodable page items");
	}
	items
}

fn bool_field(map: &Map<String, Value>, names: &[&str]) -> Option<bool> {
	names.iter().find_map(|name| map.get(*name)?.as_bool())
}

fn string_field(map: &Map<String, Value>, names: &[&str]) -> Option<String> {
	names
		.iter()
		.find_map(|name| map.get(*name)?.as_str())
		.map(str::to_owned)
}

fn u64_field(map: &Map<String, Value>, names: &[&str]) -> Option<u64> {
	names.iter().find_map(|name| map.get(*name)?.as_u64())
}
