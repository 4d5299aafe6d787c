//! The `{ok, data}` response envelope convention.

use serde::Deserialize;
use serde_json::Value;

/// Standard response envelope: `{ok: bool, data: T}` on success, with an
/// optional top-level `message` carried on failure envelopes.
///
/// Every field tolerates absence (missing `Option` fields deserialize to
/// `None`) so a partially populated envelope still deserializes; callers
/// decide what an absent `data` means. The payload type needs nothing beyond
/// `Deserialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
	/// Whether the server reports the operation as successful.
	#[serde(default)]
	pub ok: bool,
	/// The payload; absent on failure envelopes.
	pub data: Option<T>,
	/// Human-readable failure description, when the server provided one.
	pub message: Option<String>,
}

/// Extract the optional `message` field from a raw failure body.
///
/// Non-object bodies and missing or non-string fields yield `None`.
#[must_use]
pub fn failure_message(body: &Value) -> Option<String> {
	body.get("message").and_then(Value::as_str).map(str::to_owned)
}
