//! Error taxonomy consumed uniformly by every fetch controller and writer.

use thiserror::Error;

/// Result alias for operations classified by [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

/// Classified failure of a transport call or write-protocol step.
///
/// Malformed pagination envelopes are deliberately absent: they are coerced
/// to an empty terminal page by the normalizer and never surface as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
	/// The request never reached the server (connect failure, timeout).
	/// Retryable.
	#[error("network error: {0}")]
	Network(String),

	/// The server rejected the request (4xx). Retrying the same request will
	/// not succeed.
	#[error("request rejected: status {status}")]
	Client {
		/// HTTP status code.
		status: u16,
		/// Server-provided failure message, when present.
		message: Option<String>,
	},

	/// The server failed (5xx). Retryable, but the core never retries on its
	/// own; the classification is recorded for the caller to decide.
	#[error("server error: status {status}")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Server-provided failure message, when present.
		message: Option<String>,
	},

	/// The token-issuing endpoint was unreachable or returned an error. The
	/// guarded write is blocked entirely.
	#[error("token issuance failed: {0}")]
	IssuanceFailed(String),

	/// A nonce token was attached after it had already signed a write.
	#[error("token already consumed")]
	TokenConsumed,

	/// A guarded write was attempted without a nonce token.
	#[error("missing nonce token")]
	TokenMissing,

	/// Anything that fits none of the above. Must not crash the caller.
	#[error("unclassified error: {0}")]
	Unknown(String),
}

impl ApiError {
	/// Map an HTTP status (plus the envelope's optional `message`) onto the
	/// taxonomy.
	#[must_use]
	pub fn classify(status: u16, message: Option<String>) -> Self {
		match status {
			400..=499 => Self::Client { status, message },
			500..=599 => Self::Server { status, message },
			other => Self::Unknown(format!("unexpected status {other}")),
		}
	}

	/// Whether retrying the same request could reasonably succeed.
	///
	/// Advisory only; the core itself never retries.
	#[must_use]
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Network(_) | Self::Server { .. })
	}

	/// The server-provided failure message, when one was present.
	#[must_use]
	pub fn server_message(&self) -> Option<&str> {
		match self {
			Self::Client { message, .. } | Self::Server { message, .. } => message.as_deref(),
			_ => None,
		}
	}
}
