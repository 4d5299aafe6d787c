//! Transport seam between the sync core and the REST boundary.

use async_trait::async_trait;
use cursory_envelope::{ApiError, Result, failure_message};
use serde_json::Value;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	/// GET, used by list and read endpoints.
	Get,
	/// POST, used by create endpoints and token issuance.
	Post,
	/// PUT.
	Put,
	/// PATCH.
	Patch,
	/// DELETE.
	Delete,
}

impl Method {
	/// Wire name of the method.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}
}

/// One outgoing request, independent of the concrete HTTP client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the transport's base URL.
	pub path: String,
	/// Query pairs, appended in insertion order.
	pub query: Vec<(String, String)>,
	/// Extra headers, e.g. the nonce header on guarded writes.
	pub headers: Vec<(String, String)>,
	/// JSON body for write requests.
	pub body: Option<Value>,
}

impl ApiRequest {
	/// Create a request with the given method and path.
	#[must_use]
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: None,
		}
	}

	/// Shorthand for a GET request.
	#[must_use]
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a POST request.
	#[must_use]
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Append a query pair.
	#[must_use]
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));
		self
	}

	/// Append a header.
	#[must_use]
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Set a JSON body.
	#[must_use]
	pub fn json_body(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}

	/// First value of the named header, if set.
	#[must_use]
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}
}

/// Raw transport outcome: HTTP status plus leniently parsed JSON body.
#[derive(Debug, Clone)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body; `Null` when the body was empty or not JSON.
	pub body: Value,
}

impl RawResponse {
	/// Whether the status is 2xx.
	#[must_use]
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Consume the response, classifying non-2xx statuses into [`ApiError`]
	/// using the envelope's optional `message` field.
	pub fn into_body(self) -> Result<Value> {
		if self.is_success() {
			Ok(self.body)
		} else {
			Err(ApiError::classify(self.status, failure_message(&self.body)))
		}
	}
}

/// Object-safe async transport.
///
/// Implementations must be cheap to share behind an `Arc`; one client
/// typically backs many lists. Transport-level failures (connect, timeout)
/// are reported as [`ApiError::Network`]; HTTP-level failures come back as a
/// [`RawResponse`] for the caller to classify.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Dispatch a request and await its outcome.
	async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}
