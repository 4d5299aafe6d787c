//! Reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use cursory_envelope::{ApiError, Result};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::transport::{ApiRequest, Method, RawResponse, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport over a shared [`reqwest::Client`].
///
/// Connect and timeout failures map to [`ApiError::Network`]; non-2xx
/// responses are returned as [`RawResponse`] for the caller to classify.
pub struct HttpTransport {
	client: Client,
	base: Url,
	timeout: Duration,
}

impl HttpTransport {
	/// Create a transport for the given API base URL.
	pub fn new(base: impl AsRef<str>) -> Result<Self> {
		let base = Url::parse(base.as_ref())
			.map_err(|error| ApiError::Unknown(format!("invalid base url: {error}")))?;
		Ok(Self {
			client: Client::new(),
			base,
			timeout: DEFAULT_TIMEOUT,
		})
	}

	/// Override the per-request timeout.
	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	fn request_method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
			Method::Put => reqwest::Method::PUT,
			Method::Patch => reqwest::Method::PATCH,
			Method::Delete => reqwest::Method::DELETE,
		}
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
		let url = self
			.base
			.join(&request.path)
			.map_err(|error| ApiError::Unknown(format!("invalid request path: {error}")))?;

		let mut builder = self
			.client
			.request(Self::request_method(request.method), url)
			.timeout(self.timeout);
		if !request.query.is_empty() {
			builder = builder.query(&request.query);
		}
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &request.body {
			builder = builder.json(body);
		}

		let response = builder
			.send()
			.await
			.map_err(|error| ApiError::Network(error.to_string()))?;
		let status = response.status().as_u16();
		// Lenient body parse: empty or non-JSON bodies become Null.
		let body = response.json::<Value>().await.unwrap_or(Value::Null);
		Ok(RawResponse { status, body })
	}
}
