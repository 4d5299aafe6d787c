//! Composable request middleware.
//!
//! Cross-cutting concerns wrap an inner [`Transport`] instead of living in a
//! global client. Each layer is a plain struct; stack them at construction
//! time and share the result behind an `Arc`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use cursory_envelope::Result;

use crate::transport::{ApiRequest, RawResponse, Transport};

/// Source of the current auth token, queried once per request.
///
/// Token storage and refresh live outside this crate; a `None` means the
/// request goes out unauthenticated.
pub type AuthTokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Injects an authorization header when the token source yields one.
pub struct AuthHeader<T> {
	inner: T,
	header: String,
	prefix: String,
	source: AuthTokenSource,
}

impl<T> AuthHeader<T> {
	/// Standard `Authorization: Bearer <token>` injection.
	#[must_use]
	pub fn bearer(inner: T, source: AuthTokenSource) -> Self {
		Self::new(inner, "Authorization", "Bearer ", source)
	}

	/// Custom header name and value prefix.
	#[must_use]
	pub fn new(
		inner: T,
		header: impl Into<String>,
		prefix: impl Into<String>,
		source: AuthTokenSource,
	) -> Self {
		Self {
			inner,
			header: header.into(),
			prefix: prefix.into(),
			source,
		}
	}
}

#[async_trait]
impl<T: Transport> Transport for AuthHeader<T> {
	async fn execute(&self, mut request: ApiRequest) -> Result<RawResponse> {
		if let Some(token) = (self.source)() {
			request = request.header(self.header.clone(), format!("{}{token}", self.prefix));
		}
		self.inner.execute(request).await
	}
}

/// Emits `tracing` events around dispatch: method, path, status, elapsed time.
pub struct Trace<T> {
	inner: T,
}

impl<T> Trace<T> {
	/// Wrap `inner` with dispatch tracing.
	#[must_use]
	pub fn new(inner: T) -> Self {
		Self { inner }
	}
}

#[async_trait]
impl<T: Transport> Transport for Trace<T> {
	async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
		let method = request.method.as_str();
		let path = request.path.clone();
		let started = Instant::now();
		let result = self.inner.execute(request).await;
		let elapsed_ms = started.elapsed().as_millis() as u64;
		match &result {
			Ok(response) => {
				tracing::debug!(method, path, status = response.status, elapsed_ms, "request completed");
			}
			Err(error) => {
				tracing::warn!(method, path, elapsed_ms, %error, "request failed");
			}
		}
		result
	}
}
