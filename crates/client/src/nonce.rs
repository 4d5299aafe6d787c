//! Single-use idempotency tokens for non-idempotent writes.
//!
//! A create request must never leave twice with the same token: double-clicks
//! and retry-after-timeout would otherwise replay the mutation. Tokens are
//! issued by the backend, attached as the [`NONCE_HEADER`] header, and spent
//! at dispatch time regardless of outcome. A user-visible retry issues a
//! fresh token; nothing here caches or reuses one.

use std::sync::Arc;
use std::time::Instant;

use cursory_envelope::{ApiEnvelope, ApiError, Result};
use serde::Deserialize;

use crate::transport::{ApiRequest, RawResponse, Transport};

/// Header carrying the idempotency token on guarded writes.
pub const NONCE_HEADER: &str = "X-Nonce-Token";

/// Permission to perform exactly one non-idempotent write.
#[derive(Debug, Clone)]
pub struct NonceToken {
	value: String,
	issued_at: Instant,
	consumed: bool,
}

impl NonceToken {
	fn new(value: String) -> Self {
		Self {
			value,
			issued_at: Instant::now(),
			consumed: false,
		}
	}

	/// The opaque token value.
	#[must_use]
	pub fn value(&self) -> &str {
		&self.value
	}

	/// When the token was issued.
	#[must_use]
	pub fn issued_at(&self) -> Instant {
		self.issued_at
	}

	/// Whether the token has already signed a write.
	#[must_use]
	pub fn is_consumed(&self) -> bool {
		self.consumed
	}

	/// Attach the token to an outgoing write.
	///
	/// Fails with [`ApiError::TokenConsumed`] if the token already signed a
	/// request; a consumed token must never reach the wire again.
	pub fn attach(&self, request: &mut ApiRequest) -> Result<()> {
		if self.consumed {
			return Err(ApiError::TokenConsumed);
		}
		request.headers.push((NONCE_HEADER.to_owned(), self.value.clone()));
		Ok(())
	}

	/// Mark the token consumed.
	///
	/// Called when the write is dispatched, not when its response arrives:
	/// the token is spent regardless of outcome.
	pub fn consume(&mut self) {
		self.consumed = true;
	}
}

#[derive(Deserialize)]
struct IssuedToken {
	token: String,
}

/// Client for the token-issuing endpoint.
pub struct NonceIssuer {
	transport: Arc<dyn Transport>,
	path: String,
}

impl NonceIssuer {
	/// Create an issuer posting to the given endpoint path.
	#[must_use]
	pub fn new(transport: Arc<dyn Transport>, path: impl Into<String>) -> Self {
		Self {
			transport,
			path: path.into(),
		}
	}

	/// Request a fresh single-use token.
	///
	/// Every failure mode folds into [`ApiError::IssuanceFailed`]: when no
	/// token can be obtained, the guarded write is blocked outright.
	pub async fn issue(&self) -> Result<NonceToken> {
		let request = ApiRequest::post(self.path.clone());
		let response = self
			.transport
			.execute(request)
			.await
			.map_err(|error| ApiError::IssuanceFailed(error.to_string()))?;
		if !response.is_success() {
			return Err(ApiError::IssuanceFailed(format!("status {}", response.status)));
		}
		let envelope: ApiEnvelope<IssuedToken> = serde_json::from_value(response.body)
			.map_err(|error| ApiError::IssuanceFailed(format!("malformed issuance response: {error}")))?;
		match envelope.data {
			Some(data) if envelope.ok => Ok(NonceToken::new(data.token)),
			_ => Err(ApiError::IssuanceFailed("issuance envelope missing token".to_owned())),
		}
	}

	/// Attach, consume, and dispatch a guarded write in one step.
	///
	/// Fails fast with [`ApiError::TokenMissing`] when no token is supplied
	/// and with [`ApiError::TokenConsumed`] when it already signed a write; in
	/// both cases nothing is sent. The token is consumed before the transport
	/// call so that no path, success or failure, can reuse it.
	pub async fn send_write(
		&self,
		token: Option<&mut NonceToken>,
		mut request: ApiRequest,
	) -> Result<RawResponse> {
		let token = token.ok_or(ApiError::TokenMissing)?;
		token.attach(&mut request)?;
		token.consume();
		self.transport.execute(request).await
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Mutex;

	use async_trait::async_trait;
	use pretty_assertions::assert_eq;
	use serde_json::{Value, json};

	use super::*;
	use crate::transport::Method;

	/// Answers scripted responses in order and records every request.
	struct Scripted {
		responses: Mutex<Vec<Result<RawResponse>>>,
		seen: Mutex<Vec<ApiRequest>>,
	}

	impl Scripted {
		fn new(responses: Vec<Result<RawResponse>>) -> Arc<Self> {
			Arc::new(Self {
				responses: Mutex::new(responses),
				seen: Mutex::new(Vec::new()),
			})
		}

		fn ok(body: Value) -> Result<RawResponse> {
			Ok(RawResponse { status: 200, body })
		}

		fn requests(&self) -> Vec<ApiRequest> {
			self.seen.lock().unwrap().clone()
		}
	}

	#[async_trait]
	impl Transport for Scripted {
		async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
			self.seen.lock().unwrap().push(request);
			self.responses.lock().unwrap().remove(0)
		}
	}

	#[tokio::test(flavor = "current_thread")]
	async fn issue_parses_the_token_envelope() {
		let transport = Scripted::new(vec![Scripted::ok(json!({
			"ok": true,
			"data": {"token": "n-1", "expiresIn": 300}
		}))]);
		let issuer = NonceIssuer::new(transport.clone(), "/v1/nonce");

		let token = issuer.issue().await.unwrap();
		assert_eq!(token.value(), "n-1");
		assert!(!token.is_consumed());

		let requests = transport.requests();
		assert_eq!(requests[0].method, Method::Post);
		assert_eq!(requests[0].path, "/v1/nonce");
		assert_eq!(requests[0].body, None);
	}

	#[tokio::test(flavor = "current_thread")]
	async fn issue_failures_fold_into_issuance_failed() {
		// Unreachable endpoint.
		let transport = Scripted::new(vec![Err(ApiError::Network("refused".into()))]);
		let issuer = NonceIssuer::new(transport, "/v1/nonce");
		assert!(matches!(issuer.issue().await, Err(ApiError::IssuanceFailed(_))));

		// Error status.
		let transport = Scripted::new(vec![Ok(RawResponse {
			status: 503,
			body: Value::Null,
		})]);
		let issuer = NonceIssuer::new(transport, "/v1/nonce");
		assert!(matches!(issuer.issue().await, Err(ApiError::IssuanceFailed(_))));

		// Envelope without a token.
		let transport = Scripted::new(vec![Scripted::ok(json!({"ok": true, "data": {}}))]);
		let issuer = NonceIssuer::new(transport, "/v1/nonce");
		assert!(matches!(issuer.issue().await, Err(ApiError::IssuanceFailed(_))));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn a_token_never_signs_two_writes() {
		let transport = Scripted::new(vec![
			Scripted::ok(json!({"ok": true, "data": {"token": "n-1"}})),
			Scripted::ok(json!({"ok": true, "data": {"id": 7}})),
		]);
		let issuer = NonceIssuer::new(transport.clone(), "/v1/nonce");

		let mut token = issuer.issue().await.unwrap();
		let write = ApiRequest::post("/v1/reviews").json_body(json!({"body": "great"}));
		issuer.send_write(Some(&mut token), write.clone()).await.unwrap();
		assert!(token.is_consumed());

		// Second attach must fail with "token already consumed".
		assert_eq!(
			issuer.send_write(Some(&mut token), write).await.unwrap_err(),
			ApiError::TokenConsumed
		);

		// Only the issuance and the first write reached the transport.
		let requests = transport.requests();
		assert_eq!(requests.len(), 2);
		assert_eq!(requests[1].header_value(NONCE_HEADER), Some("n-1"));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn a_write_without_a_token_is_never_sent() {
		let transport = Scripted::new(vec![]);
		let issuer = NonceIssuer::new(transport.clone(), "/v1/nonce");
		assert_eq!(
			issuer
				.send_write(None, ApiRequest::post("/v1/reviews"))
				.await
				.unwrap_err(),
			ApiError::TokenMissing
		);
		assert!(transport.requests().is_empty());
	}

	#[tokio::test(flavor = "current_thread")]
	async fn the_token_is_spent_even_when_the_write_fails() {
		let transport = Scripted::new(vec![
			Scripted::ok(json!({"ok": true, "data": {"token": "n-2"}})),
			Err(ApiError::Network("timed out".into())),
		]);
		let issuer = NonceIssuer::new(transport, "/v1/nonce");

		let mut token = issuer.issue().await.unwrap();
		let result = issuer
			.send_write(Some(&mut token), ApiRequest::post("/v1/stores"))
			.await;
		assert!(result.is_err());
		// Consumed at dispatch, not at response: a retry must re-issue.
		assert!(token.is_consumed());
	}
}
