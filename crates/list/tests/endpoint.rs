//! `EndpointSource` wiring: query construction and envelope normalization.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cursory_client::{ApiRequest, Method, RawResponse, Transport};
use cursory_envelope::{ApiError, Result};
use cursory_list::{EndpointSource, ListController, Phase};
use pretty_assertions::assert_eq;
use serde_json::json;

struct ScriptedTransport {
	responses: Mutex<VecDeque<Result<RawResponse>>>,
	seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
	fn new(responses: Vec<Result<RawResponse>>) -> Arc<Self> {
		Arc::new(Self {
			responses: Mutex::new(responses.into()),
			seen: Mutex::new(Vec::new()),
		})
	}

	fn requests(&self) -> Vec<ApiRequest> {
		self.seen.lock().unwrap().clone()
	}
}

#[async_trait]
impl Transport for ScriptedTransport {
	async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
		self.seen.lock().unwrap().push(request);
		self.responses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or(Err(ApiError::Network("script exhausted".to_owned())))
	}
}

fn ok(body: serde_json::Value) -> Result<RawResponse> {
	Ok(RawResponse { status: 200, body })
}

#[tokio::test(flavor = "current_thread")]
async fn endpoint_source_drives_a_list_end_to_end() {
	let transport = ScriptedTransport::new(vec![
		ok(json!({
			"ok": true,
			"data": {
				"contents": [{"id": 1}, {"id": 2}],
				"cursor": {"hasMore": true, "nextCursor": "X", "totalCount": 3}
			}
		})),
		ok(json!({
			"ok": true,
			"data": {
				"contents": [{"id": 3}],
				"cursor": {"hasMore": false, "nextCursor": null}
			}
		})),
	]);

	let source = EndpointSource::new(transport.clone(), "/v1/reviews").filter("storeId", "s-9");
	let mut controller: ListController<serde_json::Value, _> = ListController::new(source, 20);

	controller.load_initial().await.unwrap();
	controller.load_more().await.unwrap();

	assert_eq!(
		controller.items(),
		[json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
	);
	assert!(!controller.state().has_more);

	let requests = transport.requests();
	assert_eq!(requests.len(), 2);
	assert_eq!(requests[0].method, Method::Get);
	assert_eq!(requests[0].path, "/v1/reviews");
	assert_eq!(
		requests[0].query,
		vec![
			("size".to_owned(), "20".to_owned()),
			("storeId".to_owned(), "s-9".to_owned()),
		]
	);
	// The cursor is forwarded verbatim on the continuation.
	assert_eq!(
		requests[1].query,
		vec![
			("size".to_owned(), "20".to_owned()),
			("cursor".to_owned(), "X".to_owned()),
			("storeId".to_owned(), "s-9".to_owned()),
		]
	);
}

#[tokio::test(flavor = "current_thread")]
async fn malformed_envelope_terminates_the_list_quietly() {
	let transport = ScriptedTransport::new(vec![ok(json!({"unexpected": "shape"}))]);
	let source = EndpointSource::new(transport, "/v1/users");
	let mut controller: ListController<serde_json::Value, _> = ListController::new(source, 20);

	// Malformed pages never surface as errors; the list is simply empty and
	// terminal.
	controller.load_initial().await.unwrap();
	assert!(controller.items().is_empty());
	assert!(!controller.state().has_more);
	assert_eq!(controller.state().phase, Phase::Loaded);
}

#[tokio::test(flavor = "current_thread")]
async fn http_failure_surfaces_classified() {
	let transport = ScriptedTransport::new(vec![Ok(RawResponse {
		status: 403,
		body: json!({"ok": false, "message": "forbidden"}),
	})]);
	let source = EndpointSource::new(transport, "/v1/ads");
	let mut controller: ListController<serde_json::Value, _> = ListController::new(source, 20);

	let error = controller.load_initial().await.unwrap_err();
	assert_eq!(
		error,
		ApiError::Client {
			status: 403,
			message: Some("forbidden".to_owned()),
		}
	);
	assert_eq!(controller.state().phase, Phase::Error);
}

#[tokio::test(flavor = "current_thread")]
async fn flat_single_page_envelope_is_terminal() {
	let transport = ScriptedTransport::new(vec![ok(json!({"contents": ["only"]}))]);
	let source = EndpointSource::new(transport, "/v1/banners");
	let mut controller: ListController<String, _> = ListController::new(source, 20);

	controller.load_initial().await.unwrap();
	assert_eq!(controller.items(), ["only"]);
	assert!(!controller.state().has_more);
	assert_eq!(controller.state().cursor, None);
}
