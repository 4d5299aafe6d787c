//! Page sources: where a list's pages come from.

use std::sync::Arc;

use async_trait::async_trait;
use cursory_client::{ApiRequest, Transport};
use cursory_envelope::{Cursor, Page, Result, normalize};
use serde::de::DeserializeOwned;

/// Async source of pages for one list.
///
/// The controller is generic over this seam; production code uses
/// [`EndpointSource`], tests script their own.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
	/// Fetch one page. `cursor` is absent on the first page of a cycle and
	/// forwarded verbatim afterwards.
	async fn fetch(&self, cursor: Option<&Cursor>, size: u32) -> Result<Page<T>>;
}

#[async_trait]
impl<T, S: PageSource<T> + ?Sized> PageSource<T> for Arc<S> {
	async fn fetch(&self, cursor: Option<&Cursor>, size: u32) -> Result<Page<T>> {
		(**self).fetch(cursor, size).await
	}
}

/// [`PageSource`] over a REST list endpoint.
///
/// Issues `GET <path>?cursor=..&size=..` plus any fixed endpoint filters over
/// a [`Transport`] and pipes the body through the pagination normalizer, so a
/// malformed envelope terminates the list instead of erroring.
pub struct EndpointSource {
	transport: Arc<dyn Transport>,
	path: String,
	filters: Vec<(String, String)>,
}

impl EndpointSource {
	/// Create a source for the given list endpoint path.
	#[must_use]
	pub fn new(transport: Arc<dyn Transport>, path: impl Into<String>) -> Self {
		Self {
			transport,
			path: path.into(),
			filters: Vec::new(),
		}
	}

	/// Add a fixed query filter applied to every page request.
	#[must_use]
	pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.filters.push((key.into(), value.into()));
		self
	}
}

#[async_trait]
impl<T: DeserializeOwned + Send> PageSource<T> for EndpointSource {
	async fn fetch(&self, cursor: Option<&Cursor>, size: u32) -> Result<Page<T>> {
		let mut request = ApiRequest::get(self.path.clone()).query("size", size.to_string());
		if let Some(cursor) = cursor {
			request = request.query("cursor", cursor.as_str());
		}
		for (key, value) in &self.filters {
			request = request.query(key.clone(), value.clone());
		}
		let body = self.transport.execute(request).await?.into_body()?;
		Ok(normalize(body))
	}
}
