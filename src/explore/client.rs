//! Access to the call graph HTTP service.
//!
//! The exploration engine only sees the [`Backend`] trait; [`HttpBackend`]
//! is the browser implementation over `fetch`.

use async_trait::async_trait;
use gloo_net::http::Request;
use log::debug;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::model::{FunctionList, Health, Node, SourceDocument, Subgraph};

/// The three queries the exploration flow depends on.
///
/// Implementations are pure functions of their arguments from the engine's
/// point of view; nothing is cached.
#[async_trait(?Send)]
pub trait Backend {
	/// Ranked, `limit`-bounded candidates for `query` (which may be empty).
	async fn search(&self, query: &str, limit: u32) -> Result<Vec<Node>, ApiError>;

	/// Breadth-first neighborhood of `id` over call edges.
	async fn neighborhood(&self, id: &str, depth: u32, limit: u32) -> Result<Subgraph, ApiError>;

	/// Text content of `file`.
	async fn source(&self, file: &str) -> Result<SourceDocument, ApiError>;
}

/// Request paths, relative to an optional base URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Endpoints {
	base: String,
}

impl Endpoints {
	/// `None` (or an empty base) yields same-origin relative paths.
	pub fn new(base: Option<&str>) -> Self {
		Self {
			base: base.map(|b| b.trim().trim_end_matches('/').to_string()).unwrap_or_default(),
		}
	}

	/// `GET /api/functions?q=..&limit=..`
	pub fn functions(&self, query: &str, limit: u32) -> String {
		format!(
			"{}/api/functions?q={}&limit={}",
			self.base,
			urlencoding::encode(query),
			limit
		)
	}

	/// `GET /api/function/<id>`
	pub fn function(&self, id: &str) -> String {
		format!("{}/api/function/{}", self.base, urlencoding::encode(id))
	}

	/// `GET /api/function/<id>/subgraph?depth=..&limit=..`
	pub fn subgraph(&self, id: &str, depth: u32, limit: u32) -> String {
		format!(
			"{}/subgraph?depth={}&limit={}",
			self.function(id),
			depth,
			limit
		)
	}

	/// `GET /api/source?file=..`
	pub fn source(&self, file: &str) -> String {
		format!("{}/api/source?file={}", self.base, urlencoding::encode(file))
	}

	/// `GET /api/health`
	pub fn health(&self) -> String {
		format!("{}/api/health", self.base)
	}
}

/// [`Backend`] over the browser `fetch` API.
#[derive(Clone, Debug, Default)]
pub struct HttpBackend {
	endpoints: Endpoints,
}

impl HttpBackend {
	/// Client for the service at `base`, or same-origin when `None`.
	pub fn new(base: Option<&str>) -> Self {
		Self {
			endpoints: Endpoints::new(base),
		}
	}

	/// Single node lookup.
	pub async fn function(&self, id: &str) -> Result<Node, ApiError> {
		self.get_json(&self.endpoints.function(id)).await
	}

	/// Service liveness.
	pub async fn health(&self) -> Result<Health, ApiError> {
		self.get_json(&self.endpoints.health()).await
	}

	async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
		debug!("GET {url}");
		let response = Request::get(url)
			.send()
			.await
			.map_err(|e| ApiError::request_failed(format!("Request to {url} failed: {e}")))?;

		if !response.ok() {
			let body = response.text().await.unwrap_or_default();
			return Err(ApiError::from_response(response.status(), &body));
		}

		response
			.json::<T>()
			.await
			.map_err(|e| ApiError::request_failed(format!("Invalid response from {url}: {e}")))
	}
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
	async fn search(&self, query: &str, limit: u32) -> Result<Vec<Node>, ApiError> {
		let list: FunctionList = self.get_json(&self.endpoints.functions(query, limit)).await?;
		Ok(list.results)
	}

	async fn neighborhood(&self, id: &str, depth: u32, limit: u32) -> Result<Subgraph, ApiError> {
		self.get_json(&self.endpoints.subgraph(id, depth, limit)).await
	}

	async fn source(&self, file: &str) -> Result<SourceDocument, ApiError> {
		let mut doc: SourceDocument = self.get_json(&self.endpoints.source(file)).await?;
		doc.file = file.to_string();
		Ok(doc)
	}
}
