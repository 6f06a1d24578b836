//! Failures surfaced by the exploration engine.

use thiserror::Error;

/// Failure of a backend request. Always recoverable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
	/// Transport failure, non-success status, or an unusable body.
	#[error("{message}")]
	RequestFailed {
		/// HTTP status, when a response was received.
		status: Option<u16>,
		/// Human readable message.
		message: String,
	},
}

impl ApiError {
	/// Failure without an HTTP status (network error, undecodable body).
	pub fn request_failed(message: impl Into<String>) -> Self {
		Self::RequestFailed {
			status: None,
			message: message.into(),
		}
	}

	/// Failure built from a non-success response.
	pub fn from_response(status: u16, body: &str) -> Self {
		Self::RequestFailed {
			status: Some(status),
			message: response_message(status, body),
		}
	}

	/// HTTP status of the failed response, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::RequestFailed { status, .. } => *status,
		}
	}
}

/// Neighborhood contract breach detected on the client.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubgraphError {
	/// An edge endpoint is not among the returned nodes.
	#[error(
		"edge {from} -> {to} references unknown node {missing} ({dangling} of the edges leave the returned nodes)"
	)]
	DanglingEdge {
		/// Edge caller.
		from: String,
		/// Edge callee.
		to: String,
		/// The endpoint that is absent.
		missing: String,
		/// Number of edges with an absent endpoint. A node cap applied before
		/// edge collection leaves many of them.
		dangling: usize,
	},
	/// The root is not among the returned nodes.
	#[error("root {0} is not among the subgraph nodes")]
	MissingRoot(String),
	/// The same node id was returned twice.
	#[error("node {0} appears more than once")]
	DuplicateNode(String),
}

impl From<SubgraphError> for ApiError {
	fn from(err: SubgraphError) -> Self {
		Self::request_failed(format!("Malformed subgraph: {err}"))
	}
}

/// Message for a non-success response: the `detail` string of a JSON error
/// body, else the non-empty body itself, else a generic status message.
pub fn response_message(status: u16, body: &str) -> String {
	let body = body.trim();
	if body.is_empty() {
		return format!("Request failed: {status}");
	}
	if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
		if let Some(serde_json::Value::String(detail)) = map.get("detail") {
			return detail.clone();
		}
	}
	body.to_string()
}
