//! Records exchanged with the call graph backend.
//!
//! Everything except an identifier is display metadata and may be missing:
//! a declaration without a known source position still forms a valid node.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::SubgraphError;

/// A function (or other declaration) in the call graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	/// Opaque unique identifier.
	#[serde(deserialize_with = "opaque_id")]
	pub id: String,
	/// Display name.
	#[serde(default, deserialize_with = "nullable_string")]
	pub name: String,
	/// Node kind as stored by the graph pipeline (e.g. `function`).
	#[serde(default)]
	pub kind: Option<String>,
	/// Package the declaration belongs to.
	#[serde(default)]
	pub package: Option<String>,
	/// Source file, when known.
	#[serde(default)]
	pub file: Option<String>,
	/// 1-indexed line of the declaration within `file`.
	#[serde(default)]
	pub line: Option<u32>,
}

impl Node {
	/// Human readable label, falling back to the identifier for unnamed nodes.
	pub fn label(&self) -> &str {
		if self.name.is_empty() {
			&self.id
		} else {
			&self.name
		}
	}

	/// `file:line`, `file`, or nothing.
	pub fn location(&self) -> Option<String> {
		match (&self.file, self.line) {
			(Some(file), Some(line)) => Some(format!("{file}:{line}")),
			(Some(file), None) => Some(file.clone()),
			_ => None,
		}
	}
}

/// A directed call edge. Parallel edges are meaningful and kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
	/// Caller.
	#[serde(deserialize_with = "opaque_id")]
	pub source: String,
	/// Callee.
	#[serde(deserialize_with = "opaque_id")]
	pub target: String,
}

impl Edge {
	/// Edge from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// A bounded neighborhood around `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgraph {
	/// The node the neighborhood was requested for.
	pub root: Node,
	/// Discovered nodes, `root` included.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// Call edges between discovered nodes.
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl Subgraph {
	/// Check the neighborhood contract: unique node ids, root present, and
	/// both endpoints of every edge present.
	pub fn validate(&self) -> Result<(), SubgraphError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(SubgraphError::DuplicateNode(node.id.clone()));
			}
		}
		if !ids.contains(self.root.id.as_str()) {
			return Err(SubgraphError::MissingRoot(self.root.id.clone()));
		}
		let missing = |edge: &Edge| {
			[&edge.source, &edge.target]
				.into_iter()
				.find(|endpoint| !ids.contains(endpoint.as_str()))
				.cloned()
		};
		let Some((edge, absent)) = self
			.edges
			.iter()
			.find_map(|edge| missing(edge).map(|absent| (edge, absent)))
		else {
			return Ok(());
		};
		Err(SubgraphError::DanglingEdge {
			from: edge.source.clone(),
			to: edge.target.clone(),
			missing: absent,
			dangling: self.edges.iter().filter(|e| missing(*e).is_some()).count(),
		})
	}

	/// Look a node up by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

/// Text of a source file, keyed by the file it was requested for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
	/// File identifier used in the request.
	#[serde(default)]
	pub file: String,
	/// Raw newline-delimited text.
	pub content: String,
}

/// Body of `GET /api/functions`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FunctionList {
	/// Ranked matches, backend order.
	#[serde(default)]
	pub results: Vec<Node>,
}

/// Body of `GET /api/health`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Health {
	/// `"ok"` when the service is up.
	pub status: String,
}

/// Identifiers are opaque; accept both JSON strings and integers.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Text(String),
		Int(i64),
	}

	Ok(match Raw::deserialize(deserializer)? {
		Raw::Text(s) => s,
		Raw::Int(i) => i.to_string(),
	})
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
