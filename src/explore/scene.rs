//! Visual encoding of a neighborhood relative to the selection.
//!
//! A [`Scene`] says what is drawn, never where: positions come from the
//! layout engine that consumes it.

use std::collections::HashSet;

use super::error::SubgraphError;
use super::model::{Node, Subgraph};

/// Stroke for every edge. Edges are never colored by role.
pub const EDGE_COLOR: &str = "rgba(150, 170, 200, 0.45)";

/// Base node radius in world units.
pub const NODE_RADIUS: f64 = 5.0;

/// A node's relation to the selected node, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
	/// The selected node itself.
	Selected,
	/// Calls the selected node.
	Caller,
	/// Called by the selected node.
	Callee,
	/// Anything else.
	Default,
}

impl Role {
	/// Fill color.
	pub fn color(self) -> &'static str {
		match self {
			Role::Selected => "#ffb000",
			Role::Caller => "#4cc38a",
			Role::Callee => "#e5484d",
			Role::Default => "#6e8bbf",
		}
	}

	/// Radius in world units; the selection is drawn larger.
	pub fn radius(self) -> f64 {
		match self {
			Role::Selected => NODE_RADIUS * 1.8,
			Role::Caller | Role::Callee => NODE_RADIUS * 1.2,
			Role::Default => NODE_RADIUS,
		}
	}
}

/// A node ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	/// Node id; clicks report it back.
	pub id: String,
	/// Text shown next to the node when labels are visible.
	pub label: String,
	/// Relation to the selection.
	pub role: Role,
	/// Fill color.
	pub color: &'static str,
	/// Radius in world units.
	pub radius: f64,
}

/// A directed edge ready to draw, arrowhead at `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneEdge {
	/// Caller id.
	pub source: String,
	/// Callee id.
	pub target: String,
}

/// Everything the graph view draws for one state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	/// Nodes in neighborhood order.
	pub nodes: Vec<SceneNode>,
	/// Edges in neighborhood order, parallel edges kept.
	pub edges: Vec<SceneEdge>,
}

impl Scene {
	/// Project `subgraph` with `selected` highlighted.
	///
	/// A subgraph that breaks the neighborhood contract is rejected rather
	/// than drawn with dangling edges.
	pub fn build(subgraph: &Subgraph, selected: Option<&Node>) -> Result<Self, SubgraphError> {
		subgraph.validate()?;

		let selected = selected.map(|n| n.id.as_str());
		let (mut callers, mut callees) = (HashSet::new(), HashSet::new());
		if let Some(sel) = selected {
			for edge in &subgraph.edges {
				if edge.target == sel {
					callers.insert(edge.source.as_str());
				}
				if edge.source == sel {
					callees.insert(edge.target.as_str());
				}
			}
		}

		let nodes = subgraph
			.nodes
			.iter()
			.map(|node| {
				let id = node.id.as_str();
				let role = if Some(id) == selected {
					Role::Selected
				} else if callers.contains(id) {
					Role::Caller
				} else if callees.contains(id) {
					Role::Callee
				} else {
					Role::Default
				};
				SceneNode {
					id: node.id.clone(),
					label: node.label().to_string(),
					role,
					color: role.color(),
					radius: role.radius(),
				}
			})
			.collect();

		let edges = subgraph
			.edges
			.iter()
			.map(|e| SceneEdge {
				source: e.source.clone(),
				target: e.target.clone(),
			})
			.collect();

		Ok(Self { nodes, edges })
	}

	/// Role of `id`, if it is in the scene.
	pub fn role(&self, id: &str) -> Option<Role> {
		self.nodes.iter().find(|n| n.id == id).map(|n| n.role)
	}
}
