use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale;
use crate::explore::scene::{Role, Scene};

/// World-space slack around a node's radius that still counts as a hit.
pub const HIT_SLOP: f64 = 4.0;
/// Screen-space pointer travel that turns a press on a node into a drag.
pub const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: &'static str,
	pub radius: f64,
	pub selected: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Layout and interaction state behind the canvas.
///
/// Physics is delegated to `force_graph`; this only maps scene nodes into
/// it and pointer input out of it.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(scene: &Scene, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: None,
			width,
			height,
			animation_running: true,
		};
		state.load(scene);
		state
	}

	/// Replace the drawn graph with `scene`.
	///
	/// Nodes already on screen keep their position; new ones start on a
	/// ring around the origin. The selected node is pinned at the origin.
	pub fn load(&mut self, scene: &Scene) {
		let mut previous = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});

		let mut graph = simulation();
		let mut id_to_idx = HashMap::new();
		let count = scene.nodes.len().max(1) as f64;

		for (i, node) in scene.nodes.iter().enumerate() {
			let selected = node.role == Role::Selected;
			let (x, y) = if selected {
				(0.0, 0.0)
			} else if let Some(&pos) = previous.get(&node.id) {
				pos
			} else {
				let angle = (i as f64) * 2.0 * PI / count;
				((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32)
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: selected,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color,
					radius: node.radius,
					selected,
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for edge in &scene.edges {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(edge.source.as_str()),
				id_to_idx.get(edge.target.as_str()),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		self.graph = graph;
		self.hover = None;
		self.drag = DragState::default();
		self.animation_running = true;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover = node;
	}

	/// Pointer pressed: grab the node under it, or start panning.
	pub fn press(&mut self, x: f64, y: f64) {
		if let Some(idx) = self.node_at_position(x, y) {
			self.drag = DragState {
				active: true,
				moved: false,
				node_idx: Some(idx),
				start_x: x,
				start_y: y,
				..DragState::default()
			};
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					self.drag.node_start_x = node.x();
					self.drag.node_start_y = node.y();
				}
			});
		} else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer moved: drag, pan, or update the hover target.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
		}

		if self.drag.active {
			let (sdx, sdy) = (x - self.drag.start_x, y - self.drag.start_y);
			if !self.drag.moved && (sdx * sdx + sdy * sdy).sqrt() < CLICK_SLOP {
				return;
			}
			self.drag.moved = true;
			if let Some(idx) = self.drag.node_idx {
				let (dx, dy) = (sdx / self.transform.k, sdy / self.transform.k);
				let (nx, ny) = (
					self.drag.node_start_x + dx as f32,
					self.drag.node_start_y + dy as f32,
				);
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
						node.data.is_anchor = true;
					}
				});
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	/// Pointer released. Returns the clicked node id when the press never
	/// turned into a drag. A dragged node stays pinned where it was dropped.
	pub fn release(&mut self) -> Option<String> {
		let clicked = if self.drag.active && !self.drag.moved {
			self.drag.node_idx.and_then(|idx| self.node_id(idx))
		} else {
			None
		};
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	/// CSS cursor for the current pointer interaction.
	pub fn cursor(&self) -> &'static str {
		if self.drag.moved || self.pan.active {
			"grabbing"
		} else if self.hover.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// Pointer left the canvas.
	pub fn leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Zoom around a screen position.
	pub fn zoom_at(&mut self, x: f64, y: f64, delta_y: f64) {
		let new_k = scale::zoomed(self.transform.k, delta_y);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
