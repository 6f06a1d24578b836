//! Scripted in-memory backend: every call parks until the test answers it,
//! so tests choose the order in which responses arrive.

#![allow(dead_code)]

use std::cell::RefCell;

use async_trait::async_trait;
use callgraph_explorer::explore::{ApiError, Backend, Edge, Node, SourceDocument, Subgraph};
use futures::channel::oneshot;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
	Search { query: String, limit: u32 },
	Neighborhood { id: String, depth: u32, limit: u32 },
	Source { file: String },
}

enum Reply {
	Search(oneshot::Sender<Result<Vec<Node>, ApiError>>),
	Neighborhood(oneshot::Sender<Result<Subgraph, ApiError>>),
	Source(oneshot::Sender<Result<SourceDocument, ApiError>>),
}

#[derive(Default)]
pub struct ScriptedBackend {
	calls: RefCell<Vec<Call>>,
	parked: RefCell<Vec<(Call, Reply)>>,
}

impl ScriptedBackend {
	pub fn calls(&self) -> Vec<Call> {
		self.calls.borrow().clone()
	}

	fn take(&self, matches: impl Fn(&Call) -> bool) -> Reply {
		let mut parked = self.parked.borrow_mut();
		let pos = parked
			.iter()
			.position(|(call, _)| matches(call))
			.expect("no parked call matches");
		parked.remove(pos).1
	}

	pub fn answer_search(&self, query: &str, outcome: Result<Vec<Node>, ApiError>) {
		match self.take(|c| matches!(c, Call::Search { query: q, .. } if q == query)) {
			Reply::Search(tx) => tx.send(outcome).expect("search caller gone"),
			_ => unreachable!(),
		}
	}

	pub fn answer_neighborhood(&self, id: &str, outcome: Result<Subgraph, ApiError>) {
		match self.take(|c| matches!(c, Call::Neighborhood { id: i, .. } if i == id)) {
			Reply::Neighborhood(tx) => tx.send(outcome).expect("neighborhood caller gone"),
			_ => unreachable!(),
		}
	}

	pub fn answer_source(&self, file: &str, outcome: Result<SourceDocument, ApiError>) {
		match self.take(|c| matches!(c, Call::Source { file: f } if f == file)) {
			Reply::Source(tx) => tx.send(outcome).expect("source caller gone"),
			_ => unreachable!(),
		}
	}

	pub fn parked(&self) -> usize {
		self.parked.borrow().len()
	}

	fn park(&self, call: Call, reply: Reply) {
		self.calls.borrow_mut().push(call.clone());
		self.parked.borrow_mut().push((call, reply));
	}
}

fn dropped() -> ApiError {
	ApiError::request_failed("test dropped the request")
}

#[async_trait(?Send)]
impl Backend for ScriptedBackend {
	async fn search(&self, query: &str, limit: u32) -> Result<Vec<Node>, ApiError> {
		let (tx, rx) = oneshot::channel();
		self.park(
			Call::Search {
				query: query.into(),
				limit,
			},
			Reply::Search(tx),
		);
		rx.await.unwrap_or_else(|_| Err(dropped()))
	}

	async fn neighborhood(&self, id: &str, depth: u32, limit: u32) -> Result<Subgraph, ApiError> {
		let (tx, rx) = oneshot::channel();
		self.park(
			Call::Neighborhood {
				id: id.into(),
				depth,
				limit,
			},
			Reply::Neighborhood(tx),
		);
		rx.await.unwrap_or_else(|_| Err(dropped()))
	}

	async fn source(&self, file: &str) -> Result<SourceDocument, ApiError> {
		let (tx, rx) = oneshot::channel();
		self.park(Call::Source { file: file.into() }, Reply::Source(tx));
		rx.await.unwrap_or_else(|_| Err(dropped()))
	}
}

pub fn node(id: &str) -> Node {
	Node {
		id: id.into(),
		name: id.into(),
		..Default::default()
	}
}

pub fn located(id: &str, file: &str, line: u32) -> Node {
	Node {
		file: Some(file.into()),
		line: Some(line),
		..node(id)
	}
}

/// Neighborhood with `root` plus `extra` nodes, the first of which calls
/// root while the rest are called by it.
pub fn neighborhood(root: Node, extra: &[&str]) -> Subgraph {
	let mut nodes = vec![root.clone()];
	let mut edges = Vec::new();
	for (i, id) in extra.iter().enumerate() {
		nodes.push(node(id));
		if i == 0 {
			edges.push(Edge::new(*id, root.id.clone()));
		} else {
			edges.push(Edge::new(root.id.clone(), *id));
		}
	}
	Subgraph { root, nodes, edges }
}
