mod common;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use callgraph_explorer::explore::source::source_lines;
use callgraph_explorer::explore::{
	ApiError, Edge, ExplorationState, NeighborhoodOutcome, Phase, SourceDocument, Subgraph,
	run_search, run_select,
};
use common::{Call, ScriptedBackend, located, neighborhood, node};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use pretty_assertions::assert_eq;

struct Harness {
	pool: LocalPool,
	backend: Rc<ScriptedBackend>,
	state: Rc<RefCell<ExplorationState>>,
	outcomes: Rc<RefCell<Vec<NeighborhoodOutcome>>>,
}

impl Harness {
	fn new() -> Self {
		Self {
			pool: LocalPool::new(),
			backend: Rc::new(ScriptedBackend::default()),
			state: Rc::new(RefCell::new(ExplorationState::default())),
			outcomes: Rc::default(),
		}
	}

	fn state(&self) -> Ref<'_, ExplorationState> {
		self.state.borrow()
	}

	fn type_and_search(&mut self, query: &str) {
		self.state.borrow_mut().set_query(query);
		let (backend, state) = (self.backend.clone(), self.state.clone());
		self.pool
			.spawner()
			.spawn_local(async move {
				run_search(&*backend, &*state).await;
			})
			.unwrap();
		self.settle();
	}

	fn select(&mut self, id: &str) {
		let (backend, state, outcomes) =
			(self.backend.clone(), self.state.clone(), self.outcomes.clone());
		let id = id.to_string();
		self.pool
			.spawner()
			.spawn_local(async move {
				let outcome = run_select(&*backend, &*state, id).await;
				outcomes.borrow_mut().push(outcome);
			})
			.unwrap();
		self.settle();
	}

	fn settle(&mut self) {
		self.pool.run_until_stalled();
	}

	fn selected_id(&self) -> Option<String> {
		self.state().selected().map(|n| n.id.clone())
	}

	fn root_id(&self) -> Option<String> {
		self.state().subgraph().map(|g| g.root.id.clone())
	}
}

fn doc(file: &str, content: &str) -> SourceDocument {
	SourceDocument {
		file: file.into(),
		content: content.into(),
	}
}

#[test]
fn late_search_response_for_old_query_is_ignored() {
	let mut h = Harness::new();
	h.type_and_search("foo");
	h.type_and_search("bar");

	h.backend.answer_search("bar", Ok(vec![node("bar_result")]));
	h.settle();
	h.backend.answer_search("foo", Ok(vec![node("foo_result")]));
	h.settle();

	let ids: Vec<_> = h.state().results().iter().map(|n| n.id.clone()).collect();
	assert_eq!(ids, vec!["bar_result"]);
	assert!(!h.state().searching());
}

#[test]
fn newer_selection_wins_in_either_resolution_order() {
	for b_first in [true, false] {
		let mut h = Harness::new();
		h.select("A");
		h.select("B");
		assert_eq!(h.backend.parked(), 2);

		let a = neighborhood(located("A", "a.go", 1), &["x"]);
		let b = neighborhood(located("B", "b.go", 2), &["y"]);
		if b_first {
			h.backend.answer_neighborhood("B", Ok(b));
			h.settle();
			h.backend.answer_neighborhood("A", Ok(a));
		} else {
			h.backend.answer_neighborhood("A", Ok(a));
			h.settle();
			h.backend.answer_neighborhood("B", Ok(b));
		}
		h.settle();

		assert_eq!(h.selected_id().as_deref(), Some("B"));
		assert_eq!(h.root_id().as_deref(), Some("B"));
		assert!(h.outcomes.borrow().contains(&NeighborhoodOutcome::Stale));

		// Only the winning selection chains a source fetch.
		let sources: Vec<_> = h
			.backend
			.calls()
			.into_iter()
			.filter(|c| matches!(c, Call::Source { .. }))
			.collect();
		assert_eq!(
			sources,
			vec![Call::Source {
				file: "b.go".into()
			}]
		);
	}
}

#[test]
fn stale_source_of_superseded_selection_is_dropped() {
	let mut h = Harness::new();
	h.select("A");
	h.backend
		.answer_neighborhood("A", Ok(neighborhood(located("A", "a.go", 3), &[])));
	h.settle();
	assert!(h.state().source_loading());

	h.select("B");
	h.backend.answer_source("a.go", Ok(doc("a.go", "package a")));
	h.settle();
	assert_eq!(h.state().source(), None);
	assert_eq!(h.selected_id().as_deref(), Some("A"));
	assert!(h.state().loading());
}

#[test]
fn failed_navigation_resumes_source_it_superseded() {
	let mut h = Harness::new();
	h.select("A");
	h.backend
		.answer_neighborhood("A", Ok(neighborhood(located("A", "a.go", 3), &[])));
	h.settle();

	h.select("B");
	h.backend.answer_source("a.go", Ok(doc("a.go", "package a")));
	h.settle();
	h.backend
		.answer_neighborhood("B", Err(ApiError::from_response(500, "")));
	h.settle();

	assert_eq!(h.selected_id().as_deref(), Some("A"));
	assert!(h.state().source_loading());
	assert!(h.state().busy());

	h.backend
		.answer_source("a.go", Ok(doc("a.go", "package a\n\nfunc A() {}")));
	h.settle();
	assert_eq!(
		h.outcomes.borrow().last(),
		Some(&NeighborhoodOutcome::Failed {
			source: Some("a.go".into())
		})
	);
	let s = h.state();
	assert_eq!(s.source().map(|d| d.file.as_str()), Some("a.go"));
	assert_eq!(s.highlight_line(), Some(3));
	assert_eq!(s.error(), Some("Request failed: 500"));
	assert!(!s.busy());
	assert_eq!(h.backend.parked(), 0);
}

#[test]
fn failed_navigation_keeps_previous_view() {
	let mut h = Harness::new();
	h.select("A");
	h.backend
		.answer_neighborhood("A", Ok(neighborhood(located("A", "a.go", 2), &["caller", "callee"])));
	h.settle();
	h.backend.answer_source("a.go", Ok(doc("a.go", "package a\nfunc A() {}")));
	h.settle();
	assert_eq!(h.state().phase(), Phase::Ready);

	h.select("B");
	assert_eq!(h.state().phase(), Phase::LoadingNeighborhood);
	h.backend
		.answer_neighborhood("B", Err(ApiError::from_response(404, r#"{"detail":"Function not found"}"#)));
	h.settle();

	let s = h.state();
	assert_eq!(s.subgraph().map(|g| g.root.id.as_str()), Some("A"));
	assert_eq!(s.selected().map(|n| n.id.as_str()), Some("A"));
	assert_eq!(s.source().map(|d| d.file.as_str()), Some("a.go"));
	assert_eq!(s.highlight_line(), Some(2));
	assert_eq!(s.error(), Some("Function not found"));
	assert_eq!(s.phase(), Phase::Error);
	assert!(!s.busy());
}

#[test]
fn failed_source_only_empties_source_panel() {
	let mut h = Harness::new();
	h.select("A");
	h.backend
		.answer_neighborhood("A", Ok(neighborhood(located("A", "gone.go", 2), &[])));
	h.settle();
	h.backend.answer_source("gone.go", Err(ApiError::from_response(404, "")));
	h.settle();

	let s = h.state();
	assert_eq!(s.selected().map(|n| n.id.as_str()), Some("A"));
	assert_eq!(s.source(), None);
	assert_eq!(s.source_error(), Some("Request failed: 404"));
	assert_eq!(s.error(), None);
	assert_eq!(s.scene().nodes.len(), 1);
}

#[test]
fn search_and_selection_complete_independently() {
	let mut h = Harness::new();
	h.type_and_search("Run");
	h.select("A");
	assert!(h.state().searching() && h.state().loading());

	h.backend
		.answer_neighborhood("A", Ok(neighborhood(node("A"), &[])));
	h.settle();
	assert!(h.state().searching());
	assert!(!h.state().loading());

	h.backend.answer_search("Run", Err(ApiError::request_failed("offline")));
	h.settle();
	assert_eq!(h.selected_id().as_deref(), Some("A"));
	assert_eq!(h.state().error(), Some("offline"));

	h.type_and_search("Run");
	h.backend.answer_search("Run", Ok(vec![node("Run")]));
	h.settle();
	assert_eq!(h.state().error(), None);
}

#[test]
fn search_error_keeps_previous_results() {
	let mut h = Harness::new();
	h.type_and_search("Gather");
	h.backend.answer_search("Gather", Ok(vec![node("f1"), node("f2")]));
	h.settle();

	h.type_and_search("Gatherx");
	h.backend
		.answer_search("Gatherx", Err(ApiError::from_response(500, "")));
	h.settle();
	assert_eq!(h.state().results().len(), 2);
	assert_eq!(h.state().error(), Some("Request failed: 500"));
}

#[test]
fn gather_scenario_end_to_end() {
	let mut h = Harness::new();
	h.state.borrow_mut().set_search_limit(40);
	h.type_and_search("Gather");
	assert_eq!(
		h.backend.calls()[0],
		Call::Search {
			query: "Gather".into(),
			limit: 40
		}
	);
	let mut gather = node("f1");
	gather.name = "Gather".into();
	let mut compare = node("f2");
	compare.name = "GatherAndCompare".into();
	h.backend.answer_search("Gather", Ok(vec![gather, compare]));
	h.settle();
	let names: Vec<_> = h.state().results().iter().map(|n| n.name.clone()).collect();
	assert_eq!(names, vec!["Gather", "GatherAndCompare"]);

	h.state.borrow_mut().set_depth(2);
	h.state.borrow_mut().set_limit(60);
	h.select("f1");
	assert_eq!(
		h.backend.calls()[1],
		Call::Neighborhood {
			id: "f1".into(),
			depth: 2,
			limit: 60
		}
	);

	let root = located("f1", "metric.go", 120);
	let mut nodes = vec![root.clone()];
	let mut edges = Vec::new();
	for i in 1..=11 {
		let id = format!("n{i}");
		nodes.push(node(&id));
		edges.push(Edge::new("f1", id));
	}
	for (s, t) in [("n1", "n2"), ("n2", "n3"), ("n3", "f1"), ("n4", "n5")] {
		edges.push(Edge::new(s, t));
	}
	assert_eq!((nodes.len(), edges.len()), (12, 15));
	h.backend.answer_neighborhood(
		"f1",
		Ok(Subgraph {
			root,
			nodes,
			edges,
		}),
	);
	h.settle();
	assert_eq!(
		h.backend.calls()[2],
		Call::Source {
			file: "metric.go".into()
		}
	);

	let content: String = (1..=150).map(|i| format!("// line {i}\n")).collect();
	h.backend.answer_source("metric.go", Ok(doc("metric.go", &content)));
	h.settle();

	let s = h.state();
	assert_eq!(s.selected().map(|n| n.id.as_str()), Some("f1"));
	assert_eq!(s.scene().nodes.len(), 12);
	assert_eq!(s.scene().edges.len(), 15);

	let document = s.source().expect("source loaded");
	let lines = source_lines(&document.content, s.highlight_line());
	let marked: Vec<_> = lines.iter().filter(|l| l.highlighted).collect();
	assert_eq!(marked.len(), 1);
	assert_eq!(marked[0].number, 120);
	assert_eq!(marked[0].text, "// line 120");
	assert!(!s.busy());
}
