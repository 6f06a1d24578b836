//! The exploration session state machine.
//!
//! All mutation goes through `begin_*`/`finish_*` pairs. A `begin_*` call
//! hands out a ticket carrying a sequence number for its request class
//! (search or selection); a `finish_*` call applies its result only when
//! the ticket is still the latest of its class. Late responses of
//! superseded requests are dropped without touching the state.

use std::ops::RangeInclusive;

use log::{debug, info, warn};

use super::error::ApiError;
use super::model::{Node, SourceDocument, Subgraph};
use super::scene::Scene;
use crate::config::{DEPTH_RANGE, ExplorerConfig, LIMIT_RANGE, SEARCH_LIMIT_RANGE};

/// An issued search request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
	/// Position in the search request sequence.
	pub seq: u64,
	/// Query text sent to the backend.
	pub query: String,
	/// Result cap sent to the backend.
	pub limit: u32,
}

/// An issued neighborhood request (and its chained source fetch).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectTicket {
	/// Position in the selection request sequence.
	pub seq: u64,
	/// Requested root node.
	pub id: String,
	/// Traversal depth used for this request.
	pub depth: u32,
	/// Node cap used for this request.
	pub limit: u32,
}

/// What became of a neighborhood response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NeighborhoodOutcome {
	/// A newer selection superseded this one; nothing changed.
	Stale,
	/// The fetch failed; the previous neighborhood is kept. Carries the file
	/// of the kept selection when its source fetch was cut short by this
	/// request and must be issued again.
	Failed {
		/// Source file of the kept selection.
		source: Option<String>,
	},
	/// The neighborhood was applied. Carries the file whose source must be
	/// fetched next, if the root has one.
	Loaded {
		/// Source file of the new root.
		source: Option<String>,
	},
}

impl NeighborhoodOutcome {
	/// File whose source the same selection ticket fetches next.
	pub fn source_file(&self) -> Option<&str> {
		match self {
			Self::Failed { source } | Self::Loaded { source } => source.as_deref(),
			Self::Stale => None,
		}
	}
}

/// Conceptual phase, derived from the flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Nothing loaded and nothing in flight.
	Idle,
	/// A search is in flight.
	Searching,
	/// A neighborhood fetch is in flight.
	LoadingNeighborhood,
	/// A neighborhood and selection are present.
	Ready,
	/// The last operation failed.
	Error,
}

/// Mutable record of one exploration session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorationState {
	query: String,
	results: Vec<Node>,
	selected: Option<Node>,
	subgraph: Option<Subgraph>,
	source: Option<SourceDocument>,
	depth: u32,
	limit: u32,
	search_limit: u32,
	searching: bool,
	loading: bool,
	source_loading: bool,
	error: Option<String>,
	source_error: Option<String>,
	search_seq: u64,
	select_seq: u64,
}

impl Default for ExplorationState {
	fn default() -> Self {
		Self::new(&ExplorerConfig::default())
	}
}

impl ExplorationState {
	/// Empty session using the configured parameters.
	pub fn new(config: &ExplorerConfig) -> Self {
		Self {
			query: String::new(),
			results: Vec::new(),
			selected: None,
			subgraph: None,
			source: None,
			depth: clamp_to(config.depth, &DEPTH_RANGE),
			limit: clamp_to(config.limit, &LIMIT_RANGE),
			search_limit: clamp_to(config.search_limit, &SEARCH_LIMIT_RANGE),
			searching: false,
			loading: false,
			source_loading: false,
			error: None,
			source_error: None,
			search_seq: 0,
			select_seq: 0,
		}
	}

	/// Current query text.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Latest applied search results, backend order.
	pub fn results(&self) -> &[Node] {
		&self.results
	}

	/// Selected node (always the root of the loaded neighborhood).
	pub fn selected(&self) -> Option<&Node> {
		self.selected.as_ref()
	}

	/// Loaded neighborhood.
	pub fn subgraph(&self) -> Option<&Subgraph> {
		self.subgraph.as_ref()
	}

	/// Source of the selected node's file.
	pub fn source(&self) -> Option<&SourceDocument> {
		self.source.as_ref()
	}

	/// Traversal depth for the next selection.
	pub fn depth(&self) -> u32 {
		self.depth
	}

	/// Node cap for the next selection.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Result cap for searches.
	pub fn search_limit(&self) -> u32 {
		self.search_limit
	}

	/// A neighborhood fetch is in flight.
	pub fn loading(&self) -> bool {
		self.loading
	}

	/// A search is in flight.
	pub fn searching(&self) -> bool {
		self.searching
	}

	/// The chained source fetch is in flight.
	pub fn source_loading(&self) -> bool {
		self.source_loading
	}

	/// Any fetch is in flight.
	pub fn busy(&self) -> bool {
		self.searching || self.loading || self.source_loading
	}

	/// Message of the last failed operation, until the next success.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// Message of a failed source fetch for the current selection.
	pub fn source_error(&self) -> Option<&str> {
		self.source_error.as_deref()
	}

	/// Conceptual phase.
	pub fn phase(&self) -> Phase {
		if self.loading {
			Phase::LoadingNeighborhood
		} else if self.searching {
			Phase::Searching
		} else if self.error.is_some() {
			Phase::Error
		} else if self.subgraph.is_some() {
			Phase::Ready
		} else {
			Phase::Idle
		}
	}

	/// Line of the selected node, if the loaded source is its file.
	pub fn highlight_line(&self) -> Option<u32> {
		let selected = self.selected.as_ref()?;
		let source = self.source.as_ref()?;
		if selected.file.as_deref() == Some(source.file.as_str()) {
			selected.line
		} else {
			None
		}
	}

	/// Drawable projection of the neighborhood and selection.
	pub fn scene(&self) -> Scene {
		match &self.subgraph {
			Some(subgraph) => match Scene::build(subgraph, self.selected.as_ref()) {
				Ok(scene) => scene,
				Err(e) => {
					warn!("Refusing to draw subgraph: {e}");
					Scene::default()
				}
			},
			None => Scene::default(),
		}
	}

	/// Update the query. Any search issued before this point is superseded.
	pub fn set_query(&mut self, query: impl Into<String>) {
		self.query = query.into();
		self.search_seq += 1;
	}

	/// Traversal depth for subsequent selections, clamped to the accepted range.
	pub fn set_depth(&mut self, depth: u32) {
		self.depth = clamp_to(depth, &DEPTH_RANGE);
	}

	/// Node cap for subsequent selections, clamped to the accepted range.
	pub fn set_limit(&mut self, limit: u32) {
		self.limit = clamp_to(limit, &LIMIT_RANGE);
	}

	/// Search result cap, clamped to the accepted range.
	pub fn set_search_limit(&mut self, limit: u32) {
		self.search_limit = clamp_to(limit, &SEARCH_LIMIT_RANGE);
	}

	/// Issue a search for the current query.
	pub fn begin_search(&mut self) -> SearchTicket {
		self.search_seq += 1;
		self.searching = true;
		SearchTicket {
			seq: self.search_seq,
			query: self.query.clone(),
			limit: self.search_limit,
		}
	}

	/// Apply a search response. Returns whether it was applied.
	///
	/// Results are left in place on failure.
	pub fn finish_search(
		&mut self,
		ticket: &SearchTicket,
		outcome: Result<Vec<Node>, ApiError>,
	) -> bool {
		if ticket.seq != self.search_seq {
			debug!("Discarding stale search response for {:?}", ticket.query);
			return false;
		}
		self.searching = false;
		match outcome {
			Ok(results) => {
				debug!("Search {:?} returned {} results", ticket.query, results.len());
				self.results = results;
				self.error = None;
			}
			Err(e) => {
				warn!("Search {:?} failed: {e}", ticket.query);
				self.error = Some(e.to_string());
			}
		}
		true
	}

	/// Issue a neighborhood request for `id` with the current parameters.
	///
	/// Re-selecting the current node is allowed and fetches again.
	pub fn begin_select(&mut self, id: impl Into<String>) -> SelectTicket {
		self.select_seq += 1;
		self.loading = true;
		// Any chained source fetch belongs to an older ticket now.
		self.source_loading = false;
		self.error = None;
		SelectTicket {
			seq: self.select_seq,
			id: id.into(),
			depth: self.depth,
			limit: self.limit,
		}
	}

	/// Apply a neighborhood response.
	///
	/// On success the neighborhood and selection are replaced together. The
	/// loaded source survives only if it belongs to the new root's file.
	pub fn finish_neighborhood(
		&mut self,
		ticket: &SelectTicket,
		outcome: Result<Subgraph, ApiError>,
	) -> NeighborhoodOutcome {
		if ticket.seq != self.select_seq {
			debug!("Discarding stale neighborhood of {}", ticket.id);
			return NeighborhoodOutcome::Stale;
		}
		self.loading = false;

		let subgraph = match outcome.and_then(|s| s.validate().map(|_| s).map_err(ApiError::from)) {
			Ok(subgraph) => subgraph,
			Err(e) => {
				warn!("Neighborhood of {} failed: {e}", ticket.id);
				self.error = Some(e.to_string());
				let resume = self.interrupted_source();
				self.source_loading = resume.is_some();
				return NeighborhoodOutcome::Failed { source: resume };
			}
		};

		info!(
			"Loaded neighborhood of {}: {} nodes, {} edges",
			subgraph.root.id,
			subgraph.nodes.len(),
			subgraph.edges.len()
		);
		let root = subgraph.root.clone();
		let file = root.file.clone().filter(|f| !f.is_empty());
		let same_file = matches!((&self.source, &file), (Some(doc), Some(f)) if &doc.file == f);
		if !same_file {
			self.source = None;
		}
		self.source_error = None;
		self.source_loading = file.is_some();
		self.selected = Some(root);
		self.subgraph = Some(subgraph);
		self.error = None;
		NeighborhoodOutcome::Loaded { source: file }
	}

	/// File of the kept selection if its source never arrived and never failed.
	fn interrupted_source(&self) -> Option<String> {
		if self.source.is_some() || self.source_error.is_some() {
			return None;
		}
		self.selected
			.as_ref()
			.and_then(|n| n.file.clone())
			.filter(|f| !f.is_empty())
	}

	/// Apply the chained source response of a selection. Returns whether it
	/// was applied. Failure only empties the source panel.
	pub fn finish_source(
		&mut self,
		ticket: &SelectTicket,
		outcome: Result<SourceDocument, ApiError>,
	) -> bool {
		if ticket.seq != self.select_seq {
			debug!("Discarding stale source for {}", ticket.id);
			return false;
		}
		self.source_loading = false;
		match outcome {
			Ok(doc) => {
				debug!("Loaded source {} ({} bytes)", doc.file, doc.content.len());
				self.source = Some(doc);
				self.source_error = None;
			}
			Err(e) => {
				warn!("Source for {} failed: {e}", ticket.id);
				self.source = None;
				self.source_error = Some(e.to_string());
			}
		}
		true
	}
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
	value.clamp(*range.start(), *range.end())
}
