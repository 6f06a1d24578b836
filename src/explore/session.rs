//! Sequencing of backend calls against an [`ExplorationState`].
//!
//! The async flows here own no state of their own: they take a ticket from
//! the state, await the backend, and hand the outcome back. Whether the
//! outcome is applied is decided by the state's sequence check, so any
//! number of flows may be in flight concurrently on one thread.

use std::cell::RefCell;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};

use super::client::{Backend, HttpBackend};
use super::debounce::DebounceTimer;
use super::state::{ExplorationState, NeighborhoodOutcome};
use crate::config::ExplorerConfig;

/// Something holding an [`ExplorationState`] that flows can mutate.
pub trait StateCell {
	/// Run `f` against the state. `None` if the state is gone.
	fn apply<R>(&self, f: impl FnOnce(&mut ExplorationState) -> R) -> Option<R>;
}

impl StateCell for RefCell<ExplorationState> {
	fn apply<R>(&self, f: impl FnOnce(&mut ExplorationState) -> R) -> Option<R> {
		Some(f(&mut self.borrow_mut()))
	}
}

impl StateCell for RwSignal<ExplorationState> {
	fn apply<R>(&self, f: impl FnOnce(&mut ExplorationState) -> R) -> Option<R> {
		self.try_update(f)
	}
}

/// Search for the current query. Returns whether the response was applied.
pub async fn run_search<B, S>(backend: &B, state: &S) -> bool
where
	B: Backend + ?Sized,
	S: StateCell,
{
	let Some(ticket) = state.apply(ExplorationState::begin_search) else {
		return false;
	};
	debug!("Searching {:?} (limit {})", ticket.query, ticket.limit);
	let outcome = backend.search(&ticket.query, ticket.limit).await;
	state
		.apply(|s| s.finish_search(&ticket, outcome))
		.unwrap_or(false)
}

/// Select `id`: load its neighborhood, then the source of its file.
pub async fn run_select<B, S>(backend: &B, state: &S, id: String) -> NeighborhoodOutcome
where
	B: Backend + ?Sized,
	S: StateCell,
{
	let Some(ticket) = state.apply(|s| s.begin_select(id)) else {
		return NeighborhoodOutcome::Stale;
	};
	info!(
		"Selecting {} (depth {}, limit {})",
		ticket.id, ticket.depth, ticket.limit
	);
	let neighborhood = backend
		.neighborhood(&ticket.id, ticket.depth, ticket.limit)
		.await;
	let outcome = state
		.apply(|s| s.finish_neighborhood(&ticket, neighborhood))
		.unwrap_or(NeighborhoodOutcome::Stale);

	if let Some(file) = outcome.source_file() {
		let document = backend.source(file).await;
		state.apply(|s| s.finish_source(&ticket, document));
	}
	outcome
}

/// Browser handle of one exploration session.
///
/// Cheap to copy into event handlers; views read the state through
/// [`Explorer::state`] and report intents through the methods.
#[derive(Clone, Copy)]
pub struct Explorer {
	state: RwSignal<ExplorationState>,
	backend: StoredValue<HttpBackend, LocalStorage>,
	debounce: StoredValue<DebounceTimer<String>, LocalStorage>,
}

impl Explorer {
	/// New session with empty defaults.
	pub fn new(config: &ExplorerConfig) -> Self {
		info!(
			"Exploring against {}",
			config.api_base.as_deref().unwrap_or("same origin")
		);
		Self {
			state: RwSignal::new(ExplorationState::new(config)),
			backend: StoredValue::new_local(HttpBackend::new(config.api_base.as_deref())),
			debounce: StoredValue::new_local(DebounceTimer::new(config.debounce)),
		}
	}

	/// Read-only view of the session.
	pub fn state(&self) -> ReadSignal<ExplorationState> {
		self.state.read_only()
	}

	/// Update the query now; search once typing settles.
	pub fn set_query(&self, query: String) {
		self.state.update(|s| s.set_query(query.clone()));
		let this = *self;
		self.debounce.update_value(|timer| {
			timer.schedule(query, move |settled| {
				debug!("Query settled on {settled:?}");
				this.search();
			})
		});
	}

	/// Search the current query immediately, dropping any pending debounce.
	pub fn submit_query(&self) {
		self.debounce.update_value(DebounceTimer::cancel);
		self.search();
	}

	/// Issue a search for the current query.
	pub fn search(&self) {
		let this = *self;
		spawn_local(async move {
			let backend = this.backend.get_value();
			run_search(&backend, &this.state).await;
		});
	}

	/// Log whether the backend answers at all.
	pub fn check_health(&self) {
		let this = *self;
		spawn_local(async move {
			match this.backend.get_value().health().await {
				Ok(health) => info!("Backend health: {}", health.status),
				Err(e) => warn!("Backend health check failed: {e}"),
			}
		});
	}

	/// Resolve `id` and select it when it exists. Used for deep links.
	pub fn open(&self, id: String) {
		let this = *self;
		spawn_local(async move {
			let backend = this.backend.get_value();
			match backend.function(&id).await {
				Ok(node) => {
					run_select(&backend, &this.state, node.id).await;
				}
				Err(e) => warn!("Cannot open {id:?}: {e}"),
			}
		});
	}

	/// Load the neighborhood of `id` and make it the selection.
	pub fn select_node(&self, id: String) {
		let this = *self;
		spawn_local(async move {
			let backend = this.backend.get_value();
			run_select(&backend, &this.state, id).await;
		});
	}

	/// Depth for the next selection.
	pub fn set_depth(&self, depth: u32) {
		self.state.update(|s| s.set_depth(depth));
	}

	/// Node cap for the next selection.
	pub fn set_limit(&self, limit: u32) {
		self.state.update(|s| s.set_limit(limit));
	}
}
