use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::controls::{Controls, NodeDetails, StatusBar};
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::search_panel::SearchPanel;
use crate::components::source_view::SourceView;
use crate::config::ExplorerConfig;
use crate::explore::{ExplorationState, Explorer};

/// Explorer page: search on the left, neighborhood in the middle, source on
/// the right. One page instance owns one independent session.
#[component]
pub fn Home() -> impl IntoView {
	let explorer = Explorer::new(&ExplorerConfig::from_build_env());
	let state = explorer.state();

	explorer.check_health();
	// The backend lists functions for an empty query, so start with that.
	explorer.search();
	if let Some(id) = use_query_map().with_untracked(|q| q.get("fn")) {
		explorer.open(id);
	}

	let scene = Memo::new(move |_| state.with(ExplorationState::scene));
	let on_select = Callback::new(move |id: String| explorer.select_node(id));

	let document = Signal::derive(move || state.with(|s| s.source().cloned()));
	let highlight = Signal::derive(move || state.with(ExplorationState::highlight_line));
	let source_error = Signal::derive(move || state.with(|s| s.source_error().map(str::to_string)));
	let source_loading = Signal::derive(move || state.with(ExplorationState::source_loading));

	view! {
		<div class="explorer">
			<aside class="sidebar">
				<h1>"Call Graph Explorer"</h1>
				<SearchPanel explorer=explorer />
				<Controls explorer=explorer />
				<NodeDetails explorer=explorer />
			</aside>
			<main class="graph-pane">
				<StatusBar explorer=explorer />
				<ForceGraphCanvas scene=scene on_select=on_select />
			</main>
			<section class="source-pane">
				<SourceView
					document=document
					highlight=highlight
					error=source_error
					loading=source_loading
				/>
			</section>
		</div>
	}
}
