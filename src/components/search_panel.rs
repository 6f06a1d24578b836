use leptos::prelude::*;
use web_sys::KeyboardEvent;

use crate::explore::{ExplorationState, Explorer};

/// Query box and ranked result list. Picking a result selects it.
#[component]
pub fn SearchPanel(explorer: Explorer) -> impl IntoView {
	let state = explorer.state();
	let query = move || state.with(|s| s.query().to_string());

	let rows = move || {
		state.with(|s: &ExplorationState| {
			let selected = s.selected().map(|n| n.id.as_str());
			s.results()
				.iter()
				.map(|node| {
					let id = node.id.clone();
					let is_selected = selected == Some(node.id.as_str());
					let package = node.package.clone().unwrap_or_default();
					let location = node.location().unwrap_or_default();
					view! {
						<li
							class="search-result"
							class:selected=is_selected
							on:click=move |_| explorer.select_node(id.clone())
						>
							<span class="result-name">{node.label().to_string()}</span>
							<span class="result-package">{package}</span>
							<span class="result-location">{location}</span>
						</li>
					}
				})
				.collect_view()
		})
	};

	view! {
		<div class="search-panel">
			<input
				type="search"
				placeholder="Search functions, packages or files"
				prop:value=query
				on:input=move |ev| explorer.set_query(event_target_value(&ev))
				on:keydown=move |ev: KeyboardEvent| {
					if ev.key() == "Enter" {
						explorer.submit_query();
					}
				}
			/>
			<ul class="search-results">{rows}</ul>
		</div>
	}
}
