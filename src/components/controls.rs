use leptos::prelude::*;

use crate::config::{DEPTH_RANGE, LIMIT_RANGE};
use crate::explore::Explorer;

/// Depth and node-cap inputs. Changes apply from the next selection on.
#[component]
pub fn Controls(explorer: Explorer) -> impl IntoView {
	let state = explorer.state();

	view! {
		<div class="controls">
			<label>
				"Depth"
				<input
					type="number"
					min=DEPTH_RANGE.start().to_string()
					max=DEPTH_RANGE.end().to_string()
					prop:value=move || state.with(|s| s.depth().to_string())
					on:change=move |ev| {
						if let Ok(depth) = event_target_value(&ev).trim().parse::<u32>() {
							explorer.set_depth(depth);
						}
					}
				/>
			</label>
			<label>
				"Limit"
				<input
					type="number"
					min=LIMIT_RANGE.start().to_string()
					max=LIMIT_RANGE.end().to_string()
					step="10"
					prop:value=move || state.with(|s| s.limit().to_string())
					on:change=move |ev| {
						if let Ok(limit) = event_target_value(&ev).trim().parse::<u32>() {
							explorer.set_limit(limit);
						}
					}
				/>
			</label>
		</div>
	}
}

/// Summary of the selected node and its neighborhood.
#[component]
pub fn NodeDetails(explorer: Explorer) -> impl IntoView {
	let state = explorer.state();

	move || {
		state.with(|s| {
			let node = s.selected()?;
			let (nodes, edges) = s
				.subgraph()
				.map(|g| (g.nodes.len(), g.edges.len()))
				.unwrap_or_default();
			Some(view! {
				<dl class="node-details">
					<dt>"Name"</dt>
					<dd>{node.label().to_string()}</dd>
					<dt>"Package"</dt>
					<dd>{node.package.clone().unwrap_or_else(|| "-".into())}</dd>
					<dt>"Kind"</dt>
					<dd>{node.kind.clone().unwrap_or_else(|| "-".into())}</dd>
					<dt>"Location"</dt>
					<dd>{node.location().unwrap_or_else(|| "unknown".into())}</dd>
					<dt>"Neighborhood"</dt>
					<dd>{format!("{nodes} nodes, {edges} edges")}</dd>
				</dl>
			})
		})
	}
}

/// Loading indicator and the latest error, each shown independently.
#[component]
pub fn StatusBar(explorer: Explorer) -> impl IntoView {
	let state = explorer.state();
	let busy = move || state.with(|s| s.busy());
	let error = move || state.with(|s| s.error().map(str::to_string));

	view! {
		<div class="status-bar">
			{move || busy().then(|| view! { <span class="status-loading">"Loading..."</span> })}
			{move || error().map(|message| view! { <span class="status-error">{message}</span> })}
		</div>
	}
}
