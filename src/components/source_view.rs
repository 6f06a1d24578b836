use leptos::html::Div;
use leptos::prelude::*;

use crate::explore::SourceDocument;
use crate::explore::source::source_lines;

/// Numbered source text with the selected node's line marked and scrolled
/// into view.
#[component]
pub fn SourceView(
	#[prop(into)] document: Signal<Option<SourceDocument>>,
	#[prop(into)] highlight: Signal<Option<u32>>,
	#[prop(into)] error: Signal<Option<String>>,
	#[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
	let container = NodeRef::<Div>::new();

	Effect::new(move |_| {
		document.track();
		highlight.track();
		request_animation_frame(move || {
			let Some(el) = container.get_untracked() else {
				return;
			};
			if let Ok(Some(line)) = el.query_selector(".source-line.highlighted") {
				line.scroll_into_view_with_bool(true);
			}
		});
	});

	let body = move || match document.get() {
		Some(doc) => {
			let rows = source_lines(&doc.content, highlight.get())
				.into_iter()
				.map(|line| {
					let text = line.text.to_string();
					view! {
						<div class="source-line" class:highlighted=line.highlighted>
							<span class="line-number">{line.number}</span>
							<code>{text}</code>
						</div>
					}
				})
				.collect_view();
			view! {
				<div class="source-file">{doc.file.clone()}</div>
				<div class="source-lines">{rows}</div>
			}
			.into_any()
		}
		None => {
			let message = if loading.get() {
				"Loading source...".to_string()
			} else if let Some(e) = error.get() {
				format!("Source unavailable: {e}")
			} else {
				"Select a function to view its source.".to_string()
			};
			view! { <p class="source-placeholder">{message}</p> }.into_any()
		}
	};

	view! {
		<div class="source-view" node_ref=container>
			{body}
		</div>
	}
}
