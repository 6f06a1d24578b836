use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use crate::explore::scene::Scene;

/// Canvas view of a [`Scene`]. Clicking a node reports its id through
/// `on_select`; dragging moves it, dragging the background pans and the
/// wheel zooms.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] scene: Signal<Scene>,
	#[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("Canvas 2d context unavailable");
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		*state_init.borrow_mut() = Some(ForceGraphState::new(&scene.get_untracked(), w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// A new neighborhood or selection replaces the drawn graph.
	let state_scene = state.clone();
	Effect::new(move |_| {
		let scene = scene.get();
		if let Some(ref mut s) = *state_scene.borrow_mut() {
			s.load(&scene);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let cursor = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.pointer_move(x, y);
				s.cursor()
			}
			None => "grab",
		};
		if let Some(canvas) = canvas_ref.get() {
			// Named explicitly: the leptos prelude also brings a `style` method into scope.
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = state_mu.borrow_mut().as_mut().and_then(|s| s.release());
		if let Some(id) = clicked {
			on_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn pointer(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
