use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::{debug, error};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::config::LayoutConfig;
use super::drag::PointerId;
use super::render;
use super::state::BridgeView;
use super::types::BridgeResult;

#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("no browser window available")]
	NoWindow,
	#[error("2d context unavailable: {0}")]
	Context(String),
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn now() -> f64 {
	js_sys::Date::now() / 1000.0
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
	canvas
		.get_context("2d")
		.map_err(|e| CanvasError::Context(format!("{e:?}")))?
		.ok_or_else(|| CanvasError::Context("canvas returned no context".into()))?
		.dyn_into()
		.map_err(|_| CanvasError::Context("context is not 2d".into()))
}

fn measure(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

/// Live concept graph for one bridge result.
///
/// Shows a spinner while `loading`, an empty-state overlay when there is no
/// result, and otherwise an animated force layout whose nodes can be dragged
/// with the mouse or by touch.
#[component]
pub fn BridgeGraphCanvas(
	#[prop(into)] data: Signal<Option<BridgeResult>>,
	#[prop(into)] loading: Signal<bool>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared<BridgeView> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let frame = Arc::new(AtomicI32::new(0));
	let (empty, set_empty) = signal(true);

	// The effect owns the only strong handle to the animation closure, so it is
	// dropped together with the effect when the component is disposed.
	let (state_init, alive_init, frame_init) = (state.clone(), alive.clone(), frame.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let result = mount(
			&canvas,
			width,
			height,
			&state_init,
			&animate,
			&alive_init,
			&frame_init,
		);
		match result {
			Ok(()) => {
				if let Some(ref mut v) = *state_init.borrow_mut() {
					v.update(data.get_untracked().as_ref(), loading.get_untracked(), now());
					set_empty.set(v.scene().is_empty());
				}
			}
			Err(err) => error!("bridge graph canvas unavailable: {err}"),
		}
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let result = data.get();
		let loading = loading.get();
		if let Some(ref mut v) = *state_data.borrow_mut() {
			v.update(result.as_ref(), loading, now());
			set_empty.set(v.scene().is_empty());
		}
	});

	let resize_listener = (width.is_none() || height.is_none()).then(|| {
		let state_resize = state.clone();
		window_event_listener(ev::resize, move |_| {
			let Some(canvas) = canvas_ref.get_untracked() else {
				return;
			};
			let (w, h) = measure(&canvas, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			if let Some(ref mut v) = *state_resize.borrow_mut() {
				v.resize(w, h);
			}
		})
	});

	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(frame.load(Ordering::Relaxed));
		}
		if let Some(listener) = resize_listener {
			listener.remove();
		}
		debug!("bridge graph canvas unmounted");
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut v) = *state_md.borrow_mut() {
			if v.pointer_down(PointerId::Mouse, x, y) {
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grabbing");
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_point(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut v) = *state_mm.borrow_mut() {
			if v.drag.is_dragging() {
				v.pointer_move(PointerId::Mouse, x, y);
			} else {
				let cursor = if v.is_over_node(x, y) { "grab" } else { "default" };
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut v) = *state_mu.borrow_mut() {
			v.pointer_up(PointerId::Mouse);
		}
		if let Some(canvas) = canvas_ref.get() {
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "grab");
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut v) = *state_ml.borrow_mut() {
			v.pointer_cancel();
		}
	};

	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let touches = ev.changed_touches();
		let mut grabbed = false;
		if let Some(ref mut v) = *state_ts.borrow_mut() {
			for i in 0..touches.length() {
				if let Some(touch) = touches.item(i) {
					let (x, y) = canvas_point(&canvas, touch.client_x(), touch.client_y());
					grabbed |= v.pointer_down(PointerId::Touch(touch.identifier()), x, y);
				}
			}
		}
		if grabbed {
			ev.prevent_default();
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let touches = ev.changed_touches();
		if let Some(ref mut v) = *state_tm.borrow_mut() {
			if !v.drag.is_dragging() {
				return;
			}
			ev.prevent_default();
			for i in 0..touches.length() {
				if let Some(touch) = touches.item(i) {
					let (x, y) = canvas_point(&canvas, touch.client_x(), touch.client_y());
					v.pointer_move(PointerId::Touch(touch.identifier()), x, y);
				}
			}
		}
	};

	let state_te = state.clone();
	let release_touches = move |ev: TouchEvent| {
		let touches = ev.changed_touches();
		if let Some(ref mut v) = *state_te.borrow_mut() {
			for i in 0..touches.length() {
				if let Some(touch) = touches.item(i) {
					v.pointer_up(PointerId::Touch(touch.identifier()));
				}
			}
		}
	};
	let on_touchcancel = release_touches.clone();

	view! {
		<div class="bridge-graph">
			<canvas
				node_ref=canvas_ref
				class="bridge-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:touchstart=on_touchstart
				on:touchmove=on_touchmove
				on:touchend=release_touches
				on:touchcancel=on_touchcancel
				style="display: block; cursor: grab;"
			/>
			<Show when=move || empty.get()>
				<div class="bridge-graph-empty">
					<p>"[ WAITING FOR INPUT ]"</p>
				</div>
			</Show>
		</div>
	}
}

/// Sizes the canvas, creates the view state, and starts the single animation loop
/// that steps the layout and repaints every frame.
fn mount(
	canvas: &HtmlCanvasElement,
	width: Option<f64>,
	height: Option<f64>,
	state: &Shared<BridgeView>,
	animate: &Shared<Closure<dyn FnMut()>>,
	alive: &Arc<AtomicBool>,
	frame: &Arc<AtomicI32>,
) -> Result<(), CanvasError> {
	let window: Window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let (w, h) = measure(canvas, width, height);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	let ctx = context_2d(canvas)?;
	*state.borrow_mut() = Some(BridgeView::new(LayoutConfig::default(), w, h));
	debug!("bridge graph canvas mounted at {w}x{h}");

	let (state_anim, alive_anim, frame_anim) = (state.clone(), alive.clone(), frame.clone());
	let animate_inner: Weak<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::downgrade(animate);
	*animate.borrow_mut() = Some(Closure::new(move || {
		if !alive_anim.load(Ordering::Relaxed) {
			return;
		}
		if let Some(ref mut v) = *state_anim.borrow_mut() {
			let (w, h) = (v.width, v.height);
			render::render(v.frame(now()), &ctx, w, h);
		}
		let Some(slot) = animate_inner.upgrade() else {
			return;
		};
		if let (Some(window), Some(cb)) = (web_sys::window(), slot.borrow().as_ref()) {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_anim.store(id, Ordering::Relaxed);
			}
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		frame.store(window.request_animation_frame(cb.as_ref().unchecked_ref()).unwrap_or(0), Ordering::Relaxed);
	}
	Ok(())
}
