//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. A single animation loop
//! runs via `requestAnimationFrame`; every frame it steps the engine scheduled
//! for that frame's generation and redraws when the scene changed. Each new
//! dataset tears down the previous engine and scene before building fresh ones.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::simulation::ForceConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::model::VisibleGraph;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Renders an interactive force-directed graph on a canvas element.
///
/// Every change of `data` discards the current layout and starts a new one.
/// The canvas sizes itself to its parent container unless `width`/`height`
/// are given.
#[component]
pub fn ForceGraphCanvas(
	/// Snapshot to lay out; each new value restarts the layout.
	#[prop(into)]
	data: Signal<VisibleGraph>,
	/// Canvas width in pixels; defaults to the parent's width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Canvas height in pixels; defaults to the parent's height.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	// Generation the next queued frame was scheduled for.
	let scheduled = Rc::new(Cell::new(0u64));
	let (context_init, animate_init, scheduled_init) =
		(context.clone(), animate.clone(), scheduled.clone());

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let mut slot = context_init.borrow_mut();
		if let Some(state) = slot.as_mut() {
			state.load(&graph);
			debug!("force-graph: reloaded, generation {}", state.generation());
			return;
		}

		let (w, h) = (
			width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("force-graph: 2d context has unexpected type");
					return;
				}
			},
			_ => {
				warn!("force-graph: canvas 2d context unavailable");
				return;
			}
		};

		let mut state = ForceGraphState::new(w, h, Theme::default(), ForceConfig::default());
		scheduled_init.set(state.load(&graph));
		*slot = Some(state);
		drop(slot);

		let (context_anim, animate_inner, scheduled_anim) =
			(context_init.clone(), animate_init.clone(), scheduled_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas.is_connected() {
				if let Some(ref mut state) = *context_anim.borrow_mut() {
					state.teardown();
				}
				// This closure is still running; it can only be freed on a later frame.
				if let Some(cb) = take_callback(&animate_inner) {
					release_later(cb);
				}
				debug!("force-graph: canvas detached, frame loop stopped");
				return;
			}

			if let Some(ref mut state) = *context_anim.borrow_mut() {
				state.step(scheduled_anim.get());
				if state.take_dirty() {
					render::render(state, &ctx);
				}
				scheduled_anim.set(state.generation());
			}

			if let Some(ref cb) = *animate_inner.borrow() {
				request_frame(cb);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			request_frame(cb);
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut state) = *context_md.borrow_mut() {
			state.pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut state) = *context_mm.borrow_mut() {
			state.pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut state) = *context_mu.borrow_mut() {
			state.pointer_up();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut state) = *context_ml.borrow_mut() {
			state.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut state) = *context_wh.borrow_mut() {
			state.zoom(x, y, ev.delta_y());
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

/// Empties a self-referencing callback slot, breaking its `Rc` cycle.
fn take_callback<F>(slot: &RefCell<Option<F>>) -> Option<F> {
	slot.borrow_mut().take()
}

/// Drops `cb` from a one-shot frame callback.
fn release_later(cb: Closure<dyn FnMut()>) {
	let release = Closure::once_into_js(move || drop(cb));
	let scheduled = web_sys::window()
		.is_some_and(|window| window.request_animation_frame(release.unchecked_ref()).is_ok());
	if !scheduled {
		warn!("force-graph: could not schedule release of the frame loop");
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) {
	let Some(window): Option<Window> = web_sys::window() else {
		return;
	};
	if window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.is_err()
	{
		warn!("force-graph: requestAnimationFrame failed");
	}
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
