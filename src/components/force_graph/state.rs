//! Scene state and pointer interaction for the force graph.
//!
//! Owns the engine slot, per-node visuals, the pan/zoom transform and the
//! drag/pan/hover gesture state. Pointer handlers in the component translate
//! DOM events into the methods here; nothing in this module touches the DOM.

use std::cell::Cell;
use std::rc::Rc;

use super::simulation::{EngineSlot, ForceConfig, LayoutEngine};
use super::theme::{Color, Theme, YearScale};
use crate::model::VisibleGraph;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 4.0;

/// Precomputed drawing attributes for one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Circle radius in graph units.
	pub radius: f64,
	/// Fill colour.
	pub color: Color,
	/// Text drawn beside the node.
	pub label: String,
	/// Hover text, one attribute per line.
	pub tooltip: String,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor, clamped to `MIN_ZOOM..=MAX_ZOOM`.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Maps a canvas point into graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Maps a graph point onto the canvas.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scales by `factor` about the screen point `(sx, sy)`.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// Node being dragged, if any.
	pub node_idx: Option<usize>,
	/// Pointer position when the drag began.
	pub start_x: f64,
	#[allow(missing_docs)]
	pub start_y: f64,
	/// Node position when the drag began.
	pub node_start_x: f64,
	#[allow(missing_docs)]
	pub node_start_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// Whether a pan is in progress.
	pub active: bool,
	/// Pointer position when the pan began.
	pub start_x: f64,
	#[allow(missing_docs)]
	pub start_y: f64,
	/// View translation when the pan began.
	pub transform_start_x: f64,
	#[allow(missing_docs)]
	pub transform_start_y: f64,
}

/// Everything needed to draw and interact with one dataset.
pub struct ForceGraphState {
	/// The single live layout engine.
	pub slot: EngineSlot,
	/// Drawing attributes, parallel to the engine's nodes.
	pub visuals: Vec<NodeVisual>,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// In-progress node drag.
	pub drag: DragState,
	/// In-progress canvas pan.
	pub pan: PanState,
	/// Node under the pointer.
	pub hovered: Option<usize>,
	/// Colours, sizes and fonts.
	pub theme: Theme,
	/// Parameters for every engine built by [`load`](Self::load).
	pub config: ForceConfig,
	/// Canvas size in pixels.
	pub width: f64,
	#[allow(missing_docs)]
	pub height: f64,
	dirty: Rc<Cell<bool>>,
}

impl ForceGraphState {
	/// An empty scene for a `width` × `height` canvas.
	pub fn new(width: f64, height: f64, theme: Theme, config: ForceConfig) -> Self {
		Self {
			slot: EngineSlot::default(),
			visuals: Vec::new(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			theme,
			config,
			width,
			height,
			dirty: Rc::new(Cell::new(true)),
		}
	}

	/// Discards the current scene and engine and builds fresh ones for `graph`.
	///
	/// Returns the generation of the new engine.
	pub fn load(&mut self, graph: &VisibleGraph) -> u64 {
		self.slot.teardown();

		let years = YearScale::new(&graph.nodes);
		self.visuals = graph
			.nodes
			.iter()
			.map(|node| NodeVisual {
				radius: self.theme.radius_for(node),
				color: self.theme.color_for(node, &years),
				label: node.display_label().to_string(),
				tooltip: node.tooltip(),
			})
			.collect();

		self.transform = ViewTransform::default();
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;

		let mut engine = LayoutEngine::new(graph, self.config.clone(), self.width, self.height);
		let dirty = self.dirty.clone();
		engine.on_tick(move |_, _| dirty.set(true));
		self.dirty.set(true);
		self.slot.install(engine)
	}

	/// Stops the engine and clears the scene.
	pub fn teardown(&mut self) {
		self.slot.teardown();
		self.visuals.clear();
		self.hovered = None;
		self.drag = DragState::default();
		self.dirty.set(true);
	}

	/// Generation of the current engine.
	pub fn generation(&self) -> u64 {
		self.slot.generation()
	}

	/// The current engine, if a dataset is loaded.
	pub fn engine(&self) -> Option<&LayoutEngine> {
		self.slot.engine()
	}

	/// Advances the engine scheduled under `generation`, if it is still current.
	pub fn step(&mut self, generation: u64) -> bool {
		self.slot.step(generation)
	}

	/// Whether anything changed since the last call; clears the flag.
	pub fn take_dirty(&self) -> bool {
		self.dirty.replace(false)
	}

	/// Requests a redraw on the next frame.
	pub fn mark_dirty(&self) {
		self.dirty.set(true);
	}

	/// Topmost node under the screen point, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let engine = self.engine()?;
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let slop = self.theme.hit_slop / self.transform.k;
		engine
			.nodes()
			.iter()
			.zip(&self.visuals)
			.enumerate()
			.rev()
			.find(|(_, (node, visual))| {
				let (dx, dy) = (node.x - gx, node.y - gy);
				(dx * dx + dy * dy).sqrt() < visual.radius + slop
			})
			.map(|(idx, _)| idx)
	}

	/// Pointer pressed: grabs a node if one is hit, otherwise starts panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		match self.node_at_position(sx, sy) {
			Some(idx) => self.drag_start(idx, sx, sy),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	/// Begins dragging node `idx`: reheats an idle engine and pins the node.
	pub fn drag_start(&mut self, idx: usize, sx: f64, sy: f64) {
		let drag_target = self.config.drag_alpha_target;
		let Some(engine) = self.slot.engine_mut() else {
			return;
		};
		let Some(node) = engine.nodes().get(idx) else {
			return;
		};
		let (x, y) = (node.x, node.y);

		engine.set_alpha_target(drag_target);
		if !engine.is_running() {
			engine.restart();
		}
		engine.pin(idx, x, y);

		self.drag = DragState {
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
		};
		self.mark_dirty();
	}

	/// Pointer moved: updates the drag pin, the pan offset or the hover target.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.drag.node_idx {
			let k = self.transform.k;
			let nx = self.drag.node_start_x + (sx - self.drag.start_x) / k;
			let ny = self.drag.node_start_y + (sy - self.drag.start_y) / k;
			if let Some(engine) = self.slot.engine_mut() {
				engine.pin(idx, nx, ny);
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			self.mark_dirty();
		} else {
			let hovered = self.node_at_position(sx, sy);
			if hovered != self.hovered {
				self.hovered = hovered;
				self.mark_dirty();
			}
		}
	}

	/// Pointer released: ends any drag (letting the layout settle) or pan.
	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			if let Some(engine) = self.slot.engine_mut() {
				engine.set_alpha_target(0.0);
				engine.unpin(idx);
			}
		}
		self.pan.active = false;
		self.mark_dirty();
	}

	/// Pointer left the canvas: ends gestures and clears hover.
	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.hovered = None;
	}

	/// Wheel zoom about the pointer. Positive `delta_y` zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.transform.zoom_about(sx, sy, factor);
		self.mark_dirty();
	}

	/// Tooltip text and screen anchor for the hovered node.
	pub fn hovered_tooltip(&self) -> Option<(&str, f64, f64)> {
		let idx = self.hovered?;
		let node = self.engine()?.nodes().get(idx)?;
		let visual = self.visuals.get(idx)?;
		let (sx, sy) = self.transform.graph_to_screen(node.x, node.y);
		Some((visual.tooltip.as_str(), sx, sy))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{GraphLink, GraphNode};

	fn graph() -> VisibleGraph {
		VisibleGraph {
			nodes: vec![
				GraphNode {
					year: Some(1990.0),
					..GraphNode::new("a")
				},
				GraphNode {
					is_outlier: Some(true),
					question: Some("Q?".into()),
					..GraphNode::new("b")
				},
				GraphNode::new("c"),
			],
			links: vec![GraphLink::new("a", "b"), GraphLink::new("b", "c")],
		}
	}

	fn loaded() -> ForceGraphState {
		let mut state = ForceGraphState::new(800.0, 600.0, Theme::default(), ForceConfig::default());
		state.load(&graph());
		state
	}

	fn screen_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let node = &state.engine().unwrap().nodes()[idx];
		state.transform.graph_to_screen(node.x, node.y)
	}

	#[test]
	fn load_builds_visuals() {
		let state = loaded();
		assert_eq!(state.visuals.len(), 3);
		assert_eq!(state.visuals[1].radius, 8.0);
		assert_eq!(state.visuals[1].label, "Q?");
		assert_eq!(state.visuals[1].color, state.theme.outlier);
		assert_eq!(state.visuals[0].radius, 6.0);
		assert_eq!(state.visuals[2].tooltip, "ID: c");
	}

	#[test]
	fn reload_replaces_engine_and_invalidates_old_generation() {
		let mut state = loaded();
		let old = state.generation();
		state.step(old);
		let new = state.load(&graph());
		assert_ne!(old, new);
		assert!(!state.step(old));
		assert_eq!(state.engine().unwrap().ticks(), 0);
		assert!(state.step(new));
	}

	#[test]
	fn ticks_mark_scene_dirty() {
		let mut state = loaded();
		assert!(state.take_dirty());
		assert!(!state.take_dirty());
		state.step(state.generation());
		assert!(state.take_dirty());
	}

	#[test]
	fn zoom_is_clamped_and_leaves_nodes_alone() {
		let mut state = loaded();
		let before: Vec<_> = state.engine().unwrap().nodes().iter().map(|n| (n.x, n.y)).collect();
		for _ in 0..100 {
			state.zoom(10.0, 10.0, -1.0);
		}
		assert_eq!(state.transform.k, MAX_ZOOM);
		for _ in 0..200 {
			state.zoom(10.0, 10.0, 1.0);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
		let after: Vec<_> = state.engine().unwrap().nodes().iter().map(|n| (n.x, n.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn zoom_keeps_pointer_fixed() {
		let mut t = ViewTransform::default();
		let anchor = t.screen_to_graph(200.0, 150.0);
		t.zoom_about(200.0, 150.0, 1.1);
		let (sx, sy) = t.graph_to_screen(anchor.0, anchor.1);
		assert!((sx - 200.0).abs() < 1e-9 && (sy - 150.0).abs() < 1e-9);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = loaded();
		state.pointer_down(-500.0, -500.0);
		assert!(state.pan.active);
		state.pointer_move(-450.0, -480.0);
		assert_eq!((state.transform.x, state.transform.y), (50.0, 20.0));
		state.pointer_up();
		assert!(!state.pan.active);
	}

	#[test]
	fn drag_pins_follows_pointer_and_releases() {
		let mut state = loaded();
		let generation = state.generation();
		while state.step(generation) {}
		assert!(!state.engine().unwrap().is_running());

		let (sx, sy) = screen_pos(&state, 0);
		state.pointer_down(sx, sy);
		assert_eq!(state.drag.node_idx, Some(0));
		let engine = state.engine().unwrap();
		assert!(engine.is_running());
		assert_eq!(engine.alpha_target(), 0.3);
		assert!(engine.nodes()[0].is_pinned());

		state.pointer_move(sx + 30.0, sy - 10.0);
		state.step(generation);
		let node = &state.engine().unwrap().nodes()[0];
		assert_eq!((Some(node.x), Some(node.y)), (node.fx, node.fy));
		assert!((node.x - (state.drag.node_start_x + 30.0)).abs() < 1e-9);
		assert!((node.y - (state.drag.node_start_y - 10.0)).abs() < 1e-9);

		state.pointer_up();
		let engine = state.engine().unwrap();
		assert_eq!(engine.alpha_target(), 0.0);
		assert!(!engine.nodes()[0].is_pinned());
		assert!(state.drag.node_idx.is_none());
	}

	#[test]
	fn hover_exposes_tooltip() {
		let mut state = loaded();
		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_move(sx, sy);
		assert_eq!(state.hovered, Some(1));
		let (text, _, _) = state.hovered_tooltip().unwrap();
		assert_eq!(text, "ID: b\nQuestion: Q?\nOutlier");
		state.pointer_leave();
		assert!(state.hovered_tooltip().is_none());
	}

	#[test]
	fn teardown_clears_scene() {
		let mut state = loaded();
		let generation = state.generation();
		state.teardown();
		assert!(state.engine().is_none());
		assert!(state.visuals.is_empty());
		assert!(!state.step(generation));
		assert!(state.node_at_position(0.0, 0.0).is_none());
	}
}
