//! Canvas rendering for the force graph.
//!
//! Draws in three passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, then node circles and labels (world space, under the view transform)
//! 3. Tooltip for the hovered node (screen space)

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::simulation::LayoutEngine;
use super::state::ForceGraphState;
use super::theme::Theme;

const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;

/// Renders the complete scene to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let theme = &state.theme;

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let Some(engine) = state.engine() else {
		return;
	};

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(engine, ctx, theme);
	draw_nodes(state, engine, ctx, theme);

	ctx.restore();

	if let Some((text, x, y)) = state.hovered_tooltip() {
		draw_tooltip(state, ctx, theme, text, x, y);
	}
}

fn draw_links(engine: &LayoutEngine, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let nodes = engine.nodes();
	for link in engine.links() {
		let (s, t) = (&nodes[link.source], &nodes[link.target]);
		let similarity = link.similarity;

		ctx.set_stroke_style_str(&theme.edge.with_alpha(0.2 + similarity * 0.6).to_css());
		ctx.set_line_width(1.0 + similarity * 3.0);
		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		ctx.line_to(t.x, t.y);
		ctx.stroke();
	}
}

fn draw_nodes(
	state: &ForceGraphState,
	engine: &LayoutEngine,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let stroke = theme.node_stroke.to_css();
	let label_color = theme.label_color.to_css();

	for (idx, (node, visual)) in engine.nodes().iter().zip(&state.visuals).enumerate() {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, visual.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&visual.color.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&stroke);
		ctx.set_line_width(theme.node_stroke_width);
		ctx.stroke();

		if state.hovered == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, visual.radius + 3.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&visual.color.with_alpha(0.5).to_css());
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&label_color);
		ctx.set_font(theme.label_font);
		let _ = ctx.fill_text(
			&visual.label,
			node.x + theme.label_offset.0,
			node.y + theme.label_offset.1,
		);
	}
}

fn draw_tooltip(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	text: &str,
	x: f64,
	y: f64,
) {
	ctx.set_font(theme.tooltip_font);
	let lines: Vec<&str> = text.lines().collect();
	let width = lines
		.iter()
		.filter_map(|line| ctx.measure_text(line).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max)
		+ TOOLTIP_PADDING * 2.0;
	let height = lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING * 2.0;

	// Keep the box on the canvas.
	let bx = (x + 12.0).min(state.width - width).max(0.0);
	let by = (y + 12.0).min(state.height - height).max(0.0);

	ctx.set_fill_style_str(&theme.tooltip_background.to_css());
	ctx.fill_rect(bx, by, width, height);

	ctx.set_fill_style_str(&theme.tooltip_text.to_css());
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(
			line,
			bx + TOOLTIP_PADDING,
			by + TOOLTIP_PADDING + (i as f64 + 0.75) * TOOLTIP_LINE_HEIGHT,
		);
	}
}
