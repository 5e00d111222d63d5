//! Visual theming for the force graph.
//!
//! Colours, sizes and fonts used by the renderer, plus the ordinal year scale
//! that assigns palette colours to nodes.

use std::collections::BTreeMap;

use crate::model::GraphNode;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same colour with opacity replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string for canvas styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill.
	pub background: Color,
	/// Link stroke colour; opacity is derived from similarity.
	pub edge: Color,
	/// Ring drawn around every node.
	pub node_stroke: Color,
	/// Width of the node ring.
	pub node_stroke_width: f64,
	/// Year palette, cycled when there are more years than colours.
	pub palette: Vec<Color>,
	/// Fill for outlier nodes, overriding the palette.
	pub outlier: Color,
	/// Radius of ordinary nodes.
	pub node_radius: f64,
	/// Radius of outlier nodes.
	pub outlier_radius: f64,
	/// Extra hit-test slack around a node, in screen pixels.
	pub hit_slop: f64,
	/// Label text colour.
	pub label_color: Color,
	/// Canvas font for labels.
	pub label_font: &'static str,
	/// Label position relative to the node centre.
	pub label_offset: (f64, f64),
	/// Tooltip box fill.
	pub tooltip_background: Color,
	/// Tooltip text colour.
	pub tooltip_text: Color,
	/// Canvas font for tooltip lines.
	pub tooltip_font: &'static str,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(248, 250, 252),
			edge: Color::rgb(148, 163, 184),
			node_stroke: Color::rgb(255, 255, 255),
			node_stroke_width: 2.0,
			palette: vec![
				Color::rgb(231, 110, 80), // chart-1
				Color::rgb(42, 157, 144), // chart-2
				Color::rgb(39, 71, 84),   // chart-3
			],
			outlier: Color::rgb(239, 68, 68),
			node_radius: 6.0,
			outlier_radius: 8.0,
			hit_slop: 4.0,
			label_color: Color::rgb(15, 23, 42),
			label_font: "10px sans-serif",
			label_offset: (10.0, 4.0),
			tooltip_background: Color::rgba(15, 23, 42, 0.9),
			tooltip_text: Color::rgb(248, 250, 252),
			tooltip_font: "12px sans-serif",
		}
	}
}

impl Theme {
	/// Circle radius for a node.
	pub fn radius_for(&self, node: &GraphNode) -> f64 {
		if node.is_outlier() {
			self.outlier_radius
		} else {
			self.node_radius
		}
	}

	/// Fill colour for a node: outlier colour, else its year's palette slot.
	pub fn color_for(&self, node: &GraphNode, years: &YearScale) -> Color {
		if node.is_outlier() {
			return self.outlier;
		}
		let slot = node.year().and_then(|y| years.slot(y)).unwrap_or(0);
		self.palette[slot % self.palette.len().max(1)]
	}
}

/// Ordinal scale mapping each distinct year to a palette slot.
///
/// Slots are assigned in ascending year order, so the same set of years always
/// produces the same colours.
#[derive(Clone, Debug, Default)]
pub struct YearScale {
	slots: BTreeMap<i64, usize>,
}

impl YearScale {
	/// Collects the distinct years of `nodes`.
	pub fn new(nodes: &[GraphNode]) -> Self {
		let mut slots: BTreeMap<i64, usize> =
			nodes.iter().filter_map(GraphNode::year).map(|y| (y, 0)).collect();
		for (i, slot) in slots.values_mut().enumerate() {
			*slot = i;
		}
		Self { slots }
	}

	/// Palette slot for `year`, before cycling.
	pub fn slot(&self, year: i64) -> Option<usize> {
		self.slots.get(&year).copied()
	}

	/// Number of distinct years.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether no node has a year.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}
