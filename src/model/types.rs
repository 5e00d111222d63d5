//! Record types for uploaded graph data and the active filter state.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A node record as uploaded in the nodes document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Optional display label.
	#[serde(default)]
	pub label: Option<String>,
	/// Optional question text; preferred over `label` for display.
	#[serde(default)]
	pub question: Option<String>,
	/// Optional year, used for filtering and colouring. Exporters often
	/// write whole years as floats (`1990.0`), so any JSON number is accepted.
	#[serde(default)]
	pub year: Option<f64>,
	/// Whether this node is flagged as an outlier.
	#[serde(default)]
	pub is_outlier: Option<bool>,
	/// Seed position; used as the starting point of the layout when both are set.
	#[serde(default)]
	pub x: Option<f64>,
	#[serde(default)]
	#[allow(missing_docs)]
	pub y: Option<f64>,
	/// Seed velocity.
	#[serde(default)]
	pub vx: Option<f64>,
	#[serde(default)]
	#[allow(missing_docs)]
	pub vy: Option<f64>,
	/// Pin position; the layout holds the node here while set.
	#[serde(default)]
	pub fx: Option<f64>,
	#[serde(default)]
	#[allow(missing_docs)]
	pub fy: Option<f64>,
	/// Any other fields, carried through untouched for the tooltip.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GraphNode {
	/// Creates a bare node with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}

	/// The node's year as a whole number.
	///
	/// `0`, non-finite and fractional values count as absent.
	pub fn year(&self) -> Option<i64> {
		self.year
			.filter(|y| y.is_finite() && y.fract() == 0.0 && *y != 0.0)
			.map(|y| y as i64)
	}

	/// Whether the node is flagged as an outlier.
	pub fn is_outlier(&self) -> bool {
		self.is_outlier.unwrap_or(false)
	}

	/// Text drawn next to the node: question, then label, then id.
	pub fn display_label(&self) -> &str {
		self.question
			.as_deref()
			.filter(|q| !q.is_empty())
			.or(self.label.as_deref().filter(|l| !l.is_empty()))
			.unwrap_or(&self.id)
	}

	/// Multi-line hover text built from the attributes that are present.
	pub fn tooltip(&self) -> String {
		let mut parts = vec![format!("ID: {}", self.id)];
		if let Some(question) = self.question.as_deref().filter(|q| !q.is_empty()) {
			parts.push(format!("Question: {question}"));
		}
		if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
			parts.push(format!("Label: {label}"));
		}
		if let Some(year) = self.year() {
			parts.push(format!("Year: {year}"));
		} else if let Some(raw) = self.year.filter(|y| y.is_finite() && *y != 0.0) {
			parts.push(format!("Year: {raw}"));
		}
		if self.is_outlier() {
			parts.push("Outlier".to_string());
		}
		for (key, value) in &self.extra {
			match value {
				Value::Null => {}
				Value::String(s) => parts.push(format!("{key}: {s}")),
				other => parts.push(format!("{key}: {other}")),
			}
		}
		parts.join("\n")
	}
}

/// A link record as uploaded in the links document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Link weight in [0, 1]. Absent means 1.
	#[serde(default)]
	pub similarity: Option<f64>,
	/// Any other fields, carried through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GraphLink {
	/// Creates a link without a similarity value.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			..Self::default()
		}
	}

	/// Builder-style similarity setter.
	pub fn with_similarity(mut self, similarity: f64) -> Self {
		self.similarity = Some(similarity);
		self
	}

	/// Effective similarity, defaulting to 1 when absent.
	pub fn similarity(&self) -> f64 {
		self.similarity.unwrap_or(1.0)
	}
}

/// Filter controls applied when building a visible snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterState {
	/// Years to keep. Empty means no year filter.
	pub selected_years: BTreeSet<i64>,
	/// Whether outlier nodes are kept.
	pub show_outliers: bool,
	/// Minimum link similarity, in [0, 1].
	pub similarity_threshold: f64,
}

impl Default for FilterState {
	fn default() -> Self {
		Self {
			selected_years: BTreeSet::new(),
			show_outliers: true,
			similarity_threshold: 0.0,
		}
	}
}
