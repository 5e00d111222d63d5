//! Filtering of the uploaded dataset into a visible snapshot.
//!
//! Every filter change produces a fresh [`VisibleGraph`]: a private copy of the
//! records that pass the filters, in input order. The layout engine consumes
//! it and mutates only its own positional state, never the caller's records.

use std::collections::BTreeSet;

use super::types::{FilterState, GraphLink, GraphNode};

/// Nodes and links that pass the active filters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleGraph {
	/// Visible nodes, in input order.
	pub nodes: Vec<GraphNode>,
	/// Visible links, in input order. Endpoints may refer to hidden nodes.
	pub links: Vec<GraphLink>,
}

impl VisibleGraph {
	/// Whether there is nothing to lay out.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Whether a node passes the year and outlier filters.
pub fn node_passes(node: &GraphNode, filters: &FilterState) -> bool {
	let year_match = match node.year() {
		None => true,
		Some(year) => {
			filters.selected_years.is_empty() || filters.selected_years.contains(&year)
		}
	};
	let outlier_match = filters.show_outliers || !node.is_outlier();
	year_match && outlier_match
}

/// Whether a link passes the similarity threshold.
pub fn link_passes(link: &GraphLink, filters: &FilterState) -> bool {
	link.similarity() >= filters.similarity_threshold
}

/// Applies `filters` to the full dataset.
///
/// Node and link filtering are independent: a link whose endpoint was filtered
/// out is still returned here and is dropped later, when the layout engine
/// resolves endpoint ids.
pub fn build_snapshot(
	all_nodes: &[GraphNode],
	all_links: &[GraphLink],
	filters: &FilterState,
) -> VisibleGraph {
	VisibleGraph {
		nodes: all_nodes
			.iter()
			.filter(|n| node_passes(n, filters))
			.cloned()
			.collect(),
		links: all_links
			.iter()
			.filter(|l| link_passes(l, filters))
			.cloned()
			.collect(),
	}
}

/// Sorted distinct years present in `nodes`.
pub fn available_years(nodes: &[GraphNode]) -> Vec<i64> {
	nodes
		.iter()
		.filter_map(GraphNode::year)
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

/// Counts shown on the dashboard stat cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	/// All uploaded nodes.
	pub total_nodes: usize,
	/// Nodes passing the filters.
	pub filtered_nodes: usize,
	/// All uploaded links.
	pub total_links: usize,
	/// Links passing the similarity threshold.
	pub filtered_links: usize,
	/// Uploaded nodes flagged as outliers.
	pub outliers: usize,
}

impl GraphStats {
	/// Derives the stat card counts.
	pub fn collect(all_nodes: &[GraphNode], all_links: &[GraphLink], visible: &VisibleGraph) -> Self {
		Self {
			total_nodes: all_nodes.len(),
			filtered_nodes: visible.nodes.len(),
			total_links: all_links.len(),
			filtered_links: visible.links.len(),
			outliers: all_nodes.iter().filter(|n| n.is_outlier()).count(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, year: Option<i64>, outlier: bool) -> GraphNode {
		GraphNode {
			year: year.map(|y| y as f64),
			is_outlier: Some(outlier),
			..GraphNode::new(id)
		}
	}

	fn filters(years: &[i64], show_outliers: bool, threshold: f64) -> FilterState {
		FilterState {
			selected_years: years.iter().copied().collect(),
			show_outliers,
			similarity_threshold: threshold,
		}
	}

	fn ids(graph: &VisibleGraph) -> Vec<&str> {
		graph.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn year_and_outlier_filters_combine() {
		let nodes = vec![node("a", Some(1990), false), node("b", Some(2000), true)];
		let visible = build_snapshot(&nodes, &[], &filters(&[1990], false, 0.0));
		assert_eq!(ids(&visible), vec!["a"]);
	}

	#[test]
	fn empty_year_selection_means_no_year_filter() {
		let nodes = vec![node("a", Some(1990), false), node("b", Some(2000), false)];
		let visible = build_snapshot(&nodes, &[], &filters(&[], true, 0.0));
		assert_eq!(ids(&visible), vec!["a", "b"]);
	}

	#[test]
	fn nodes_without_year_always_pass_year_filter() {
		let nodes = vec![node("a", None, false), node("b", Some(2000), false)];
		let visible = build_snapshot(&nodes, &[], &filters(&[1990], true, 0.0));
		assert_eq!(ids(&visible), vec!["a"]);
	}

	#[test]
	fn outliers_hidden_only_when_toggle_off() {
		let nodes = vec![node("a", None, true)];
		assert_eq!(build_snapshot(&nodes, &[], &filters(&[], true, 0.0)).nodes.len(), 1);
		assert!(build_snapshot(&nodes, &[], &filters(&[], false, 0.0)).nodes.is_empty());
	}

	#[test]
	fn link_threshold_is_inclusive_and_defaults_to_one() {
		let links = vec![
			GraphLink::new("a", "b").with_similarity(0.4),
			GraphLink::new("b", "c"),
		];
		assert_eq!(build_snapshot(&[], &links, &filters(&[], true, 0.4)).links.len(), 2);
		assert_eq!(build_snapshot(&[], &links, &filters(&[], true, 0.41)).links.len(), 1);
		assert_eq!(build_snapshot(&[], &links, &filters(&[], true, 1.0)).links.len(), 1);
	}

	#[test]
	fn links_are_not_cross_filtered_by_nodes() {
		let nodes = vec![node("a", None, false), node("b", None, true)];
		let links = vec![GraphLink::new("a", "b")];
		let visible = build_snapshot(&nodes, &links, &filters(&[], false, 0.0));
		assert_eq!(ids(&visible), vec!["a"]);
		assert_eq!(visible.links.len(), 1);
	}

	#[test]
	fn snapshot_is_deterministic_and_order_preserving() {
		let nodes: Vec<_> = (0..20)
			.map(|i| node(&format!("n{i}"), Some(1990 + i % 3), i % 4 == 0))
			.collect();
		let links: Vec<_> = (0..19)
			.map(|i| GraphLink::new(format!("n{i}"), format!("n{}", i + 1)).with_similarity(i as f64 / 20.0))
			.collect();
		let f = filters(&[1990, 1992], false, 0.3);
		let first = build_snapshot(&nodes, &links, &f);
		assert_eq!(first, build_snapshot(&nodes, &links, &f));
		let positions: Vec<usize> = first
			.nodes
			.iter()
			.map(|n| nodes.iter().position(|m| m.id == n.id).unwrap())
			.collect();
		assert!(positions.windows(2).all(|w| w[0] < w[1]));
	}

	#[test]
	fn available_years_are_sorted_and_distinct() {
		let nodes = vec![
			node("a", Some(2001), false),
			node("b", Some(1999), false),
			node("c", Some(2001), false),
			node("d", None, false),
			node("e", Some(0), false),
		];
		assert_eq!(available_years(&nodes), vec![1999, 2001]);
	}

	#[test]
	fn stats_count_totals_and_outliers() {
		let nodes = vec![node("a", None, true), node("b", None, false)];
		let links = vec![GraphLink::new("a", "b").with_similarity(0.1)];
		let visible = build_snapshot(&nodes, &links, &filters(&[], false, 0.5));
		assert_eq!(
			GraphStats::collect(&nodes, &links, &visible),
			GraphStats {
				total_nodes: 2,
				filtered_nodes: 1,
				total_links: 1,
				filtered_links: 0,
				outliers: 1,
			}
		);
	}
}
