use std::collections::BTreeSet;

use anyhow::Result;
use similarity_dashboard::components::force_graph::{ForceGraphState, Theme};
use similarity_dashboard::model::{available_years, build_snapshot, parse_links, parse_nodes};
use similarity_dashboard::{FilterState, ForceConfig, GraphStats, IngestError, LayoutEngine};

const NODES: &str = r#"[
	{"id": "q1", "question": "How often?", "year": 1990},
	{"id": "q2", "label": "Second", "year": 2000, "isOutlier": true},
	{"id": "q3", "year": 2000, "source": "survey-b"},
	{"id": "q4"}
]"#;

const LINKS: &str = r#"[
	{"source": "q1", "target": "q2", "similarity": 0.9},
	{"source": "q2", "target": "q3", "similarity": 0.4},
	{"source": "q3", "target": "q4"},
	{"source": "q1", "target": "q4", "similarity": 0.2}
]"#;

#[test]
fn upload_filter_and_layout() -> Result<()> {
	let nodes = parse_nodes("nodes.json", NODES)?;
	let links = parse_links("links.json", LINKS)?;
	assert_eq!(available_years(&nodes), vec![1990, 2000]);

	let filters = FilterState {
		selected_years: BTreeSet::from([2000]),
		show_outliers: false,
		similarity_threshold: 0.3,
	};
	let visible = build_snapshot(&nodes, &links, &filters);
	let ids: Vec<_> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, vec!["q3", "q4"]);
	assert_eq!(visible.links.len(), 3);

	let stats = GraphStats::collect(&nodes, &links, &visible);
	assert_eq!((stats.total_nodes, stats.filtered_nodes, stats.outliers), (4, 2, 1));

	// Only q3 -> q4 has both endpoints visible.
	let mut engine = LayoutEngine::new(&visible, ForceConfig::default(), 640.0, 480.0);
	assert_eq!(engine.links().len(), 1);

	let mut steps = 0;
	while engine.step() {
		steps += 1;
		assert!(steps < 1000);
	}
	assert!(engine.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));

	// The caller's records are untouched by the layout.
	assert_eq!(parse_nodes("nodes.json", NODES)?, nodes);
	Ok(())
}

#[test]
fn extra_fields_reach_the_tooltip() -> Result<()> {
	let nodes = parse_nodes("nodes.json", NODES)?;
	let visible = build_snapshot(&nodes, &[], &FilterState::default());
	let mut state = ForceGraphState::new(640.0, 480.0, Theme::default(), ForceConfig::default());
	state.load(&visible);

	let q3 = state.visuals.iter().find(|v| v.label == "q3").expect("q3 is visible");
	assert_eq!(q3.tooltip, "ID: q3\nYear: 2000\nsource: survey-b");
	Ok(())
}

#[test]
fn failed_upload_reports_file_name() {
	let err = parse_links("broken-links.json", "not json").unwrap_err();
	assert!(matches!(err, IngestError::Parse { .. }));
	assert!(err.to_string().starts_with("error parsing links file broken-links.json"));
}

#[test]
fn reload_discards_previous_layout() {
	let nodes = parse_nodes("nodes.json", NODES).unwrap();
	let links = parse_links("links.json", LINKS).unwrap();
	let mut state = ForceGraphState::new(640.0, 480.0, Theme::default(), ForceConfig::default());

	let all = build_snapshot(&nodes, &links, &FilterState::default());
	let first = state.load(&all);
	for _ in 0..10 {
		state.step(first);
	}

	let fewer = build_snapshot(
		&nodes,
		&links,
		&FilterState {
			show_outliers: false,
			..FilterState::default()
		},
	);
	let second = state.load(&fewer);
	assert!(!state.step(first), "stale generation must not tick");
	let engine = state.engine().unwrap();
	assert_eq!(engine.nodes().len(), 3);
	assert_eq!(engine.ticks(), 0);
	assert!(state.step(second));
}
