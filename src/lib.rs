//! similarity-dashboard: upload, filter and explore similarity networks.
//!
//! This crate provides a WASM dashboard that ingests a nodes document and a
//! links document, filters them by year, outlier flag and link similarity, and
//! renders the result as an animated force-directed graph with drag, pan and
//! zoom.

use std::collections::BTreeSet;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod components;
pub mod error;
pub mod model;

pub use components::force_graph::{ForceConfig, ForceGraphCanvas, LayoutEngine};
pub use error::{DocumentKind, IngestError};
pub use model::{FilterState, GraphLink, GraphNode, GraphStats, VisibleGraph};

use components::dashboard::{FilterControls, StatsCard, Upload, UploadCard};
use model::{available_years, build_snapshot, parse_links, parse_nodes};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("similarity-dashboard: logging initialized");
}

/// Main application component.
///
/// Holds the uploaded dataset and filter state; every change rebuilds the
/// visible snapshot, which in turn restarts the graph layout.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let nodes = RwSignal::new(Vec::<GraphNode>::new());
	let links = RwSignal::new(Vec::<GraphLink>::new());
	let nodes_file = RwSignal::new(None::<String>);
	let links_file = RwSignal::new(None::<String>);
	let error = RwSignal::new(None::<String>);

	let threshold = RwSignal::new(0.0);
	let selected_years = RwSignal::new(BTreeSet::<i64>::new());
	let show_outliers = RwSignal::new(true);
	let years = RwSignal::new(Vec::<i64>::new());

	let report = Callback::new(move |err: IngestError| {
		warn!("similarity-dashboard: {}", err);
		error.set(Some(err.to_string()));
	});

	let on_nodes = Callback::new(move |(file, text): Upload| match parse_nodes(&file, &text) {
		Ok(parsed) => {
			let found = available_years(&parsed);
			selected_years.set(found.iter().copied().collect());
			years.set(found);
			nodes.set(parsed);
			nodes_file.set(Some(file));
			error.set(None);
		}
		Err(err) => report.run(err),
	});

	let on_links = Callback::new(move |(file, text): Upload| match parse_links(&file, &text) {
		Ok(parsed) => {
			links.set(parsed);
			links_file.set(Some(file));
			error.set(None);
		}
		Err(err) => report.run(err),
	});

	let filters = Memo::new(move |_| FilterState {
		selected_years: selected_years.get(),
		show_outliers: show_outliers.get(),
		similarity_threshold: threshold.get(),
	});
	let visible = Memo::new(move |_| {
		nodes.with(|n| links.with(|l| filters.with(|f| build_snapshot(n, l, f))))
	});
	let stats = Memo::new(move |_| {
		nodes.with(|n| links.with(|l| visible.with(|v| GraphStats::collect(n, l, v))))
	});
	let has_data = move || nodes.with(|n| !n.is_empty()) && links.with(|l| !l.is_empty());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Analysis Dashboard" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="dashboard">
			<header>
				<h1>"Analysis Dashboard"</h1>
				<p class="muted">
					"Upload your data files and explore visual similarity networks with interactive controls"
				</p>
			</header>

			<section class="upload-grid">
				<UploadCard
					kind=DocumentKind::Nodes
					file_name=nodes_file
					loaded=Signal::derive(move || nodes.with(Vec::len))
					on_load=on_nodes
					on_error=report
				/>
				<UploadCard
					kind=DocumentKind::Links
					file_name=links_file
					loaded=Signal::derive(move || links.with(Vec::len))
					on_load=on_links
					on_error=report
				/>
			</section>

			{move || error.get().map(|msg| view! { <div class="alert" role="alert">{msg}</div> })}

			<Show when=has_data>
				<section class="stats-grid">
					<StatsCard title="Total Nodes" value=Signal::derive(move || stats.get().total_nodes) color="#e76e50" />
					<StatsCard title="Filtered Nodes" value=Signal::derive(move || stats.get().filtered_nodes) color="#2a9d90" />
					<StatsCard title="Total Links" value=Signal::derive(move || stats.get().total_links) color="#274754" />
					<StatsCard title="Active Links" value=Signal::derive(move || stats.get().filtered_links) color="#e8c468" />
					<StatsCard title="Outliers" value=Signal::derive(move || stats.get().outliers) color="#f4a462" />
				</section>

				<section class="main-grid">
					<FilterControls
						threshold=threshold
						selected_years=selected_years
						available_years=years
						show_outliers=show_outliers
					/>
					<div class="card graph-card">
						<div class="card-header">
							<h3 class="card-title">"Network Graph"</h3>
							<p class="card-description">
								{move || {
									let s = stats.get();
									format!(
										"Interactive visualization of {} nodes and {} connections",
										s.filtered_nodes,
										s.filtered_links,
									)
								}}
							</p>
						</div>
						<div style="position: relative; height: 600px; width: 100%;">
							<ForceGraphCanvas data=visible height=Some(600.0) />
							<div class="graph-legend">
								<p>"Controls"</p>
								<p class="muted">"• Drag nodes to reposition"</p>
								<p class="muted">"• Scroll to zoom"</p>
								<p class="muted">"• Pan with click + drag"</p>
							</div>
						</div>
					</div>
				</section>
			</Show>
		</main>
	}
}
