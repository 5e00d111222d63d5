//! Filter controls: similarity threshold, year selection, outlier toggle.

use std::collections::BTreeSet;

use leptos::prelude::*;

/// Adds `year` to the selection, or removes it if already selected.
pub fn toggle_year(selected: &mut BTreeSet<i64>, year: i64) {
	if !selected.remove(&year) {
		selected.insert(year);
	}
}

/// Parses a slider value, clamped to [0, 1].
pub fn parse_threshold(value: &str) -> Option<f64> {
	value
		.trim()
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.map(|v| v.clamp(0.0, 1.0))
}

/// Side panel with the filter inputs.
#[component]
pub fn FilterControls(
	/// Minimum link similarity, `0.0..=1.0`.
	threshold: RwSignal<f64>,
	/// Checked years; empty means no year filter.
	selected_years: RwSignal<BTreeSet<i64>>,
	/// Years offered as checkboxes.
	#[prop(into)]
	available_years: Signal<Vec<i64>>,
	/// Whether outlier nodes are shown.
	show_outliers: RwSignal<bool>,
) -> impl IntoView {
	let on_threshold = move |ev: web_sys::Event| {
		if let Some(value) = parse_threshold(&event_target_value(&ev)) {
			threshold.set(value);
		}
	};

	view! {
		<div class="controls">
			<div class="card">
				<div class="card-header">
					<h3 class="card-title">"Similarity Threshold"</h3>
					<p class="card-description">"Filter links by similarity score"</p>
				</div>
				<div class="card-content">
					<div class="row">
						<label>"Threshold"</label>
						<span class="muted">{move || format!("{:.2}", threshold.get())}</span>
					</div>
					<input
						type="range"
						min="0"
						max="1"
						step="0.01"
						prop:value=move || threshold.get().to_string()
						on:input=on_threshold
					/>
				</div>
			</div>

			<div class="card">
				<div class="card-header">
					<h3 class="card-title">"Years"</h3>
					<p class="card-description">"No selection shows every year"</p>
				</div>
				<div class="card-content">
					{move || {
						available_years
							.get()
							.into_iter()
							.map(|year| {
								view! {
									<label class="row">
										<input
											type="checkbox"
											prop:checked=move || {
												selected_years.with(|s| s.contains(&year))
											}
											on:change=move |_| {
												selected_years.update(|s| toggle_year(s, year))
											}
										/>
										<span>{year.to_string()}</span>
									</label>
								}
							})
							.collect_view()
					}}
				</div>
			</div>

			<div class="card">
				<div class="card-header">
					<h3 class="card-title">"Display Options"</h3>
					<p class="card-description">"Toggle visualization elements"</p>
				</div>
				<div class="card-content row">
					<label for="outliers-toggle">"Show Outliers"</label>
					<input
						id="outliers-toggle"
						type="checkbox"
						prop:checked=move || show_outliers.get()
						on:change=move |ev| show_outliers.set(event_target_checked(&ev))
					/>
				</div>
			</div>
		</div>
	}
}
