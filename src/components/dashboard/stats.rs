//! Stat cards summarising the loaded and filtered dataset.

use leptos::prelude::*;

/// Formats a count with thousands separators.
pub fn format_count(value: usize) -> String {
	let digits = value.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

/// A single titled count.
#[component]
pub fn StatsCard(
	/// Caption above the value.
	title: &'static str,
	/// Count to display.
	#[prop(into)]
	value: Signal<usize>,
	/// Accent colour (CSS).
	#[prop(default = "#e76e50")]
	color: &'static str,
) -> impl IntoView {
	view! {
		<div class="card stat-card" style=format!("border-top: 3px solid {color};")>
			<p class="muted">{title}</p>
			<p class="stat-value">{move || format_count(value.get())}</p>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn groups_thousands() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1000), "1,000");
		assert_eq!(format_count(1234567), "1,234,567");
	}
}
