//! Dashboard glue around the graph: uploads, stats and filter controls.

mod controls;
mod stats;
mod upload;

pub use controls::{FilterControls, parse_threshold, toggle_year};
pub use stats::{StatsCard, format_count};
pub use upload::{Upload, UploadCard};
