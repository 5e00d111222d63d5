//! Graph model: uploaded records, ingestion, and filtered snapshots.

pub mod ingest;
pub mod snapshot;
pub mod types;

pub use ingest::{parse_links, parse_nodes};
pub use snapshot::{GraphStats, VisibleGraph, available_years, build_snapshot};
pub use types::{FilterState, GraphLink, GraphNode};
