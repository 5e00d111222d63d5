//! Force-directed graph visualization component.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - A d3-style force simulation (link, many-body, centering, collision)
//! - Pan, zoom, and node dragging interactions
//! - Year-based colouring, outlier highlighting and hover tooltips
//!
//! # Example
//!
//! ```ignore
//! use similarity_dashboard::components::force_graph::ForceGraphCanvas;
//! use similarity_dashboard::model::{build_snapshot, FilterState, GraphLink, GraphNode};
//!
//! let nodes = vec![GraphNode::new("a"), GraphNode::new("b")];
//! let links = vec![GraphLink::new("a", "b").with_similarity(0.8)];
//! let visible = build_snapshot(&nodes, &links, &FilterState::default());
//!
//! view! { <ForceGraphCanvas data=Signal::stored(visible) /> }
//! ```

mod component;
pub mod forces;
pub mod quadtree;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use simulation::{EngineSlot, ForceConfig, LayoutEngine, SimLink, SimNode};
pub use state::{ForceGraphState, ViewTransform};
pub use theme::{Color, Theme, YearScale};
