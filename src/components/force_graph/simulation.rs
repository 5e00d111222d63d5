//! Force layout engine.
//!
//! [`LayoutEngine`] owns a private copy of the visible nodes and links and
//! relaxes their positions with four superposed forces. It never schedules
//! itself: the host calls [`LayoutEngine::step`] once per animation frame, and
//! the engine reports whether it actually ticked. Ticking continues while the
//! simulation's `alpha` stays above `alpha_min`, or indefinitely while a drag
//! holds `alpha_target` above it.
//!
//! [`EngineSlot`] pairs the active engine with a generation number so that a
//! frame scheduled for a torn-down engine can never advance its replacement.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, info};

use super::forces::{CenterForce, CollideForce, Lcg, LinkForce, ManyBodyForce};
use crate::model::{GraphNode, VisibleGraph};

/// Physics constants for the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Barnes–Hut accuracy parameter.
	pub theta: f64,
	/// Distances below this are clamped when computing charge.
	pub charge_distance_min: f64,
	/// Pairs farther apart than this ignore each other.
	pub charge_distance_max: f64,
	/// Fraction of the centroid offset corrected per tick.
	pub center_strength: f64,
	/// Collision radius of each node.
	pub collide_radius: f64,
	/// Fraction of an overlap corrected per tick.
	pub collide_strength: f64,
	/// Simulation stops once alpha drops below this.
	pub alpha_min: f64,
	/// Rate at which alpha approaches its target.
	pub alpha_decay: f64,
	/// Factor applied to velocities every tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 80.0,
			charge_strength: -300.0,
			theta: 0.9,
			charge_distance_min: 1.0,
			charge_distance_max: f64::INFINITY,
			center_strength: 1.0,
			collide_radius: 20.0,
			collide_strength: 1.0,
			alpha_min,
			// Roughly 300 ticks from 1.0 down to alpha_min.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.6,
			drag_alpha_target: 0.3,
		}
	}
}

/// A node under simulation: its record plus positional state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// The uploaded record this node was built from.
	pub record: GraphNode,
	/// Current position.
	pub x: f64,
	#[allow(missing_docs)]
	pub y: f64,
	/// Current velocity, applied to the position each tick.
	pub vx: f64,
	#[allow(missing_docs)]
	pub vy: f64,
	/// Pinned x coordinate, overriding physics while set.
	pub fx: Option<f64>,
	/// Pinned y coordinate, overriding physics while set.
	pub fy: Option<f64>,
}

impl SimNode {
	/// A resting node at `(x, y)`.
	pub fn at(record: GraphNode, x: f64, y: f64) -> Self {
		Self {
			record,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Starts from the record's own position, velocity and pin where given,
	/// falling back to `(x, y)` for the position.
	pub fn seeded(record: GraphNode, x: f64, y: f64) -> Self {
		let (x, y) = match (record.x, record.y) {
			(Some(rx), Some(ry)) if rx.is_finite() && ry.is_finite() => (rx, ry),
			_ => (x, y),
		};
		let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
		let (fx, fy) = (finite(record.fx), finite(record.fy));
		Self {
			x: fx.unwrap_or(x),
			y: fy.unwrap_or(y),
			vx: finite(record.vx).unwrap_or(0.0),
			vy: finite(record.vy).unwrap_or(0.0),
			fx,
			fy,
			record,
		}
	}

	/// Whether either coordinate is pinned.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// A link whose endpoints have been resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
	/// Index of the source node in the engine's node array.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Link similarity in `[0, 1]`; drives stroke width and opacity.
	pub similarity: f64,
}

impl SimLink {
	/// A link between two resolved node indices.
	pub fn new(source: usize, target: usize, similarity: f64) -> Self {
		Self {
			source,
			target,
			similarity,
		}
	}
}

type TickListener = Box<dyn FnMut(&[SimNode], &[SimLink])>;

/// Iterative force-directed layout over one visible snapshot.
pub struct LayoutEngine {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	config: ForceConfig,
	link_force: LinkForce,
	many_body: ManyBodyForce,
	center: CenterForce,
	collide: CollideForce,
	rng: Lcg,
	alpha: f64,
	alpha_target: f64,
	active: bool,
	ticks: u64,
	listeners: Vec<TickListener>,
}

impl LayoutEngine {
	/// Builds an engine centred in a `width` × `height` canvas.
	///
	/// Link endpoints are resolved by id; links naming a node that is not in
	/// `graph.nodes` are dropped. The engine starts out running.
	pub fn new(graph: &VisibleGraph, config: ForceConfig, width: f64, height: f64) -> Self {
		let (cx, cy) = (width / 2.0, height / 2.0);
		let golden_angle = PI * (3.0 - 5f64.sqrt());

		let nodes: Vec<SimNode> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				SimNode::seeded(node.clone(), cx + radius * angle.cos(), cy + radius * angle.sin())
			})
			.collect();

		let id_to_idx: HashMap<&str, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();

		let links: Vec<SimLink> = graph
			.links
			.iter()
			.filter_map(|link| {
				let source = *id_to_idx.get(link.source.as_str())?;
				let target = *id_to_idx.get(link.target.as_str())?;
				Some(SimLink::new(source, target, link.similarity()))
			})
			.collect();

		let dropped = graph.links.len() - links.len();
		if dropped > 0 {
			debug!("layout: dropped {} links with unresolved endpoints", dropped);
		}
		info!(
			"layout: built engine with {} nodes, {} links",
			nodes.len(),
			links.len()
		);

		Self {
			link_force: LinkForce::new(&links, nodes.len(), config.link_distance),
			many_body: ManyBodyForce::new(
				config.charge_strength,
				config.theta,
				config.charge_distance_min,
				config.charge_distance_max,
			),
			center: CenterForce {
				x: cx,
				y: cy,
				strength: config.center_strength,
			},
			collide: CollideForce::new(config.collide_radius, config.collide_strength),
			nodes,
			links,
			config,
			rng: Lcg::default(),
			alpha: 1.0,
			alpha_target: 0.0,
			active: true,
			ticks: 0,
			listeners: Vec::new(),
		}
	}

	/// Nodes in snapshot order, with their current positions.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Links whose endpoints resolved.
	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	/// Parameters the engine was built with.
	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	/// Current temperature; forces are scaled by it.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha decays toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Number of ticks applied so far.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Whether [`step`](Self::step) will advance the simulation.
	pub fn is_running(&self) -> bool {
		self.active
	}

	/// Resumes ticking without touching alpha.
	pub fn start(&mut self) {
		self.active = true;
	}

	/// Halts ticking. Pending frames become no-ops.
	pub fn stop(&mut self) {
		self.active = false;
	}

	/// Reheats the simulation to alpha = 1 and resumes ticking.
	pub fn restart(&mut self) {
		self.alpha = 1.0;
		self.active = true;
	}

	/// Sets the value alpha decays toward. Does not restart a settled engine.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Registers a callback invoked after every step with the updated state.
	pub fn on_tick(&mut self, listener: impl FnMut(&[SimNode], &[SimLink]) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	/// Holds node `idx` at `(x, y)` until unpinned.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Returns node `idx` to physics control.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Applies one integration step regardless of the running state.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.link_force
			.apply(&mut self.nodes, &self.links, alpha, &mut self.rng);
		self.many_body.apply(&mut self.nodes, alpha, &mut self.rng);
		self.center.apply(&mut self.nodes);
		self.collide.apply(&mut self.nodes, &mut self.rng);

		let decay = self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= decay;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= decay;
					node.y += node.vy;
				}
			}
		}
		self.ticks += 1;
	}

	/// Scheduler entry point: ticks once if running and notifies listeners.
	///
	/// Returns whether a tick happened. Once alpha falls below `alpha_min`
	/// the engine goes idle until restarted.
	pub fn step(&mut self) -> bool {
		if !self.active {
			return false;
		}
		self.tick();
		for listener in &mut self.listeners {
			listener(&self.nodes, &self.links);
		}
		if self.alpha < self.config.alpha_min {
			self.active = false;
			debug!("layout: settled after {} ticks", self.ticks);
		}
		true
	}
}

/// Holds the engine currently driven by the frame loop.
#[derive(Default)]
pub struct EngineSlot {
	generation: u64,
	engine: Option<LayoutEngine>,
}

impl EngineSlot {
	/// Replaces any previous engine, returning the new generation.
	pub fn install(&mut self, engine: LayoutEngine) -> u64 {
		self.teardown();
		self.engine = Some(engine);
		self.generation
	}

	/// Stops and drops the current engine.
	pub fn teardown(&mut self) {
		if let Some(mut engine) = self.engine.take() {
			engine.stop();
		}
		self.generation += 1;
	}

	/// Generation of the installed engine; bumped by every install and teardown.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// The live engine, if any.
	pub fn engine(&self) -> Option<&LayoutEngine> {
		self.engine.as_ref()
	}

	/// Mutable access to the live engine.
	pub fn engine_mut(&mut self) -> Option<&mut LayoutEngine> {
		self.engine.as_mut()
	}

	/// Steps the engine if `generation` still names it. Stale calls are no-ops.
	pub fn step(&mut self, generation: u64) -> bool {
		if generation != self.generation {
			return false;
		}
		self.engine.as_mut().is_some_and(LayoutEngine::step)
	}
}
