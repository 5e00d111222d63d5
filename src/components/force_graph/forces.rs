//! The four forces superposed on every simulation tick.
//!
//! Link, many-body and collision forces adjust velocities; the centering force
//! translates positions directly. Each is a plain value configured once when
//! the engine is built.

use super::quadtree::QuadTree;
use super::simulation::{SimLink, SimNode};

/// Deterministic linear congruential generator for separating coincident nodes.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Default for Lcg {
	fn default() -> Self {
		Self(1)
	}
}

impl Lcg {
	/// Next value in [0, 1).
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// A tiny non-zero-mean offset used in place of a zero distance.
	pub fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// Spring force pulling linked nodes towards a target separation.
#[derive(Clone, Debug)]
pub struct LinkForce {
	distance: f64,
	/// Per-link strength: 1 / min(degree(source), degree(target)).
	strengths: Vec<f64>,
	/// Per-link share of the correction applied to the target.
	biases: Vec<f64>,
}

impl LinkForce {
	/// Precomputes degree-normalised strengths and biases for `links`.
	pub fn new(links: &[SimLink], node_count: usize, distance: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		for link in links {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let strengths = links
			.iter()
			.map(|l| 1.0 / degree[l.source].min(degree[l.target]) as f64)
			.collect();
		let biases = links
			.iter()
			.map(|l| {
				let (s, t) = (degree[l.source] as f64, degree[l.target] as f64);
				s / (s + t)
			})
			.collect();
		Self {
			distance,
			strengths,
			biases,
		}
	}

	/// Nudges each linked pair's velocities toward the rest distance.
	pub fn apply(&self, nodes: &mut [SimNode], links: &[SimLink], alpha: f64, rng: &mut Lcg) {
		for (i, link) in links.iter().enumerate() {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = rng.jiggle();
			}
			if dy == 0.0 {
				dy = rng.jiggle();
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - self.distance) / l * alpha * self.strengths[i];
			let (dx, dy) = (dx * k, dy * k);
			let b = self.biases[i];

			let target = &mut nodes[link.target];
			target.vx -= dx * b;
			target.vy -= dy * b;
			let source = &mut nodes[link.source];
			source.vx += dx * (1.0 - b);
			source.vy += dy * (1.0 - b);
		}
	}
}

/// Pairwise charge between all nodes, approximated with Barnes–Hut.
#[derive(Clone, Debug)]
pub struct ManyBodyForce {
	strength: f64,
	theta2: f64,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBodyForce {
	/// Negative `strength` repels. Cells narrower than `theta` times their
	/// distance are treated as one body.
	pub fn new(strength: f64, theta: f64, distance_min: f64, distance_max: f64) -> Self {
		Self {
			strength,
			theta2: theta * theta,
			distance_min2: distance_min * distance_min,
			distance_max2: distance_max * distance_max,
		}
	}

	/// Adds the approximated charge from every other node to each velocity.
	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64, rng: &mut Lcg) {
		let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
		let weights = vec![self.strength; nodes.len()];
		let tree = QuadTree::new(&points, &weights);

		for (i, node) in nodes.iter_mut().enumerate() {
			let (x, y) = (node.x, node.y);
			let (mut fx, mut fy) = (0.0, 0.0);

			tree.visit(|cell| {
				let (mut dx, mut dy) = (cell.cx - x, cell.cy - y);
				let mut l = dx * dx + dy * dy;
				let w = cell.width();

				// Far enough away: treat the whole cell as one body.
				if w * w / self.theta2 < l {
					if l < self.distance_max2 {
						if dx == 0.0 {
							dx = rng.jiggle();
							l += dx * dx;
						}
						if dy == 0.0 {
							dy = rng.jiggle();
							l += dy * dy;
						}
						if l < self.distance_min2 {
							l = (self.distance_min2 * l).sqrt();
						}
						fx += dx * cell.weight * alpha / l;
						fy += dy * cell.weight * alpha / l;
					}
					return true;
				}

				if !cell.is_leaf() {
					return false;
				}
				if l >= self.distance_max2 {
					return true;
				}

				for &j in &cell.points {
					if j == i {
						continue;
					}
					let (px, py) = points[j];
					let (mut dx, mut dy) = (px - x, py - y);
					if dx == 0.0 {
						dx = rng.jiggle();
					}
					if dy == 0.0 {
						dy = rng.jiggle();
					}
					let mut l = dx * dx + dy * dy;
					if l < self.distance_min2 {
						l = (self.distance_min2 * l).sqrt();
					}
					fx += dx * weights[j] * alpha / l;
					fy += dy * weights[j] * alpha / l;
				}
				true
			});

			node.vx += fx;
			node.vy += fy;
		}
	}
}

/// Translates all nodes so their centroid sits at a fixed point.
#[derive(Clone, Debug)]
pub struct CenterForce {
	/// Target centroid.
	pub x: f64,
	#[allow(missing_docs)]
	pub y: f64,
	/// Fraction of the offset removed per tick.
	pub strength: f64,
}

impl CenterForce {
	/// Shifts positions directly; velocities are untouched.
	pub fn apply(&self, nodes: &mut [SimNode]) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let dx = (sx / n - self.x) * self.strength;
		let dy = (sy / n - self.y) * self.strength;
		for node in nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

/// Pushes apart nodes whose circles overlap.
#[derive(Clone, Debug)]
pub struct CollideForce {
	radius: f64,
	strength: f64,
}

impl CollideForce {
	/// Every node gets the same collision `radius`.
	pub fn new(radius: f64, strength: f64) -> Self {
		Self { radius, strength }
	}

	/// Resolves overlaps between predicted positions by adjusting velocities.
	pub fn apply(&self, nodes: &mut [SimNode], rng: &mut Lcg) {
		let predicted: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x + n.vx, n.y + n.vy)).collect();
		let tree = QuadTree::new(&predicted, &vec![1.0; nodes.len()]);
		let r = self.radius * 2.0;
		let r2 = r * r;

		for i in 0..nodes.len() {
			let (xi, yi) = (nodes[i].x + nodes[i].vx, nodes[i].y + nodes[i].vy);

			tree.visit(|cell| {
				for &j in &cell.points {
					if j <= i {
						continue;
					}
					let mut dx = xi - nodes[j].x - nodes[j].vx;
					let mut dy = yi - nodes[j].y - nodes[j].vy;
					let mut l = dx * dx + dy * dy;
					if l >= r2 {
						continue;
					}
					if dx == 0.0 {
						dx = rng.jiggle();
						l += dx * dx;
					}
					if dy == 0.0 {
						dy = rng.jiggle();
						l += dy * dy;
					}
					l = l.sqrt();
					let k = (r - l) / l * self.strength;
					// Equal radii: the correction is split evenly.
					let (dx, dy) = (dx * k * 0.5, dy * k * 0.5);
					nodes[i].vx += dx;
					nodes[i].vy += dy;
					nodes[j].vx -= dx;
					nodes[j].vy -= dy;
				}
				cell.x0 > xi + r || cell.x1 < xi - r || cell.y0 > yi + r || cell.y1 < yi - r
			});
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::GraphNode;

	fn nodes_at(points: &[(f64, f64)]) -> Vec<SimNode> {
		points
			.iter()
			.enumerate()
			.map(|(i, &(x, y))| SimNode::at(GraphNode::new(format!("n{i}")), x, y))
			.collect()
	}

	#[test]
	fn lcg_is_deterministic() {
		let (mut a, mut b) = (Lcg::default(), Lcg::default());
		for _ in 0..10 {
			assert_eq!(a.next_f64(), b.next_f64());
		}
		let j = a.jiggle();
		assert!(j.abs() <= 0.5e-6);
	}

	#[test]
	fn link_pulls_distant_pair_together() {
		let mut nodes = nodes_at(&[(0.0, 0.0), (200.0, 0.0)]);
		let links = vec![SimLink::new(0, 1, 1.0)];
		let force = LinkForce::new(&links, 2, 80.0);
		force.apply(&mut nodes, &links, 1.0, &mut Lcg::default());
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[1].vx < 0.0);
	}

	#[test]
	fn link_pushes_close_pair_apart() {
		let mut nodes = nodes_at(&[(0.0, 0.0), (10.0, 0.0)]);
		let links = vec![SimLink::new(0, 1, 1.0)];
		LinkForce::new(&links, 2, 80.0).apply(&mut nodes, &links, 1.0, &mut Lcg::default());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
	}

	#[test]
	fn self_link_is_a_no_op() {
		let mut nodes = nodes_at(&[(5.0, 5.0)]);
		let links = vec![SimLink::new(0, 0, 1.0)];
		LinkForce::new(&links, 1, 80.0).apply(&mut nodes, &links, 1.0, &mut Lcg::default());
		assert_eq!((nodes[0].vx, nodes[0].vy), (0.0, 0.0));
	}

	#[test]
	fn link_strength_is_normalised_by_degree() {
		let links = vec![SimLink::new(0, 1, 1.0), SimLink::new(0, 2, 1.0), SimLink::new(0, 3, 1.0)];
		let force = LinkForce::new(&links, 4, 80.0);
		assert_eq!(force.strengths, vec![1.0; 3]);
		assert!((force.biases[0] - 0.75).abs() < 1e-12);
	}

	#[test]
	fn many_body_repels() {
		let mut nodes = nodes_at(&[(0.0, 0.0), (10.0, 0.0)]);
		ManyBodyForce::new(-300.0, 0.9, 1.0, f64::INFINITY).apply(&mut nodes, 1.0, &mut Lcg::default());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert!((nodes[0].vx + nodes[1].vx).abs() < 1e-9);
	}

	#[test]
	fn many_body_approximation_keeps_direction() {
		let mut points = vec![(0.0, 0.0)];
		points.extend((0..30).map(|i| (500.0 + (i % 6) as f64, (i / 6) as f64)));
		let mut nodes = nodes_at(&points);
		ManyBodyForce::new(-300.0, 0.9, 1.0, f64::INFINITY).apply(&mut nodes, 1.0, &mut Lcg::default());
		assert!(nodes[0].vx < 0.0);
	}

	#[test]
	fn many_body_separates_coincident_nodes() {
		let mut nodes = nodes_at(&[(1.0, 1.0), (1.0, 1.0)]);
		ManyBodyForce::new(-300.0, 0.9, 1.0, f64::INFINITY).apply(&mut nodes, 1.0, &mut Lcg::default());
		assert!(nodes.iter().all(|n| n.vx.is_finite() && n.vy.is_finite()));
		assert!(nodes[0].vx != 0.0 || nodes[0].vy != 0.0);
	}

	#[test]
	fn center_moves_centroid_to_target() {
		let mut nodes = nodes_at(&[(0.0, 0.0), (10.0, 20.0)]);
		CenterForce {
			x: 100.0,
			y: 100.0,
			strength: 1.0,
		}
		.apply(&mut nodes);
		let cx = (nodes[0].x + nodes[1].x) / 2.0;
		let cy = (nodes[0].y + nodes[1].y) / 2.0;
		assert!((cx - 100.0).abs() < 1e-9 && (cy - 100.0).abs() < 1e-9);
		assert!((nodes[1].x - nodes[0].x - 10.0).abs() < 1e-9);
	}

	#[test]
	fn center_on_empty_is_a_no_op() {
		CenterForce {
			x: 0.0,
			y: 0.0,
			strength: 1.0,
		}
		.apply(&mut []);
	}

	#[test]
	fn collide_separates_overlapping_nodes() {
		let mut nodes = nodes_at(&[(0.0, 0.0), (10.0, 0.0), (500.0, 500.0)]);
		CollideForce::new(20.0, 1.0).apply(&mut nodes, &mut Lcg::default());
		assert!(nodes[0].vx < 0.0);
		assert!(nodes[1].vx > 0.0);
		assert_eq!((nodes[2].vx, nodes[2].vy), (0.0, 0.0));
	}
}
