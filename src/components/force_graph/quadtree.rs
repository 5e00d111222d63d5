//! Point quadtree used by the many-body and collision forces.
//!
//! The tree is rebuilt from scratch every tick. Each cell caches the summed
//! weight of its points and their weighted centroid, so distant cells can be
//! treated as a single body (Barnes–Hut).

/// Depth at which subdivision stops; remaining points share one leaf.
const MAX_DEPTH: usize = 32;

/// A square region of the tree.
#[derive(Clone, Debug)]
pub struct Cell {
	/// Top-left corner.
	pub x0: f64,
	#[allow(missing_docs)]
	pub y0: f64,
	/// Bottom-right corner.
	pub x1: f64,
	#[allow(missing_docs)]
	pub y1: f64,
	/// Child cells (NW, NE, SW, SE). All `None` for leaves.
	pub children: [Option<usize>; 4],
	/// Points stored in this cell. Empty for internal cells.
	pub points: Vec<usize>,
	/// Sum of point weights in this cell and below.
	pub weight: f64,
	/// Centroid weighted by absolute point weight.
	pub cx: f64,
	#[allow(missing_docs)]
	pub cy: f64,
}

impl Cell {
	/// Whether the cell has no children.
	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	/// Side length of the (square) cell.
	pub fn width(&self) -> f64 {
		self.x1 - self.x0
	}
}

/// Arena-backed quadtree over a fixed set of points.
#[derive(Clone, Debug, Default)]
pub struct QuadTree {
	cells: Vec<Cell>,
}

impl QuadTree {
	/// Builds a tree over `points`, with `weights[i]` attached to point `i`.
	pub fn new(points: &[(f64, f64)], weights: &[f64]) -> Self {
		let mut tree = Self { cells: Vec::new() };
		if points.is_empty() {
			return tree;
		}

		let (mut x0, mut y0, mut x1, mut y1) = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		// Square extent, never degenerate.
		let size = (x1 - x0).max(y1 - y0).max(1.0);
		let indices: Vec<usize> = (0..points.len()).collect();
		tree.build(points, weights, indices, (x0, y0, x0 + size, y0 + size), 0);
		tree
	}

	fn build(
		&mut self,
		points: &[(f64, f64)],
		weights: &[f64],
		indices: Vec<usize>,
		(x0, y0, x1, y1): (f64, f64, f64, f64),
		depth: usize,
	) -> usize {
		let weight: f64 = indices.iter().map(|&i| weights[i]).sum();
		let abs_weight: f64 = indices.iter().map(|&i| weights[i].abs()).sum();
		let (cx, cy) = if abs_weight > 0.0 {
			let sx: f64 = indices.iter().map(|&i| points[i].0 * weights[i].abs()).sum();
			let sy: f64 = indices.iter().map(|&i| points[i].1 * weights[i].abs()).sum();
			(sx / abs_weight, sy / abs_weight)
		} else {
			let n = indices.len() as f64;
			(
				indices.iter().map(|&i| points[i].0).sum::<f64>() / n,
				indices.iter().map(|&i| points[i].1).sum::<f64>() / n,
			)
		};

		let idx = self.cells.len();
		self.cells.push(Cell {
			x0,
			y0,
			x1,
			y1,
			children: [None; 4],
			points: Vec::new(),
			weight,
			cx,
			cy,
		});

		let first = points[indices[0]];
		let coincident = indices.iter().all(|&i| points[i] == first);
		if indices.len() == 1 || coincident || depth >= MAX_DEPTH {
			self.cells[idx].points = indices;
			return idx;
		}

		let (xm, ym) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		let mut quadrants: [Vec<usize>; 4] = Default::default();
		for i in indices {
			let (x, y) = points[i];
			let q = (x >= xm) as usize | (((y >= ym) as usize) << 1);
			quadrants[q].push(i);
		}

		for (q, members) in quadrants.into_iter().enumerate() {
			if members.is_empty() {
				continue;
			}
			let bounds = match q {
				0 => (x0, y0, xm, ym),
				1 => (xm, y0, x1, ym),
				2 => (x0, ym, xm, y1),
				_ => (xm, ym, x1, y1),
			};
			let child = self.build(points, weights, members, bounds, depth + 1);
			self.cells[idx].children[q] = Some(child);
		}
		idx
	}

	/// Whether the tree was built over no points.
	pub fn is_empty(&self) -> bool {
		self.cells.is_empty()
	}

	/// The cell covering every point.
	pub fn root(&self) -> Option<&Cell> {
		self.cells.first()
	}

	/// Pre-order traversal. Returning `true` from `f` skips the cell's children.
	pub fn visit(&self, mut f: impl FnMut(&Cell) -> bool) {
		if self.cells.is_empty() {
			return;
		}
		let mut stack = vec![0];
		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if f(cell) {
				continue;
			}
			stack.extend(cell.children.iter().rev().flatten().copied());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_tree_visits_nothing() {
		let tree = QuadTree::new(&[], &[]);
		assert!(tree.is_empty());
		let mut count = 0;
		tree.visit(|_| {
			count += 1;
			false
		});
		assert_eq!(count, 0);
	}

	#[test]
	fn root_aggregates_weight_and_centroid() {
		let points = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)];
		let tree = QuadTree::new(&points, &[-1.0; 4]);
		let root = tree.root().unwrap();
		assert_eq!(root.weight, -4.0);
		assert!((root.cx - 5.0).abs() < 1e-9);
		assert!((root.cy - 5.0).abs() < 1e-9);
		assert!(!root.is_leaf());
	}

	#[test]
	fn every_point_lands_in_exactly_one_leaf() {
		let points: Vec<(f64, f64)> = (0..50)
			.map(|i| ((i * 7 % 13) as f64, (i * 3 % 11) as f64))
			.collect();
		let tree = QuadTree::new(&points, &vec![1.0; points.len()]);
		let mut seen = vec![0; points.len()];
		tree.visit(|cell| {
			for &p in &cell.points {
				seen[p] += 1;
				let (x, y) = points[p];
				assert!(x >= cell.x0 && x <= cell.x1 && y >= cell.y0 && y <= cell.y1);
			}
			false
		});
		assert!(seen.iter().all(|&c| c == 1));
	}

	#[test]
	fn coincident_points_share_a_leaf() {
		let points = [(3.0, 3.0); 5];
		let tree = QuadTree::new(&points, &[1.0; 5]);
		let root = tree.root().unwrap();
		assert!(root.is_leaf());
		assert_eq!(root.points.len(), 5);
	}

	#[test]
	fn visit_can_prune_children() {
		let points = [(0.0, 0.0), (10.0, 10.0)];
		let tree = QuadTree::new(&points, &[1.0, 1.0]);
		let mut visited = 0;
		tree.visit(|_| {
			visited += 1;
			true
		});
		assert_eq!(visited, 1);
	}
}
