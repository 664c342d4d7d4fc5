//! Node, link and viewport types owned by the graph store.

/// Stable handle of a node inside one graph.
///
/// Handles are never reused within a graph; a handle from a previous topic may
/// resolve to nothing after a reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// Expansion lifecycle of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionState {
	/// Related words not fetched yet (or the last fetch failed).
	Collapsed,
	/// A fetch is in flight.
	Loading,
	/// Related words fetched and linked.
	Expanded,
}

/// A word on the canvas. Identity for merging is the label text.
#[derive(Clone, Debug)]
pub struct Node {
	pub id: NodeId,
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub expanded: bool,
	pub loading: bool,
	pub dragging: bool,
	/// Neighbors, one entry per link (duplicates possible).
	pub neighbors: Vec<NodeId>,
}

impl Node {
	pub fn new(id: NodeId, label: impl Into<String>, x: f64, y: f64, radius: f64) -> Self {
		Self {
			id,
			label: label.into(),
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius,
			expanded: false,
			loading: false,
			dragging: false,
			neighbors: Vec::new(),
		}
	}

	pub fn state(&self) -> ExpansionState {
		if self.loading {
			ExpansionState::Loading
		} else if self.expanded {
			ExpansionState::Expanded
		} else {
			ExpansionState::Collapsed
		}
	}

	/// Whether the circle contains the point `(x, y)`.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		(self.x - x).hypot(self.y - y) <= self.radius
	}
}

/// Link drawn as an arrow from `source` to `target`; undirected for pruning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: NodeId,
	pub target: NodeId,
}

/// Drawable area in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}
