//! Graph store: the live node set, link set and focal node of one topic.
//!
//! Nodes and links enter only through expansion and leave only through
//! [`MindMap::prune`]. A topic change calls [`MindMap::reset`], which discards
//! everything and bumps the epoch so late expansion results can be told apart.

use std::collections::HashSet;

use log::error;

use super::metrics::{Metrics, TextMeasure};
use super::types::{Bounds, Link, Node, NodeId};
use crate::error::{MindMapError, Result};

/// The mutable graph plus the viewport it is laid out in.
#[derive(Clone, Debug, Default)]
pub struct MindMap {
	nodes: Vec<Node>,
	links: Vec<Link>,
	focus: Option<NodeId>,
	next_id: u32,
	epoch: u64,
	topic: String,
	/// False until a layout step finds nothing moving.
	pub stable: bool,
	pub bounds: Bounds,
}

impl MindMap {
	pub fn new(bounds: Bounds) -> Self {
		Self {
			bounds,
			..Self::default()
		}
	}

	/// Drops every node and link and starts a new topic.
	pub fn reset(&mut self, topic: impl Into<String>) {
		self.nodes.clear();
		self.links.clear();
		self.focus = None;
		self.epoch += 1;
		self.topic = topic.into();
		self.stable = false;
	}

	pub fn topic(&self) -> &str {
		&self.topic
	}

	/// Generation counter, bumped on every [`MindMap::reset`].
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn focus(&self) -> Option<NodeId> {
		self.focus
	}

	pub fn is_focus(&self, id: NodeId) -> bool {
		self.focus == Some(id)
	}

	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	pub fn find_by_label(&self, label: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.label == label)
	}

	/// Topmost-first hit test: the first node whose circle contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<NodeId> {
		self.nodes.iter().find(|n| n.contains(x, y)).map(|n| n.id)
	}

	pub fn mark_unstable(&mut self) {
		self.stable = false;
	}

	/// Updates the viewport; the layout has to settle again.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width, height);
		self.stable = false;
	}

	/// Allocates a fresh node handle.
	pub fn allocate_id(&mut self) -> NodeId {
		let id = NodeId(self.next_id);
		self.next_id += 1;
		id
	}

	/// Appends `node`. Duplicate labels are the caller's concern.
	pub fn add_node(&mut self, node: Node) -> NodeId {
		let id = node.id;
		self.nodes.push(node);
		self.stable = false;
		id
	}

	/// Links `a` to `b` and records each as the other's neighbor.
	pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<()> {
		for id in [a, b] {
			if self.node(id).is_none() {
				error!("vocab-mindmap: link to missing node {:?}", id);
				return Err(MindMapError::invariant(format!("link endpoint {id:?} not in graph")));
			}
		}
		self.links.push(Link {
			source: a,
			target: b,
		});
		for (node, other) in [(a, b), (b, a)] {
			if let Some(n) = self.node_mut(node) {
				n.neighbors.push(other);
			}
		}
		self.stable = false;
		Ok(())
	}

	/// Makes `id` the focal node.
	///
	/// The previous focal node is marked expanded, whether or not its own
	/// expansion finished. The new focal node is re-measured with the focal
	/// font.
	pub fn set_focus<M: TextMeasure>(&mut self, id: NodeId, metrics: &Metrics<M>) -> Result<()> {
		let Some(label) = self.node(id).map(|n| n.label.clone()) else {
			error!("vocab-mindmap: focus on missing node {:?}", id);
			return Err(MindMapError::invariant(format!("focus target {id:?} not in graph")));
		};

		if let Some(previous) = self.focus.filter(|&prev| prev != id) {
			if let Some(prev) = self.node_mut(previous) {
				prev.expanded = true;
			}
		}

		let radius = metrics.measure_radius(&label, true);
		if let Some(node) = self.node_mut(id) {
			node.radius = radius;
			node.dragging = false;
		}
		self.focus = Some(id);
		self.stable = false;
		Ok(())
	}

	/// Bounds the graph to the focal neighborhood once it exceeds `max_nodes`.
	///
	/// Keeps the focal node and its direct neighbors, even when that set alone
	/// is larger than `max_nodes`. Returns the number of nodes removed.
	pub fn prune(&mut self, max_nodes: usize) -> usize {
		if self.nodes.len() <= max_nodes {
			return 0;
		}
		let Some(focus) = self.focus.and_then(|id| self.node(id)) else {
			return 0;
		};

		let keep: HashSet<NodeId> = std::iter::once(focus.id)
			.chain(focus.neighbors.iter().copied())
			.collect();

		let before = self.nodes.len();
		self.nodes.retain(|n| keep.contains(&n.id));
		self.links
			.retain(|l| keep.contains(&l.source) && keep.contains(&l.target));
		for node in &mut self.nodes {
			node.neighbors.retain(|id| keep.contains(id));
		}
		self.stable = false;
		before - self.nodes.len()
	}
}
