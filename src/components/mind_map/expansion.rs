//! Node expansion: `Collapsed -> Loading -> Expanded`.
//!
//! An expansion is split into a synchronous [`Expander::begin`], the awaited
//! word-source call, and a synchronous [`Expander::finish`]. The graph is only
//! borrowed inside the two synchronous halves, never across the await, so the
//! animation loop keeps running while a request is in flight.

use std::cell::RefCell;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::metrics::{Metrics, TextMeasure, clamp_into_view, generate_child_position};
use super::state::MindMap;
use super::types::{Node, NodeId};
use crate::api::{WordSource, seed_words};
use crate::config::{Config, GraphConfig, PlacementConfig, VocabularyConfig};
use crate::error::{MindMapError, Result};

/// Seed words requested when a topic starts.
const SEED_COUNT: usize = 5;

/// Root label when the seed list comes back empty.
const DEFAULT_ROOT: &str = "environment";

/// Captured state of an expansion waiting on the word source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionTicket {
	pub node: NodeId,
	pub label: String,
	pub topic: String,
	epoch: u64,
}

/// How an expansion request ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpansionOutcome {
	/// The node was already expanded or loading; nothing happened.
	Skipped,
	/// Words were merged into the graph.
	Expanded {
		/// New nodes created.
		added: usize,
		/// Links to nodes that already existed.
		merged: usize,
		/// Nodes dropped by the pruning pass.
		pruned: usize,
	},
	/// The word source failed; the node is collapsed again and retryable.
	Failed(MindMapError),
	/// The topic changed (or the node vanished) while the request was out.
	Stale,
}

/// Drives expansions against a word source.
pub struct Expander<S, M> {
	source: S,
	metrics: Metrics<M>,
	rng: RefCell<SmallRng>,
	graph: GraphConfig,
	placement: PlacementConfig,
	vocabulary: VocabularyConfig,
}

impl<S: WordSource, M: TextMeasure> Expander<S, M> {
	pub fn new(source: S, measure: M, config: &Config, seed: u64) -> Self {
		Self {
			source,
			metrics: Metrics::new(measure, config.graph.clone()),
			rng: RefCell::new(SmallRng::seed_from_u64(seed)),
			graph: config.graph.clone(),
			placement: config.placement.clone(),
			vocabulary: config.vocabulary.clone(),
		}
	}

	pub fn source(&self) -> &S {
		&self.source
	}

	pub fn metrics(&self) -> &Metrics<M> {
		&self.metrics
	}

	/// Enters `Loading`: focuses the node and marks it busy.
	///
	/// Returns `None` when the node is already loading or expanded, so repeated
	/// clicks never queue a second request.
	pub fn begin(&self, map: &mut MindMap, id: NodeId) -> Result<Option<ExpansionTicket>> {
		let Some(node) = map.node(id) else {
			return Err(MindMapError::invariant(format!("expanding missing node {id:?}")));
		};
		if node.expanded || node.loading {
			debug!("vocab-mindmap: {:?} already {:?}", node.label, node.state());
			return Ok(None);
		}
		let label = node.label.clone();

		map.set_focus(id, &self.metrics)?;
		if let Some(node) = map.node_mut(id) {
			node.loading = true;
		}
		Ok(Some(ExpansionTicket {
			node: id,
			label,
			topic: map.topic().to_string(),
			epoch: map.epoch(),
		}))
	}

	/// Leaves `Loading` with the word source's answer.
	///
	/// Existing labels are linked rather than duplicated; new words become
	/// children placed around the expanding node. Pruning runs afterwards.
	pub fn finish(
		&self,
		map: &mut MindMap,
		ticket: ExpansionTicket,
		words: Result<Vec<String>>,
	) -> Result<ExpansionOutcome> {
		if map.epoch() != ticket.epoch {
			warn!(
				"vocab-mindmap: dropping words for {:?}, topic changed to {:?}",
				ticket.label,
				map.topic()
			);
			return Ok(ExpansionOutcome::Stale);
		}
		let Some(parent) = map.node_mut(ticket.node) else {
			warn!("vocab-mindmap: {:?} was pruned while loading", ticket.label);
			return Ok(ExpansionOutcome::Stale);
		};
		parent.loading = false;
		let (parent_x, parent_y) = (parent.x, parent.y);

		let words = match words {
			Ok(words) => words,
			Err(e) => {
				warn!("vocab-mindmap: expanding {:?} failed: {e}", ticket.label);
				return Ok(ExpansionOutcome::Failed(e));
			}
		};

		let (mut added, mut merged) = (0, 0);
		for word in words.into_iter().take(self.graph.max_connections) {
			if word == ticket.label {
				continue;
			}
			if let Some(existing) = map.find_by_label(&word).map(|n| n.id) {
				map.link(ticket.node, existing)?;
				merged += 1;
				continue;
			}

			let (x, y) = generate_child_position(
				parent_x,
				parent_y,
				map.bounds,
				&self.placement,
				&mut *self.rng.borrow_mut(),
			);
			let radius = self.metrics.measure_radius(&word, false);
			let id = map.allocate_id();
			let mut child = Node::new(id, word, x, y, radius);
			clamp_into_view(&mut child, map.bounds, self.graph.margin);
			map.add_node(child);
			map.link(ticket.node, id)?;
			added += 1;
		}

		if let Some(parent) = map.node_mut(ticket.node) {
			parent.expanded = true;
		}
		let pruned = map.prune(self.graph.max_nodes);
		debug!(
			"vocab-mindmap: expanded {:?}: {added} new, {merged} merged, {pruned} pruned",
			ticket.label
		);
		Ok(ExpansionOutcome::Expanded {
			added,
			merged,
			pruned,
		})
	}

	/// Full expansion of `id`: begin, ask the source, finish.
	pub async fn expand(&self, map: &RefCell<MindMap>, id: NodeId) -> Result<ExpansionOutcome> {
		let Some(ticket) = self.begin(&mut map.borrow_mut(), id)? else {
			return Ok(ExpansionOutcome::Skipped);
		};
		let words = self
			.source
			.related_words(&ticket.label, &ticket.topic, self.graph.max_connections)
			.await;
		self.finish(&mut map.borrow_mut(), ticket, words)
	}

	/// Starts `topic` from scratch: fresh graph, root at the center, root expanded.
	pub async fn seed_topic(&self, map: &RefCell<MindMap>, topic: &str) -> Result<ExpansionOutcome> {
		let epoch = {
			let mut map = map.borrow_mut();
			map.reset(topic);
			map.epoch()
		};

		let words = seed_words(&self.source, topic, SEED_COUNT, &self.vocabulary).await;
		let label = words
			.into_iter()
			.next()
			.unwrap_or_else(|| DEFAULT_ROOT.to_string());

		let root = {
			let mut map = map.borrow_mut();
			if map.epoch() != epoch {
				return Ok(ExpansionOutcome::Stale);
			}
			let (cx, cy) = map.bounds.center();
			let id = map.allocate_id();
			let radius = self.metrics.measure_radius(&label, true);
			map.add_node(Node::new(id, label.as_str(), cx, cy, radius));
			map.set_focus(id, &self.metrics)?;
			id
		};
		info!("vocab-mindmap: topic {topic:?} seeded with {label:?}");

		self.expand(map, root).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::tests::{ScriptedSource, block_on};
	use crate::components::mind_map::metrics::EstimatedMeasure;
	use crate::components::mind_map::types::Bounds;

	fn expander(source: ScriptedSource) -> Expander<ScriptedSource, EstimatedMeasure> {
		Expander::new(source, EstimatedMeasure, &Config::default(), 1)
	}

	fn map_with_root(label: &str) -> (RefCell<MindMap>, NodeId) {
		let mut map = MindMap::new(Bounds::new(1024.0, 768.0));
		map.reset("Environment & Nature");
		let id = map.allocate_id();
		map.add_node(Node::new(id, label, 512.0, 384.0, 40.0));
		(RefCell::new(map), id)
	}

	#[test]
	fn begin_focuses_and_marks_loading() {
		let ex = expander(ScriptedSource::words(&["a"]));
		let (map, root) = map_with_root("environment");
		let ticket = ex.begin(&mut map.borrow_mut(), root).unwrap().unwrap();
		let map = map.borrow();
		assert_eq!(ticket.label, "environment");
		assert_eq!(map.focus(), Some(root));
		assert!(map.node(root).unwrap().loading);
	}

	#[test]
	fn second_begin_while_loading_is_skipped() {
		let ex = expander(ScriptedSource::words(&["a"]));
		let (map, root) = map_with_root("environment");
		assert!(ex.begin(&mut map.borrow_mut(), root).unwrap().is_some());
		assert!(ex.begin(&mut map.borrow_mut(), root).unwrap().is_none());
	}

	#[test]
	fn expanded_node_is_a_noop_without_calling_the_source() {
		let ex = expander(ScriptedSource::words(&["a", "b"]));
		let (map, root) = map_with_root("environment");
		assert!(matches!(
			block_on(ex.expand(&map, root)).unwrap(),
			ExpansionOutcome::Expanded { added: 2, .. }
		));
		let (nodes, links) = (map.borrow().nodes().len(), map.borrow().links().len());

		assert_eq!(block_on(ex.expand(&map, root)).unwrap(), ExpansionOutcome::Skipped);
		assert_eq!(ex.source().calls.get(), 1);
		assert_eq!(map.borrow().nodes().len(), nodes);
		assert_eq!(map.borrow().links().len(), links);
	}

	#[test]
	fn children_start_inside_the_view() {
		let ex = expander(ScriptedSource::words(&["ecosystem", "pollution", "climate", "habitat"]));
		let (map, root) = map_with_root("environment");
		block_on(ex.expand(&map, root)).unwrap();
		let map = map.borrow();
		for node in map.nodes() {
			assert!(node.x - node.radius >= 20.0 - 1e-9);
			assert!(node.x + node.radius <= 1024.0 - 20.0 + 1e-9);
			assert!(node.y - node.radius >= 20.0 - 1e-9);
			assert!(node.y + node.radius <= 768.0 - 20.0 + 1e-9);
		}
	}

	#[test]
	fn own_label_in_the_answer_is_ignored() {
		let ex = expander(ScriptedSource::words(&["environment", "habitat"]));
		let (map, root) = map_with_root("environment");
		block_on(ex.expand(&map, root)).unwrap();
		let map = map.borrow();
		assert_eq!(map.nodes().len(), 2);
		assert!(map.links().iter().all(|l| l.source != l.target));
	}

	#[test]
	fn failure_leaves_node_collapsed_and_graph_unchanged() {
		let ex = expander(ScriptedSource::failing());
		let (map, root) = map_with_root("environment");
		let outcome = block_on(ex.expand(&map, root)).unwrap();
		assert!(matches!(outcome, ExpansionOutcome::Failed(MindMapError::SourceUnavailable(_))));

		let map = map.borrow();
		let node = map.node(root).unwrap();
		assert!(!node.loading);
		assert!(!node.expanded);
		assert_eq!(map.nodes().len(), 1);
		assert!(map.links().is_empty());
	}

	#[test]
	fn result_for_an_old_topic_is_discarded() {
		let ex = expander(ScriptedSource::words(&["a"]));
		let (map, root) = map_with_root("environment");
		let ticket = ex.begin(&mut map.borrow_mut(), root).unwrap().unwrap();

		map.borrow_mut().reset("Health & Medicine");
		let outcome = ex
			.finish(&mut map.borrow_mut(), ticket, Ok(vec!["ghost".to_string()]))
			.unwrap();
		assert_eq!(outcome, ExpansionOutcome::Stale);
		assert!(map.borrow().nodes().is_empty());
	}

	#[test]
	fn expansion_prunes_back_to_the_focal_neighborhood() {
		let mut config = Config::default();
		config.graph.max_nodes = 4;
		config.graph.max_connections = 3;
		let ex = Expander::new(ScriptedSource::words(&["x", "y", "z"]), EstimatedMeasure, &config, 5);

		let (map, root) = map_with_root("root");
		block_on(ex.expand(&map, root)).unwrap();
		assert_eq!(map.borrow().nodes().len(), 4);

		// Expanding "x" adds three more children; only root + x's neighbors survive.
		let x = map.borrow().find_by_label("x").unwrap().id;
		let ex2 = Expander::new(ScriptedSource::words(&["p", "q", "r"]), EstimatedMeasure, &config, 6);
		let outcome = block_on(ex2.expand(&map, x)).unwrap();
		assert_eq!(
			outcome,
			ExpansionOutcome::Expanded {
				added: 3,
				merged: 0,
				pruned: 2
			}
		);

		let map = map.borrow();
		let mut labels: Vec<&str> = map.nodes().iter().map(|n| n.label.as_str()).collect();
		labels.sort();
		assert_eq!(labels, vec!["p", "q", "r", "root", "x"]);
		assert!(map.node(root).unwrap().expanded);
		for link in map.links() {
			assert!(map.node(link.source).is_some() && map.node(link.target).is_some());
		}
	}

	#[test]
	fn seeding_uses_first_topic_word_as_focal_root() {
		let ex = expander(ScriptedSource::words(&["river", "lake"]));
		let map = RefCell::new(MindMap::new(Bounds::new(800.0, 600.0)));
		block_on(ex.seed_topic(&map, "Environment & Nature")).unwrap();

		let map = map.borrow();
		let focus = map.node(map.focus().unwrap()).unwrap();
		assert_eq!(focus.label, "river");
		assert_eq!((focus.x, focus.y), (400.0, 300.0));
		assert!(focus.expanded);
		assert_eq!(map.topic(), "Environment & Nature");
		// The same list answers the expansion: "river" is its own label and skipped.
		assert_eq!(map.nodes().len(), 2);
	}

	#[test]
	fn seeding_falls_back_when_source_is_down() {
		let ex = expander(ScriptedSource::failing());
		let map = RefCell::new(MindMap::new(Bounds::new(800.0, 600.0)));
		let outcome = block_on(ex.seed_topic(&map, "Society & Culture")).unwrap();
		assert!(matches!(outcome, ExpansionOutcome::Failed(_)));

		let map = map.borrow();
		let focus = map.node(map.focus().unwrap()).unwrap();
		assert_eq!(focus.label, "society");
		assert!(!focus.expanded && !focus.loading);
	}
}
