//! Pointer gestures as an explicit `Idle -> Pressed -> Idle` state machine.
//!
//! Independent of the DOM: the component translates mouse events into
//! [`PointerEvent`]s and acts on the returned [`InputAction`].

use super::metrics::clamp_into_view;
use super::state::MindMap;
use super::types::NodeId;

/// Pointer event in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down { x: f64, y: f64 },
	Move { x: f64, y: f64 },
	Up { x: f64, y: f64 },
	/// Pointer tracking was lost (window blur); ends any gesture without a click.
	Leave,
}

/// What the component should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
	None,
	/// A click landed on a collapsed node: expand it.
	Select(NodeId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	Pressed {
		node: NodeId,
		start_x: f64,
		start_y: f64,
		offset_x: f64,
		offset_y: f64,
		draggable: bool,
	},
}

/// Tracks the gesture in progress.
#[derive(Clone, Debug, Default)]
pub struct PointerInput {
	gesture: Gesture,
	click_threshold: f64,
	margin: f64,
}

impl PointerInput {
	pub fn new(click_threshold: f64, margin: f64) -> Self {
		Self {
			gesture: Gesture::Idle,
			click_threshold,
			margin,
		}
	}

	/// Node currently captured by a press, if any.
	pub fn captured(&self) -> Option<NodeId> {
		match self.gesture {
			Gesture::Idle => None,
			Gesture::Pressed { node, .. } => Some(node),
		}
	}

	pub fn handle(&mut self, map: &mut MindMap, event: PointerEvent) -> InputAction {
		match (self.gesture, event) {
			(Gesture::Idle, PointerEvent::Down { x, y }) => {
				self.press(map, x, y);
				InputAction::None
			}
			(
				Gesture::Pressed {
					node,
					offset_x,
					offset_y,
					draggable: true,
					..
				},
				PointerEvent::Move { x, y },
			) => {
				let bounds = map.bounds;
				if let Some(n) = map.node_mut(node) {
					n.x = x - offset_x;
					n.y = y - offset_y;
					clamp_into_view(n, bounds, self.margin);
				}
				map.mark_unstable();
				InputAction::None
			}
			(
				Gesture::Pressed {
					node,
					start_x,
					start_y,
					..
				},
				PointerEvent::Up { x, y },
			) => {
				self.release(map, node);
				let travel = (x - start_x).hypot(y - start_y);
				match map.node(node) {
					Some(n) if travel < self.click_threshold && !n.expanded && !n.loading => {
						InputAction::Select(node)
					}
					_ => InputAction::None,
				}
			}
			(Gesture::Pressed { node, .. }, PointerEvent::Leave) => {
				self.release(map, node);
				InputAction::None
			}
			_ => InputAction::None,
		}
	}

	fn press(&mut self, map: &mut MindMap, x: f64, y: f64) {
		let Some(id) = map.node_at_position(x, y) else {
			return;
		};
		let draggable = !map.is_focus(id);
		let Some(node) = map.node_mut(id) else {
			return;
		};
		let (offset_x, offset_y) = (x - node.x, y - node.y);
		if draggable {
			node.dragging = true;
			node.vx = 0.0;
			node.vy = 0.0;
		}
		self.gesture = Gesture::Pressed {
			node: id,
			start_x: x,
			start_y: y,
			offset_x,
			offset_y,
			draggable,
		};
		if draggable {
			map.mark_unstable();
		}
	}

	fn release(&mut self, map: &mut MindMap, id: NodeId) {
		if let Some(node) = map.node_mut(id) {
			node.dragging = false;
			node.vx = 0.0;
			node.vy = 0.0;
		}
		self.gesture = Gesture::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::layout::{Spacing, advance_layout};
	use crate::components::mind_map::metrics::{EstimatedMeasure, Metrics};
	use crate::components::mind_map::types::{Bounds, Node};
	use crate::config::{GraphConfig, LayoutConfig};

	fn map() -> (MindMap, NodeId, NodeId) {
		let mut map = MindMap::new(Bounds::new(800.0, 600.0));
		map.reset("t");
		let focal = map.allocate_id();
		map.add_node(Node::new(focal, "root", 400.0, 300.0, 30.0));
		let leaf = map.allocate_id();
		map.add_node(Node::new(leaf, "leaf", 200.0, 200.0, 30.0));
		map.link(focal, leaf).unwrap();
		let metrics = Metrics::new(EstimatedMeasure, GraphConfig::default());
		map.set_focus(focal, &metrics).unwrap();
		(map, focal, leaf)
	}

	fn input() -> PointerInput {
		PointerInput::new(5.0, 20.0)
	}

	#[test]
	fn short_press_on_collapsed_node_selects_it() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 205.0, y: 200.0 });
		assert!(map.node(leaf).unwrap().dragging);
		let action = input.handle(&mut map, PointerEvent::Up { x: 207.0, y: 201.0 });
		assert_eq!(action, InputAction::Select(leaf));
		assert!(!map.node(leaf).unwrap().dragging);
		assert_eq!(input.captured(), None);
	}

	#[test]
	fn drag_moves_node_and_destabilizes_layout() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 210.0, y: 200.0 });
		map.stable = true;
		input.handle(&mut map, PointerEvent::Move { x: 260.0, y: 240.0 });
		assert!(!map.stable);

		// The dragged node stays put through layout steps.
		advance_layout(
			&mut map,
			&LayoutConfig::default(),
			Spacing {
				min_spacing: 10.0,
				margin: 20.0,
			},
		);
		let node = map.node(leaf).unwrap();
		assert_eq!((node.x, node.y), (250.0, 240.0));

		let action = input.handle(&mut map, PointerEvent::Up { x: 260.0, y: 240.0 });
		assert_eq!(action, InputAction::None);
		let node = map.node(leaf).unwrap();
		assert_eq!((node.x, node.y), (250.0, 240.0));
		assert!(!node.dragging);
	}

	#[test]
	fn released_node_keeps_no_momentum() {
		let mut map = MindMap::new(Bounds::new(800.0, 600.0));
		map.reset("t");
		let id = map.allocate_id();
		map.add_node(Node::new(id, "lone", 400.0, 300.0, 30.0));
		{
			let node = map.node_mut(id).unwrap();
			node.vx = 40.0;
			node.vy = -25.0;
		}

		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 400.0, y: 300.0 });
		input.handle(&mut map, PointerEvent::Move { x: 200.0, y: 200.0 });
		input.handle(&mut map, PointerEvent::Up { x: 200.0, y: 200.0 });

		let spacing = Spacing {
			min_spacing: 10.0,
			margin: 20.0,
		};
		for _ in 0..30 {
			advance_layout(&mut map, &LayoutConfig::default(), spacing);
		}
		let node = map.node(id).unwrap();
		assert_eq!((node.x, node.y), (200.0, 200.0));
		assert!(map.stable);
	}

	#[test]
	fn drag_survives_the_pointer_leaving_the_canvas() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 200.0, y: 200.0 });
		input.handle(&mut map, PointerEvent::Move { x: -300.0, y: -300.0 });
		assert_eq!(input.captured(), Some(leaf));
		input.handle(&mut map, PointerEvent::Move { x: 320.0, y: 260.0 });
		let action = input.handle(&mut map, PointerEvent::Up { x: 320.0, y: 260.0 });
		assert_eq!(action, InputAction::None);
		let node = map.node(leaf).unwrap();
		assert_eq!((node.x, node.y), (320.0, 260.0));
	}

	#[test]
	fn drop_point_is_clamped_into_view() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 200.0, y: 200.0 });
		input.handle(&mut map, PointerEvent::Move { x: -100.0, y: 900.0 });
		input.handle(&mut map, PointerEvent::Up { x: -100.0, y: 900.0 });
		let node = map.node(leaf).unwrap();
		assert_eq!((node.x, node.y), (50.0, 550.0));
	}

	#[test]
	fn focal_node_is_never_dragged() {
		let (mut map, focal, _) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 400.0, y: 300.0 });
		assert!(!map.node(focal).unwrap().dragging);
		input.handle(&mut map, PointerEvent::Move { x: 500.0, y: 350.0 });
		let node = map.node(focal).unwrap();
		assert_eq!((node.x, node.y), (400.0, 300.0));
	}

	#[test]
	fn focal_node_whose_expansion_failed_can_be_clicked_again() {
		let (mut map, focal, _) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 400.0, y: 300.0 });
		let action = input.handle(&mut map, PointerEvent::Up { x: 401.0, y: 300.0 });
		assert_eq!(action, InputAction::Select(focal));
	}

	#[test]
	fn expanded_or_loading_nodes_are_not_selected() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		for (expanded, loading) in [(true, false), (false, true)] {
			{
				let node = map.node_mut(leaf).unwrap();
				node.expanded = expanded;
				node.loading = loading;
			}
			input.handle(&mut map, PointerEvent::Down { x: 200.0, y: 200.0 });
			let action = input.handle(&mut map, PointerEvent::Up { x: 200.0, y: 200.0 });
			assert_eq!(action, InputAction::None);
		}
	}

	#[test]
	fn leaving_the_canvas_cancels_without_click() {
		let (mut map, _, leaf) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 200.0, y: 200.0 });
		assert_eq!(input.handle(&mut map, PointerEvent::Leave), InputAction::None);
		assert!(!map.node(leaf).unwrap().dragging);
		assert_eq!(
			input.handle(&mut map, PointerEvent::Up { x: 200.0, y: 200.0 }),
			InputAction::None
		);
	}

	#[test]
	fn press_on_empty_canvas_stays_idle() {
		let (mut map, _, _) = map();
		let mut input = input();
		input.handle(&mut map, PointerEvent::Down { x: 700.0, y: 50.0 });
		assert_eq!(input.captured(), None);
	}
}
