//! Per-frame relaxation of node positions.
//!
//! A deliberately cheap scheme: overlap-driven repulsion, a soft boundary
//! force, friction, and a focal node that homes in on the canvas center. It
//! has no convergence guarantee; it only has to settle visibly within a few
//! seconds for a few dozen nodes.

use super::metrics::clamp_into_view;
use super::state::MindMap;
use super::types::Node;
use crate::config::LayoutConfig;

/// Outcome of one layout step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stability {
	/// Nothing moved past its threshold; later steps may be skipped.
	Stable,
	/// At least one node is still moving.
	Moving,
}

/// Geometry constants the step needs besides [`LayoutConfig`].
#[derive(Clone, Copy, Debug)]
pub struct Spacing {
	/// Extra gap required between two circles.
	pub min_spacing: f64,
	/// Distance circles keep from the canvas edges.
	pub margin: f64,
}

/// Advances the layout by one frame and records the result in `map.stable`.
pub fn advance_layout(map: &mut MindMap, config: &LayoutConfig, spacing: Spacing) -> Stability {
	let bounds = map.bounds;
	let (cx, cy) = bounds.center();
	let focus = map.focus();
	let nodes = map.nodes_mut();

	apply_repulsion(nodes, config, spacing.min_spacing);

	let mut moving = false;
	for node in nodes.iter_mut() {
		apply_boundary_force(node, bounds.width, bounds.height, spacing.margin, config);

		if node.dragging {
			// pointer owns the position
		} else if Some(node.id) == focus {
			// Homing alone places the focal node.
			node.vx = 0.0;
			node.vy = 0.0;
			let (dx, dy) = (cx - node.x, cy - node.y);
			if dx.abs() > config.focal_threshold || dy.abs() > config.focal_threshold {
				moving = true;
				node.x += dx * config.focal_homing;
				node.y += dy * config.focal_homing;
			}
		} else {
			node.vx *= config.velocity_decay;
			node.vy *= config.velocity_decay;
			if node.vx.abs() > config.move_threshold || node.vy.abs() > config.move_threshold {
				moving = true;
				node.x += node.vx * config.time_step;
				node.y += node.vy * config.time_step;
			}
		}

		clamp_into_view(node, bounds, spacing.margin);
	}

	map.stable = !moving;
	if moving { Stability::Moving } else { Stability::Stable }
}

/// Pushes every overlapping pair apart along the line between their centers.
///
/// Each side absorbs half of the correction; a dragged node is not moved but
/// still pushes the other one.
fn apply_repulsion(nodes: &mut [Node], config: &LayoutConfig, min_spacing: f64) {
	for i in 0..nodes.len() {
		let (head, tail) = nodes.split_at_mut(i + 1);
		let n1 = &mut head[i];
		for n2 in tail.iter_mut() {
			let (dx, dy) = (n2.x - n1.x, n2.y - n1.y);
			let d = dx.hypot(dy).max(1.0);
			let overlap = n1.radius + n2.radius + min_spacing - d;
			if overlap <= 0.0 {
				continue;
			}
			let fx = overlap * dx / d * config.repulsion_damping;
			let fy = overlap * dy / d * config.repulsion_damping;
			if !n1.dragging {
				n1.vx -= fx;
				n1.vy -= fy;
			}
			if !n2.dragging {
				n2.vx += fx;
				n2.vy += fy;
			}
		}
	}
}

/// Adds a restoring velocity proportional to how far the circle intrudes
/// into the margin band.
fn apply_boundary_force(node: &mut Node, width: f64, height: f64, margin: f64, config: &LayoutConfig) {
	let gain = config.boundary_gain;
	if node.x - node.radius < margin {
		node.vx += (margin - (node.x - node.radius)) * gain;
	}
	if node.x + node.radius > width - margin {
		node.vx -= (node.x + node.radius - (width - margin)) * gain;
	}
	if node.y - node.radius < margin {
		node.vy += (margin - (node.y - node.radius)) * gain;
	}
	if node.y + node.radius > height - margin {
		node.vy -= (node.y + node.radius - (height - margin)) * gain;
	}
}
