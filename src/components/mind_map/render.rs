//! Canvas rendering for the mind-map.
//!
//! A pure function of the graph state. Links are painted first so node discs
//! cover their ends:
//! 1. Background
//! 2. Links with arrowheads at the target's rim
//! 3. Node discs, loading rings and labels

use std::f64::consts::PI;
use std::rc::Rc;

use web_sys::CanvasRenderingContext2d;

use super::metrics::css_font;
use super::state::MindMap;
use super::theme::Theme;
use super::types::Node;
use crate::api::Clock;
use crate::config::GraphConfig;

/// Wall-clock seconds since the animation started, independent of frame rate.
pub struct AnimationClock {
	clock: Rc<dyn Clock>,
	started_ms: f64,
}

impl AnimationClock {
	pub fn new(clock: Rc<dyn Clock>) -> Self {
		let started_ms = clock.now_ms();
		Self { clock, started_ms }
	}

	pub fn seconds(&self) -> f64 {
		(self.clock.now_ms() - self.started_ms) / 1000.0
	}
}

/// Label with the animated loading dots, cycling 0 to 3 dots.
pub fn display_label(node: &Node, time: f64, step: f64) -> String {
	if !node.loading || step <= 0.0 {
		return node.label.clone();
	}
	let dots = ((time / step) as usize) % 4;
	format!("{}{}", node.label, ".".repeat(dots))
}

/// Renders the complete graph to the canvas.
pub fn render(
	map: &MindMap,
	ctx: &CanvasRenderingContext2d,
	graph: &GraphConfig,
	theme: &Theme,
	time: f64,
) {
	draw_background(map, ctx, theme);
	draw_links(map, ctx, theme);
	draw_nodes(map, ctx, graph, theme, time);
}

fn draw_background(map: &MindMap, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.clear_rect(0.0, 0.0, map.bounds.width, map.bounds.height);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, map.bounds.width, map.bounds.height);
}

fn draw_links(map: &MindMap, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.link;
	let color = style.color.to_css();
	ctx.set_stroke_style_str(&color);
	ctx.set_fill_style_str(&color);

	for link in map.links() {
		let (Some(from), Some(to)) = (map.node(link.source), map.node(link.target)) else {
			continue;
		};
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		if dx.hypot(dy) < 0.001 {
			continue;
		}
		let angle = dy.atan2(dx);

		ctx.set_line_width(if map.is_focus(link.source) {
			style.focal_width
		} else {
			style.width
		});
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();

		let (tip_x, tip_y) = (to.x - angle.cos() * to.radius, to.y - angle.sin() * to.radius);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(
			tip_x - style.arrow_length * (angle - style.arrow_spread).cos(),
			tip_y - style.arrow_length * (angle - style.arrow_spread).sin(),
		);
		ctx.line_to(
			tip_x - style.arrow_length * (angle + style.arrow_spread).cos(),
			tip_y - style.arrow_length * (angle + style.arrow_spread).sin(),
		);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_nodes(
	map: &MindMap,
	ctx: &CanvasRenderingContext2d,
	graph: &GraphConfig,
	theme: &Theme,
	time: f64,
) {
	let style = &theme.node;
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in map.nodes() {
		let focal = map.is_focus(node.id);

		if node.loading {
			// Slow breathing ring while the request is out.
			let pulse = 4.0 + 2.0 * (time * 4.0).sin();
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, node.radius + pulse, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&style.loading_ring.to_css());
			ctx.set_line_width(2.0);
			ctx.stroke();
		}

		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		let fill = if focal { style.focal_fill } else { style.fill };
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();

		let font_size = if focal {
			graph.center_font_size
		} else {
			graph.normal_font_size
		};
		ctx.set_fill_style_str(&style.label.to_css());
		ctx.set_font(&css_font(font_size, &graph.font_family));
		let _ = ctx.fill_text(&display_label(node, time, style.loading_step), node.x, node.y);
	}
}
