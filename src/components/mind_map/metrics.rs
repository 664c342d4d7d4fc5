//! Node geometry: label-derived radii, child placement and view containment.

use std::f64::consts::TAU;

use log::warn;
use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::{Bounds, Node};
use crate::config::{GraphConfig, PlacementConfig};

/// Measures rendered label widths.
pub trait TextMeasure {
	/// Width in pixels of `text` drawn at `font_size` in `font_family`.
	fn text_width(&self, text: &str, font_size: f64, font_family: &str) -> f64;
}

/// Heuristic measurer based on per-character width factors.
///
/// Used before a canvas exists and off the browser. Factors are tuned for a
/// heavy sans-serif face, so estimates err on the wide side.
#[derive(Clone, Copy, Debug, Default)]
pub struct EstimatedMeasure;

fn char_width_factor(ch: char) -> f64 {
	match ch {
		' ' => 0.33,
		'.' | ',' | ':' | ';' | '\'' | '!' | '|' | '(' | ')' => 0.36,
		'i' | 'j' | 'l' | 'I' | 'f' | 't' => 0.42,
		'm' | 'w' => 1.0,
		'M' | 'W' => 1.1,
		'-' => 0.4,
		c if c.is_ascii_uppercase() => 0.8,
		c if c.is_ascii() => 0.68,
		// CJK and other wide scripts
		_ => 1.0,
	}
}

impl TextMeasure for EstimatedMeasure {
	fn text_width(&self, text: &str, font_size: f64, _font_family: &str) -> f64 {
		text.chars().map(char_width_factor).sum::<f64>() * font_size
	}
}

/// Measures through a 2D canvas context, estimating when none is available.
#[derive(Clone, Debug)]
pub struct CanvasMeasure {
	ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasMeasure {
	/// Measures on an offscreen canvas, so it works before the graph mounts.
	pub fn detached() -> Self {
		let ctx = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.create_element("canvas").ok())
			.and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
			.and_then(|c| c.get_context("2d").ok().flatten())
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
		if ctx.is_none() {
			warn!("vocab-mindmap: no offscreen canvas, estimating label widths");
		}
		Self { ctx }
	}
}

impl TextMeasure for CanvasMeasure {
	fn text_width(&self, text: &str, font_size: f64, font_family: &str) -> f64 {
		let Some(ctx) = &self.ctx else {
			return EstimatedMeasure.text_width(text, font_size, font_family);
		};
		ctx.set_font(&css_font(font_size, font_family));
		match ctx.measure_text(text) {
			Ok(metrics) => metrics.width(),
			Err(_) => EstimatedMeasure.text_width(text, font_size, font_family),
		}
	}
}

/// CSS `font` shorthand for a label.
pub fn css_font(font_size: f64, font_family: &str) -> String {
	format!("{}px {}", font_size, font_family)
}

/// Label metrics bound to the configured fonts.
#[derive(Clone, Debug)]
pub struct Metrics<M> {
	measure: M,
	graph: GraphConfig,
}

impl<M: TextMeasure> Metrics<M> {
	pub fn new(measure: M, graph: GraphConfig) -> Self {
		Self { measure, graph }
	}

	pub fn font_size(&self, is_focal: bool) -> f64 {
		if is_focal {
			self.graph.center_font_size
		} else {
			self.graph.normal_font_size
		}
	}

	/// Circle radius that fits `label`.
	///
	/// `ceil(max(width, min_text_width) / 2 + padding)`, so every node is at
	/// least `min_text_width / 2 + padding` wide regardless of its label.
	pub fn measure_radius(&self, label: &str, is_focal: bool) -> f64 {
		let width = self.measure.text_width(label, self.font_size(is_focal), &self.graph.font_family);
		(width.max(self.graph.min_text_width) / 2.0 + self.graph.padding_around).ceil()
	}
}

/// Proposes a starting point for a child of the node at `(parent_x, parent_y)`.
///
/// Tries `attempts` random points in the ring around the parent and keeps the
/// first one inside the safe rectangle. When every try lands outside, picks a
/// random point within a quarter of the smaller canvas side from the center.
pub fn generate_child_position<R: Rng + ?Sized>(
	parent_x: f64,
	parent_y: f64,
	bounds: Bounds,
	placement: &PlacementConfig,
	rng: &mut R,
) -> (f64, f64) {
	let inset = placement.safe_margin + placement.estimated_radius;
	let (min_x, max_x) = (inset, bounds.width - inset);
	let (min_y, max_y) = (inset, bounds.height - inset);

	for _ in 0..placement.attempts {
		let radius = placement.inner_radius + rng.r#gen::<f64>() * placement.radius_band;
		let angle = rng.r#gen::<f64>() * TAU;
		let (x, y) = (parent_x + angle.cos() * radius, parent_y + angle.sin() * radius);

		if (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y) {
			return (x, y);
		}
	}

	let (cx, cy) = bounds.center();
	let safe_radius = bounds.width.min(bounds.height) / 4.0;
	let angle = rng.r#gen::<f64>() * TAU;
	let radius = rng.r#gen::<f64>() * safe_radius;
	(cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// Range a circle center may occupy along one axis of length `extent`.
///
/// Collapses to the midpoint when the circle cannot fit at all.
fn axis_range(extent: f64, radius: f64, margin: f64) -> (f64, f64) {
	let (lo, hi) = (radius + margin, extent - radius - margin);
	if hi < lo {
		(extent / 2.0, extent / 2.0)
	} else {
		(lo, hi)
	}
}

/// Hard-clamps `node` so its whole circle stays `margin` away from every edge.
///
/// Idempotent. In a viewport too small for the circle the node is centered on
/// the offending axis.
pub fn clamp_into_view(node: &mut Node, bounds: Bounds, margin: f64) {
	let (lo_x, hi_x) = axis_range(bounds.width, node.radius, margin);
	let (lo_y, hi_y) = axis_range(bounds.height, node.radius, margin);
	node.x = node.x.clamp(lo_x, hi_x);
	node.y = node.y.clamp(lo_y, hi_y);
}
