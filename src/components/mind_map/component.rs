//! Leptos component wrapping the mind-map canvas.
//!
//! The canvas fills the window and follows its size. An animation loop runs
//! via `requestAnimationFrame`, stepping the layout while it is unsettled and
//! repainting every frame. Expansions run as local tasks so the loop keeps
//! drawing the loading animation while a request is out. Once a press lands
//! on a node, move and release are tracked on the window so a drag survives
//! the pointer crossing the overlay or leaving the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::expansion::{Expander, ExpansionOutcome};
use super::input::{InputAction, PointerEvent, PointerInput};
use super::layout::{Spacing, advance_layout};
use super::metrics::CanvasMeasure;
use super::render::{self, AnimationClock};
use super::state::MindMap;
use super::theme::Theme;
use super::types::NodeId;
use crate::api::{BrowserClock, CachedWordSource, WordSourceKind};
use crate::config::Config;

type LiveExpander = Expander<CachedWordSource<WordSourceKind>, CanvasMeasure>;

/// A request to (re)start the map on a topic.
///
/// Bumping `generation` reseeds even when the topic is unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicRequest {
	pub topic: String,
	pub generation: u32,
}

impl TopicRequest {
	pub fn new(topic: impl Into<String>) -> Self {
		Self {
			topic: topic.into(),
			generation: 0,
		}
	}

	/// Same request again, forcing a reseed.
	pub fn renewed(&self, topic: impl Into<String>) -> Self {
		Self {
			topic: topic.into(),
			generation: self.generation.wrapping_add(1),
		}
	}
}

/// Gesture tracking plus visual state shared by the handlers and the loop.
struct CanvasContext {
	input: PointerInput,
	theme: Theme,
	clock: AnimationClock,
}

fn window_size(window: &Window) -> (f64, f64) {
	let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
	let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
	(w, h)
}

fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

fn canvas_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top())
}

fn spawn_expansion(map: Rc<RefCell<MindMap>>, expander: Rc<LiveExpander>, id: NodeId) {
	spawn_local(async move {
		match expander.expand(&map, id).await {
			Ok(ExpansionOutcome::Failed(e)) => warn!("vocab-mindmap: expansion failed: {e}"),
			Ok(outcome) => debug!("vocab-mindmap: expansion {outcome:?}"),
			Err(e) => error!("vocab-mindmap: {e}"),
		}
	});
}

/// Renders the interactive mind-map on a full-window canvas.
///
/// Every change of `topic` discards the graph and seeds a new one; `seeding`
/// is true while the seed words are being fetched.
#[component]
pub fn MindMapCanvas(
	#[prop(into)] topic: Signal<TopicRequest>,
	config: Config,
	seeding: RwSignal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let map = Rc::new(RefCell::new(MindMap::default()));
	let context = Rc::new(RefCell::new(CanvasContext {
		input: PointerInput::new(config.input.click_threshold, config.graph.margin),
		theme: Theme::by_name(&config.theme),
		clock: AnimationClock::new(Rc::new(BrowserClock)),
	}));
	let source = CachedWordSource::new(
		WordSourceKind::from_config(&config, random_seed()),
		config.cache.clone(),
		Rc::new(BrowserClock),
	);
	let expander = Rc::new(Expander::new(source, CanvasMeasure::detached(), &config, random_seed()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let blur_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let pointer_cbs: Rc<RefCell<Vec<Closure<dyn FnMut(MouseEvent)>>>> =
		Rc::new(RefCell::new(Vec::new()));

	let (map_init, context_init, animate_init, resize_cb_init) =
		(map.clone(), context.clone(), animate.clone(), resize_cb.clone());
	let (expander_init, blur_cb_init, pointer_cbs_init) =
		(expander.clone(), blur_cb.clone(), pointer_cbs.clone());
	let (graph_config, layout_config) = (config.graph.clone(), config.layout.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = window_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		map_init.borrow_mut().resize(w, h);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				error!("vocab-mindmap: canvas has no 2d context");
				return;
			}
		};

		let (map_resize, canvas_resize) = (map_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			map_resize.borrow_mut().resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (map_mm, context_mm, canvas_mm) =
			(map_init.clone(), context_init.clone(), canvas.clone());
		let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let mut c = context_mm.borrow_mut();
			if c.input.captured().is_none() {
				return;
			}
			let (x, y) = canvas_position(&canvas_mm, &ev);
			c.input.handle(&mut map_mm.borrow_mut(), PointerEvent::Move { x, y });
		});
		let (map_mu, context_mu, canvas_mu) =
			(map_init.clone(), context_init.clone(), canvas.clone());
		let expander_mu = expander_init.clone();
		let on_up = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
			let (x, y) = canvas_position(&canvas_mu, &ev);
			let action = context_mu
				.borrow_mut()
				.input
				.handle(&mut map_mu.borrow_mut(), PointerEvent::Up { x, y });
			if let InputAction::Select(id) = action {
				spawn_expansion(map_mu.clone(), expander_mu.clone(), id);
			}
		});
		for (name, cb) in [("mousemove", &on_move), ("mouseup", &on_up)] {
			let _ = window.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
		}
		pointer_cbs_init.borrow_mut().extend([on_move, on_up]);

		let (map_blur, context_blur) = (map_init.clone(), context_init.clone());
		*blur_cb_init.borrow_mut() = Some(Closure::new(move || {
			let mut c = context_blur.borrow_mut();
			c.input.handle(&mut map_blur.borrow_mut(), PointerEvent::Leave);
		}));
		if let Some(ref cb) = *blur_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("blur", cb.as_ref().unchecked_ref());
		}

		let spacing = Spacing {
			min_spacing: graph_config.min_spacing,
			margin: graph_config.margin,
		};
		let (graph_config, layout_config) = (graph_config.clone(), layout_config.clone());
		let (map_anim, context_anim, animate_inner) =
			(map_init.clone(), context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let c = context_anim.borrow();
				let mut map = map_anim.borrow_mut();
				if !map.stable {
					advance_layout(&mut map, &layout_config, spacing);
				}
				render::render(&map, &ctx, &graph_config, &c.theme, c.clock.seconds());
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (map_topic, expander_topic) = (map.clone(), expander.clone());
	Effect::new(move |_| {
		let request = topic.get();
		let (map, expander) = (map_topic.clone(), expander_topic.clone());
		seeding.set(true);
		spawn_local(async move {
			info!("vocab-mindmap: seeding {:?}", request.topic);
			match expander.seed_topic(&map, &request.topic).await {
				Ok(ExpansionOutcome::Failed(e)) => warn!("vocab-mindmap: root expansion failed: {e}"),
				Ok(outcome) => debug!("vocab-mindmap: seeded with {outcome:?}"),
				Err(e) => error!("vocab-mindmap: {e}"),
			}
			// A newer request owns the overlay now.
			if topic.get_untracked() == request {
				seeding.set(false);
			}
		});
	});

	let (map_md, context_md) = (map.clone(), context.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_position(&canvas, &ev);
		let mut c = context_md.borrow_mut();
		c.input.handle(&mut map_md.borrow_mut(), PointerEvent::Down { x, y });
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="mind-map-canvas"
			on:mousedown=on_mousedown
			style="display: block; cursor: pointer;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renewed_request_differs_even_for_the_same_topic() {
		let first = TopicRequest::new("Health & Medicine");
		let again = first.renewed("Health & Medicine");
		assert_ne!(first, again);
		assert_eq!(again.topic, first.topic);
	}
}
