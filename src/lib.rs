//! vocab-mindmap: Interactive vocabulary mind-map for the browser.
//!
//! This crate provides a WASM-based canvas component that grows a word graph
//! on demand: clicking a word fetches related words, attaches them around it,
//! and keeps the layout readable with a small incremental relaxation.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod api;
pub mod components;
pub mod config;
pub mod error;

pub use components::mind_map::{MindMap, MindMapCanvas, TopicRequest};
pub use config::Config;
pub use error::{MindMapError, Result};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("vocab-mindmap: logging initialized");
}

/// Load configuration from a script element with id="mindmap-config".
/// Missing or malformed blobs fall back to [`Config::default`].
fn load_config() -> Config {
	let Some(json_text) = config_script_text() else {
		return Config::default();
	};

	match Config::from_json(&json_text) {
		Ok(config) => {
			info!(
				"vocab-mindmap: loaded config with {} topics",
				config.vocabulary.topics.len()
			);
			config
		}
		Err(e) => {
			warn!("vocab-mindmap: failed to parse config: {}", e);
			Config::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("mindmap-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Reads the config from the DOM and renders the topic controls over the map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let topics = config.vocabulary.topics.clone();
	let first = topics.first().cloned().unwrap_or_default();

	let selected = RwSignal::new(first.clone());
	let request = RwSignal::new(TopicRequest::new(first));
	let seeding = RwSignal::new(false);

	let on_new_topic = move |_| {
		let topic = selected.get_untracked();
		request.update(|r| *r = r.renewed(topic));
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Vocabulary Mind-Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<MindMapCanvas topic=request config=config seeding=seeding />
			<div class="graph-overlay">
				<h1>"Vocabulary Mind-Map"</h1>
				<p class="subtitle">"Click a word to expand it. Drag words to rearrange."</p>
				<div class="topic-controls">
					<select
						id="topic-select"
						on:change=move |ev| selected.set(event_target_value(&ev))
					>
						{topics
							.into_iter()
							.map(|topic| view! { <option value=topic.clone()>{topic.clone()}</option> })
							.collect_view()}
					</select>
					<button id="new-topic-btn" on:click=on_new_topic disabled=move || seeding.get()>
						{move || if seeding.get() { "Loading..." } else { "New topic" }}
					</button>
				</div>
			</div>
			<Show when=move || seeding.get()>
				<div class="loading-overlay">"Loading topic..."</div>
			</Show>
		</div>
	}
}
