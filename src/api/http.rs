//! Word source backed by the language-model proxy endpoints.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use super::{WordSource, empty_answer, normalize_words};
use crate::config::ApiConfig;
use crate::error::{MindMapError, Result};

#[derive(Serialize)]
struct RelatedWordsRequest<'a> {
	word: &'a str,
	topic: &'a str,
	count: usize,
}

#[derive(Serialize)]
struct TopicWordsRequest<'a> {
	topic: &'a str,
	count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedWordsResponse {
	related_words: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicWordsResponse {
	topic_words: Vec<String>,
}

/// Parses a `{ "relatedWords": [...] }` body.
pub(crate) fn parse_related_words(body: &str, count: usize) -> Result<Vec<String>> {
	let parsed: RelatedWordsResponse = serde_json::from_str(body)
		.map_err(|e| MindMapError::unavailable(format!("malformed related words: {e}")))?;
	Ok(normalize_words(parsed.related_words, count))
}

/// Parses a `{ "topicWords": [...] }` body.
pub(crate) fn parse_topic_words(body: &str, count: usize) -> Result<Vec<String>> {
	let parsed: TopicWordsResponse = serde_json::from_str(body)
		.map_err(|e| MindMapError::unavailable(format!("malformed topic words: {e}")))?;
	Ok(normalize_words(parsed.topic_words, count))
}

fn js_error(context: &str, value: JsValue) -> MindMapError {
	let detail = value.as_string().unwrap_or_else(|| format!("{value:?}"));
	MindMapError::unavailable(format!("{context}: {detail}"))
}

/// POSTs JSON to the proxy with a timeout and a bounded number of retries.
#[derive(Clone, Debug)]
pub struct HttpWordSource {
	config: ApiConfig,
}

impl HttpWordSource {
	pub fn new(config: ApiConfig) -> Self {
		Self { config }
	}

	async fn post_with_retries(&self, endpoint: &str, body: &str) -> Result<String> {
		let url = format!("{}{}", self.config.base_url, endpoint);
		let mut attempt = 0;
		loop {
			match self.post_once(&url, body).await {
				Ok(text) => return Ok(text),
				Err(e) if attempt < self.config.retries => {
					attempt += 1;
					info!(
						"vocab-mindmap: request to {url} failed ({e}), retry {attempt}/{}",
						self.config.retries
					);
				}
				Err(e) => return Err(e),
			}
		}
	}

	async fn post_once(&self, url: &str, body: &str) -> Result<String> {
		let window = web_sys::window().ok_or_else(|| MindMapError::unavailable("no window"))?;

		let controller = AbortController::new().map_err(|e| js_error("abort controller", e))?;
		let signal = controller.signal();
		let on_timeout = Closure::<dyn FnMut()>::new(move || controller.abort());
		let timer = window
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				on_timeout.as_ref().unchecked_ref(),
				self.config.timeout_ms.min(i32::MAX as u32) as i32,
			)
			.map_err(|e| js_error("timer", e))?;

		let result = send(&window, url, body, &signal).await;
		window.clear_timeout_with_handle(timer);
		drop(on_timeout);
		result
	}
}

async fn send(
	window: &web_sys::Window,
	url: &str,
	body: &str,
	signal: &web_sys::AbortSignal,
) -> Result<String> {
	let headers = Headers::new().map_err(|e| js_error("headers", e))?;
	headers
		.set("Content-Type", "application/json")
		.map_err(|e| js_error("headers", e))?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_headers(&headers);
	init.set_body(&JsValue::from_str(body));
	init.set_signal(Some(signal));

	let request =
		Request::new_with_str_and_init(url, &init).map_err(|e| js_error("request", e))?;
	let value = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| js_error("fetch", e))?;
	let response: Response = value.dyn_into().map_err(|e| js_error("response", e))?;

	if !response.ok() {
		return Err(MindMapError::unavailable(format!(
			"{url} answered {}",
			response.status()
		)));
	}

	let text = JsFuture::from(response.text().map_err(|e| js_error("body", e))?)
		.await
		.map_err(|e| js_error("body", e))?;
	text.as_string()
		.ok_or_else(|| MindMapError::unavailable("response body is not text"))
}

fn encode<T: Serialize>(payload: &T) -> Result<String> {
	serde_json::to_string(payload).map_err(|e| MindMapError::unavailable(e.to_string()))
}

impl WordSource for HttpWordSource {
	async fn related_words(&self, word: &str, topic: &str, count: usize) -> Result<Vec<String>> {
		let body = encode(&RelatedWordsRequest { word, topic, count })?;
		let text = self
			.post_with_retries(&self.config.related_words, &body)
			.await?;
		let words = parse_related_words(&text, count)?;
		if words.is_empty() {
			warn!("vocab-mindmap: no related words for {word:?}");
			return Err(empty_answer("related words"));
		}
		Ok(words)
	}

	async fn topic_words(&self, topic: &str, count: usize) -> Result<Vec<String>> {
		let body = encode(&TopicWordsRequest { topic, count })?;
		let text = self.post_with_retries(&self.config.topic_words, &body).await?;
		parse_topic_words(&text, count)
	}
}
