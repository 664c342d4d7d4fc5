//! Word sources: where related words and topic seeds come from.
//!
//! The graph engine only sees the [`WordSource`] trait. The browser build
//! talks to the language-model proxy through [`HttpWordSource`]; development
//! and tests use [`OfflineWordSource`] or their own fakes.

mod cache;
mod http;
mod offline;

use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

use log::{debug, warn};

pub use cache::{BrowserClock, Clock, TtlCache};
pub use http::HttpWordSource;
pub use offline::OfflineWordSource;

use crate::config::{CacheConfig, Config, SourceMode, VocabularyConfig};
use crate::error::{MindMapError, Result};

/// Answers "which words relate to this one" queries.
///
/// Futures run on the single UI thread and need not be `Send`.
pub trait WordSource {
	/// Up to `count` distinct words related to `word` within `topic`.
	fn related_words(&self, word: &str, topic: &str, count: usize)
	-> impl Future<Output = Result<Vec<String>>>;

	/// Up to `count` seed words for `topic`.
	fn topic_words(&self, topic: &str, count: usize) -> impl Future<Output = Result<Vec<String>>>;
}

/// Trims, drops blanks and repeats, and truncates to `count`.
pub fn normalize_words(words: Vec<String>, count: usize) -> Vec<String> {
	let mut seen = HashSet::new();
	words
		.into_iter()
		.map(|w| w.trim().to_string())
		.filter(|w| !w.is_empty() && seen.insert(w.clone()))
		.take(count)
		.collect()
}

/// Seed words for `topic`, substituting the static list when the source fails.
pub async fn seed_words<S: WordSource>(
	source: &S,
	topic: &str,
	count: usize,
	vocabulary: &VocabularyConfig,
) -> Vec<String> {
	match source.topic_words(topic, count).await {
		Ok(words) if !words.is_empty() => words,
		Ok(_) => {
			warn!("vocab-mindmap: no seed words for {topic:?}, using fallback list");
			vocabulary.fallback_for(topic).to_vec()
		}
		Err(e) => {
			warn!("vocab-mindmap: topic seed failed ({e}), using fallback list");
			vocabulary.fallback_for(topic).to_vec()
		}
	}
}

/// Any word source wrapped with the response cache.
///
/// Only successful answers are cached.
pub struct CachedWordSource<S> {
	inner: S,
	cache: RefCell<TtlCache<Vec<String>>>,
	config: CacheConfig,
}

impl<S: WordSource> CachedWordSource<S> {
	pub fn new(inner: S, config: CacheConfig, clock: Rc<dyn Clock>) -> Self {
		Self {
			inner,
			cache: RefCell::new(TtlCache::new(clock)),
			config,
		}
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	fn lookup(&self, key: &str) -> Option<Vec<String>> {
		if !self.config.enabled {
			return None;
		}
		let hit = self.cache.borrow_mut().get(key);
		if hit.is_some() {
			debug!("vocab-mindmap: cache hit {key}");
		}
		hit
	}

	fn store(&self, key: String, words: &[String]) {
		if self.config.enabled {
			self.cache
				.borrow_mut()
				.put(key, words.to_vec(), self.config.max_age_ms());
		}
	}
}

impl<S: WordSource> WordSource for CachedWordSource<S> {
	async fn related_words(&self, word: &str, topic: &str, count: usize) -> Result<Vec<String>> {
		let key = format!("{word}_{topic}_{count}");
		if let Some(words) = self.lookup(&key) {
			return Ok(words);
		}
		let words = self.inner.related_words(word, topic, count).await?;
		self.store(key, &words);
		Ok(words)
	}

	async fn topic_words(&self, topic: &str, count: usize) -> Result<Vec<String>> {
		let key = format!("{topic}_{count}");
		if let Some(words) = self.lookup(&key) {
			return Ok(words);
		}
		let words = self.inner.topic_words(topic, count).await?;
		self.store(key, &words);
		Ok(words)
	}
}

/// Source selected by `api.mode`.
pub enum WordSourceKind {
	Http(HttpWordSource),
	Offline(OfflineWordSource),
}

impl WordSourceKind {
	/// Builds the configured source, seeding the offline RNG with `seed`.
	pub fn from_config(config: &Config, seed: u64) -> Self {
		match config.api.mode {
			SourceMode::Http => Self::Http(HttpWordSource::new(config.api.clone())),
			SourceMode::Offline => {
				Self::Offline(OfflineWordSource::new(config.vocabulary.clone(), seed))
			}
		}
	}
}

impl WordSource for WordSourceKind {
	async fn related_words(&self, word: &str, topic: &str, count: usize) -> Result<Vec<String>> {
		match self {
			Self::Http(source) => source.related_words(word, topic, count).await,
			Self::Offline(source) => source.related_words(word, topic, count).await,
		}
	}

	async fn topic_words(&self, topic: &str, count: usize) -> Result<Vec<String>> {
		match self {
			Self::Http(source) => source.topic_words(topic, count).await,
			Self::Offline(source) => source.topic_words(topic, count).await,
		}
	}
}

/// Error for a source that has nothing to offer.
pub(crate) fn empty_answer(what: &str) -> MindMapError {
	MindMapError::unavailable(format!("empty {what} response"))
}

#[cfg(test)]
pub(crate) mod tests {
	use std::cell::Cell;
	use std::pin::pin;
	use std::task::{Context, Poll, Waker};

	use super::cache::tests::FakeClock;
	use super::*;

	/// Drives a future whose every await resolves immediately.
	pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
		let mut future = pin!(future);
		let mut cx = Context::from_waker(Waker::noop());
		loop {
			if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
				return out;
			}
		}
	}

	/// Fake source answering a fixed list and counting calls.
	pub(crate) struct ScriptedSource {
		pub(crate) answer: Result<Vec<String>>,
		pub(crate) calls: Cell<usize>,
	}

	impl ScriptedSource {
		pub(crate) fn words(words: &[&str]) -> Self {
			Self {
				answer: Ok(words.iter().map(|w| w.to_string()).collect()),
				calls: Cell::new(0),
			}
		}

		pub(crate) fn failing() -> Self {
			Self {
				answer: Err(MindMapError::unavailable("scripted failure")),
				calls: Cell::new(0),
			}
		}
	}

	impl WordSource for ScriptedSource {
		async fn related_words(&self, _: &str, _: &str, count: usize) -> Result<Vec<String>> {
			self.calls.set(self.calls.get() + 1);
			self.answer.clone().map(|w| normalize_words(w, count))
		}

		async fn topic_words(&self, _: &str, count: usize) -> Result<Vec<String>> {
			self.calls.set(self.calls.get() + 1);
			self.answer.clone().map(|w| normalize_words(w, count))
		}
	}

	#[test]
	fn normalize_trims_dedupes_and_truncates() {
		let words = ["  alpha ", "", "beta", "alpha", "gamma", "delta"]
			.map(String::from)
			.to_vec();
		assert_eq!(normalize_words(words, 3), vec!["alpha", "beta", "gamma"]);
	}

	#[test]
	fn seed_words_falls_back_on_failure_and_empty_answers() {
		let vocab = VocabularyConfig::default();
		let failing = ScriptedSource::failing();
		let words = block_on(seed_words(&failing, "Society & Culture", 5, &vocab));
		assert_eq!(words[0], "society");

		let empty = ScriptedSource::words(&[]);
		let words = block_on(seed_words(&empty, "Unknown", 5, &vocab));
		assert_eq!(words, vocab.default_fallback);

		let ok = ScriptedSource::words(&["river"]);
		assert_eq!(block_on(seed_words(&ok, "Unknown", 5, &vocab)), vec!["river"]);
	}

	#[test]
	fn cached_source_hits_until_expiry() {
		let clock = Rc::new(FakeClock::default());
		let source = CachedWordSource::new(
			ScriptedSource::words(&["a", "b"]),
			CacheConfig {
				enabled: true,
				max_age_secs: 10,
			},
			clock.clone(),
		);

		block_on(source.related_words("w", "t", 2)).unwrap();
		block_on(source.related_words("w", "t", 2)).unwrap();
		assert_eq!(source.inner().calls.get(), 1);

		// Different count is a different key.
		block_on(source.related_words("w", "t", 1)).unwrap();
		assert_eq!(source.inner().calls.get(), 2);

		clock.advance(10_000.0);
		block_on(source.related_words("w", "t", 2)).unwrap();
		assert_eq!(source.inner().calls.get(), 3);
	}

	#[test]
	fn cached_source_does_not_cache_failures_or_when_disabled() {
		let clock = Rc::new(FakeClock::default());
		let failing = CachedWordSource::new(
			ScriptedSource::failing(),
			CacheConfig::default(),
			clock.clone(),
		);
		assert!(block_on(failing.topic_words("t", 3)).is_err());
		assert!(block_on(failing.topic_words("t", 3)).is_err());
		assert_eq!(failing.inner().calls.get(), 2);

		let disabled = CachedWordSource::new(
			ScriptedSource::words(&["a"]),
			CacheConfig {
				enabled: false,
				max_age_secs: 60,
			},
			clock,
		);
		block_on(disabled.topic_words("t", 3)).unwrap();
		block_on(disabled.topic_words("t", 3)).unwrap();
		assert_eq!(disabled.inner().calls.get(), 2);
	}
}
