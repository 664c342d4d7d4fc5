//! Local word source for development without the language-model proxy.

use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::{WordSource, empty_answer};
use crate::config::VocabularyConfig;
use crate::error::Result;

/// General academic vocabulary mixed into every topic.
const BASE_WORDS: [&str; 20] = [
	"analysis",
	"comprehensive",
	"fundamental",
	"significant",
	"development",
	"innovation",
	"framework",
	"sustainable",
	"interaction",
	"perspective",
	"generation",
	"diversity",
	"implementation",
	"methodology",
	"collaboration",
	"emerging",
	"strategy",
	"assessment",
	"integration",
	"transformation",
];

/// Draws related words at random from the topic list plus [`BASE_WORDS`].
pub struct OfflineWordSource {
	vocabulary: VocabularyConfig,
	rng: RefCell<SmallRng>,
}

impl OfflineWordSource {
	pub fn new(vocabulary: VocabularyConfig, seed: u64) -> Self {
		Self {
			vocabulary,
			rng: RefCell::new(SmallRng::seed_from_u64(seed)),
		}
	}

	fn candidates(&self, word: &str, topic: &str) -> Vec<String> {
		let topic_words = self
			.vocabulary
			.fallback_words
			.get(topic)
			.map(Vec::as_slice)
			.unwrap_or_default();

		let mut out: Vec<String> = Vec::new();
		for w in topic_words.iter().map(String::as_str).chain(BASE_WORDS) {
			if w != word && !out.iter().any(|o| o == w) {
				out.push(w.to_string());
			}
		}
		out
	}
}

impl WordSource for OfflineWordSource {
	async fn related_words(&self, word: &str, topic: &str, count: usize) -> Result<Vec<String>> {
		let candidates = self.candidates(word, topic);
		let picked: Vec<String> = candidates
			.choose_multiple(&mut *self.rng.borrow_mut(), count)
			.cloned()
			.collect();
		if picked.is_empty() {
			return Err(empty_answer("related words"));
		}
		Ok(picked)
	}

	async fn topic_words(&self, topic: &str, count: usize) -> Result<Vec<String>> {
		let words: Vec<String> = self
			.vocabulary
			.fallback_words
			.get(topic)
			.map(|w| w.iter().take(count).cloned().collect())
			.unwrap_or_default();
		if words.is_empty() {
			return Err(empty_answer("topic words"));
		}
		Ok(words)
	}
}
