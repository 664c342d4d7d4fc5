//! Runtime configuration.
//!
//! Every field has a default so a page can ship a partial JSON blob in a
//! `<script id="mindmap-config">` element and override only what it needs.

use std::collections::HashMap;

use serde::Deserialize;

/// Complete application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Graph size and node metrics.
	pub graph: GraphConfig,
	/// Relaxation constants for the layout engine.
	pub layout: LayoutConfig,
	/// Where freshly expanded children are dropped.
	pub placement: PlacementConfig,
	/// Pointer gesture tuning.
	pub input: InputConfig,
	/// Word-source endpoint settings.
	pub api: ApiConfig,
	/// Response cache settings.
	pub cache: CacheConfig,
	/// Topics offered in the selector plus their fallback seed words.
	pub vocabulary: VocabularyConfig,
	/// Theme name (`paper` or `midnight`).
	pub theme: String,
}

/// Graph size limits and node metrics.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphConfig {
	/// Node count above which pruning runs after an expansion.
	pub max_nodes: usize,
	/// Number of related words requested per expansion.
	pub max_connections: usize,
	/// Minimum gap between two node circles.
	pub min_spacing: f64,
	/// Font size (px) of the focal node label.
	pub center_font_size: f64,
	/// Font size (px) of every other label.
	pub normal_font_size: f64,
	/// Padding between the label and the circle edge.
	pub padding_around: f64,
	/// Labels narrower than this are measured as this wide.
	pub min_text_width: f64,
	/// Distance every circle keeps from the canvas edges.
	pub margin: f64,
	/// CSS font family used for labels.
	pub font_family: String,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			max_nodes: 20,
			max_connections: 4,
			min_spacing: 10.0,
			center_font_size: 18.0,
			normal_font_size: 16.0,
			padding_around: 14.0,
			min_text_width: 30.0,
			margin: 20.0,
			font_family: "Arial Black".to_string(),
		}
	}
}

/// Constants of the per-frame relaxation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
	/// Share of the overlap turned into velocity by the repulsion pass.
	pub repulsion_damping: f64,
	/// Gain of the soft boundary force.
	pub boundary_gain: f64,
	/// Per-frame velocity multiplier (friction).
	pub velocity_decay: f64,
	/// Velocity to position factor.
	pub time_step: f64,
	/// Velocity component above which a node counts as moving.
	pub move_threshold: f64,
	/// Fraction of the offset to the center the focal node covers per frame.
	pub focal_homing: f64,
	/// Offset component (px) above which the focal node counts as moving.
	pub focal_threshold: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			repulsion_damping: 0.5,
			boundary_gain: 0.1,
			velocity_decay: 0.8,
			time_step: 0.2,
			move_threshold: 0.05,
			focal_homing: 0.2,
			focal_threshold: 0.5,
		}
	}
}

/// Child placement around an expanding parent.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
	/// Closest distance from the parent.
	pub inner_radius: f64,
	/// Width of the band beyond `inner_radius`.
	pub radius_band: f64,
	/// Random candidates tried before falling back to the center region.
	pub attempts: usize,
	/// Inset of the safe rectangle from the canvas edges.
	pub safe_margin: f64,
	/// Radius assumed for a node that has not been measured yet.
	pub estimated_radius: f64,
}

impl Default for PlacementConfig {
	fn default() -> Self {
		Self {
			inner_radius: 80.0,
			radius_band: 70.0,
			attempts: 12,
			safe_margin: 40.0,
			estimated_radius: 50.0,
		}
	}
}

/// Pointer gesture tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
	/// Press/release travel (px) below which a gesture is a click.
	pub click_threshold: f64,
}

impl Default for InputConfig {
	fn default() -> Self {
		Self {
			click_threshold: 5.0,
		}
	}
}

/// Which word source backs the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
	/// Language-model proxy over HTTP.
	#[default]
	Http,
	/// Local random draw from the fallback vocabulary.
	Offline,
}

/// Word-source endpoint settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
	/// Source backing the graph.
	pub mode: SourceMode,
	/// Prefix of every endpoint.
	pub base_url: String,
	/// Endpoint answering related-word queries.
	pub related_words: String,
	/// Endpoint answering topic seed queries.
	pub topic_words: String,
	/// Per-request timeout.
	pub timeout_ms: u32,
	/// Extra attempts after a failed request.
	pub retries: u32,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			mode: SourceMode::Http,
			base_url: "/api".to_string(),
			related_words: "/get-related-words".to_string(),
			topic_words: "/get-topic-words".to_string(),
			timeout_ms: 10_000,
			retries: 2,
		}
	}
}

/// Response cache settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
	/// Disables caching entirely when false.
	pub enabled: bool,
	/// Entry lifetime in seconds.
	pub max_age_secs: u64,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			max_age_secs: 24 * 60 * 60,
		}
	}
}

impl CacheConfig {
	/// Entry lifetime in milliseconds, the unit of [`crate::api::Clock`].
	pub fn max_age_ms(&self) -> f64 {
		self.max_age_secs as f64 * 1000.0
	}
}

/// Topics and the static word lists used when the source is down.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VocabularyConfig {
	/// Topics offered in the selector, in display order.
	pub topics: Vec<String>,
	/// Seed words per topic.
	pub fallback_words: HashMap<String, Vec<String>>,
	/// Seed words for a topic missing from `fallback_words`.
	pub default_fallback: Vec<String>,
}

impl Default for VocabularyConfig {
	fn default() -> Self {
		let table: [(&str, [&str; 5]); 6] = [
			(
				"Environment & Nature",
				["environment", "ecosystem", "sustainable", "biodiversity", "conservation"],
			),
			(
				"Education & Learning",
				["education", "curriculum", "academic", "knowledge", "learning"],
			),
			(
				"Technology & Innovation",
				["technology", "innovation", "digital", "artificial", "algorithm"],
			),
			(
				"Society & Culture",
				["society", "culture", "heritage", "tradition", "diversity"],
			),
			(
				"Health & Medicine",
				["health", "medical", "treatment", "wellness", "prevention"],
			),
			(
				"City & Architecture",
				["urban", "architecture", "infrastructure", "planning", "development"],
			),
		];

		Self {
			topics: table.iter().map(|(topic, _)| topic.to_string()).collect(),
			fallback_words: table
				.iter()
				.map(|(topic, words)| {
					(
						topic.to_string(),
						words.iter().map(|w| w.to_string()).collect(),
					)
				})
				.collect(),
			default_fallback: ["environment", "education", "technology", "society", "health"]
				.into_iter()
				.map(String::from)
				.collect(),
		}
	}
}

impl VocabularyConfig {
	/// Static seed list for `topic`, falling back to the default list.
	pub fn fallback_for(&self, topic: &str) -> &[String] {
		self.fallback_words
			.get(topic)
			.map(Vec::as_slice)
			.unwrap_or(&self.default_fallback)
	}
}

impl Config {
	/// Parses a (possibly partial) JSON config.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_documented_constants() {
		let config = Config::default();
		assert_eq!(config.graph.max_nodes, 20);
		assert_eq!(config.graph.max_connections, 4);
		assert_eq!(config.layout.velocity_decay, 0.8);
		assert_eq!(config.placement.attempts, 12);
		assert_eq!(config.input.click_threshold, 5.0);
		assert_eq!(config.vocabulary.topics.len(), 6);
		assert_eq!(config.api.mode, SourceMode::Http);
	}

	#[test]
	fn partial_json_overrides_only_named_fields() {
		let config =
			Config::from_json(r#"{ "graph": { "maxNodes": 8 }, "api": { "mode": "offline" } }"#)
				.unwrap();
		assert_eq!(config.graph.max_nodes, 8);
		assert_eq!(config.graph.max_connections, 4);
		assert_eq!(config.api.mode, SourceMode::Offline);
		assert_eq!(config.api.base_url, "/api");
	}

	#[test]
	fn unknown_topic_uses_default_fallback() {
		let vocab = VocabularyConfig::default();
		assert_eq!(vocab.fallback_for("Cooking")[0], "environment");
		assert_eq!(vocab.fallback_for("Society & Culture")[0], "society");
	}

	#[test]
	fn cache_age_is_reported_in_milliseconds() {
		let cache = CacheConfig {
			enabled: true,
			max_age_secs: 2,
		};
		assert_eq!(cache.max_age_ms(), 2000.0);
	}
}
