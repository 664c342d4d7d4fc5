//! Error taxonomy shared by the graph engine and the word sources.

use thiserror::Error;

/// Failures surfaced by the mind-map engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindMapError {
	/// The word source could not answer: network error, non-success status,
	/// timeout or a malformed payload. Always recoverable.
	#[error("word source unavailable: {0}")]
	SourceUnavailable(String),
	/// Programmer error, e.g. linking a node that is not in the store.
	#[error("graph invariant violated: {0}")]
	InvariantViolation(String),
}

impl MindMapError {
	/// Shorthand for [`MindMapError::SourceUnavailable`].
	pub fn unavailable(reason: impl Into<String>) -> Self {
		Self::SourceUnavailable(reason.into())
	}

	/// Builds an [`MindMapError::InvariantViolation`], tripping a debug assertion first.
	pub fn invariant(reason: impl Into<String>) -> Self {
		let reason = reason.into();
		debug_assert!(false, "graph invariant violated: {reason}");
		Self::InvariantViolation(reason)
	}
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MindMapError>;
