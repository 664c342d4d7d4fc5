//! Vocabulary mind-map drawn on a canvas.
//!
//! The graph grows by clicking words: each click asks a [`crate::api::WordSource`]
//! for related words and attaches them around the clicked node, which becomes
//! the new focus. Pieces, bottom-up:
//! - [`types`]: nodes, links and handles
//! - [`metrics`]: label-derived radii, child placement, view clamping
//! - [`state`]: the graph store with focus and pruning
//! - [`layout`]: per-frame relaxation
//! - [`expansion`]: the `Collapsed -> Loading -> Expanded` cycle
//! - [`input`]: press/drag/click gestures
//! - [`render`]: canvas painting
//!
//! # Example
//!
//! ```ignore
//! use vocab_mindmap::{Config, MindMapCanvas, TopicRequest};
//!
//! let topic = RwSignal::new(TopicRequest::new("Health & Medicine"));
//! let seeding = RwSignal::new(false);
//! view! { <MindMapCanvas topic=topic config=Config::default() seeding=seeding /> }
//! ```

mod component;
pub mod expansion;
pub mod input;
pub mod layout;
pub mod metrics;
mod render;
pub mod state;
pub mod theme;
pub mod types;

pub use component::{MindMapCanvas, TopicRequest};
pub use expansion::{Expander, ExpansionOutcome, ExpansionTicket};
pub use input::{InputAction, PointerEvent, PointerInput};
pub use layout::{Spacing, Stability, advance_layout};
pub use metrics::{
	CanvasMeasure, EstimatedMeasure, Metrics, TextMeasure, clamp_into_view, generate_child_position,
};
pub use state::MindMap;
pub use theme::Theme;
pub use types::{Bounds, ExpansionState, Link, Node, NodeId};
