//! Transcript processing: events in, nested forest out.
//!
//! The usual entry point is the standard pipeline:
//!
//! ```rust,ignore
//! use transcript_tree::transcript::transforms::standard::TRANSCRIPT_TREE;
//!
//! let forest = TRANSCRIPT_TREE.run(events);
//! for root in forest.roots() {
//!     println!("{} at depth {}", root.event().tag(), root.depth());
//! }
//! ```
//!
//! Or, starting from a log file, the [loader::TranscriptLoader].

pub mod dispatch;
pub mod event;
pub mod formats;
pub mod loader;
pub mod normalization;
pub mod snapshot;
pub mod testing;
pub mod transforms;
pub mod tree;

pub use dispatch::{
    Dispatcher, EventRenderer, JsonStateManager, RowContext, StateManager, StateManagerFactory,
};
pub use event::{Event, EventKind, StepAction, StepMarker};
pub use loader::{LoadError, TranscriptLoader};
pub use normalization::normalize_events;
pub use tree::{build_forest, EventNode, Forest, NodeId, NodeRef, Nodes, TreeBuilder};
