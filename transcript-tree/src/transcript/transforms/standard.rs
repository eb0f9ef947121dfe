//! Standard transform definitions
//!
//! Pre-built pipelines, defined as static references using `once_cell::sync::Lazy`.

use crate::transcript::event::Event;
use crate::transcript::transforms::stages::{BuildTree, NormalizeStream};
use crate::transcript::transforms::Transform;
use crate::transcript::tree::Forest;
use once_cell::sync::Lazy;

/// Type alias for normalization transform
pub type NormalizationTransform = Transform<Vec<Event>, Vec<Event>>;

/// Type alias for the full events → forest transform
pub type TreeTransform = Transform<Vec<Event>, Forest>;

/// Normalization transform: raw events → normalized events
pub static NORMALIZATION: Lazy<NormalizationTransform> =
    Lazy::new(|| Transform::from_fn(|events: Vec<Event>| events).then(NormalizeStream::new()));

/// Raw events → forest with root depth 0:
/// 1. Stream normalization
/// 2. Tree building
///
/// This is the standard transform for most use cases.
pub static TRANSCRIPT_TREE: Lazy<TreeTransform> = Lazy::new(|| tree_pipeline(0));

/// Raw events → forest, for forests nested under an existing depth.
pub fn tree_pipeline(base_depth: usize) -> TreeTransform {
    Transform::from_fn(|events: Vec<Event>| events)
        .then(NormalizeStream::new())
        .then(BuildTree::new(base_depth))
}
