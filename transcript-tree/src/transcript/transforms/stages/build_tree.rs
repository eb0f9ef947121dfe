//! Tree building stage
//!
//! Rebuilds the nested forest from begin/end step markers.

use crate::transcript::event::Event;
use crate::transcript::transforms::Runnable;
use crate::transcript::tree::{build_forest, Forest};

/// Tree building stage
///
/// # Input
/// - `Vec<Event>` - normalized events
///
/// # Output
/// - `Forest` - nodes with depths starting at `base_depth`
pub struct BuildTree {
    base_depth: usize,
}

impl BuildTree {
    pub fn new(base_depth: usize) -> Self {
        BuildTree { base_depth }
    }
}

impl Default for BuildTree {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Runnable<Vec<Event>, Forest> for BuildTree {
    fn run(&self, input: Vec<Event>) -> Forest {
        build_forest(input, self.base_depth)
    }
}
