//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait.

pub mod build_tree;
pub mod normalize;

pub use build_tree::BuildTree;
pub use normalize::NormalizeStream;
