//! Testing utilities for transcript forests
//!
//!     Two tools cover almost every test in this crate:
//!
//!         1. [factories] build events tersely. Timestamps are plain seconds, since the
//!            builder trusts stream order and never looks at them.
//!         2. [assert_forest](fn@assert_forest) checks the shape of a built forest through a
//!            fluent API, failing with the path of the node that did not match.
//!
//!     Example:
//!
//!     ```rust,ignore
//!     use transcript_tree::transcript::testing::assert_forest;
//!     use transcript_tree::transcript::testing::factories::{mk_begin, mk_end, mk_leaf};
//!
//!     let forest = build_forest(vec![mk_begin("A", 1), mk_leaf(EventKind::Info, 2), mk_end("A", 3)], 0);
//!
//!     assert_forest(&forest).root_count(1).root(0, |root| {
//!         root.step("A").depth(0).child_count(1).child(0, |info| {
//!             info.tag("info").depth(1).leaf();
//!         });
//!     });
//!     ```

pub mod factories;
mod forest_assertions;

pub use forest_assertions::{assert_forest, ForestAssertion, NodeAssertion};
