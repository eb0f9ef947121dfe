//! # transcript-tree
//!
//! Turns the flat, time-ordered event stream recorded while a sample executes into a
//! tree suitable for nested rendering.
//!
//! Layout
//!
//! The work happens in three stages, composed left to right:
//!
//! src/transcript
//!   ├── event           The event model (closed set of kinds, raw fields kept verbatim)
//!   ├── normalization   Synthesizes structural markers the source stream leaves implicit
//!   ├── tree            Rebuilds the nested forest from begin/end markers
//!   └── dispatch        Routes each node to a per-kind renderer with its state context
//!
//! Around these sit the [transforms](transcript::transforms) used to chain the stages, the
//! [loader](transcript::loader) that reads execution logs, and the output
//! [formats](transcript::formats).
//!
//! For writing tests against forests, see the [testing module](transcript::testing).

pub mod transcript;
