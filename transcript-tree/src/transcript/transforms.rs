//! Transform pipeline infrastructure
//!
//! Stages are chained with a small composable system: anything implementing
//! [`Runnable<I, O>`] can be appended to a [`Transform`] whose output type is `I`, and the
//! compiler checks that adjacent stages fit together.
//!
//! ```rust,ignore
//! let pipeline = Transform::from_fn(|events| events)
//!     .then(NormalizeStream::new())   // Vec<Event> → Vec<Event>
//!     .then(BuildTree::new(0));       // Vec<Event> → Forest
//!
//! let forest = pipeline.run(events);
//! ```
//!
//! Both transcript stages are total: every event stream normalizes and every normalized
//! stream builds a forest, so stages return their output directly.
//!
//! # Module Organization
//!
//! - [`stages`]: the individual stages
//! - [`standard`]: pre-built pipelines for common use

pub mod stages;
pub mod standard;

/// Trait for anything that can transform an input to an output
pub trait Runnable<I, O> {
    /// Execute this transformation on the input
    fn run(&self, input: I) -> O;
}

/// A composable transformation pipeline from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> O + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Append a stage, returning a transform with the stage's output type
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| stage.run(prev_run(input))),
        }
    }

    /// Execute this transform on the given input
    pub fn run(&self, input: I) -> O {
        (self.run_fn)(input)
    }
}

// Transforms can themselves be used as stages
impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> O {
        Transform::run(self, input)
    }
}
