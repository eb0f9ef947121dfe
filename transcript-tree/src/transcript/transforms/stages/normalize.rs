//! Stream normalization stage
//!
//! Brackets the first `sample_init` event with synthetic step markers.

use crate::transcript::event::Event;
use crate::transcript::normalization::SampleInitWrapping;
use crate::transcript::transforms::Runnable;

/// Normalization stage
///
/// # Input
/// - `Vec<Event>` - raw events in stream order
///
/// # Output
/// - `Vec<Event>` - the same events with implicit groupings made explicit
pub struct NormalizeStream;

impl NormalizeStream {
    pub fn new() -> Self {
        NormalizeStream
    }
}

impl Default for NormalizeStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Event>, Vec<Event>> for NormalizeStream {
    fn run(&self, input: Vec<Event>) -> Vec<Event> {
        SampleInitWrapping::new().map(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::testing::factories::mk_sample_init;

    #[test]
    fn test_adds_two_markers() {
        let result = NormalizeStream::new().run(vec![mk_sample_init(1)]);

        assert_eq!(result.len(), 3);
    }
}
