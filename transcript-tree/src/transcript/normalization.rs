//! Stream normalization
//!
//!     The engine records sample initialization as a bare `sample_init` leaf, but it reads
//!     best as a scope of its own: the initial state and inputs nested under a collapsible
//!     header, like every solver and scorer step. Rather than special-casing it in the tree
//!     builder, this stage makes the grouping explicit by bracketing the event with
//!     synthetic step markers:
//!
//!         [.., sample_init, ..]  =>  [.., step/begin, sample_init, step/end, ..]
//!
//!     Both markers carry the init event's timestamp, `name = "sample_init"` and no type.
//!     After this pass the tree builder sees one more ordinary scope.
//!
//! Rules
//!
//!     - Only the first `sample_init` in scan order is wrapped.
//!     - A stream without `sample_init` passes through unchanged.
//!     - A `sample_init` that is already bracketed by `sample_init` markers is left alone,
//!       so normalizing an already normalized stream is a no-op.
//!     - The input is never mutated.

use crate::transcript::event::{Event, StepAction};
use tracing::trace;

/// Name given to the synthetic scope around sample initialization.
pub const SAMPLE_INIT_STEP: &str = "sample_init";

/// A mapper that brackets the first `sample_init` event with step markers.
pub struct SampleInitWrapping;

impl SampleInitWrapping {
    pub fn new() -> Self {
        SampleInitWrapping
    }

    /// Produces the normalized copy of `events`.
    pub fn map(&self, events: &[Event]) -> Vec<Event> {
        let Some(index) = events.iter().position(Event::is_sample_init) else {
            return events.to_vec();
        };

        if is_already_wrapped(events, index) {
            trace!(index, "sample_init already wrapped");
            return events.to_vec();
        }

        let init = &events[index];
        trace!(index, "wrapping sample_init in a step scope");

        let mut result = Vec::with_capacity(events.len() + 2);
        result.extend_from_slice(&events[..index]);
        result.push(Event::step_begin(init.timestamp, SAMPLE_INIT_STEP, None));
        result.push(init.clone());
        result.push(Event::step_end(init.timestamp, SAMPLE_INIT_STEP, None));
        result.extend_from_slice(&events[index + 1..]);
        result
    }
}

impl Default for SampleInitWrapping {
    fn default() -> Self {
        Self::new()
    }
}

fn is_sample_init_marker(event: Option<&Event>, action: StepAction) -> bool {
    event
        .and_then(Event::step_marker)
        .is_some_and(|marker| marker.action == action && marker.name == SAMPLE_INIT_STEP)
}

fn is_already_wrapped(events: &[Event], index: usize) -> bool {
    let before = index.checked_sub(1).and_then(|i| events.get(i));
    let after = events.get(index + 1);
    is_sample_init_marker(before, StepAction::Begin) && is_sample_init_marker(after, StepAction::End)
}

/// Normalize a raw event stream. See the [module docs](self) for the rules.
pub fn normalize_events(events: &[Event]) -> Vec<Event> {
    SampleInitWrapping::new().map(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::event::{EventKind, StepMarker};
    use crate::transcript::testing::factories::{mk_begin, mk_end, mk_leaf, mk_sample_init, ts};

    #[test]
    fn test_passthrough_without_sample_init() {
        let input = vec![
            mk_begin("solver", 1),
            mk_leaf(EventKind::Info, 2),
            mk_end("solver", 3),
        ];

        let output = normalize_events(&input);

        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_stream() {
        assert!(normalize_events(&[]).is_empty());
    }

    #[test]
    fn test_wraps_sample_init() {
        let input = vec![mk_sample_init(1)];

        let output = normalize_events(&input);

        assert_eq!(output.len(), 3);
        assert_eq!(
            output[0].kind,
            EventKind::Step(StepMarker::begin(SAMPLE_INIT_STEP, None))
        );
        assert_eq!(output[1], input[0]);
        assert_eq!(
            output[2].kind,
            EventKind::Step(StepMarker::end(SAMPLE_INIT_STEP, None))
        );
        assert_eq!(output[0].timestamp, ts(1));
        assert_eq!(output[2].timestamp, ts(1));
    }

    #[test]
    fn test_markers_use_init_timestamp_not_neighbours() {
        let input = vec![
            mk_leaf(EventKind::Info, 1),
            mk_sample_init(5),
            mk_leaf(EventKind::Info, 9),
        ];

        let output = normalize_events(&input);

        let tags: Vec<&str> = output.iter().map(Event::tag).collect();
        assert_eq!(tags, vec!["info", "step", "sample_init", "step", "info"]);
        assert_eq!(output[1].timestamp, ts(5));
        assert_eq!(output[3].timestamp, ts(5));
    }

    #[test]
    fn test_only_first_sample_init_is_wrapped() {
        let input = vec![mk_sample_init(1), mk_sample_init(2)];

        let output = normalize_events(&input);

        let tags: Vec<&str> = output.iter().map(Event::tag).collect();
        assert_eq!(tags, vec!["step", "sample_init", "step", "sample_init"]);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let input = vec![
            mk_sample_init(1),
            mk_begin("solver", 2),
            mk_end("solver", 3),
        ];

        let once = normalize_events(&input);
        let twice = normalize_events(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_is_untouched() {
        let input = vec![mk_sample_init(1)];
        let snapshot = input.clone();

        let _ = normalize_events(&input);

        assert_eq!(input, snapshot);
    }
}
