//! JSON output: the forest snapshot as a flat row list, and the normalized event stream.

use super::FormatError;
use crate::transcript::event::Event;
use crate::transcript::snapshot::snapshot_forest;
use crate::transcript::tree::Forest;

pub fn to_json_str(forest: &Forest, namespace: &str) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&snapshot_forest(
        forest, namespace,
    ))?)
}

pub fn events_to_json_str(events: &[Event]) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(events)?)
}
