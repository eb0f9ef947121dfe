//! Loading transcripts from execution logs
//!
//!     Events reach us inside log files of a few shapes, depending on what was saved and
//!     by which engine version:
//!
//!         1. a bare JSON array of events
//!         2. a sample object with an `events` array
//!         3. a sample object with `transcript.events` (older logs)
//!         4. an eval log object with a `samples` array, each sample shaped as 2 or 3
//!
//!     The loader accepts all of them and hands back the event list of one sample, or the
//!     built forest via the standard pipeline.
//!
//!     ```rust,ignore
//!     let loader = TranscriptLoader::from_path("logs/run.json")?;
//!     let forest = loader.forest(Some(2), 0)?;
//!     ```

use crate::transcript::event::Event;
use crate::transcript::transforms::standard::tree_pipeline;
use crate::transcript::tree::Forest;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error that can occur while loading a transcript
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The file could not be read
    Io { path: PathBuf, message: String },
    /// The source is not valid JSON, or an event is malformed
    Json(String),
    /// Valid JSON that holds no recognizable event list
    UnrecognizedShape(String),
    /// The requested sample does not exist
    SampleOutOfRange { index: usize, count: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            LoadError::Json(msg) => write!(f, "Invalid transcript JSON: {}", msg),
            LoadError::UnrecognizedShape(msg) => write!(f, "Unrecognized log shape: {}", msg),
            LoadError::SampleOutOfRange { index, count } => {
                write!(f, "Sample {} out of range (log has {} samples)", index, count)
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err.to_string())
    }
}

/// A parsed log, ready to hand out the events of any of its samples.
#[derive(Debug, Clone)]
pub struct TranscriptLoader {
    source: Value,
}

impl TranscriptLoader {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| LoadError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        debug!(path = %path.display(), bytes = source.len(), "read transcript log");
        Self::from_string(&source)
    }

    pub fn from_string(source: &str) -> Result<Self, LoadError> {
        let source = serde_json::from_str(source)?;
        Ok(TranscriptLoader { source })
    }

    /// Number of samples in the log. Logs that are a single sample count as one.
    pub fn sample_count(&self) -> usize {
        match samples_of(&self.source) {
            Some(samples) => samples.len(),
            None => 1,
        }
    }

    /// The events of one sample, in stream order. `None` selects the first sample.
    pub fn load_events(&self, sample: Option<usize>) -> Result<Vec<Event>, LoadError> {
        let index = sample.unwrap_or(0);
        let sample_value = match samples_of(&self.source) {
            Some(samples) => samples
                .get(index)
                .ok_or(LoadError::SampleOutOfRange {
                    index,
                    count: samples.len(),
                })?,
            None if index == 0 => &self.source,
            None => return Err(LoadError::SampleOutOfRange { index, count: 1 }),
        };

        let events_value = events_of(sample_value).ok_or_else(|| {
            LoadError::UnrecognizedShape(
                "expected an event array, `events`, `transcript.events` or `samples`".to_string(),
            )
        })?;
        let events = Vec::<Event>::deserialize(events_value)?;
        debug!(sample = index, events = events.len(), "loaded transcript events");
        Ok(events)
    }

    /// Loads one sample and runs it through normalization and tree building.
    pub fn forest(&self, sample: Option<usize>, base_depth: usize) -> Result<Forest, LoadError> {
        let events = self.load_events(sample)?;
        Ok(tree_pipeline(base_depth).run(events))
    }
}

fn samples_of(value: &Value) -> Option<&Vec<Value>> {
    value.get("samples")?.as_array()
}

fn events_of(sample: &Value) -> Option<&Value> {
    if sample.is_array() {
        return Some(sample);
    }
    sample
        .get("events")
        .or_else(|| sample.get("transcript")?.get("events"))
        .filter(|events| events.is_array())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::testing::assert_forest;
    use std::io::Write;

    const INFO: &str = r#"{"timestamp": "2024-05-01T12:00:00Z", "event": "info", "data": "hi"}"#;

    #[test]
    fn test_bare_array() {
        let loader = TranscriptLoader::from_string(&format!("[{}]", INFO)).unwrap();

        assert_eq!(loader.sample_count(), 1);
        assert_eq!(loader.load_events(None).unwrap().len(), 1);
    }

    #[test]
    fn test_sample_with_events() {
        let loader = TranscriptLoader::from_string(&format!(r#"{{"id": 1, "events": [{}]}}"#, INFO))
            .unwrap();

        assert_eq!(loader.load_events(None).unwrap()[0].tag(), "info");
    }

    #[test]
    fn test_sample_with_transcript() {
        let loader = TranscriptLoader::from_string(&format!(
            r#"{{"id": 1, "transcript": {{"events": [{0}, {0}]}}}}"#,
            INFO
        ))
        .unwrap();

        assert_eq!(loader.load_events(None).unwrap().len(), 2);
    }

    #[test]
    fn test_eval_log_sample_selection() {
        let loader = TranscriptLoader::from_string(&format!(
            r#"{{"samples": [{{"events": []}}, {{"events": [{}]}}]}}"#,
            INFO
        ))
        .unwrap();

        assert_eq!(loader.sample_count(), 2);
        assert!(loader.load_events(Some(0)).unwrap().is_empty());
        assert_eq!(loader.load_events(Some(1)).unwrap().len(), 1);
        assert_eq!(
            loader.load_events(Some(2)).unwrap_err(),
            LoadError::SampleOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn test_single_sample_rejects_other_indices() {
        let loader = TranscriptLoader::from_string("[]").unwrap();

        assert_eq!(
            loader.load_events(Some(1)).unwrap_err(),
            LoadError::SampleOutOfRange { index: 1, count: 1 }
        );
    }

    #[test]
    fn test_unrecognized_shape() {
        let loader = TranscriptLoader::from_string(r#"{"status": "success"}"#).unwrap();

        assert!(matches!(
            loader.load_events(None),
            Err(LoadError::UnrecognizedShape(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = TranscriptLoader::from_string("{not json").unwrap_err();

        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_malformed_step_is_a_json_error() {
        let loader = TranscriptLoader::from_string(
            r#"[{"timestamp": "2024-05-01T12:00:00Z", "event": "step", "action": "??", "name": "x"}]"#,
        )
        .unwrap();

        assert!(matches!(loader.load_events(None), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_step_label_defects_do_not_reject_the_log() {
        let loader = TranscriptLoader::from_string(
            r#"[
                {"timestamp": "2024-05-01T12:00:00Z", "event": "step", "action": "begin"},
                {"timestamp": "2024-05-01T12:00:01Z", "event": "info"},
                {"timestamp": "2024-05-01T12:00:02Z", "event": "step", "action": "end", "name": "x", "type": 7}
            ]"#,
        )
        .unwrap();

        let forest = loader.forest(None, 0).unwrap();

        assert_forest(&forest)
            .root_count(1)
            .unclosed_scopes(0)
            .root(0, |root| {
                root.step("").child_count(1).child(0, |info| {
                    info.tag("info").depth(1);
                });
            });
    }

    #[test]
    fn test_from_path_and_forest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"timestamp": "2024-05-01T12:00:00Z", "event": "sample_init", "sample": {{}}}},
                {INFO}
            ]"#
        )
        .unwrap();

        let loader = TranscriptLoader::from_path(file.path()).unwrap();
        let forest = loader.forest(None, 0).unwrap();

        assert_forest(&forest)
            .root_count(2)
            .node_count(3)
            .root(0, |root| {
                root.step("sample_init").child_count(1);
            })
            .root(1, |info| {
                info.tag("info").depth(0);
            });
    }

    #[test]
    fn test_missing_file() {
        let err = TranscriptLoader::from_path("/definitely/not/here.json").unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
