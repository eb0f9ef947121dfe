//! The event model
//!
//!     An execution log records what happened while a sample ran as a flat list of events.
//!     Every event carries a timestamp and an `event` tag; everything else is specific to
//!     the tag. We only ever discriminate on the tag, so the tag-specific fields are kept
//!     verbatim in [`Event::fields`] and never validated.
//!
//!     The one exception is `step`: its `action`, `name` and `type` fields are lifted into a
//!     typed [`StepMarker`]. Only `action` carries structure and must be `begin` or `end`;
//!     a missing `name` becomes `""` and a `type` that is not a string becomes `None`.
//!
//!     The JSON shape is the one written to logs:
//!
//!         {"timestamp": "2024-05-01T12:00:00Z", "event": "step", "action": "begin",
//!          "name": "solver", "type": "solver"}
//!
//!     Tags outside the known set load as [`EventKind::Unknown`] rather than failing, so a
//!     log written by a newer engine still produces a tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Whether a `step` event opens or closes a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Begin,
    End,
}

impl StepAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepAction::Begin => "begin",
            StepAction::End => "end",
        }
    }
}

/// The structural part of a `step` event.
///
/// `name` is only a label: begin and end markers are paired by stack discipline, never by
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMarker {
    pub action: StepAction,
    pub name: String,
    /// The scope classifier (`solver`, `scorer`, ...), when the engine supplied one.
    pub scope_type: Option<String>,
}

impl StepMarker {
    pub fn begin(name: impl Into<String>, scope_type: Option<String>) -> Self {
        StepMarker {
            action: StepAction::Begin,
            name: name.into(),
            scope_type,
        }
    }

    pub fn end(name: impl Into<String>, scope_type: Option<String>) -> Self {
        StepMarker {
            action: StepAction::End,
            name: name.into(),
            scope_type,
        }
    }
}

/// The event discriminant.
///
/// This is a closed set: every variant except `Unknown` has a dedicated renderer method in
/// [`EventRenderer`](crate::transcript::dispatch::EventRenderer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    SampleInit,
    SampleLimit,
    State,
    Store,
    Model,
    Tool,
    Approval,
    Input,
    Score,
    Error,
    Logger,
    Info,
    Step(StepMarker),
    Subtask,
    /// A tag this crate does not know about. Carries the raw tag.
    Unknown(String),
}

impl EventKind {
    /// The wire tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            EventKind::SampleInit => "sample_init",
            EventKind::SampleLimit => "sample_limit",
            EventKind::State => "state",
            EventKind::Store => "store",
            EventKind::Model => "model",
            EventKind::Tool => "tool",
            EventKind::Approval => "approval",
            EventKind::Input => "input",
            EventKind::Score => "score",
            EventKind::Error => "error",
            EventKind::Logger => "logger",
            EventKind::Info => "info",
            EventKind::Step(_) => "step",
            EventKind::Subtask => "subtask",
            EventKind::Unknown(tag) => tag,
        }
    }

    /// Resolve a non-step tag. `step` needs its marker fields and is handled by the caller.
    fn from_plain_tag(tag: &str) -> EventKind {
        match tag {
            "sample_init" => EventKind::SampleInit,
            "sample_limit" => EventKind::SampleLimit,
            "state" => EventKind::State,
            "store" => EventKind::Store,
            "model" => EventKind::Model,
            "tool" => EventKind::Tool,
            "approval" => EventKind::Approval,
            "input" => EventKind::Input,
            "score" => EventKind::Score,
            "error" => EventKind::Error,
            "logger" => EventKind::Logger,
            "info" => EventKind::Info,
            "subtask" => EventKind::Subtask,
            other => EventKind::Unknown(other.to_string()),
        }
    }
}

/// A single transcript event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    /// Tag-specific fields, untouched. For `step` events the marker fields live in
    /// [`EventKind::Step`] instead.
    pub fields: Map<String, Value>,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, kind: EventKind) -> Self {
        Event {
            timestamp,
            kind,
            fields: Map::new(),
        }
    }

    pub fn step_begin(
        timestamp: DateTime<Utc>,
        name: impl Into<String>,
        scope_type: Option<String>,
    ) -> Self {
        Event::new(timestamp, EventKind::Step(StepMarker::begin(name, scope_type)))
    }

    pub fn step_end(
        timestamp: DateTime<Utc>,
        name: impl Into<String>,
        scope_type: Option<String>,
    ) -> Self {
        Event::new(timestamp, EventKind::Step(StepMarker::end(name, scope_type)))
    }

    /// Attach a tag-specific field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    pub fn step_marker(&self) -> Option<&StepMarker> {
        match &self.kind {
            EventKind::Step(marker) => Some(marker),
            _ => None,
        }
    }

    pub fn is_step_begin(&self) -> bool {
        matches!(self.step_marker(), Some(m) if m.action == StepAction::Begin)
    }

    pub fn is_step_end(&self) -> bool {
        matches!(self.step_marker(), Some(m) if m.action == StepAction::End)
    }

    pub fn is_sample_init(&self) -> bool {
        self.kind == EventKind::SampleInit
    }
}

/// Error raised when a serialized event cannot be turned into an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventError {
    /// A `step` event whose `action` is missing or not `begin`/`end`.
    InvalidStepAction(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::InvalidStepAction(found) => {
                write!(f, "step event has invalid action: {}", found)
            }
        }
    }
}

impl std::error::Error for EventError {}

/// Wire representation: the tag and the remaining fields side by side.
#[derive(Serialize, Deserialize)]
struct RawEvent {
    timestamp: DateTime<Utc>,
    event: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let RawEvent {
            timestamp,
            event,
            mut fields,
        } = raw;

        let kind = if event == "step" {
            EventKind::Step(take_step_marker(&mut fields)?)
        } else {
            EventKind::from_plain_tag(&event)
        };

        Ok(Event {
            timestamp,
            kind,
            fields,
        })
    }
}

/// Lifts the marker fields out of a `step` event. Only `action` is required; a `name` or
/// `type` that is not a string stays in `fields` and the marker gets `""` / `None`.
fn take_step_marker(fields: &mut Map<String, Value>) -> Result<StepMarker, EventError> {
    let action = match fields.remove("action") {
        Some(Value::String(s)) if s == "begin" => StepAction::Begin,
        Some(Value::String(s)) if s == "end" => StepAction::End,
        Some(other) => return Err(EventError::InvalidStepAction(other.to_string())),
        None => return Err(EventError::InvalidStepAction("<missing>".to_string())),
    };
    let name = take_string(fields, "name").unwrap_or_default();
    let scope_type = take_string(fields, "type");
    if fields.get("type").is_some_and(Value::is_null) {
        fields.remove("type");
    }
    Ok(StepMarker {
        action,
        name,
        scope_type,
    })
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !fields.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let Event {
            timestamp,
            kind,
            mut fields,
        } = event;
        let tag = kind.tag().to_string();
        if let EventKind::Step(marker) = kind {
            fields.insert("action".into(), Value::from(marker.action.as_str()));
            // A non-string name or type kept in `fields` is written back as it was read
            fields
                .entry("name")
                .or_insert_with(|| Value::from(marker.name));
            fields
                .entry("type")
                .or_insert_with(|| marker.scope_type.map(Value::from).unwrap_or(Value::Null));
        }
        RawEvent {
            timestamp,
            event: tag,
            fields,
        }
    }
}
