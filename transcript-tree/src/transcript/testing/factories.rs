//! Event factories for tests.

use crate::transcript::event::{Event, EventKind};
use chrono::{DateTime, Utc};

/// A timestamp `secs` seconds after the epoch.
pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

pub fn mk_begin(name: &str, secs: i64) -> Event {
    Event::step_begin(ts(secs), name, None)
}

pub fn mk_end(name: &str, secs: i64) -> Event {
    Event::step_end(ts(secs), name, None)
}

pub fn mk_leaf(kind: EventKind, secs: i64) -> Event {
    Event::new(ts(secs), kind)
}

pub fn mk_sample_init(secs: i64) -> Event {
    Event::new(ts(secs), EventKind::SampleInit)
}
