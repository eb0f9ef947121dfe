//! Forest snapshot: a plain, serializable copy of the tree
//!
//! Output formats consume [`NodeSnapshot`]s rather than walking the arena themselves. A
//! snapshot captures, per node, the event tag, a short human label, the depth and the row
//! id the dispatcher would assign.
//!
//! Snapshots are flat: one entry per row in pre-order, linked to their parent and children
//! by row id. Nesting depth is unbounded (unclosed scopes pile up), so nothing here nests
//! values or walks the tree recursively.

use crate::transcript::dispatch::row_id;
use crate::transcript::event::{Event, EventKind};
use crate::transcript::tree::Forest;
use serde::Serialize;
use serde_json::Value;

/// A snapshot of one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    /// The event tag (`step`, `model`, ...)
    pub event: String,
    pub label: String,
    pub depth: usize,
    pub row_id: String,
    /// Row id of the enclosing scope, `None` for roots
    pub parent: Option<String>,
    /// Row ids of the direct children, in order
    pub children: Vec<String>,
}

/// Snapshot every row of `forest` in pre-order. `namespace` is used for the row ids.
pub fn snapshot_forest(forest: &Forest, namespace: &str) -> Vec<NodeSnapshot> {
    let mut parents = vec![None; forest.len()];
    for node in forest.rows() {
        for child in node.children() {
            parents[child.row()] = Some(node.row());
        }
    }

    forest
        .rows()
        .zip(parents)
        .map(|(node, parent)| NodeSnapshot {
            event: node.event().tag().to_string(),
            label: label_for(node.event()),
            depth: node.depth(),
            row_id: row_id(namespace, node.row()),
            parent: parent.map(|row| row_id(namespace, row)),
            children: node
                .children()
                .iter()
                .map(|child| row_id(namespace, child.row()))
                .collect(),
        })
        .collect()
}

fn str_field<'a>(event: &'a Event, path: &[&str]) -> Option<&'a str> {
    let (first, rest) = path.split_first()?;
    let mut value = event.fields.get(*first)?;
    for key in rest {
        value = value.get(key)?;
    }
    value.as_str()
}

fn changes_label(event: &Event) -> String {
    let count = event
        .fields
        .get("changes")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    match count {
        1 => "1 change".to_string(),
        n => format!("{} changes", n),
    }
}

/// Short human label for an event
pub fn label_for(event: &Event) -> String {
    let tag = event.tag();
    let detail = match &event.kind {
        EventKind::Step(marker) => {
            return match &marker.scope_type {
                Some(scope_type) => format!("{} ({})", marker.name, scope_type),
                None => marker.name.clone(),
            };
        }
        EventKind::State | EventKind::Store => Some(changes_label(event)),
        EventKind::Model => str_field(event, &["model"]).map(str::to_string),
        EventKind::Tool => str_field(event, &["function"]).map(str::to_string),
        EventKind::Subtask => str_field(event, &["name"]).map(str::to_string),
        EventKind::Logger => str_field(event, &["message", "message"]).map(str::to_string),
        EventKind::Error => str_field(event, &["error", "message"]).map(str::to_string),
        EventKind::SampleLimit => str_field(event, &["type"]).map(str::to_string),
        EventKind::Score => event
            .fields
            .get("score")
            .and_then(|score| score.get("value"))
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        EventKind::SampleInit
        | EventKind::Approval
        | EventKind::Input
        | EventKind::Info
        | EventKind::Unknown(_) => None,
    };
    match detail {
        Some(detail) => format!("{}: {}", tag, detail),
        None => tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::testing::factories::{mk_begin, mk_end, mk_leaf, ts};
    use crate::transcript::tree::build_forest;
    use serde_json::json;

    #[test]
    fn test_labels() {
        let model = mk_leaf(EventKind::Model, 1).with_field("model", "mockllm/model");
        assert_eq!(label_for(&model), "model: mockllm/model");

        let tool = mk_leaf(EventKind::Tool, 1).with_field("function", "bash");
        assert_eq!(label_for(&tool), "tool: bash");

        let logger = mk_leaf(EventKind::Logger, 1)
            .with_field("message", json!({"level": "info", "message": "hello"}));
        assert_eq!(label_for(&logger), "logger: hello");

        let score = mk_leaf(EventKind::Score, 1).with_field("score", json!({"value": "C"}));
        assert_eq!(label_for(&score), "score: C");

        let store = mk_leaf(EventKind::Store, 1).with_field("changes", json!([{"op": "add"}]));
        assert_eq!(label_for(&store), "store: 1 change");

        let state = mk_leaf(EventKind::State, 1);
        assert_eq!(label_for(&state), "state: 0 changes");

        let step = Event::step_begin(ts(1), "generate", Some("solver".to_string()));
        assert_eq!(label_for(&step), "generate (solver)");

        let unknown = mk_leaf(EventKind::Unknown("sandbox".to_string()), 1);
        assert_eq!(label_for(&unknown), "sandbox");
    }

    #[test]
    fn test_snapshot_shape() {
        let forest = build_forest(
            vec![
                mk_begin("a", 1),
                mk_leaf(EventKind::Info, 2),
                mk_end("a", 3),
                mk_leaf(EventKind::Model, 4),
            ],
            0,
        );

        let snapshot = snapshot_forest(&forest, "s");

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].row_id, "s-event0");
        assert_eq!(snapshot[0].parent, None);
        assert_eq!(snapshot[0].children, vec!["s-event1"]);
        assert_eq!(snapshot[1].parent.as_deref(), Some("s-event0"));
        assert_eq!(snapshot[1].depth, 1);
        assert_eq!(snapshot[1].label, "info");
        assert_eq!(snapshot[2].parent, None);
        assert_eq!(snapshot[2].depth, 0);
    }

    #[test]
    fn test_deep_nesting() {
        let mut events: Vec<Event> = (0..100_000).map(|i| mk_begin("deep", i)).collect();
        events.push(mk_leaf(EventKind::Info, 100_000));
        let forest = build_forest(events, 0);

        let snapshot = snapshot_forest(&forest, "s");

        assert_eq!(snapshot.len(), 100_001);
        let last = &snapshot[100_000];
        assert_eq!(last.depth, 100_000);
        assert_eq!(last.parent.as_deref(), Some("s-event99999"));
    }
}
