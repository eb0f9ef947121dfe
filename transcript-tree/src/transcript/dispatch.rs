//! Node dispatch
//!
//!     Rendering is not this crate's business, but routing is. Given a node, the
//!     [`Dispatcher`] picks the renderer method for the node's event kind and hands it
//!     exactly the context that kind is entitled to:
//!
//!         kind                       depth   children   state manager
//!         step                       yes     yes        shared
//!         subtask, tool              yes     no         shared
//!         store                      no      no         fresh, from the factory
//!         everything else            no      no         shared
//!         unknown tag                (not dispatched, no output)
//!
//!     `store` nodes get their own state manager so the snapshot view they build cannot
//!     leak into, or be polluted by, the state of the surrounding scope.
//!
//!     [`EventRenderer`] has one required method per known kind, so a renderer that
//!     forgets a kind does not compile. Unknown tags never reach a renderer.
//!
//! Row identity
//!
//!     Each dispatched row gets the id `"{namespace}-event{row}"`, where `row` is the node's
//!     position in the forest's flattened pre-order row list. Ids are stable for a given
//!     forest and carry no meaning across rebuilds.

use crate::transcript::event::{Event, EventKind};
use crate::transcript::tree::{NodeRef, Nodes};
use serde_json::{Map, Value};
use tracing::trace;

/// Read/write access to the evaluation state that renderers display.
///
/// How state diffs are applied is up to the implementation.
pub trait StateManager {
    fn state(&self) -> &Value;
    fn set_state(&mut self, state: Value);
}

/// In-memory state manager holding a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonStateManager {
    state: Value,
}

impl JsonStateManager {
    /// Starts from an empty object.
    pub fn new() -> Self {
        JsonStateManager {
            state: Value::Object(Map::new()),
        }
    }

    pub fn with_state(state: Value) -> Self {
        JsonStateManager { state }
    }
}

impl Default for JsonStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager for JsonStateManager {
    fn state(&self) -> &Value {
        &self.state
    }

    fn set_state(&mut self, state: Value) {
        self.state = state;
    }
}

/// The identity of the row at `row` in the flattened row list.
pub fn row_id(namespace: &str, row: usize) -> String {
    format!("{}-event{}", namespace, row)
}

/// Produces independent state managers for `store` nodes.
pub trait StateManagerFactory<S> {
    fn create(&self) -> S;
}

impl<S, F> StateManagerFactory<S> for F
where
    F: Fn() -> S,
{
    fn create(&self) -> S {
        self()
    }
}

/// What every renderer call receives: the generated row id and the event itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RowContext<'a> {
    pub id: String,
    pub event: &'a Event,
}

/// Per-kind rendering behaviour.
pub trait EventRenderer<S: StateManager> {
    type Output;

    fn sample_init(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn sample_limit(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn state(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    /// `state` is a fresh instance, never the shared one.
    fn store(&mut self, row: RowContext<'_>, state: S) -> Self::Output;
    fn model(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn tool(&mut self, row: RowContext<'_>, depth: usize, state: &mut S) -> Self::Output;
    fn approval(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn input(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn score(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn error(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn logger(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn info(&mut self, row: RowContext<'_>, state: &mut S) -> Self::Output;
    fn step(
        &mut self,
        row: RowContext<'_>,
        depth: usize,
        children: Nodes<'_>,
        state: &mut S,
    ) -> Self::Output;
    fn subtask(&mut self, row: RowContext<'_>, depth: usize, state: &mut S) -> Self::Output;
}

/// Routes forest nodes to an [`EventRenderer`].
pub struct Dispatcher<F> {
    namespace: String,
    factory: F,
}

impl<F> Dispatcher<F> {
    /// `namespace` prefixes every generated row id; `factory` supplies the state managers
    /// handed to `store` nodes.
    pub fn new(namespace: impl Into<String>, factory: F) -> Self {
        Dispatcher {
            namespace: namespace.into(),
            factory,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn row_id(&self, node: NodeRef<'_>) -> String {
        row_id(&self.namespace, node.row())
    }

    /// Dispatches one node. Returns `None` for tags with no renderer.
    pub fn dispatch<S, R>(
        &self,
        node: NodeRef<'_>,
        state: &mut S,
        renderer: &mut R,
    ) -> Option<R::Output>
    where
        S: StateManager,
        F: StateManagerFactory<S>,
        R: EventRenderer<S>,
    {
        let event = node.event();
        let row = RowContext {
            id: self.row_id(node),
            event,
        };

        let output = match &event.kind {
            EventKind::SampleInit => renderer.sample_init(row, state),
            EventKind::SampleLimit => renderer.sample_limit(row, state),
            EventKind::State => renderer.state(row, state),
            EventKind::Store => renderer.store(row, self.factory.create()),
            EventKind::Model => renderer.model(row, state),
            EventKind::Tool => renderer.tool(row, node.depth(), state),
            EventKind::Approval => renderer.approval(row, state),
            EventKind::Input => renderer.input(row, state),
            EventKind::Score => renderer.score(row, state),
            EventKind::Error => renderer.error(row, state),
            EventKind::Logger => renderer.logger(row, state),
            EventKind::Info => renderer.info(row, state),
            EventKind::Step(_) => renderer.step(row, node.depth(), node.children(), state),
            EventKind::Subtask => renderer.subtask(row, node.depth(), state),
            EventKind::Unknown(tag) => {
                trace!(tag = tag.as_str(), row = node.row(), "no renderer for event");
                return None;
            }
        };
        Some(output)
    }

    /// Dispatches a run of nodes in order, skipping the ones that produce no output.
    pub fn dispatch_all<'a, I, S, R>(
        &self,
        nodes: I,
        state: &mut S,
        renderer: &mut R,
    ) -> Vec<R::Output>
    where
        I: IntoIterator<Item = NodeRef<'a>>,
        S: StateManager,
        F: StateManagerFactory<S>,
        R: EventRenderer<S>,
    {
        nodes
            .into_iter()
            .filter_map(|node| self.dispatch(node, state, renderer))
            .collect()
    }
}
