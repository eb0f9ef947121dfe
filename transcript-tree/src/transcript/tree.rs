//! Rebuilds a nested forest from a flat, normalized event stream.
//!
//! # The High-Level Concept
//!
//! Structure in a transcript is carried by `step` markers: a `begin` opens a scope, the next
//! unmatched `end` closes it, and everything in between belongs to that scope. The builder
//! walks the stream once, keeping a stack of the scopes that are currently open. The top of
//! the stack is where the next node is attached.
//!
//! # The Algorithm
//!
//! 1. **`step` begin:** create a node at `depth = open scopes + base depth` (saturating at
//!    `usize::MAX`), attach it to the top of the stack (or as a new root), then push it.
//! 2. **`step` end:** pop the top of the stack. An end with nothing open is dropped. End
//!    markers never become nodes.
//! 3. **Anything else:** create a leaf node at the current depth and attach it. The stack is
//!    not touched.
//! 4. **End of stream:** scopes still open stay open, keeping whatever children they got.
//!
//! Begin and end markers are paired purely by stack discipline; their names are never
//! compared.
//!
//! # Representation
//!
//! Nodes live in a single arena owned by the [`Forest`]. The stack and the child lists hold
//! [`NodeId`]s into that arena, so every node has exactly one owner. Because nodes are
//! created in stream order and a child always follows its parent in the stream, the arena
//! order is also the pre-order of the tree: a node's arena index is its position in the
//! flattened row list.

use crate::transcript::event::Event;
use std::slice;
use tracing::debug;

/// Handle to a node inside a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the forest's flattened (pre-order) row list.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A tree node: one event, its nesting depth and, for scopes, its children.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNode {
    event: Event,
    depth: usize,
    children: Vec<NodeId>,
}

impl EventNode {
    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn child_ids(&self) -> &[NodeId] {
        &self.children
    }
}

/// The ordered roots produced by one build pass, together with the arena that owns every
/// node below them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    nodes: Vec<EventNode>,
    roots: Vec<NodeId>,
    unclosed_scopes: usize,
}

impl Forest {
    pub fn roots(&self) -> Nodes<'_> {
        Nodes {
            forest: self,
            ids: &self.roots,
        }
    }

    pub fn root(&self, index: usize) -> Option<NodeRef<'_>> {
        self.roots().get(index)
    }

    /// Total number of nodes at every level.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { forest: self, id })
    }

    /// Every node, flattened in pre-order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| NodeRef {
            forest: self,
            id: NodeId(i),
        })
    }

    /// Scopes whose `end` never arrived.
    pub fn unclosed_scopes(&self) -> usize {
        self.unclosed_scopes
    }

    fn node(&self, id: NodeId) -> &EventNode {
        &self.nodes[id.0]
    }
}

/// Borrowed view of a node in a [`Forest`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    forest: &'a Forest,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Position in the flattened row list.
    pub fn row(&self) -> usize {
        self.id.0
    }

    pub fn event(&self) -> &'a Event {
        &self.forest.node(self.id).event
    }

    pub fn depth(&self) -> usize {
        self.forest.node(self.id).depth
    }

    pub fn children(&self) -> Nodes<'a> {
        Nodes {
            forest: self.forest,
            ids: &self.forest.node(self.id).children,
        }
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.children().get(index)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

/// An ordered run of sibling nodes: the forest roots or a node's children.
#[derive(Debug, Clone, Copy)]
pub struct Nodes<'a> {
    forest: &'a Forest,
    ids: &'a [NodeId],
}

impl<'a> Nodes<'a> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.ids.get(index).map(|&id| NodeRef {
            forest: self.forest,
            id,
        })
    }

    pub fn iter(&self) -> NodesIter<'a> {
        NodesIter {
            forest: self.forest,
            ids: self.ids.iter(),
        }
    }
}

impl<'a> IntoIterator for Nodes<'a> {
    type Item = NodeRef<'a>;
    type IntoIter = NodesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct NodesIter<'a> {
    forest: &'a Forest,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for NodesIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef {
            forest: self.forest,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for NodesIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| NodeRef {
            forest: self.forest,
            id,
        })
    }
}

impl ExactSizeIterator for NodesIter<'_> {}

/// The single-pass builder. Feed it events in stream order, then [`finish`](Self::finish).
pub struct TreeBuilder {
    base_depth: usize,
    forest: Forest,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new(base_depth: usize) -> Self {
        TreeBuilder {
            base_depth,
            forest: Forest::default(),
            stack: Vec::new(),
        }
    }

    /// Number of scopes currently open.
    pub fn open_scopes(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, event: Event) {
        if event.is_step_begin() {
            let id = self.attach(event);
            self.stack.push(id);
        } else if event.is_step_end() {
            if self.stack.pop().is_none() {
                debug!(timestamp = %event.timestamp, "dropping step end with no open scope");
            }
        } else {
            self.attach(event);
        }
    }

    pub fn finish(mut self) -> Forest {
        if !self.stack.is_empty() {
            debug!(open = self.stack.len(), "scopes left open at end of stream");
        }
        self.forest.unclosed_scopes = self.stack.len();
        self.forest
    }

    /// Creates a node at the current depth and hangs it under the top of the stack.
    fn attach(&mut self, event: Event) -> NodeId {
        let id = NodeId(self.forest.nodes.len());
        self.forest.nodes.push(EventNode {
            event,
            depth: self.stack.len().saturating_add(self.base_depth),
            children: Vec::new(),
        });
        match self.stack.last() {
            Some(parent) => self.forest.nodes[parent.0].children.push(id),
            None => self.forest.roots.push(id),
        }
        id
    }
}

/// Builds the forest for a normalized event stream.
pub fn build_forest<I>(events: I, base_depth: usize) -> Forest
where
    I: IntoIterator<Item = Event>,
{
    let mut builder = TreeBuilder::new(base_depth);
    for event in events {
        builder.push(event);
    }
    builder.finish()
}
