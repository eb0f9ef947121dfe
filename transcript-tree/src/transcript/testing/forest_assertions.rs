//! Fluent assertion API for forests

use crate::transcript::tree::{Forest, NodeRef};

/// Create an assertion builder for a forest
pub fn assert_forest(forest: &Forest) -> ForestAssertion<'_> {
    ForestAssertion { forest }
}

pub struct ForestAssertion<'a> {
    forest: &'a Forest,
}

impl<'a> ForestAssertion<'a> {
    pub fn root_count(self, expected: usize) -> Self {
        let actual = self.forest.roots().len();
        assert_eq!(
            actual, expected,
            "forest: expected {} roots, found {}",
            expected, actual
        );
        self
    }

    /// Total nodes at every level
    pub fn node_count(self, expected: usize) -> Self {
        let actual = self.forest.len();
        assert_eq!(
            actual, expected,
            "forest: expected {} nodes, found {}",
            expected, actual
        );
        self
    }

    pub fn unclosed_scopes(self, expected: usize) -> Self {
        let actual = self.forest.unclosed_scopes();
        assert_eq!(
            actual, expected,
            "forest: expected {} unclosed scopes, found {}",
            expected, actual
        );
        self
    }

    pub fn root<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let context = format!("roots[{}]", index);
        let node = self.forest.root(index).unwrap_or_else(|| {
            panic!(
                "{}: out of range, forest has {} roots",
                context,
                self.forest.roots().len()
            )
        });
        check(NodeAssertion { node, context });
        self
    }
}

pub struct NodeAssertion<'a> {
    node: NodeRef<'a>,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn tag(self, expected: &str) -> Self {
        let actual = self.node.event().tag();
        assert_eq!(
            actual, expected,
            "{}: expected tag '{}', found '{}'",
            self.context, expected, actual
        );
        self
    }

    /// Assert this node is a step scope with the given name
    pub fn step(self, name: &str) -> Self {
        match self.node.event().step_marker() {
            Some(marker) => assert_eq!(
                marker.name, name,
                "{}: expected step '{}', found step '{}'",
                self.context, name, marker.name
            ),
            None => panic!(
                "{}: expected step '{}', found '{}'",
                self.context,
                name,
                self.node.event().tag()
            ),
        }
        self
    }

    pub fn depth(self, expected: usize) -> Self {
        let actual = self.node.depth();
        assert_eq!(
            actual, expected,
            "{}: expected depth {}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn row(self, expected: usize) -> Self {
        let actual = self.node.row();
        assert_eq!(
            actual, expected,
            "{}: expected row {}, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.children().len();
        assert_eq!(
            actual, expected,
            "{}: expected {} children, found {}",
            self.context, expected, actual
        );
        self
    }

    /// Assert the node has no children
    pub fn leaf(self) -> Self {
        self.child_count(0)
    }

    pub fn child<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let context = format!("{}.children[{}]", self.context, index);
        let node = self.node.child(index).unwrap_or_else(|| {
            panic!(
                "{}: out of range, node has {} children",
                context,
                self.node.children().len()
            )
        });
        check(NodeAssertion { node, context });
        self
    }
}
