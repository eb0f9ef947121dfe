//! Tree Visualization
//!
//! One line per node, nested with box-drawing connectors:
//!
//! ```text
//! ├─ sample_init
//! │ └─ sample_init
//! └─ generate (solver)
//!   ├─ model: mockllm/model
//!   └─ tool: bash
//! ```

use crate::transcript::snapshot::label_for;
use crate::transcript::tree::{Forest, NodeRef, Nodes};

struct Frame<'a> {
    node: NodeRef<'a>,
    prefix: String,
    is_last: bool,
}

/// Pushes `siblings` so that the first one is popped first.
fn push_siblings<'a>(stack: &mut Vec<Frame<'a>>, siblings: Nodes<'a>, prefix: &str) {
    let count = siblings.len();
    for (i, node) in siblings.iter().enumerate().rev() {
        stack.push(Frame {
            node,
            prefix: prefix.to_string(),
            is_last: i + 1 == count,
        });
    }
}

pub fn to_treeviz_str(forest: &Forest) -> String {
    let mut output = String::new();
    let mut stack = Vec::new();
    push_siblings(&mut stack, forest.roots(), "");

    while let Some(frame) = stack.pop() {
        let connector = if frame.is_last { "└─" } else { "├─" };
        output.push_str(&frame.prefix);
        output.push_str(connector);
        output.push(' ');
        output.push_str(&label_for(frame.node.event()));
        output.push('\n');

        let children = frame.node.children();
        if !children.is_empty() {
            let mut child_prefix = frame.prefix;
            child_prefix.push_str(if frame.is_last { "  " } else { "│ " });
            push_siblings(&mut stack, children, &child_prefix);
        }
    }
    output
}
