//! Outline output
//!
//!     A small text renderer driven through the [`Dispatcher`], so that what comes out is
//!     exactly what each kind is handed: scopes become headings whose level follows their
//!     depth, everything else becomes a bullet under the nearest heading.
//!
//!         # sample_init
//!         - sample_init
//!         # generate (solver)
//!         - model: mockllm/model
//!         ## retry
//!         - tool: bash
//!
//!     The shared state manager is seeded from the `sample_init` event's `state` field;
//!     `store` events are rendered against their own fresh manager.
//!
//!     Rows are dispatched in pre-order straight from [`Forest::rows`], so a heading is
//!     followed by its subtree without the renderer descending into `children`.

use crate::transcript::dispatch::{
    Dispatcher, EventRenderer, JsonStateManager, RowContext, StateManager,
};
use crate::transcript::snapshot::label_for;
use crate::transcript::tree::{Forest, Nodes};

/// Markdown only goes six levels deep
const MAX_HEADING_LEVEL: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Prefix for generated row ids
    pub namespace: String,
    /// Append `{#row-id}` to every line
    pub show_ids: bool,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        OutlineOptions {
            namespace: "transcript".to_string(),
            show_ids: false,
        }
    }
}

pub struct OutlineRenderer {
    show_ids: bool,
}

impl OutlineRenderer {
    pub fn new(show_ids: bool) -> Self {
        OutlineRenderer { show_ids }
    }

    fn line(&self, text: String, row: &RowContext<'_>) -> String {
        if self.show_ids {
            format!("{} {{#{}}}", text, row.id)
        } else {
            text
        }
    }

    fn bullet(&self, row: RowContext<'_>) -> String {
        self.line(format!("- {}", label_for(row.event)), &row)
    }
}

impl EventRenderer<JsonStateManager> for OutlineRenderer {
    type Output = String;

    fn sample_init(&mut self, row: RowContext<'_>, state: &mut JsonStateManager) -> String {
        if let Some(initial) = row.event.fields.get("state") {
            state.set_state(initial.clone());
        }
        self.bullet(row)
    }

    fn sample_limit(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn state(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn store(&mut self, row: RowContext<'_>, _state: JsonStateManager) -> String {
        self.bullet(row)
    }

    fn model(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn tool(
        &mut self,
        row: RowContext<'_>,
        _depth: usize,
        _state: &mut JsonStateManager,
    ) -> String {
        self.bullet(row)
    }

    fn approval(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn input(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn score(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn error(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn logger(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn info(&mut self, row: RowContext<'_>, _state: &mut JsonStateManager) -> String {
        self.bullet(row)
    }

    fn step(
        &mut self,
        row: RowContext<'_>,
        depth: usize,
        _children: Nodes<'_>,
        _state: &mut JsonStateManager,
    ) -> String {
        let level = depth.saturating_add(1).min(MAX_HEADING_LEVEL);
        let heading = format!("{} {}", "#".repeat(level), label_for(row.event));
        self.line(heading, &row)
    }

    fn subtask(
        &mut self,
        row: RowContext<'_>,
        _depth: usize,
        _state: &mut JsonStateManager,
    ) -> String {
        self.bullet(row)
    }
}

/// Renders the forest as an outline.
pub fn to_outline_str(forest: &Forest, options: &OutlineOptions) -> String {
    let dispatcher = Dispatcher::new(options.namespace.clone(), JsonStateManager::new);
    let mut state = JsonStateManager::new();
    let mut renderer = OutlineRenderer::new(options.show_ids);

    let mut output = String::new();
    for line in dispatcher.dispatch_all(forest.rows(), &mut state, &mut renderer) {
        output.push_str(&line);
        output.push('\n');
    }
    output
}
