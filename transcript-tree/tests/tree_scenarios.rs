//! Tree building scenarios
//!
//! Each test runs raw events through normalization and tree building and checks the
//! resulting forest with `assert_forest`.

use rstest::rstest;
use transcript_tree::transcript::event::{Event, EventKind};
use transcript_tree::transcript::testing::assert_forest;
use transcript_tree::transcript::testing::factories::{mk_begin, mk_end, mk_leaf, mk_sample_init};
use transcript_tree::transcript::{build_forest, normalize_events, Forest};

fn build(events: Vec<Event>, base_depth: usize) -> Forest {
    build_forest(normalize_events(&events), base_depth)
}

#[test]
fn test_sample_init_alone() {
    let normalized = normalize_events(&[mk_sample_init(1)]);
    assert_eq!(normalized.len(), 3);

    let forest = build_forest(normalized, 0);

    assert_forest(&forest)
        .root_count(1)
        .node_count(2)
        .unclosed_scopes(0)
        .root(0, |root| {
            root.tag("step")
                .step("sample_init")
                .depth(0)
                .child_count(1)
                .child(0, |init| {
                    init.tag("sample_init").depth(1).leaf();
                });
        });
}

#[test]
fn test_balanced_scope() {
    let forest = build(
        vec![
            mk_begin("A", 1),
            mk_leaf(EventKind::Info, 2),
            mk_end("A", 3),
        ],
        0,
    );

    assert_forest(&forest)
        .root_count(1)
        .unclosed_scopes(0)
        .root(0, |root| {
            root.step("A").depth(0).child_count(1).child(0, |info| {
                info.tag("info").depth(1).leaf();
            });
        });
}

#[test]
fn test_dangling_end_is_dropped() {
    let forest = build(vec![mk_end("X", 1)], 0);

    assert_forest(&forest).root_count(0).node_count(0);
}

#[test]
fn test_dangling_begin_stays_open() {
    let forest = build(vec![mk_begin("A", 1)], 0);

    assert_forest(&forest)
        .root_count(1)
        .unclosed_scopes(1)
        .root(0, |root| {
            root.step("A").depth(0).leaf();
        });
}

#[test]
fn test_sibling_scopes_do_not_share_children() {
    let forest = build(
        vec![
            mk_begin("A", 1),
            mk_leaf(EventKind::Info, 2),
            mk_end("A", 3),
            mk_begin("B", 4),
            mk_leaf(EventKind::Model, 5),
            mk_end("B", 6),
        ],
        0,
    );

    assert_forest(&forest)
        .root_count(2)
        .node_count(4)
        .root(0, |a| {
            a.step("A").depth(0).child_count(1).child(0, |leaf| {
                leaf.tag("info").depth(1).row(1);
            });
        })
        .root(1, |b| {
            b.step("B").depth(0).child_count(1).child(0, |leaf| {
                leaf.tag("model").depth(1).row(3);
            });
        });
}

#[test]
fn test_unclosed_scope_keeps_partial_children() {
    let forest = build(
        vec![
            mk_begin("outer", 1),
            mk_leaf(EventKind::Info, 2),
            mk_begin("inner", 3),
            mk_leaf(EventKind::Tool, 4),
        ],
        0,
    );

    assert_forest(&forest)
        .root_count(1)
        .unclosed_scopes(2)
        .root(0, |outer| {
            outer.child_count(2).child(1, |inner| {
                inner.step("inner").depth(1).child(0, |tool| {
                    tool.tag("tool").depth(2);
                });
            });
        });
}

#[test]
fn test_store_is_an_ordinary_leaf() {
    let forest = build(
        vec![
            mk_begin("A", 1),
            mk_leaf(EventKind::Store, 2),
            mk_end("A", 3),
        ],
        0,
    );

    assert_forest(&forest).root(0, |root| {
        root.child(0, |store| {
            store.tag("store").depth(1).leaf();
        });
    });
}

#[rstest]
#[case::empty(vec![], 0, 0, 0)]
#[case::sample_init(vec![mk_sample_init(1)], 1, 2, 0)]
#[case::balanced(vec![mk_begin("A", 1), mk_leaf(EventKind::Info, 2), mk_end("A", 3)], 1, 2, 0)]
#[case::dangling_end(vec![mk_end("X", 1)], 0, 0, 0)]
#[case::dangling_begin(vec![mk_begin("A", 1)], 1, 1, 1)]
#[case::extra_ends(vec![mk_begin("A", 1), mk_end("A", 2), mk_end("A", 3), mk_leaf(EventKind::Info, 4)], 2, 2, 0)]
#[case::unknown_kind(vec![mk_leaf(EventKind::Unknown("sandbox".to_string()), 1)], 1, 1, 0)]
fn test_forest_counts(
    #[case] events: Vec<Event>,
    #[case] roots: usize,
    #[case] nodes: usize,
    #[case] unclosed: usize,
) {
    let forest = build(events, 0);

    assert_forest(&forest)
        .root_count(roots)
        .node_count(nodes)
        .unclosed_scopes(unclosed);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn test_base_depth_shifts_all_levels(#[case] base_depth: usize) {
    let forest = build(vec![mk_sample_init(1)], base_depth);

    assert_forest(&forest).root(0, |root| {
        root.depth(base_depth).child(0, |init| {
            init.depth(base_depth + 1);
        });
    });
}
