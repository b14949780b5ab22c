//! Integration tests: edit → layout → viewport.

use mm_core::id::{NodeId, SequentialIds};
use mm_core::layout::{LayoutConfig, compute_layout};
use mm_core::model::MindMap;
use mm_core::viewport::{
    Point, VISIBLE_PADDING, Viewport, compute_fit_offset, ensure_visible, map_bounds,
    node_bounds, world_to_screen,
};
use pretty_assertions::assert_eq;

const VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

fn config() -> LayoutConfig {
    LayoutConfig::default().with_measure(|_| 80.0)
}

fn clock() -> u64 {
    0
}

/// root ─┬─ a ─┬─ a1
///       │     └─ a2
///       └─ b
fn sample(prefix: &str) -> (MindMap, [NodeId; 5]) {
    let mut ids = SequentialIds::new(prefix);
    let map = MindMap::new(&clock, &mut ids);
    let root = map.root_id();
    let (map, a) = map.add_child(root, "a", &clock, &mut ids).unwrap();
    let (map, b) = map.add_child(root, "b", &clock, &mut ids).unwrap();
    let (map, a1) = map.add_child(a, "a1", &clock, &mut ids).unwrap();
    let (map, a2) = map.add_child(a, "a2", &clock, &mut ids).unwrap();
    (compute_layout(&map, &config()), [root, a, b, a1, a2])
}

// ─── Layout ──────────────────────────────────────────────────────────────

#[test]
fn columns_follow_depth() {
    let (map, [root, a, b, a1, a2]) = sample("col");
    assert_eq!(map.node(root).unwrap().x, 0.0);
    assert_eq!(map.node(a).unwrap().x, 150.0);
    assert_eq!(map.node(b).unwrap().x, 150.0);
    assert_eq!(map.node(a1).unwrap().x, 300.0);
    assert_eq!(map.node(a2).unwrap().x, 300.0);
}

#[test]
fn siblings_do_not_overlap() {
    let (map, [_, a, b, a1, a2]) = sample("ovl");
    let cfg = config();
    let y = |id| map.node(id).unwrap().y;
    assert!(y(a1) + cfg.node_height <= y(a2), "a1 {} / a2 {}", y(a1), y(a2));
    assert!(y(a2) + cfg.node_height <= y(b), "a2 {} / b {}", y(a2), y(b));
    // a is centred on its two children.
    assert_eq!(y(a), (y(a1) + y(a2)) / 2.0);
    assert!(y(a) < y(b));
}

#[test]
fn root_stays_put_when_a_branch_grows() {
    let (map, [root, a, ..]) = sample("anc");
    let anchored = map.with_positions(|n| (n.id == root).then_some((40.0, -70.0)));
    let mut ids = SequentialIds::new("anc-more");
    let mut grown = anchored;
    for i in 0..6 {
        let (next, _) = grown.add_child(a, format!("extra{i}"), &clock, &mut ids).unwrap();
        grown = next;
    }

    let relaid = compute_layout(&grown, &config());
    let r = relaid.node(root).unwrap();
    assert_eq!((r.x, r.y), (40.0, -70.0));
}

#[test]
fn layout_is_deterministic() {
    let (map, ids) = sample("det");
    let again = compute_layout(&map, &config());
    for id in ids {
        let (p, q) = (map.node(id).unwrap(), again.node(id).unwrap());
        assert_eq!((p.x, p.y), (q.x, q.y), "{id}");
    }
}

// ─── Viewport ────────────────────────────────────────────────────────────

#[test]
fn fit_centres_the_whole_tree() {
    let (map, _) = sample("fit");
    let cfg = config();
    let offset = compute_fit_offset(&map, VIEWPORT, &cfg);
    let bounds = map_bounds(&map, &cfg).unwrap();
    let centre = world_to_screen(bounds.center(), offset);
    assert_eq!(centre, Point::new(400.0, 300.0));
}

#[test]
fn ensure_visible_brings_far_node_inside_padding() {
    let (map, [_, _, _, a1, _]) = sample("far");
    let cfg = config();
    // Pan far to the left so everything is off-screen.
    let offset = Point::new(-2_000.0, 900.0);
    let next = ensure_visible(&map, offset, a1, VIEWPORT, &cfg);

    let node = map.node(a1).unwrap();
    let b = node_bounds(node, &cfg);
    let top_left = world_to_screen(Point::new(b.min_x, b.min_y), next);
    let bottom_right = world_to_screen(Point::new(b.max_x, b.max_y), next);
    assert!(top_left.x >= VISIBLE_PADDING, "{top_left:?}");
    assert!(top_left.y >= VISIBLE_PADDING, "{top_left:?}");
    assert!(bottom_right.x <= VIEWPORT.width - VISIBLE_PADDING, "{bottom_right:?}");
    assert!(bottom_right.y <= VIEWPORT.height - VISIBLE_PADDING, "{bottom_right:?}");

    // Already visible now: a second call changes nothing.
    assert_eq!(ensure_visible(&map, next, a1, VIEWPORT, &cfg), next);
}
