//! Map → screen-space draw list.
//!
//! A `RenderPlan` is a flat, ephemeral projection of the map for one frame:
//! node boxes with the pan offset already applied, and one connector curve
//! per parent→child link. Both lists follow the map's pre-order, so the
//! paint order (and therefore hit-test priority) is stable.

use mm_core::id::NodeId;
use mm_core::layout::LayoutConfig;
use mm_core::model::{MindMap, Node};
use mm_core::viewport::Point;
use serde::{Deserialize, Serialize};

/// Connector trunk length bounds.
pub const MIN_TRUNK: f32 = 30.0;
pub const MAX_TRUNK: f32 = 120.0;
/// Fraction of the horizontal span used as trunk before clamping.
const TRUNK_FACTOR: f32 = 0.45;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: NodeId,
    pub content: String,
    pub icons: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub is_selected: bool,
}

/// A cubic Bézier from the parent's right-centre to the child's left-centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub start: Point,
    pub cp1: Point,
    pub cp2: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderPlan {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Plan with the map's own selection flagged.
pub fn build_render_plan(map: &MindMap, offset: Point, config: &LayoutConfig) -> RenderPlan {
    build_render_plan_with_selection(map, offset, config, Some(map.selected_node_id()))
}

/// Plan with `selected` flagged instead of the map's selection. `None`
/// flags nothing, which is how the cached background layer is built.
pub fn build_render_plan_with_selection(
    map: &MindMap,
    offset: Point,
    config: &LayoutConfig,
    selected: Option<NodeId>,
) -> RenderPlan {
    let mut plan = RenderPlan {
        nodes: Vec::with_capacity(map.len()),
        edges: Vec::with_capacity(map.len().saturating_sub(1)),
    };

    for node in map.walk() {
        plan.nodes
            .push(render_node(node, offset, config, selected == Some(node.id)));

        if let Some(parent) = node.parent.and_then(|p| map.node(p)) {
            plan.edges.push(render_edge(parent, node, offset, config));
        }
    }

    plan
}

/// The selected node alone, always flagged as selected. Drawn on top of the
/// cached background every frame.
pub fn build_selection_overlay(
    map: &MindMap,
    offset: Point,
    config: &LayoutConfig,
) -> Option<RenderNode> {
    map.selected()
        .map(|node| render_node(node, offset, config, true))
}

fn render_node(node: &Node, offset: Point, config: &LayoutConfig, is_selected: bool) -> RenderNode {
    RenderNode {
        id: node.id,
        content: node.content.clone(),
        icons: node.icons.to_vec(),
        x: node.x + offset.x,
        y: node.y + offset.y,
        width: config.node_width(node),
        height: config.node_height,
        is_selected,
    }
}

fn render_edge(parent: &Node, child: &Node, offset: Point, config: &LayoutConfig) -> RenderEdge {
    let half = config.node_height / 2.0;
    let start = Point::new(
        parent.x + offset.x + config.node_width(parent),
        parent.y + offset.y + half,
    );
    let end = Point::new(child.x + offset.x, child.y + offset.y + half);
    let trunk = trunk_length(end.x - start.x);
    RenderEdge {
        from: parent.id,
        to: child.id,
        start,
        cp1: Point::new(start.x + trunk, start.y),
        cp2: Point::new(start.x + trunk, end.y),
        end,
    }
}

/// `|dx| * 0.45`, clamped to `[MIN_TRUNK, MAX_TRUNK]`.
pub fn trunk_length(dx: f32) -> f32 {
    (dx.abs() * TRUNK_FACTOR).clamp(MIN_TRUNK, MAX_TRUNK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::SequentialIds;
    use mm_core::layout::compute_layout;
    use pretty_assertions::assert_eq;

    fn config() -> LayoutConfig {
        LayoutConfig::default().with_measure(|_| 100.0)
    }

    fn two_children(prefix: &str) -> (MindMap, NodeId, NodeId) {
        let mut ids = SequentialIds::new(prefix);
        let clock = || 0u64;
        let map = MindMap::new(&clock, &mut ids);
        let root = map.root_id();
        let (map, a) = map.add_child(root, "A", &clock, &mut ids).unwrap();
        let (map, b) = map.add_child(root, "B", &clock, &mut ids).unwrap();
        (compute_layout(&map, &config()), a, b)
    }

    #[test]
    fn trunk_is_clamped() {
        assert_eq!(trunk_length(10.0), MIN_TRUNK);
        assert_eq!(trunk_length(-10.0), MIN_TRUNK);
        assert_eq!(trunk_length(100.0), 45.0);
        assert_eq!(trunk_length(1_000.0), MAX_TRUNK);
    }

    #[test]
    fn nodes_are_offset_and_flagged() {
        let (map, a, _) = two_children("pn");
        let offset = Point::new(10.0, 20.0);
        let plan = build_render_plan(&map, offset, &config());
        assert_eq!(plan.nodes.len(), 3);
        let root = &plan.nodes[0];
        assert_eq!(root.id, map.root_id());
        assert_eq!((root.x, root.y), (10.0, 20.0));
        assert_eq!((root.width, root.height), (100.0, 30.0));
        assert!(root.is_selected);
        let node_a = plan.nodes.iter().find(|n| n.id == a).unwrap();
        assert!(!node_a.is_selected);
        assert_eq!((node_a.x, node_a.y), (160.0, -5.0));
    }

    #[test]
    fn edges_run_right_centre_to_left_centre() {
        let (map, a, _) = two_children("pe");
        let plan = build_render_plan(&map, Point::default(), &config());
        assert_eq!(plan.edges.len(), 2);
        let edge = plan.edges[0];
        assert_eq!((edge.from, edge.to), (map.root_id(), a));
        assert_eq!(edge.start, Point::new(100.0, 15.0));
        assert_eq!(edge.end, Point::new(150.0, -10.0));
        // |dx| = 50 → 22.5, clamped up to 30.
        assert_eq!(edge.cp1, Point::new(130.0, 15.0));
        assert_eq!(edge.cp2, Point::new(130.0, -10.0));
    }

    #[test]
    fn selection_override() {
        let (map, _, b) = two_children("po");
        let none = build_render_plan_with_selection(&map, Point::default(), &config(), None);
        assert!(none.nodes.iter().all(|n| !n.is_selected));

        let only_b = build_render_plan_with_selection(&map, Point::default(), &config(), Some(b));
        let flagged: Vec<NodeId> = only_b
            .nodes
            .iter()
            .filter(|n| n.is_selected)
            .map(|n| n.id)
            .collect();
        assert_eq!(flagged, vec![b]);
    }

    #[test]
    fn overlay_is_the_selected_node() {
        let (map, a, _) = two_children("pov");
        let map = map.select_node(a).unwrap();
        let overlay = build_selection_overlay(&map, Point::new(1.0, 1.0), &config()).unwrap();
        assert_eq!(overlay.id, a);
        assert!(overlay.is_selected);
        assert_eq!((overlay.x, overlay.y), (151.0, -24.0));
    }
}
