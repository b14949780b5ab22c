//! Left-to-right tidy-tree layout.
//!
//! Children sit one column to the right of their parent, stacked top to
//! bottom without overlap; each parent is vertically centred on the block its
//! children occupy. After the pass the whole tree is translated so the root
//! keeps the position it had before, which keeps the view still when an
//! unrelated branch grows or shrinks.
//!
//! The walk uses explicit stacks rather than native recursion, so very deep
//! maps cannot exhaust the thread stack.

use crate::id::NodeId;
use crate::model::{MindMap, Node};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Estimated advance per character for the default measure.
pub const CHAR_WIDTH: f32 = 8.0;
/// Horizontal pitch of one icon glyph.
pub const ICON_SPACING: f32 = 20.0;
/// Horizontal padding added around a label.
pub const TEXT_PADDING: f32 = 20.0;

/// Measures the natural width of a node's box.
pub type MeasureFn = Arc<dyn Fn(&Node) -> f32 + Send + Sync>;

/// Geometry knobs plus a width callback, supplied per frame by the host.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub min_node_width: f32,
    #[serde(skip, default = "default_measure")]
    measure: MeasureFn,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_height: 30.0,
            horizontal_gap: 50.0,
            vertical_gap: 20.0,
            min_node_width: 100.0,
            measure: default_measure(),
        }
    }
}

impl fmt::Debug for LayoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutConfig")
            .field("node_height", &self.node_height)
            .field("horizontal_gap", &self.horizontal_gap)
            .field("vertical_gap", &self.vertical_gap)
            .field("min_node_width", &self.min_node_width)
            .finish_non_exhaustive()
    }
}

/// Rough label width: 8 units per char plus icons and padding. Hosts with a
/// real text shaper install their own measure.
pub fn estimate_width(node: &Node) -> f32 {
    node.content.chars().count() as f32 * CHAR_WIDTH
        + node.icons.len() as f32 * ICON_SPACING
        + TEXT_PADDING
}

fn default_measure() -> MeasureFn {
    Arc::new(estimate_width)
}

impl LayoutConfig {
    /// Replace the width callback.
    pub fn with_measure(mut self, measure: impl Fn(&Node) -> f32 + Send + Sync + 'static) -> Self {
        self.measure = Arc::new(measure);
        self
    }

    /// Raw measured width, before the minimum is applied.
    pub fn measure(&self, node: &Node) -> f32 {
        (self.measure)(node)
    }

    /// Box width used everywhere: measured width, at least `min_node_width`.
    pub fn node_width(&self, node: &Node) -> f32 {
        self.measure(node).max(self.min_node_width)
    }

    /// Vertical space one leaf occupies.
    pub fn row_height(&self) -> f32 {
        self.node_height + self.vertical_gap
    }
}

/// Position every node. The input map is not touched; the result carries a
/// fresh revision and identical structure, content and selection.
pub fn compute_layout(map: &MindMap, config: &LayoutConfig) -> MindMap {
    let order = preorder(map);
    let row = config.row_height();

    // x: parent column + parent width + gap (pre-order).
    let mut xs: HashMap<NodeId, f32> = HashMap::with_capacity(order.len());
    for node in &order {
        let x = node
            .parent
            .and_then(|p| Some((map.node(p)?, *xs.get(&p)?)))
            .map(|(parent, px)| px + config.node_width(parent) + config.horizontal_gap)
            .unwrap_or(0.0);
        xs.insert(node.id, x);
    }

    // Subtree heights (post-order: reverse of pre-order).
    let mut heights: HashMap<NodeId, f32> = HashMap::with_capacity(order.len());
    for node in order.iter().rev() {
        let stacked: f32 = node
            .children
            .iter()
            .filter_map(|c| heights.get(c))
            .sum();
        heights.insert(node.id, stacked.max(row));
    }

    // y: each child block starts where the previous sibling's block ended.
    let mut starts: HashMap<NodeId, f32> = HashMap::with_capacity(order.len());
    let mut positions: HashMap<NodeId, (f32, f32)> = HashMap::with_capacity(order.len());
    starts.insert(map.root_id(), 0.0);
    for node in &order {
        let start_y = starts.get(&node.id).copied().unwrap_or(0.0);
        let height = heights.get(&node.id).copied().unwrap_or(row);
        let y = if node.is_leaf() {
            start_y
        } else {
            start_y + (height - row) / 2.0
        };
        positions.insert(node.id, (xs.get(&node.id).copied().unwrap_or(0.0), y));

        let mut cursor = start_y;
        for child_id in &node.children {
            if let Some(child_height) = heights.get(child_id) {
                starts.insert(*child_id, cursor);
                cursor += child_height;
            }
        }
    }

    // Anchor: the root keeps its previous position.
    let (dx, dy) = match (map.root(), positions.get(&map.root_id())) {
        (Some(root), Some(&(rx, ry))) => (root.x - rx, root.y - ry),
        _ => (0.0, 0.0),
    };

    log::trace!(
        "layout: {} node(s), anchor shift ({dx}, {dy})",
        positions.len()
    );
    map.with_positions(|node| positions.get(&node.id).map(|&(x, y)| (x + dx, y + dy)))
}

/// Nodes reachable from the root, in pre-order. Unknown child ids are
/// skipped and a node is never visited twice.
fn preorder(map: &MindMap) -> Vec<&Node> {
    let mut seen = HashSet::with_capacity(map.len());
    let mut out = Vec::with_capacity(map.len());
    let mut stack = vec![map.root_id()];
    while let Some(id) = stack.pop() {
        let Some(node) = map.node(id) else { continue };
        if !seen.insert(id) {
            continue;
        }
        stack.extend(node.children.iter().rev().copied());
        out.push(node);
    }
    out
}
