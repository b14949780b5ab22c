//! Viewport math: world ↔ screen conversion, fit-to-view, and keeping the
//! selected node inside a padded margin.

use crate::id::NodeId;
use crate::layout::LayoutConfig;
use crate::model::{MindMap, Node};
use serde::{Deserialize, Serialize};

/// Margin kept between a node and the viewport edge by [`ensure_visible`].
pub const VISIBLE_PADDING: f32 = 50.0;

/// A 2-D point or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The canvas (viewport) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// A viewport with no area cannot be drawn into.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Inclusive on all edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// World-space box of one node.
pub fn node_bounds(node: &Node, config: &LayoutConfig) -> Bounds {
    Bounds {
        min_x: node.x,
        min_y: node.y,
        max_x: node.x + config.node_width(node),
        max_y: node.y + config.node_height,
    }
}

/// Union of every node box, or `None` for an empty table.
pub fn map_bounds(map: &MindMap, config: &LayoutConfig) -> Option<Bounds> {
    map.nodes()
        .map(|node| node_bounds(node, config))
        .reduce(Bounds::union)
}

pub fn screen_to_world(point: Point, offset: Point) -> Point {
    Point::new(point.x - offset.x, point.y - offset.y)
}

pub fn world_to_screen(point: Point, offset: Point) -> Point {
    Point::new(point.x + offset.x, point.y + offset.y)
}

/// Offset for a tab that has not been fitted yet: world origin at the
/// viewport centre.
pub fn default_offset(viewport: Viewport) -> Point {
    viewport.center()
}

/// Offset that puts the centre of the map's bounding box at the centre of
/// the viewport.
pub fn compute_fit_offset(map: &MindMap, viewport: Viewport, config: &LayoutConfig) -> Point {
    match map_bounds(map, config) {
        Some(bounds) => {
            let c = bounds.center();
            Point::new(viewport.width / 2.0 - c.x, viewport.height / 2.0 - c.y)
        }
        None => viewport.center(),
    }
}

/// Smallest change to `offset` that brings `node_id` at least
/// [`VISIBLE_PADDING`] inside every viewport edge.
///
/// Each axis is corrected independently. A node that already fits, or an
/// unknown id, leaves the offset as it was.
pub fn ensure_visible(
    map: &MindMap,
    offset: Point,
    node_id: NodeId,
    viewport: Viewport,
    config: &LayoutConfig,
) -> Point {
    let Some(node) = map.node(node_id) else {
        return offset;
    };
    let w = config.node_width(node);
    let h = config.node_height;
    let pad = VISIBLE_PADDING;
    let screen = world_to_screen(Point::new(node.x, node.y), offset);
    let mut next = offset;

    if screen.x < pad {
        next.x += pad - screen.x;
    }
    if screen.y < pad {
        next.y += pad - screen.y;
    }
    if screen.x + w > viewport.width - pad {
        next.x += viewport.width - pad - (screen.x + w);
    }
    if screen.y + h > viewport.height - pad {
        next.y += viewport.height - pad - (screen.y + h);
    }

    next
}
