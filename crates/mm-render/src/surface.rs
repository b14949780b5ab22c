//! The drawing seam between the compositor and a concrete backend.
//!
//! The compositor and painters only ever talk to a `Surface`. The vello
//! backend lives in `scene`; `RecordingSurface` keeps a serialisable display
//! list instead of pixels.

use crate::theme::Rgba;
use mm_core::viewport::{Point, Viewport};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Soft shadow drawn underneath a filled shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

/// Control polygon of a cubic Bézier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub start: Point,
    pub cp1: Point,
    pub cp2: Point,
    pub end: Point,
}

/// A 2-D drawing target. Coordinates are logical pixels; the backend maps
/// them to device pixels using the ratio passed to `begin`.
pub trait Surface {
    /// Discard all content and size the surface for a new frame.
    fn begin(&mut self, viewport: Viewport, dpr: f32);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// `radius` is used as given; callers clamp it to the box.
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba, glow: Option<Glow>);

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba, width: f32);

    /// Stroke with round caps and joins.
    fn stroke_curve(&mut self, curve: Curve, color: Rgba, width: f32);

    /// Left-aligned text whose vertical middle sits on `origin.y`.
    fn fill_text(&mut self, text: &str, origin: Point, size: f32, color: Rgba);

    /// Copy another surface's content on top of this one, untransformed.
    fn blit(&mut self, layer: &Self);
}

// ─── Display list ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Begin {
        viewport: Viewport,
        dpr: f32,
    },
    FillRect {
        rect: Rect,
        color: Rgba,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgba,
        glow: Option<Glow>,
    },
    StrokeRoundedRect {
        rect: Rect,
        radius: f32,
        color: Rgba,
        width: f32,
    },
    StrokeCurve {
        curve: Curve,
        color: Rgba,
        width: f32,
    },
    FillText {
        text: String,
        origin: Point,
        size: f32,
        color: Rgba,
    },
    /// Marks the start of `count` ops copied from another layer.
    Blit {
        count: usize,
    },
}

/// A surface that records what it is asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drawing ops only, without the leading `Begin`.
    fn content(&self) -> &[DrawOp] {
        match self.ops.first() {
            Some(DrawOp::Begin { .. }) => &self.ops[1..],
            _ => &self.ops,
        }
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn begin(&mut self, viewport: Viewport, dpr: f32) {
        self.ops.clear();
        self.ops.push(DrawOp::Begin { viewport, dpr });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba, glow: Option<Glow>) {
        self.ops.push(DrawOp::FillRoundedRect {
            rect,
            radius,
            color,
            glow,
        });
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba, width: f32) {
        self.ops.push(DrawOp::StrokeRoundedRect {
            rect,
            radius,
            color,
            width,
        });
    }

    fn stroke_curve(&mut self, curve: Curve, color: Rgba, width: f32) {
        self.ops.push(DrawOp::StrokeCurve {
            curve,
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, size: f32, color: Rgba) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            origin,
            size,
            color,
        });
    }

    fn blit(&mut self, layer: &Self) {
        let content = layer.content();
        self.ops.push(DrawOp::Blit {
            count: content.len(),
        });
        self.ops.extend_from_slice(content);
    }
}
