//! Render plan → surface drawing calls.
//!
//! Nodes are rounded boxes with a border, an optional glow when selected,
//! a row of icon glyphs and a left-aligned label. Edges are 2 px cubic
//! curves with round caps.

use crate::plan::{RenderEdge, RenderNode};
use crate::surface::{Curve, Glow, Rect, Surface};
use crate::theme::Palette;
use mm_core::layout::ICON_SPACING;
use mm_core::viewport::Point;

pub const NODE_RADIUS: f32 = 5.0;
pub const GLOW_BLUR: f32 = 10.0;
pub const EDGE_WIDTH: f32 = 2.0;
pub const BORDER_WIDTH: f32 = 1.0;
pub const SELECTED_BORDER_WIDTH: f32 = 2.0;
/// Gap between a node's left edge and its first glyph.
pub const TEXT_INSET: f32 = 10.0;
pub const FONT_SIZE: f32 = 14.0;

/// Corner radius that fits the box: at most half of either side.
pub fn clamp_radius(width: f32, height: f32, radius: f32) -> f32 {
    radius.min(width / 2.0).min(height / 2.0).max(0.0)
}

pub fn draw_edges<S: Surface + ?Sized>(surface: &mut S, edges: &[RenderEdge], palette: &Palette) {
    for edge in edges {
        let curve = Curve {
            start: edge.start,
            cp1: edge.cp1,
            cp2: edge.cp2,
            end: edge.end,
        };
        surface.stroke_curve(curve, palette.edge, EDGE_WIDTH);
    }
}

pub fn draw_nodes<S: Surface + ?Sized>(surface: &mut S, nodes: &[RenderNode], palette: &Palette) {
    for node in nodes {
        draw_node_shape(surface, node, palette);
        draw_node_text(surface, node, palette);
    }
}

fn draw_node_shape<S: Surface + ?Sized>(surface: &mut S, node: &RenderNode, palette: &Palette) {
    let rect = Rect::new(node.x, node.y, node.width, node.height);
    let radius = clamp_radius(node.width, node.height, NODE_RADIUS);

    if node.is_selected {
        let glow = Glow {
            color: palette.node_selected_glow,
            blur: GLOW_BLUR,
        };
        surface.fill_rounded_rect(rect, radius, palette.node_selected, Some(glow));
        surface.stroke_rounded_rect(
            rect,
            radius,
            palette.node_border_selected,
            SELECTED_BORDER_WIDTH,
        );
    } else {
        surface.fill_rounded_rect(rect, radius, palette.node, None);
        surface.stroke_rounded_rect(rect, radius, palette.node_border, BORDER_WIDTH);
    }
}

fn draw_node_text<S: Surface + ?Sized>(surface: &mut S, node: &RenderNode, palette: &Palette) {
    let color = if node.is_selected {
        palette.text_selected
    } else {
        palette.text
    };
    let middle = node.y + node.height / 2.0;
    let mut x = node.x + TEXT_INSET;

    for tag in &node.icons {
        // Emoji sit a pixel low next to the label baseline.
        surface.fill_text(icon_glyph(tag), Point::new(x, middle + 1.0), FONT_SIZE, color);
        x += ICON_SPACING;
    }
    if !node.content.is_empty() {
        surface.fill_text(&node.content, Point::new(x, middle), FONT_SIZE, color);
    }
}

/// Emoji for an icon tag; `"?"` for tags with no glyph.
pub fn icon_glyph(tag: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, glyph)| *glyph)
        .unwrap_or("?")
}

/// Tag names follow the FreeMind icon set.
pub const ICONS: &[(&str, &str)] = &[
    ("idea", "💡"),
    ("help", "❓"),
    ("yes", "✔️"),
    ("messagebox_warning", "⚠️"),
    ("stop-sign", "🛑"),
    ("closed", "⛔"),
    ("info", "ℹ️"),
    ("button_ok", "✅"),
    ("button_cancel", "❌"),
    ("full-1", "1️⃣"),
    ("full-2", "2️⃣"),
    ("full-3", "3️⃣"),
    ("full-4", "4️⃣"),
    ("full-5", "5️⃣"),
    ("full-6", "6️⃣"),
    ("full-7", "7️⃣"),
    ("full-8", "8️⃣"),
    ("full-9", "9️⃣"),
    ("full-0", "0️⃣"),
    ("stop", "🔴"),
    ("prepare", "🟡"),
    ("go", "🟢"),
    ("back", "⬅️"),
    ("forward", "➡️"),
    ("up", "⬆️"),
    ("down", "⬇️"),
    ("attach", "📎"),
    ("ksmiletris", "😀"),
    ("smiley-neutral", "😐"),
    ("smiley-oh", "😮"),
    ("smiley-angry", "😠"),
    ("smily_bad", "😞"),
    ("clanbomber", "💣"),
    ("desktop_new", "🖥️"),
    ("gohome", "🏠"),
    ("folder", "📁"),
    ("korn", "📦"),
    ("Mail", "✉️"),
    ("kmail", "📨"),
    ("list", "📋"),
    ("edit", "📝"),
    ("kaddressbook", "📒"),
    ("knotify", "📣"),
    ("password", "🔑"),
    ("pencil", "✏️"),
    ("wizard", "🧙"),
    ("xmag", "🔍"),
    ("bell", "🔔"),
    ("bookmark", "🔖"),
    ("penguin", "🐧"),
    ("trash", "🗑️"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::theme::ThemeColors;
    use mm_core::id::NodeId;
    use mm_core::viewport::Viewport;
    use pretty_assertions::assert_eq;

    fn node(selected: bool, icons: &[&str]) -> RenderNode {
        RenderNode {
            id: NodeId::intern("paint-node"),
            content: "Label".into(),
            icons: icons.iter().map(|s| s.to_string()).collect(),
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 30.0,
            is_selected: selected,
        }
    }

    fn surface() -> RecordingSurface {
        let mut s = RecordingSurface::new();
        s.begin(Viewport::new(200.0, 200.0), 1.0);
        s
    }

    #[test]
    fn radius_is_clamped_to_half_side() {
        assert_eq!(clamp_radius(100.0, 30.0, 5.0), 5.0);
        assert_eq!(clamp_radius(100.0, 6.0, 5.0), 3.0);
        assert_eq!(clamp_radius(4.0, 30.0, 5.0), 2.0);
    }

    #[test]
    fn plain_node_has_thin_border_and_no_glow() {
        let palette = ThemeColors::light().palette();
        let mut s = surface();
        draw_nodes(&mut s, &[node(false, &[])], &palette);
        assert_eq!(
            s.ops()[1],
            DrawOp::FillRoundedRect {
                rect: Rect::new(10.0, 20.0, 100.0, 30.0),
                radius: 5.0,
                color: palette.node,
                glow: None,
            }
        );
        assert_eq!(
            s.ops()[2],
            DrawOp::StrokeRoundedRect {
                rect: Rect::new(10.0, 20.0, 100.0, 30.0),
                radius: 5.0,
                color: palette.node_border,
                width: 1.0,
            }
        );
    }

    #[test]
    fn selected_node_glows() {
        let palette = ThemeColors::light().palette();
        let mut s = surface();
        draw_nodes(&mut s, &[node(true, &[])], &palette);
        match &s.ops()[1] {
            DrawOp::FillRoundedRect { color, glow, .. } => {
                assert_eq!(*color, palette.node_selected);
                assert_eq!(
                    *glow,
                    Some(Glow {
                        color: palette.node_selected_glow,
                        blur: 10.0
                    })
                );
            }
            other => panic!("expected rounded fill, got {other:?}"),
        }
        match &s.ops()[3] {
            DrawOp::FillText { color, .. } => assert_eq!(*color, palette.text_selected),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn icons_precede_label() {
        let palette = ThemeColors::light().palette();
        let mut s = surface();
        draw_nodes(&mut s, &[node(false, &["idea", "no-such-icon"])], &palette);
        assert_eq!(s.texts(), vec!["💡", "?", "Label"]);
        let xs: Vec<f32> = s
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { origin, .. } => Some(origin.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![20.0, 40.0, 60.0]);
    }

    #[test]
    fn edges_use_edge_colour() {
        let palette = ThemeColors::light().palette();
        let mut s = surface();
        let edge = RenderEdge {
            from: NodeId::intern("pe-a"),
            to: NodeId::intern("pe-b"),
            start: Point::new(0.0, 0.0),
            cp1: Point::new(30.0, 0.0),
            cp2: Point::new(30.0, 10.0),
            end: Point::new(50.0, 10.0),
        };
        draw_edges(&mut s, &[edge], &palette);
        assert_eq!(
            s.ops()[1],
            DrawOp::StrokeCurve {
                curve: Curve {
                    start: edge.start,
                    cp1: edge.cp1,
                    cp2: edge.cp2,
                    end: edge.end,
                },
                color: palette.edge,
                width: 2.0,
            }
        );
    }
}
