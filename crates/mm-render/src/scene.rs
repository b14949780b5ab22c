//! Vello backend for [`Surface`].
//!
//! Drawing goes into a `vello::Scene` in logical pixels under a
//! device-pixel-ratio scale. The host presents the scene through its own
//! wgpu renderer. Text is shaped glyph by glyph through the installed font's
//! character map; without a font, text calls are logged and skipped.

use crate::surface::{Curve, Glow, Rect, Surface};
use crate::theme::Rgba;
use kurbo::{Affine, BezPath, Cap, Join, RoundedRect, Stroke};
use mm_core::viewport::{Point, Viewport};
use peniko::{Color, Fill, Font};
use vello::Scene;
use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, GlyphId, MetadataProvider};

pub struct SceneSurface {
    scene: Scene,
    transform: Affine,
    viewport: Viewport,
    font: Option<Font>,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            transform: Affine::IDENTITY,
            viewport: Viewport::new(0.0, 0.0),
            font: None,
        }
    }

    /// Install the font used for labels and icon glyphs.
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Logical size of the current frame.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

fn color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn kurbo_rect(r: Rect) -> kurbo::Rect {
    kurbo::Rect::new(
        r.x as f64,
        r.y as f64,
        (r.x + r.width) as f64,
        (r.y + r.height) as f64,
    )
}

fn kurbo_point(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

impl Surface for SceneSurface {
    fn begin(&mut self, viewport: Viewport, dpr: f32) {
        self.scene.reset();
        self.viewport = viewport;
        self.transform = Affine::scale(dpr as f64);
    }

    fn fill_rect(&mut self, rect: Rect, c: Rgba) {
        self.scene
            .fill(Fill::NonZero, self.transform, color(c), None, &kurbo_rect(rect));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, c: Rgba, glow: Option<Glow>) {
        let r = kurbo_rect(rect);
        if let Some(glow) = glow {
            // Canvas shadow blur is roughly twice the Gaussian deviation.
            self.scene.draw_blurred_rounded_rect(
                self.transform,
                r,
                color(glow.color),
                radius as f64,
                (glow.blur / 2.0) as f64,
            );
        }
        let shape = RoundedRect::from_rect(r, radius as f64);
        self.scene
            .fill(Fill::NonZero, self.transform, color(c), None, &shape);
    }

    fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, c: Rgba, width: f32) {
        let shape = RoundedRect::from_rect(kurbo_rect(rect), radius as f64);
        let stroke = Stroke::new(width as f64);
        self.scene
            .stroke(&stroke, self.transform, color(c), None, &shape);
    }

    fn stroke_curve(&mut self, curve: Curve, c: Rgba, width: f32) {
        let mut path = BezPath::new();
        path.move_to(kurbo_point(curve.start));
        path.curve_to(
            kurbo_point(curve.cp1),
            kurbo_point(curve.cp2),
            kurbo_point(curve.end),
        );
        let stroke = Stroke::new(width as f64)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        self.scene
            .stroke(&stroke, self.transform, color(c), None, &path);
    }

    fn fill_text(&mut self, text: &str, origin: Point, size: f32, c: Rgba) {
        let Some(font) = &self.font else {
            log::trace!("TEXT {text:?} at ({}, {}) skipped: no font", origin.x, origin.y);
            return;
        };
        let Ok(font_ref) = FontRef::from_index(font.data.data(), font.index) else {
            log::warn!("font data could not be read; text skipped");
            return;
        };

        let font_size = Size::new(size);
        let location = LocationRef::default();
        let charmap = font_ref.charmap();
        let advances = font_ref.glyph_metrics(font_size, location);
        let metrics = font_ref.metrics(font_size, location);

        let mut pen_x = 0.0f32;
        let glyphs: Vec<vello::Glyph> = glyph_chars(text)
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                let glyph = vello::Glyph {
                    id: gid.to_u32(),
                    x: pen_x,
                    y: 0.0,
                };
                pen_x += advances.advance_width(gid).unwrap_or_default();
                glyph
            })
            .collect();

        // Baseline placed so the ascent/descent box is centred on origin.y.
        let baseline = origin.y + (metrics.ascent + metrics.descent) / 2.0;
        let transform =
            self.transform * Affine::translate((origin.x as f64, baseline as f64));
        self.scene
            .draw_glyphs(font)
            .font_size(size)
            .transform(transform)
            .brush(color(c))
            .draw(Fill::NonZero, glyphs.into_iter());
    }

    fn blit(&mut self, layer: &Self) {
        self.scene.append(&layer.scene, None);
    }
}

/// Chars that get a glyph. Variation selectors (U+FE00..=U+FE0F) only pick
/// a presentation for the previous char and are dropped.
fn glyph_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|ch| !('\u{FE00}'..='\u{FE0F}').contains(ch))
}
