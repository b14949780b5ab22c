//! Incremental frame rendering.
//!
//! Everything except the selected node is drawn into an off-screen
//! background layer that is rebuilt only when something it depends on
//! changes: the node table (by revision), the pan offset, the viewport
//! size, the device pixel ratio, or the theme. Every frame then blits that
//! layer and paints the selected node on top, so moving the selection
//! through a large map costs one node per frame.

use crate::paint::{draw_edges, draw_nodes};
use crate::plan::{build_render_plan_with_selection, build_selection_overlay};
use crate::surface::{Rect, Surface};
use crate::theme::{Palette, ThemeColors};
use mm_core::layout::LayoutConfig;
use mm_core::model::{MindMap, Revision};
use mm_core::viewport::{Point, Viewport};
use serde::{Deserialize, Serialize};

/// Per-frame output geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSpec {
    pub viewport: Viewport,
    /// Device pixels per logical pixel.
    pub dpr: f32,
}

impl FrameSpec {
    pub fn new(viewport: Viewport, dpr: f32) -> Self {
        Self { viewport, dpr }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameOutcome {
    /// The viewport has no area; nothing was drawn.
    Skipped,
    /// The background layer was redrawn.
    Rebuilt,
    /// The cached background layer was reused.
    Reused,
}

/// Everything the background layer's pixels depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    pub revision: Revision,
    pub offset: Point,
    pub viewport: Viewport,
    pub dpr: f32,
    pub theme_key: String,
}

struct Cached {
    key: CacheKey,
    palette: Palette,
}

pub struct IncrementalRenderer<S: Surface> {
    background: S,
    cached: Option<Cached>,
}

impl<S: Surface> IncrementalRenderer<S> {
    /// `background` is the off-screen layer; it is overwritten on rebuild.
    pub fn new(background: S) -> Self {
        Self {
            background,
            cached: None,
        }
    }

    pub fn background(&self) -> &S {
        &self.background
    }

    pub fn cache_key(&self) -> Option<&CacheKey> {
        self.cached.as_ref().map(|c| &c.key)
    }

    /// Force the next frame to rebuild the background.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Draw one frame of `map` into `target`.
    pub fn render(
        &mut self,
        target: &mut S,
        map: &MindMap,
        offset: Point,
        frame: FrameSpec,
        theme: &ThemeColors,
        config: &LayoutConfig,
    ) -> FrameOutcome {
        if frame.viewport.is_empty() {
            log::trace!("render: skipped, empty viewport {:?}", frame.viewport);
            return FrameOutcome::Skipped;
        }

        let key = CacheKey {
            revision: map.revision(),
            offset,
            viewport: frame.viewport,
            dpr: frame.dpr,
            theme_key: theme.cache_key(),
        };

        let outcome = match &self.cached {
            Some(cached) if cached.key == key => FrameOutcome::Reused,
            _ => {
                let palette = theme.palette();
                self.rebuild_background(map, offset, frame, &palette, config);
                log::debug!(
                    "render: background rebuilt (revision {}, {} node(s))",
                    key.revision.get(),
                    map.len()
                );
                self.cached = Some(Cached { key, palette });
                FrameOutcome::Rebuilt
            }
        };

        target.begin(frame.viewport, frame.dpr);
        target.blit(&self.background);

        if let (Some(cached), Some(selected)) =
            (&self.cached, build_selection_overlay(map, offset, config))
        {
            draw_nodes(target, &[selected], &cached.palette);
        }

        log::trace!("render: {outcome:?}");
        outcome
    }

    fn rebuild_background(
        &mut self,
        map: &MindMap,
        offset: Point,
        frame: FrameSpec,
        palette: &Palette,
        config: &LayoutConfig,
    ) {
        let plan = build_render_plan_with_selection(map, offset, config, None);
        let layer = &mut self.background;
        layer.begin(frame.viewport, frame.dpr);
        layer.fill_rect(
            Rect::new(0.0, 0.0, frame.viewport.width, frame.viewport.height),
            palette.canvas_bg,
        );
        draw_edges(layer, &plan.edges, palette);
        draw_nodes(layer, &plan.nodes, palette);
    }
}
