pub mod compositor;
pub mod hit;
pub mod paint;
pub mod plan;
pub mod scene;
pub mod surface;
pub mod theme;

pub use compositor::{CacheKey, FrameOutcome, FrameSpec, IncrementalRenderer};
pub use hit::hit_test;
pub use plan::{
    RenderEdge, RenderNode, RenderPlan, build_render_plan, build_render_plan_with_selection,
    build_selection_overlay,
};
pub use scene::SceneSurface;
pub use surface::{DrawOp, RecordingSurface, Surface};
pub use theme::{Palette, Rgba, ThemeColors};
