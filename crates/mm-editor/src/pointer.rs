//! Pointer gestures on the canvas.
//!
//! Pressing on an unselected node selects it. Pressing on the background,
//! or on the node that is already selected, grabs the canvas: moving the
//! pointer then pans by the distance travelled since the press. A double
//! click on a node asks for its label editor.

use mm_core::id::NodeId;
use mm_core::viewport::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    DoubleClick { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Nothing for the session to do.
    Idle,
    Select(NodeId),
    /// New pan offset.
    Pan(Point),
    /// Open the inline editor on this node.
    Edit(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start: Point,
    start_offset: Point,
}

#[derive(Debug, Clone, Default)]
pub struct PointerGesture {
    drag: Option<Drag>,
}

impl PointerGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_some()
    }

    /// Interpret one event. `hit` is the node under the pointer, `selected`
    /// the map's current selection and `offset` its current pan offset.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        hit: Option<NodeId>,
        selected: NodeId,
        offset: Point,
    ) -> PointerOutcome {
        match event {
            PointerEvent::Down { x, y } => match hit {
                Some(id) if id != selected => {
                    self.drag = None;
                    PointerOutcome::Select(id)
                }
                _ => {
                    self.drag = Some(Drag {
                        start: Point::new(x, y),
                        start_offset: offset,
                    });
                    PointerOutcome::Idle
                }
            },

            PointerEvent::Move { x, y } => match self.drag {
                Some(drag) => PointerOutcome::Pan(Point::new(
                    drag.start_offset.x + (x - drag.start.x),
                    drag.start_offset.y + (y - drag.start.y),
                )),
                None => PointerOutcome::Idle,
            },

            PointerEvent::Up { .. } => {
                self.drag = None;
                PointerOutcome::Idle
            }

            PointerEvent::DoubleClick { .. } => {
                self.drag = None;
                hit.map_or(PointerOutcome::Idle, PointerOutcome::Edit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids() -> (NodeId, NodeId) {
        (NodeId::intern("ptr-root"), NodeId::intern("ptr-child"))
    }

    #[test]
    fn press_on_other_node_selects() {
        let (root, child) = ids();
        let mut g = PointerGesture::new();
        let out = g.handle(PointerEvent::Down { x: 5.0, y: 5.0 }, Some(child), root, Point::default());
        assert_eq!(out, PointerOutcome::Select(child));
        assert!(!g.is_panning());
        let moved = g.handle(PointerEvent::Move { x: 50.0, y: 5.0 }, None, child, Point::default());
        assert_eq!(moved, PointerOutcome::Idle);
    }

    #[test]
    fn press_on_background_pans_from_start_offset() {
        let (root, _) = ids();
        let mut g = PointerGesture::new();
        let offset = Point::new(400.0, 300.0);
        g.handle(PointerEvent::Down { x: 10.0, y: 10.0 }, None, root, offset);
        assert!(g.is_panning());
        assert_eq!(
            g.handle(PointerEvent::Move { x: 30.0, y: 5.0 }, None, root, offset),
            PointerOutcome::Pan(Point::new(420.0, 295.0))
        );
        // Deltas are measured from the press, not from the previous move.
        assert_eq!(
            g.handle(PointerEvent::Move { x: 40.0, y: 15.0 }, None, root, Point::new(420.0, 295.0)),
            PointerOutcome::Pan(Point::new(430.0, 305.0))
        );
        g.handle(PointerEvent::Up { x: 40.0, y: 15.0 }, None, root, offset);
        assert!(!g.is_panning());
    }

    #[test]
    fn press_on_selected_node_pans() {
        let (root, _) = ids();
        let mut g = PointerGesture::new();
        let out = g.handle(PointerEvent::Down { x: 1.0, y: 1.0 }, Some(root), root, Point::default());
        assert_eq!(out, PointerOutcome::Idle);
        assert!(g.is_panning());
    }

    #[test]
    fn double_click_edits_hit_node() {
        let (root, child) = ids();
        let mut g = PointerGesture::new();
        assert_eq!(
            g.handle(PointerEvent::DoubleClick { x: 0.0, y: 0.0 }, Some(child), root, Point::default()),
            PointerOutcome::Edit(child)
        );
        assert_eq!(
            g.handle(PointerEvent::DoubleClick { x: 0.0, y: 0.0 }, None, root, Point::default()),
            PointerOutcome::Idle
        );
    }
}
