//! Hit testing: screen point → node lookup.
//!
//! Node boxes are tested in reverse paint order, so when boxes overlap the
//! one drawn last (topmost) wins.

use mm_core::id::NodeId;
use mm_core::layout::LayoutConfig;
use mm_core::model::MindMap;
use mm_core::viewport::{Point, node_bounds, screen_to_world};

/// Find the topmost node under a canvas-space point.
/// Returns `None` if the point is over the background.
pub fn hit_test(
    map: &MindMap,
    offset: Point,
    screen_point: Point,
    config: &LayoutConfig,
) -> Option<NodeId> {
    let world = screen_to_world(screen_point, offset);
    let painted: Vec<_> = map.walk().collect();
    painted
        .into_iter()
        .rev()
        .find(|node| node_bounds(node, config).contains(world))
        .map(|node| node.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::id::SequentialIds;

    fn config() -> LayoutConfig {
        LayoutConfig::default().with_measure(|_| 100.0)
    }

    #[test]
    fn hit_and_miss() {
        let map = MindMap::new(&|| 0u64, &mut SequentialIds::new("ht"));
        let origin = Point::default();
        assert_eq!(hit_test(&map, origin, Point::new(10.0, 10.0), &config()), Some(map.root_id()));
        assert_eq!(hit_test(&map, origin, Point::new(200.0, 200.0), &config()), None);
    }

    #[test]
    fn edges_are_inclusive() {
        let map = MindMap::new(&|| 0u64, &mut SequentialIds::new("hte"));
        let root = Some(map.root_id());
        let origin = Point::default();
        assert_eq!(hit_test(&map, origin, Point::new(0.0, 0.0), &config()), root);
        assert_eq!(hit_test(&map, origin, Point::new(100.0, 30.0), &config()), root);
        assert_eq!(hit_test(&map, origin, Point::new(100.5, 30.0), &config()), None);
    }

    #[test]
    fn offset_is_applied() {
        let map = MindMap::new(&|| 0u64, &mut SequentialIds::new("hto"));
        let offset = Point::new(50.0, 30.0);
        assert_eq!(
            hit_test(&map, offset, Point::new(150.0, 50.0), &config()),
            Some(map.root_id())
        );
        assert_eq!(hit_test(&map, offset, Point::new(10.0, 10.0), &config()), None);
    }

    #[test]
    fn topmost_wins_on_overlap() {
        let mut ids = SequentialIds::new("htt");
        let clock = || 0u64;
        let map = MindMap::new(&clock, &mut ids);
        // Unlaid-out child sits at (0, 0), right on top of the root.
        let (map, child) = map.add_child(map.root_id(), "on top", &clock, &mut ids).unwrap();
        assert_eq!(
            hit_test(&map, Point::default(), Point::new(5.0, 5.0), &config()),
            Some(child)
        );
    }
}
