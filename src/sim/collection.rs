//! Swallow rules
//!
//! Overlap tests stand in for the engine trigger volumes: the hole is a disc
//! of diameter `hole_size` on the ground plane, collectibles are discs of
//! diameter `size`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Size test deciding whether the hole can swallow an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectionRule {
    /// Multiplier on the object size (`hole >= object * tolerance`)
    pub tolerance: f32,
}

impl Default for CollectionRule {
    fn default() -> Self {
        Self { tolerance: 1.0 }
    }
}

impl CollectionRule {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    #[inline]
    pub fn can_collect(&self, hole_size: f32, object_size: f32) -> bool {
        hole_size >= object_size * self.tolerance
    }
}

/// Object centre lies over the hole opening (it would fall in)
#[inline]
pub fn center_inside(hole_pos: Vec2, hole_size: f32, object_pos: Vec2) -> bool {
    hole_pos.distance(object_pos) <= hole_size * 0.5
}

/// Object footprint touches the hole opening
#[inline]
pub fn footprint_touches(hole_pos: Vec2, hole_size: f32, object_pos: Vec2, object_size: f32) -> bool {
    hole_pos.distance(object_pos) < (hole_size + object_size) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_size_is_collectable_at_unit_tolerance() {
        let rule = CollectionRule::default();
        assert!(rule.can_collect(1.0, 1.0));
        assert!(!rule.can_collect(1.0, 1.01));
    }

    #[test]
    fn test_lower_tolerance_admits_larger_objects() {
        let rule = CollectionRule::new(0.9);
        assert!(rule.can_collect(1.0, 1.1));
        assert!(!rule.can_collect(1.0, 1.2));
    }

    #[test]
    fn test_overlap_shapes() {
        let hole = Vec2::ZERO;
        assert!(center_inside(hole, 2.0, Vec2::new(0.9, 0.0)));
        assert!(!center_inside(hole, 2.0, Vec2::new(1.1, 0.0)));
        assert!(footprint_touches(hole, 2.0, Vec2::new(1.4, 0.0), 1.0));
        assert!(!footprint_touches(hole, 2.0, Vec2::new(1.6, 0.0), 1.0));
    }

    proptest! {
        #[test]
        fn can_collect_is_monotonic_in_hole_size(
            hole in 0.0f32..20.0,
            grow in 0.0f32..20.0,
            object in 0.0f32..20.0,
            tolerance in 0.5f32..1.5,
        ) {
            let rule = CollectionRule::new(tolerance);
            if rule.can_collect(hole, object) {
                prop_assert!(rule.can_collect(hole + grow, object));
            }
        }
    }
}
