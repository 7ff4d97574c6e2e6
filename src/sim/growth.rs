//! Score-driven hole growth
//!
//! The hole grows in discrete steps: crossing the n-th score threshold sets
//! the hole to `initial + amount * (n + 1)`. Each threshold fires once.

use serde::{Deserialize, Serialize};

use crate::level::LevelConfig;

/// Reported when one or more thresholds are crossed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthEvent {
    /// Hole size after the last crossed threshold
    pub new_hole_size: f32,
    /// Index of the last threshold crossed
    pub threshold_index: usize,
    /// How many thresholds this score change crossed
    pub thresholds_crossed: usize,
}

/// Tracks which growth thresholds have fired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreGrowth {
    initial_size: f32,
    growth_amount: f32,
    max_size: f32,
    thresholds: Vec<u32>,
    /// Next threshold to watch (== thresholds.len() once all have fired)
    index: usize,
}

impl ScoreGrowth {
    pub fn new(initial_size: f32, growth_amount: f32, max_size: f32, thresholds: Vec<u32>) -> Self {
        Self {
            initial_size,
            growth_amount,
            max_size,
            thresholds,
            index: 0,
        }
    }

    pub fn from_level(level: &LevelConfig) -> Self {
        Self::new(
            level.initial_hole_size,
            level.growth_amount,
            level.max_hole_size,
            level.score_thresholds.clone(),
        )
    }

    /// Index of the next threshold to cross
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// Hole size after the threshold at `index` fires
    pub fn size_after(&self, index: usize) -> f32 {
        let size = self.initial_size + self.growth_amount * (index + 1) as f32;
        size.min(self.max_size)
    }

    /// Current hole size implied by the thresholds already crossed
    pub fn current_size(&self) -> f32 {
        match self.index {
            0 => self.initial_size,
            n => self.size_after(n - 1),
        }
    }

    /// Feed the new cumulative score; returns growth if any threshold was crossed
    pub fn on_score_added(&mut self, score: u32) -> Option<GrowthEvent> {
        let mut event: Option<GrowthEvent> = None;

        while let Some(&threshold) = self.thresholds.get(self.index) {
            if score < threshold {
                break;
            }
            let crossed = event.map_or(0, |e| e.thresholds_crossed) + 1;
            event = Some(GrowthEvent {
                new_hole_size: self.size_after(self.index),
                threshold_index: self.index,
                thresholds_crossed: crossed,
            });
            self.index += 1;
        }

        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn growth() -> ScoreGrowth {
        ScoreGrowth::new(1.0, 0.3, 10.0, vec![100, 250, 400])
    }

    #[test]
    fn test_single_crossing() {
        let mut g = growth();
        assert_eq!(g.on_score_added(90), None);
        let event = g.on_score_added(100).unwrap();
        assert_eq!(event.threshold_index, 0);
        assert_eq!(event.thresholds_crossed, 1);
        assert!((event.new_hole_size - 1.3).abs() < 1e-5);
        assert_eq!(g.index(), 1);
    }

    #[test]
    fn test_jump_crosses_several_thresholds() {
        let mut g = growth();
        assert_eq!(g.on_score_added(90), None);
        let event = g.on_score_added(260).unwrap();
        assert_eq!(g.index(), 2);
        assert_eq!(event.thresholds_crossed, 2);
        assert!((event.new_hole_size - 1.6).abs() < 1e-5);
    }

    #[test]
    fn test_passed_threshold_never_refires() {
        let mut g = growth();
        assert!(g.on_score_added(120).is_some());
        assert_eq!(g.on_score_added(120), None);
        assert_eq!(g.on_score_added(200), None);
    }

    #[test]
    fn test_exhausted_thresholds_are_a_noop() {
        let mut g = growth();
        g.on_score_added(1000);
        assert_eq!(g.index(), 3);
        assert_eq!(g.on_score_added(5000), None);
        assert_eq!(g.index(), 3);
    }

    #[test]
    fn test_size_clamped_to_max() {
        let mut g = ScoreGrowth::new(1.0, 5.0, 4.0, vec![10, 20]);
        let event = g.on_score_added(20).unwrap();
        assert_eq!(event.new_hole_size, 4.0);
    }

    proptest! {
        #[test]
        fn index_is_bounded_and_monotonic(increments in prop::collection::vec(0u32..200, 0..40)) {
            let mut g = ScoreGrowth::new(1.0, 0.3, 10.0, vec![100, 250, 400, 600, 800]);
            let mut score = 0u32;
            let mut last_index = 0;
            let mut last_size = g.current_size();
            for inc in increments {
                score += inc;
                g.on_score_added(score);
                prop_assert!(g.index() >= last_index);
                prop_assert!(g.index() <= g.thresholds().len());
                prop_assert!(g.current_size() >= last_size);
                last_index = g.index();
                last_size = g.current_size();
            }
        }
    }
}
