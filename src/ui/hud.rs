//! In-game HUD model
//!
//! Level label, score text, progress slider with one mark per growth
//! threshold, and the countdown text. The host draws; this decides what.

use crate::level::LevelConfig;
use crate::sim::format_mm_ss;

/// A growth threshold marker on the progress slider
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdMark {
    pub threshold: u32,
    /// Position along the slider, 0.0 - 1.0 of the target
    pub position: f32,
    pub reached: bool,
}

#[derive(Debug, Clone)]
pub struct Hud {
    pub level_text: String,
    pub score_text: String,
    pub timer_text: String,
    /// Slider value in score units (0 ..= target)
    pub slider_value: f32,
    pub slider_max: f32,
    pub marks: Vec<ThresholdMark>,
}

impl Hud {
    pub fn new(level: &LevelConfig) -> Self {
        let marks = level
            .score_thresholds
            .iter()
            .zip(level.threshold_fractions())
            .map(|(&threshold, position)| ThresholdMark {
                threshold,
                position,
                reached: false,
            })
            .collect();

        Self {
            level_text: format!("Level {}", level.level_number),
            score_text: format!("0/{}", level.target_score),
            timer_text: format_mm_ss(level.level_time_secs),
            slider_value: 0.0,
            slider_max: level.target_score as f32,
            marks,
        }
    }

    /// Refresh score widgets. Returns indices of marks reached just now,
    /// each reported once (the host plays its pulse effect for these).
    pub fn update_score(&mut self, score: u32) -> Vec<usize> {
        self.score_text = format!("{}/{}", score, self.slider_max as u32);
        self.slider_value = (score as f32).min(self.slider_max);

        let mut newly_reached = Vec::new();
        for (index, mark) in self.marks.iter_mut().enumerate() {
            if !mark.reached && score >= mark.threshold {
                mark.reached = true;
                newly_reached.push(index);
            }
        }
        newly_reached
    }

    pub fn update_timer(&mut self, remaining_secs: f32) {
        self.timer_text = format_mm_ss(remaining_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud() -> Hud {
        let mut level = LevelConfig::new(4, 500);
        level.score_thresholds = vec![100, 250, 400];
        level.level_time_secs = 95.0;
        Hud::new(&level)
    }

    #[test]
    fn test_initial_texts_and_mark_positions() {
        let hud = hud();
        assert_eq!(hud.level_text, "Level 4");
        assert_eq!(hud.score_text, "0/500");
        assert_eq!(hud.timer_text, "01:35");
        let positions: Vec<f32> = hud.marks.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn test_marks_report_once() {
        let mut hud = hud();
        assert_eq!(hud.update_score(90), Vec::<usize>::new());
        assert_eq!(hud.update_score(260), vec![0, 1]);
        assert_eq!(hud.update_score(300), Vec::<usize>::new());
        assert_eq!(hud.score_text, "300/500");
        assert_eq!(hud.slider_value, 300.0);
    }

    #[test]
    fn test_slider_caps_at_target() {
        let mut hud = hud();
        hud.update_score(650);
        assert_eq!(hud.slider_value, 500.0);
        assert!(hud.marks.iter().all(|m| m.reached));
    }
}
