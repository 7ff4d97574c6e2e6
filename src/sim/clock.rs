//! Level countdown

use serde::{Deserialize, Serialize};

/// Counts remaining level time down to zero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelClock {
    remaining: f32,
    expired: bool,
}

impl LevelClock {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            expired: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance the clock. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.expired {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= 0.0 {
            self.expired = true;
            return true;
        }
        false
    }
}

/// Render seconds as `MM:SS` (both fields floored)
pub fn format_mm_ss(seconds: f32) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    format!("{:02}:{:02}", minutes, secs)
}
