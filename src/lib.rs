//! Sinkhole - a growing-hole arcade game
//!
//! Core modules:
//! - `sim`: Deterministic level simulation (hole, collectibles, growth, clock)
//! - `level`: Data-driven level definitions
//! - `flow`: Level progression and deferred re-initialisation
//! - `persistence`: Typed key/value save data
//! - `settings`: Player preferences
//! - `ui`: HUD and overlay state for the host to draw

pub mod flow;
pub mod level;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod ui;

pub use flow::GameFlow;
pub use level::{LevelConfig, default_levels};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Delay before the first level setup after boot (seconds)
    pub const BOOT_SETUP_DELAY: f32 = 0.1;
    /// Delay before rebinding after a level reload (seconds)
    pub const RELOAD_REBIND_DELAY: f32 = 0.2;
    /// Delay between rebinding and level setup after a reload (seconds)
    pub const RELOAD_SETUP_DELAY: f32 = 0.1;

    /// Spawn draws allowed per requested instance
    pub const SPAWN_ATTEMPTS_PER_INSTANCE: u32 = 100;

    /// Wanderers stop and idle this close to their target
    pub const WANDER_ARRIVE_DISTANCE: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Heading (radians) of a ground-plane direction
#[inline]
pub fn heading_of(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

/// Unit vector for a heading (radians)
#[inline]
pub fn heading_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Turn `current` toward `target` by at most `max_step` radians
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_angle(target - current);
    normalize_angle(current + delta.clamp(-max_step, max_step))
}

/// Critically damped follow of `current` toward `target`.
///
/// `velocity` carries state between calls and must be reset to zero when the
/// follower should stop. Never overshoots the target.
pub fn smooth_damp(
    current: Vec2,
    target: Vec2,
    velocity: &mut Vec2,
    smooth_time: f32,
    dt: f32,
) -> Vec2 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp overshoot
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec2::ZERO;
    }
    output
}
