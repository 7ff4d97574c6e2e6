//! Roaming collectibles (animals)
//!
//! Wanderers walk between random points around their spawn, pause for a
//! while on arrival, and run away when the hole gets close.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::WANDER_ARRIVE_DISTANCE;
use crate::level::WanderParams;
use crate::{heading_dir, heading_of, turn_toward};

/// Answers whether something blocks the way ahead
pub trait ObstacleProbe {
    /// True when an obstacle lies within `distance` of `from` along `dir`
    fn blocked(&self, from: Vec2, dir: Vec2, distance: f32) -> bool;
}

/// Open field
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleProbe for NoObstacles {
    fn blocked(&self, _from: Vec2, _dir: Vec2, _distance: f32) -> bool {
        false
    }
}

/// Circular obstacles (trees, rocks) on the ground plane
#[derive(Debug, Clone, Default)]
pub struct CircleObstacles {
    pub circles: Vec<(Vec2, f32)>,
}

impl ObstacleProbe for CircleObstacles {
    fn blocked(&self, from: Vec2, dir: Vec2, distance: f32) -> bool {
        let dir = dir.normalize_or_zero();
        self.circles.iter().any(|&(center, radius)| {
            let along = (center - from).dot(dir).clamp(0.0, distance);
            (from + dir * along).distance(center) <= radius
        })
    }
}

/// Per-animal movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wanderer {
    pub params: WanderParams,
    /// Spawn point the roam radius is measured from
    pub home: Vec2,
    pub target: Vec2,
    /// Facing in radians
    pub heading: f32,
    pub speed: f32,
    /// Remaining idle time; `None` while moving
    pub idle: Option<f32>,
}

impl Wanderer {
    pub fn new<R: Rng>(params: WanderParams, home: Vec2, heading: f32, rng: &mut R) -> Self {
        let speed = params.walk_speed;
        let mut wanderer = Self {
            params,
            home,
            target: home,
            heading,
            speed,
            idle: None,
        };
        wanderer.pick_target(rng);
        wanderer
    }

    pub fn is_running(&self) -> bool {
        self.idle.is_none() && self.speed == self.params.run_speed
    }

    fn pick_target<R: Rng>(&mut self, rng: &mut R) {
        let r = self.params.roam_radius * rng.random::<f32>().sqrt();
        let theta = rng.random_range(0.0..std::f32::consts::TAU);
        self.target = self.home + heading_dir(theta) * r;
    }

    fn start_idle<R: Rng>(&mut self, rng: &mut R) {
        let (lo, hi) = (self.params.idle_min, self.params.idle_max);
        let duration = if hi > lo { rng.random_range(lo..hi) } else { lo };
        self.idle = Some(duration);
    }

    /// Advance one tick, moving `pos`
    pub fn update<R: Rng>(
        &mut self,
        pos: &mut Vec2,
        hole_pos: Vec2,
        obstacles: &dyn ObstacleProbe,
        rng: &mut R,
        dt: f32,
    ) {
        if let Some(remaining) = self.idle.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.idle = None;
                self.pick_target(rng);
            }
            return;
        }

        // Flee from the hole
        if pos.distance(hole_pos) <= self.params.hole_detection_radius {
            self.speed = self.params.run_speed;
            let away = (*pos - hole_pos).normalize_or_zero();
            self.target = *pos + away * self.params.roam_radius;
        } else {
            self.speed = self.params.walk_speed;
        }

        if pos.distance(self.target) < WANDER_ARRIVE_DISTANCE {
            self.start_idle(rng);
            return;
        }

        let forward = heading_dir(self.heading);
        if obstacles.blocked(*pos, forward, self.params.obstacle_check_distance) {
            log::debug!("Wanderer blocked at ({:.1}, {:.1})", pos.x, pos.y);
            self.pick_target(rng);
            return;
        }

        let desired = heading_of(self.target - *pos);
        let max_turn = self.params.turn_rate_deg.to_radians() * dt;
        self.heading = turn_toward(self.heading, desired, max_turn);
        *pos += heading_dir(self.heading) * self.speed * dt;

        if self.home.distance(*pos) > self.params.roam_radius {
            self.pick_target(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn params() -> WanderParams {
        WanderParams {
            turn_rate_deg: 3600.0,
            ..WanderParams::default()
        }
    }

    #[test]
    fn test_target_within_roam_radius() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let w = Wanderer::new(params(), Vec2::new(3.0, 4.0), 0.0, &mut rng);
            assert!(w.target.distance(w.home) <= w.params.roam_radius + 1e-3);
        }
    }

    #[test]
    fn test_flees_at_run_speed_when_hole_is_near() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut w = Wanderer::new(params(), Vec2::ZERO, 0.0, &mut rng);
        let mut pos = Vec2::ZERO;
        let hole = Vec2::new(-2.0, 0.0);
        w.update(&mut pos, hole, &NoObstacles, &mut rng, 0.1);
        assert!(w.is_running());
        assert!(pos.x > 0.0, "should move away from the hole, got {pos:?}");
    }

    #[test]
    fn test_idles_on_arrival_then_moves_on() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut w = Wanderer::new(params(), Vec2::ZERO, 0.0, &mut rng);
        let mut pos = w.target + Vec2::new(0.1, 0.0);
        let far_hole = Vec2::new(1000.0, 1000.0);

        w.update(&mut pos, far_hole, &NoObstacles, &mut rng, 0.1);
        assert!(w.idle.is_some());

        let before = pos;
        for _ in 0..100 {
            w.update(&mut pos, far_hole, &NoObstacles, &mut rng, 0.1);
            if w.idle.is_none() {
                break;
            }
            assert_eq!(pos, before);
        }
        assert!(w.idle.is_none());
    }

    #[test]
    fn test_obstacle_forces_new_target_without_moving() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut w = Wanderer::new(params(), Vec2::ZERO, 0.0, &mut rng);
        w.target = Vec2::new(10.0, 0.0);
        let wall = CircleObstacles {
            circles: vec![(Vec2::new(1.0, 0.0), 0.5)],
        };
        let mut pos = Vec2::ZERO;
        w.update(&mut pos, Vec2::new(500.0, 500.0), &wall, &mut rng, 0.1);
        assert_eq!(pos, Vec2::ZERO);
        assert_ne!(w.target, Vec2::new(10.0, 0.0));
    }
}
