//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically. Order within a
//! tick: input, hole movement, wanderers, swallowing, see-through marks,
//! clock. Swallowing runs before the clock, so a last-frame swallow that
//! reaches the target still wins.

use glam::Vec2;

use super::collection::center_inside;
use super::state::GameState;
use super::wander::ObstacleProbe;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Stick/drag direction, length <= 1
    pub move_dir: Vec2,
    /// Finger went down this tick
    pub input_started: bool,
    /// Finger lifted this tick
    pub input_ended: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Steer toward the nearest object the hole can already swallow
fn autopilot_dir(state: &GameState) -> Vec2 {
    let hole = &state.hole;
    let swallowable = state
        .collectibles
        .iter()
        .filter(|c| !c.collected && state.rule.can_collect(hole.size, c.size))
        .min_by(|a, b| {
            a.pos
                .distance_squared(hole.pos)
                .partial_cmp(&b.pos.distance_squared(hole.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match swallowable {
        Some(target) => {
            let to_target = target.pos - hole.target;
            // Ease off near the target so the hole does not orbit it
            to_target.normalize_or_zero() * to_target.length().min(1.0)
        }
        None => Vec2::ZERO,
    }
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, obstacles: &dyn ObstacleProbe) {
    // Don't tick if paused or not playing
    if state.paused || !state.is_active() {
        return;
    }

    state.time_ticks += 1;

    let mut move_dir = input.move_dir;
    if input.idle_mode {
        move_dir = autopilot_dir(state);
    }

    // Hole movement
    if input.input_started {
        state.hole.input_started();
    }
    state.hole.steer(move_dir, &state.level.hole, dt);
    if input.input_ended {
        state.hole.input_ended();
    }

    // Wanderers
    let hole_pos = state.hole.pos;
    for item in state.collectibles.iter_mut().filter(|c| !c.collected) {
        if let Some(wanderer) = item.wanderer.as_mut() {
            wanderer.update(&mut item.pos, hole_pos, obstacles, &mut state.rng, dt);
            item.yaw = wanderer.heading;
        }
    }

    // Swallow everything over the opening that fits
    let over_hole: Vec<u32> = state
        .collectibles
        .iter()
        .filter(|c| !c.collected && center_inside(state.hole.pos, state.hole.size, c.pos))
        .map(|c| c.id)
        .collect();
    for id in over_hole {
        if !state.is_active() {
            break;
        }
        state.try_collect(id);
    }

    // Oversized objects covering the opening
    state
        .see_through
        .update(state.hole.pos, state.hole.size, &state.collectibles);

    // Clock
    if state.clock.tick(dt) {
        state.fail();
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::LevelConfig;
    use crate::sim::spawn::FlatGround;
    use crate::sim::state::{Collectible, GameEvent, GamePhase};
    use crate::sim::wander::NoObstacles;

    fn push_item(state: &mut GameState, pos: Vec2, size: f32, score: u32) -> u32 {
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: "box".to_string(),
            pos,
            yaw: 0.0,
            size,
            score,
            collected: false,
            wanderer: None,
        });
        id
    }

    fn session(target: u32, time: f32) -> GameState {
        let mut level = LevelConfig::new(1, target);
        level.level_time_secs = time;
        let mut state = GameState::new(&level);
        state.begin(&FlatGround);
        state
    }

    #[test]
    fn test_tick_swallows_fitting_objects_under_the_hole() {
        let mut state = session(500, 60.0);
        let small = push_item(&mut state, Vec2::new(0.2, 0.0), 0.5, 10);
        let big = push_item(&mut state, Vec2::new(-0.2, 0.0), 3.0, 50);
        let far = push_item(&mut state, Vec2::new(20.0, 0.0), 0.5, 10);

        tick(&mut state, &TickInput::default(), SIM_DT, &NoObstacles);

        let by_id = |id: u32| state.collectibles.iter().find(|c| c.id == id).unwrap();
        assert!(by_id(small).collected);
        assert!(!by_id(big).collected);
        assert!(!by_id(far).collected);
        assert_eq!(state.score, 10);
        assert!(state.see_through.is_marked(big));
    }

    #[test]
    fn test_timer_expiry_fails_exactly_once() {
        let mut state = session(500, 0.05);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT, &NoObstacles);
        }
        assert_eq!(state.phase, GamePhase::Failed);
        let failures = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelFailed { .. }))
            .count();
        assert_eq!(failures, 1);
        assert_eq!(state.clock.remaining(), 0.0);
    }

    #[test]
    fn test_last_frame_swallow_beats_the_clock() {
        let mut state = session(10, SIM_DT * 0.5);
        push_item(&mut state, Vec2::ZERO, 0.5, 10);
        tick(&mut state, &TickInput::default(), SIM_DT, &NoObstacles);
        assert_eq!(state.phase, GamePhase::Completed);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = session(500, 10.0);
        state.paused = true;
        let input = TickInput {
            move_dir: Vec2::X,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT, &NoObstacles);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.hole.pos, Vec2::ZERO);
        assert_eq!(state.clock.remaining(), 10.0);
    }

    #[test]
    fn test_stick_moves_hole() {
        let mut state = session(500, 10.0);
        let input = TickInput {
            move_dir: Vec2::X,
            ..Default::default()
        };
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT, &NoObstacles);
        }
        assert!(state.hole.pos.x > 3.0, "hole at {:?}", state.hole.pos);
        assert!(state.hole.pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_autopilot_clears_a_small_field() {
        let mut state = session(30, 30.0);
        push_item(&mut state, Vec2::new(3.0, 0.0), 0.5, 10);
        push_item(&mut state, Vec2::new(3.0, 4.0), 0.5, 10);
        push_item(&mut state, Vec2::new(-2.0, 1.0), 0.5, 10);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..(20.0 / SIM_DT) as usize {
            tick(&mut state, &input, SIM_DT, &NoObstacles);
        }
        assert_eq!(state.phase, GamePhase::Completed);
        assert_eq!(state.remaining_collectibles(), 0);
    }

    #[test]
    fn test_determinism() {
        let mut level = crate::level::default_levels().remove(0);
        level.level_time_secs = 5.0;
        let mut a = GameState::new(&level);
        let mut b = GameState::new(&level);
        a.begin(&FlatGround);
        b.begin(&FlatGround);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut a, &input, SIM_DT, &NoObstacles);
            tick(&mut b, &input, SIM_DT, &NoObstacles);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.hole.pos, b.hole.pos);
        let pa: Vec<_> = a.collectibles.iter().map(|c| c.pos).collect();
        let pb: Vec<_> = b.collectibles.iter().map(|c| c.pos).collect();
        assert_eq!(pa, pb);
    }
}
