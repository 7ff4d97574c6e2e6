//! Session state and core simulation types
//!
//! One `GameState` is one playthrough of a level. It is rebuilt from the
//! level definition on start and on every restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::LevelClock;
use super::collection::CollectionRule;
use super::growth::ScoreGrowth;
use super::see_through::SeeThrough;
use super::spawn::{GroundProbe, Shortfall, place_zones};
use super::wander::Wanderer;
use crate::level::{HoleTuning, LevelConfig};
use crate::smooth_damp;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but not yet populated
    Initializing,
    /// Playing
    Active,
    /// Target score reached
    Completed,
    /// Ran out of time
    Failed,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Completed | GamePhase::Failed)
    }
}

/// Things the host reacts to (sounds, panels, effects)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Collected { id: u32, score: u32 },
    HoleGrew { size: f32, threshold_index: usize },
    SpawnShortfall(Shortfall),
    LevelCompleted { score: u32 },
    LevelFailed { score: u32 },
}

/// The player-controlled hole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hole {
    pub pos: Vec2,
    /// Point the hole is easing toward
    pub target: Vec2,
    pub velocity: Vec2,
    /// Diameter of the opening
    pub size: f32,
    pub control_enabled: bool,
}

impl Hole {
    pub fn new(start: Vec2, size: f32) -> Self {
        Self {
            pos: start,
            target: start,
            velocity: Vec2::ZERO,
            size,
            control_enabled: true,
        }
    }

    /// Move the target by the stick direction, then ease toward it
    pub fn steer(&mut self, dir: Vec2, tuning: &HoleTuning, dt: f32) {
        if !self.control_enabled {
            return;
        }
        let dir = dir.clamp_length_max(1.0);
        if dir != Vec2::ZERO {
            self.target += dir * tuning.move_speed * dt;
        }
        self.pos = smooth_damp(self.pos, self.target, &mut self.velocity, tuning.movement_smoothing, dt);
    }

    /// Touch down: steer relative to where the hole is now
    pub fn input_started(&mut self) {
        if self.control_enabled {
            self.target = self.pos;
        }
    }

    /// Touch up: stop drifting
    pub fn input_ended(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn set_control(&mut self, enabled: bool) {
        self.control_enabled = enabled;
        if !enabled {
            self.velocity = Vec2::ZERO;
        }
    }
}

/// A world object that can be swallowed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: String,
    pub pos: Vec2,
    /// Facing in radians
    pub yaw: f32,
    /// Largest bounding extent, fixed at spawn
    pub size: f32,
    pub score: u32,
    pub collected: bool,
    #[serde(default)]
    pub wanderer: Option<Wanderer>,
}

impl Collectible {
    /// Mark as swallowed. Returns the score only the first time.
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        log::debug!("{} #{} collected with score {}", self.kind, self.id, self.score);
        Some(self.score)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub level: LevelConfig,
    pub phase: GamePhase,
    /// Frozen while an overlay holds the game (time scale 0)
    pub paused: bool,
    pub score: u32,
    pub clock: LevelClock,
    pub growth: ScoreGrowth,
    pub rule: CollectionRule,
    pub hole: Hole,
    /// Sorted by id
    pub collectibles: Vec<Collectible>,
    pub see_through: SeeThrough,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh session for a level, still `Initializing`
    pub fn new(level: &LevelConfig) -> Self {
        Self {
            level: level.clone(),
            phase: GamePhase::Initializing,
            paused: false,
            score: 0,
            clock: LevelClock::new(level.level_time_secs),
            growth: ScoreGrowth::from_level(level),
            rule: CollectionRule::new(level.hole.collect_tolerance),
            hole: Hole::new(level.hole.start, level.initial_hole_size),
            collectibles: Vec::new(),
            see_through: SeeThrough::default(),
            rng: Pcg32::seed_from_u64(level.seed),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Populate the level and start playing
    pub fn begin(&mut self, ground: &dyn GroundProbe) {
        if self.phase != GamePhase::Initializing {
            log::warn!("begin() ignored in phase {:?}", self.phase);
            return;
        }

        let report = place_zones(&self.level.spawn_zones, &mut self.rng, ground);
        for placement in report.placements {
            let kind = &self.level.spawn_zones[placement.zone].entries[placement.entry].kind;
            let (name, size, score) = (kind.name.clone(), kind.size(), kind.score);
            let wander_params = kind.wander.clone();
            let wanderer =
                wander_params.map(|p| Wanderer::new(p, placement.pos, placement.yaw, &mut self.rng));
            let id = self.next_entity_id();
            self.collectibles.push(Collectible {
                id,
                kind: name,
                pos: placement.pos,
                yaw: placement.yaw,
                size,
                score,
                collected: false,
                wanderer,
            });
        }
        for shortfall in report.shortfalls {
            self.events.push(GameEvent::SpawnShortfall(shortfall));
        }

        self.phase = GamePhase::Active;
        log::info!(
            "Level {} started: target {}, {:.0}s, {} objects",
            self.level.level_number,
            self.level.target_score,
            self.clock.remaining(),
            self.collectibles.len()
        );
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Add points; grows the hole and completes the level as thresholds pass
    pub fn add_score(&mut self, points: u32) {
        if !self.is_active() {
            return;
        }
        self.score = self.score.saturating_add(points);

        if let Some(growth) = self.growth.on_score_added(self.score) {
            self.hole.size = self.hole.size.max(growth.new_hole_size);
            log::info!(
                "Hole grew to {:.2} (threshold {} of {})",
                self.hole.size,
                growth.threshold_index + 1,
                self.growth.thresholds().len()
            );
            self.events.push(GameEvent::HoleGrew {
                size: self.hole.size,
                threshold_index: growth.threshold_index,
            });
        }

        if self.score >= self.level.target_score {
            self.phase = GamePhase::Completed;
            self.hole.set_control(false);
            log::info!("Level {} complete! score {}", self.level.level_number, self.score);
            self.events.push(GameEvent::LevelCompleted { score: self.score });
        }
    }

    /// Swallow a collectible by id if the hole is big enough
    pub fn try_collect(&mut self, id: u32) -> bool {
        if !self.is_active() {
            return false;
        }
        let hole_size = self.hole.size;
        let rule = self.rule;
        let Some(item) = self.collectibles.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if item.collected || !rule.can_collect(hole_size, item.size) {
            return false;
        }
        let Some(score) = item.collect() else {
            return false;
        };
        self.events.push(GameEvent::Collected { id, score });
        self.add_score(score);
        true
    }

    /// Clock ran out
    pub(crate) fn fail(&mut self) {
        if !self.is_active() {
            return;
        }
        self.phase = GamePhase::Failed;
        self.hole.set_control(false);
        log::info!("Level {} failed with score {}", self.level.level_number, self.score);
        self.events.push(GameEvent::LevelFailed { score: self.score });
    }

    pub fn remaining_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }

    /// Take queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Ensure collectibles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.collectibles.sort_by_key(|c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::FlatGround;

    fn level() -> LevelConfig {
        let mut level = LevelConfig::new(1, 500);
        level.score_thresholds = vec![100, 250, 400];
        level
    }

    fn active(level: &LevelConfig) -> GameState {
        let mut state = GameState::new(level);
        state.begin(&FlatGround);
        state
    }

    #[test]
    fn test_begin_moves_to_active_once() {
        let mut state = GameState::new(&level());
        assert_eq!(state.phase, GamePhase::Initializing);
        state.begin(&FlatGround);
        assert_eq!(state.phase, GamePhase::Active);
        state.begin(&FlatGround);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_score_jump_grows_hole_through_two_thresholds() {
        let mut state = active(&level());
        state.add_score(90);
        assert_eq!(state.growth.index(), 0);
        state.add_score(170);
        assert_eq!(state.score, 260);
        assert_eq!(state.growth.index(), 2);
        assert!((state.hole.size - 1.6).abs() < 1e-5);
        let grew = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::HoleGrew { .. }))
            .count();
        assert_eq!(grew, 1);
    }

    #[test]
    fn test_reaching_target_completes() {
        let mut state = active(&level());
        state.add_score(500);
        assert_eq!(state.phase, GamePhase::Completed);
        assert!(!state.hole.control_enabled);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LevelCompleted { score: 500 })
        );

        // Terminal: further score is ignored
        state.add_score(100);
        assert_eq!(state.score, 500);
    }

    #[test]
    fn test_score_ignored_before_begin() {
        let mut state = GameState::new(&level());
        state.add_score(50);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut state = active(&level());
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: "cone".to_string(),
            pos: Vec2::ZERO,
            yaw: 0.0,
            size: 0.5,
            score: 10,
            collected: false,
            wanderer: None,
        });
        assert!(state.try_collect(id));
        assert!(!state.try_collect(id));
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_oversized_object_rejected() {
        let mut state = active(&level());
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            kind: "car".to_string(),
            pos: Vec2::ZERO,
            yaw: 0.0,
            size: 2.0,
            score: 40,
            collected: false,
            wanderer: None,
        });
        assert!(!state.try_collect(id));
        assert!(!state.collectibles[0].collected);
        assert_eq!(state.score, 0);
    }
}
