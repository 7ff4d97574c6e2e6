//! Level progression
//!
//! `GameFlow` owns everything that outlives a single session: the level list,
//! save data, settings, overlays. It rebuilds the session on start, restart
//! and level advance. Setup is deferred a short, fixed time after boot and
//! after a reload, the way a freshly loaded scene needs a moment before its
//! collaborators can be bound.

use crate::consts::*;
use crate::level::LevelConfig;
use crate::persistence::{KeyValueStore, keys, load_data, save_data};
use crate::settings::Settings;
use crate::sim::{FlatGround, GameEvent, GameState, GroundProbe, NoObstacles, ObstacleProbe, TickInput, tick};
use crate::ui::{Hud, Overlays, PanelSet};

/// Step a pending deferral performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStep {
    /// Re-acquire collaborators after a reload
    Rebind,
    /// Build and start the current level
    Setup,
}

/// One-shot countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deferred {
    pub remaining: f32,
    pub step: DeferredStep,
}

impl Deferred {
    pub fn new(delay: f32, step: DeferredStep) -> Self {
        Self {
            remaining: delay,
            step,
        }
    }

    /// Returns true once the delay has fully elapsed
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

pub struct GameFlow<S: KeyValueStore> {
    levels: Vec<LevelConfig>,
    store: S,
    settings: Settings,
    current_level: usize,
    session: Option<GameState>,
    hud: Option<Hud>,
    overlays: Overlays,
    pending: Option<Deferred>,
    ground: Box<dyn GroundProbe>,
    obstacles: Box<dyn ObstacleProbe>,
    accumulator: f32,
    /// HUD marks reached since the host last took them
    reached_marks: Vec<usize>,
    /// Held input; one-shot flags are cleared after the first substep
    pub input: TickInput,
}

impl<S: KeyValueStore> GameFlow<S> {
    pub fn new(levels: Vec<LevelConfig>, store: S) -> Self {
        let levels: Vec<LevelConfig> = levels
            .into_iter()
            .filter(|level| match level.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Skipping level {}: {}", level.level_number, e);
                    false
                }
            })
            .collect();
        let current_level = load_data(&store, keys::CURRENT_LEVEL, 0usize);
        let settings = Settings::load(&store);
        log::info!("Resuming at level index {}", current_level);

        Self {
            levels,
            store,
            settings,
            current_level,
            session: None,
            hud: None,
            overlays: Overlays::default(),
            pending: Some(Deferred::new(BOOT_SETUP_DELAY, DeferredStep::Setup)),
            ground: Box::new(FlatGround),
            obstacles: Box::new(NoObstacles),
            accumulator: 0.0,
            reached_marks: Vec::new(),
            input: TickInput::default(),
        }
    }

    pub fn with_ground(mut self, ground: Box<dyn GroundProbe>) -> Self {
        self.ground = ground;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Box<dyn ObstacleProbe>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_panels(mut self, panels: PanelSet) -> Self {
        self.overlays = Overlays::new(panels);
        self
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn hud(&self) -> Option<&Hud> {
        self.hud.as_ref()
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.settings.set_music_volume(&mut self.store, volume);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// A deferred setup is still pending
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Indices of HUD marks reached since the last call, oldest first
    pub fn take_reached_marks(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.reached_marks)
    }

    /// Advance one rendered frame; returns the session events it produced
    pub fn advance_frame(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        // Deferrals count wall time; only the sim step is clamped
        self.advance_pending(frame_dt.max(0.0));
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);

        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };

        let effect = self.overlays.effect();
        session.paused = effect.paused;
        if session.is_active() {
            session.hole.set_control(effect.control_enabled);
        }

        if !effect.paused {
            self.accumulator += dt;
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(session, &self.input, SIM_DT, self.obstacles.as_ref());
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.input_started = false;
                self.input.input_ended = false;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
        }

        let events = session.drain_events();
        if let Some(hud) = self.hud.as_mut() {
            let reached = hud.update_score(session.score);
            self.reached_marks.extend(reached);
            hud.update_timer(session.clock.remaining());
        }
        for event in &events {
            match event {
                GameEvent::LevelCompleted { .. } => self.overlays.show_win(),
                GameEvent::LevelFailed { .. } => self.overlays.show_fail(),
                _ => {}
            }
        }
        events
    }

    fn advance_pending(&mut self, dt: f32) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if !pending.advance(dt) {
            return;
        }
        let step = pending.step;
        self.pending = None;
        match step {
            DeferredStep::Rebind => {
                self.rebind();
                self.pending = Some(Deferred::new(RELOAD_SETUP_DELAY, DeferredStep::Setup));
            }
            DeferredStep::Setup => self.setup_current_level(),
        }
    }

    fn rebind(&mut self) {
        if self.levels.is_empty() {
            log::error!("Essential level data is missing!");
        }
        self.settings = Settings::load(&self.store);
    }

    fn setup_current_level(&mut self) {
        if self.levels.is_empty() {
            log::error!("No levels to set up");
            return;
        }
        if self.current_level >= self.levels.len() {
            self.current_level = 0;
            save_data(&mut self.store, keys::CURRENT_LEVEL, 0usize);
        }

        let level = &self.levels[self.current_level];
        let mut session = GameState::new(level);
        session.begin(self.ground.as_ref());

        self.overlays.reset_for_level();
        self.hud = Some(Hud::new(level));
        self.session = Some(session);
        self.accumulator = 0.0;
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            let restored = session.see_through.clear();
            if !restored.is_empty() {
                log::debug!("Restored {} translucent objects on teardown", restored.len());
            }
        }
        self.hud = None;
        self.reached_marks.clear();
        self.input = TickInput::default();
    }

    /// Record the current level as beaten and move the saved index on
    pub fn level_completed(&mut self) {
        self.current_level += 1;
        save_data(&mut self.store, keys::CURRENT_LEVEL, self.current_level);
        log::info!("Progress saved: next level index {}", self.current_level);
    }

    /// Drop the session and rebuild the same level after the reload delay
    pub fn restart_level(&mut self) {
        self.teardown();
        self.pending = Some(Deferred::new(RELOAD_REBIND_DELAY, DeferredStep::Rebind));
    }

    pub fn next_level(&mut self) {
        self.level_completed();
        self.restart_level();
    }
}
