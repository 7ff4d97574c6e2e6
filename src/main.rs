//! Sinkhole headless runner
//!
//! Plays every level on autopilot at a fixed frame rate and logs the outcome.
//! Level data comes from the JSON file named by `SINKHOLE_LEVELS` if set,
//! otherwise the built-in set. Progress is saved to `sinkhole_save.json`.

use sinkhole::persistence::JsonFileStore;
use sinkhole::sim::{GameEvent, GamePhase, TickInput};
use sinkhole::{GameFlow, LevelConfig, default_levels, level};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;
const SAVE_PATH: &str = "sinkhole_save.json";

fn load_levels() -> Vec<LevelConfig> {
    let Ok(path) = std::env::var("SINKHOLE_LEVELS") else {
        return default_levels();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| level::load_levels_from_str(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(levels) if !levels.is_empty() => levels,
        Ok(_) => {
            log::warn!("{} holds no levels, using built-in set", path);
            default_levels()
        }
        Err(e) => {
            log::error!("Failed to load levels from {}: {}", path, e);
            default_levels()
        }
    }
}

/// Run the current level to its end; returns the final phase
fn play_level(flow: &mut GameFlow<JsonFileStore>) -> Option<GamePhase> {
    // Let the deferred setup run
    while flow.is_loading() {
        flow.advance_frame(FRAME_DT);
    }
    let level_time = flow.session()?.level.level_time_secs;
    let max_frames = ((level_time + 1.0) / FRAME_DT) as usize;

    for _ in 0..max_frames {
        for event in flow.advance_frame(FRAME_DT) {
            match event {
                GameEvent::HoleGrew { size, .. } => log::info!("  hole -> {:.2}", size),
                GameEvent::SpawnShortfall(s) => {
                    log::warn!("  only {}/{} {} placed", s.placed, s.requested, s.kind)
                }
                _ => {}
            }
        }
        let phase = flow.session()?.phase;
        if phase.is_terminal() {
            return Some(phase);
        }
    }
    flow.session().map(|s| s.phase)
}

fn main() {
    env_logger::init();
    log::info!("Sinkhole (headless) starting...");

    let store = JsonFileStore::open_or_default(SAVE_PATH);
    let mut flow = GameFlow::new(load_levels(), store);
    flow.input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let rounds = flow.level_count();
    for _ in 0..rounds {
        let Some(phase) = play_level(&mut flow) else {
            log::error!("No playable level, stopping");
            return;
        };
        if let (Some(session), Some(hud)) = (flow.session(), flow.hud()) {
            println!(
                "{}: {:?} with {} ({} left, {} objects remaining)",
                hud.level_text,
                phase,
                hud.score_text,
                hud.timer_text,
                session.remaining_collectibles()
            );
        }

        match phase {
            GamePhase::Completed => flow.next_level(),
            _ => flow.restart_level(),
        }
        flow.input.idle_mode = true;
    }
}
