//! Level definitions
//!
//! Static per-level data: target score, timer, growth curve and spawn zones.
//! Levels are immutable once loaded; a session copies what it needs.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while loading or validating level data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level {level}: target score must be positive")]
    ZeroTarget { level: u32 },
    #[error("level {level}: level time must be positive, got {time}")]
    BadLevelTime { level: u32, time: f32 },
    #[error("level {level}: initial hole size {initial} must be positive and not above max {max}")]
    BadHoleSize { level: u32, initial: f32, max: f32 },
    #[error("level {level}: growth amount must not be negative, got {amount}")]
    NegativeGrowth { level: u32, amount: f32 },
    #[error("level {level}: score thresholds must be strictly increasing (index {index})")]
    UnorderedThresholds { level: u32, index: usize },
    #[error("level {level}: zone {zone} has an empty area")]
    EmptyZone { level: u32, zone: usize },
    #[error("level {level}: `{kind}` min spacing must not be negative")]
    NegativeSpacing { level: u32, kind: String },
    #[error("level {level}: `{kind}` score {score} is not a 5-point tier up to 100")]
    BadScoreTier { level: u32, kind: String, score: u32 },
    #[error("level {level}: `{kind}` must have positive extents")]
    BadExtents { level: u32, kind: String },
}

/// Hole handling knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoleTuning {
    /// Target speed in units per second at full stick deflection
    pub move_speed: f32,
    /// Smooth-damp time for the hole following its target
    pub movement_smoothing: f32,
    /// Object size multiplier in the swallow test (`hole >= object * tolerance`)
    pub collect_tolerance: f32,
    /// Where the hole starts on the ground plane
    pub start: Vec2,
}

impl Default for HoleTuning {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            movement_smoothing: 0.1,
            collect_tolerance: 1.0,
            start: Vec2::ZERO,
        }
    }
}

/// Movement parameters for collectibles that roam on their own (animals)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderParams {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Turn rate in degrees per second
    pub turn_rate_deg: f32,
    /// Max distance from the spawn point
    pub roam_radius: f32,
    /// Flee when the hole gets this close
    pub hole_detection_radius: f32,
    /// Obstacle look-ahead distance
    pub obstacle_check_distance: f32,
    pub idle_min: f32,
    pub idle_max: f32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            run_speed: 5.0,
            turn_rate_deg: 120.0,
            roam_radius: 30.0,
            hole_detection_radius: 10.0,
            obstacle_check_distance: 2.0,
            idle_min: 2.0,
            idle_max: 5.0,
        }
    }
}

/// A type of object that can be swallowed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleKind {
    pub name: String,
    /// Bounding box size (x, y, z)
    pub extents: Vec3,
    /// Points awarded when swallowed
    pub score: u32,
    #[serde(default)]
    pub wander: Option<WanderParams>,
}

impl CollectibleKind {
    /// Swallow size: the largest bounding extent
    pub fn size(&self) -> f32 {
        self.extents.max_element()
    }
}

/// Shape of a spawn zone on the ground plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneShape {
    Rect { min: Vec2, max: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

impl ZoneShape {
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            ZoneShape::Rect { min, max } => point.cmpge(min).all() && point.cmple(max).all(),
            ZoneShape::Circle { center, radius } => point.distance(center) <= radius,
        }
    }

    pub fn area(&self) -> f32 {
        match *self {
            ZoneShape::Rect { min, max } => {
                let size = (max - min).max(Vec2::ZERO);
                size.x * size.y
            }
            ZoneShape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
        }
    }
}

/// How many of one kind to place, and how far apart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: CollectibleKind,
    pub count: u32,
    #[serde(default = "default_min_spacing")]
    pub min_spacing: f32,
}

fn default_min_spacing() -> f32 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnZone {
    pub area: ZoneShape,
    pub entries: Vec<SpawnEntry>,
}

/// Complete level definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level_number: u32,
    pub target_score: u32,
    #[serde(default = "default_level_time")]
    pub level_time_secs: f32,
    #[serde(default = "default_initial_hole")]
    pub initial_hole_size: f32,
    #[serde(default = "default_max_hole")]
    pub max_hole_size: f32,
    #[serde(default = "default_growth")]
    pub growth_amount: f32,
    #[serde(default = "default_thresholds")]
    pub score_thresholds: Vec<u32>,
    #[serde(default)]
    pub spawn_zones: Vec<SpawnZone>,
    /// Seed for spawn placement and wandering
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub hole: HoleTuning,
}

fn default_level_time() -> f32 {
    180.0
}
fn default_initial_hole() -> f32 {
    1.0
}
fn default_max_hole() -> f32 {
    10.0
}
fn default_growth() -> f32 {
    0.3
}
fn default_thresholds() -> Vec<u32> {
    vec![100, 250, 400, 600, 800]
}

impl LevelConfig {
    /// A level with default timing and growth and no spawn zones
    pub fn new(level_number: u32, target_score: u32) -> Self {
        Self {
            level_number,
            target_score,
            level_time_secs: default_level_time(),
            initial_hole_size: default_initial_hole(),
            max_hole_size: default_max_hole(),
            growth_amount: default_growth(),
            score_thresholds: default_thresholds(),
            spawn_zones: Vec::new(),
            seed: 0,
            hole: HoleTuning::default(),
        }
    }

    /// Parse and validate a single level
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let level: LevelConfig = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level_number;
        if self.target_score == 0 {
            return Err(ConfigError::ZeroTarget { level });
        }
        if !(self.level_time_secs > 0.0) {
            return Err(ConfigError::BadLevelTime {
                level,
                time: self.level_time_secs,
            });
        }
        if !(self.initial_hole_size > 0.0) || self.initial_hole_size > self.max_hole_size {
            return Err(ConfigError::BadHoleSize {
                level,
                initial: self.initial_hole_size,
                max: self.max_hole_size,
            });
        }
        if self.growth_amount < 0.0 {
            return Err(ConfigError::NegativeGrowth {
                level,
                amount: self.growth_amount,
            });
        }
        if let Some(index) = self
            .score_thresholds
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(ConfigError::UnorderedThresholds {
                level,
                index: index + 1,
            });
        }

        for (zone_index, zone) in self.spawn_zones.iter().enumerate() {
            if !(zone.area.area() > 0.0) {
                return Err(ConfigError::EmptyZone {
                    level,
                    zone: zone_index,
                });
            }
            for entry in &zone.entries {
                let kind = &entry.kind;
                if entry.min_spacing < 0.0 {
                    return Err(ConfigError::NegativeSpacing {
                        level,
                        kind: kind.name.clone(),
                    });
                }
                if kind.score > 100 || kind.score % 5 != 0 {
                    return Err(ConfigError::BadScoreTier {
                        level,
                        kind: kind.name.clone(),
                        score: kind.score,
                    });
                }
                if !(kind.extents.min_element() > 0.0) {
                    return Err(ConfigError::BadExtents {
                        level,
                        kind: kind.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Fraction of the target each threshold sits at, for progress marks
    pub fn threshold_fractions(&self) -> impl Iterator<Item = f32> + '_ {
        let target = self.target_score as f32;
        self.score_thresholds.iter().map(move |&t| t as f32 / target)
    }
}

/// Parse and validate a JSON array of levels
pub fn load_levels_from_str(json: &str) -> Result<Vec<LevelConfig>, ConfigError> {
    let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
    for level in &levels {
        level.validate()?;
    }
    log::info!("Loaded {} levels", levels.len());
    Ok(levels)
}

fn kind(name: &str, extents: Vec3, score: u32) -> CollectibleKind {
    CollectibleKind {
        name: name.to_string(),
        extents,
        score,
        wander: None,
    }
}

fn animal(name: &str, extents: Vec3, score: u32) -> CollectibleKind {
    CollectibleKind {
        wander: Some(WanderParams::default()),
        ..kind(name, extents, score)
    }
}

/// Built-in level set used when no level file is supplied
pub fn default_levels() -> Vec<LevelConfig> {
    let park = ZoneShape::Rect {
        min: Vec2::new(-20.0, -20.0),
        max: Vec2::new(40.0, 40.0),
    };

    let mut first = LevelConfig::new(1, 500);
    first.seed = 0x51_4B_01;
    first.spawn_zones = vec![SpawnZone {
        area: park,
        entries: vec![
            SpawnEntry {
                kind: kind("pebble", Vec3::new(0.4, 0.3, 0.4), 5),
                count: 40,
                min_spacing: 1.0,
            },
            SpawnEntry {
                kind: kind("cone", Vec3::new(0.6, 0.9, 0.6), 10),
                count: 30,
                min_spacing: 1.5,
            },
            SpawnEntry {
                kind: kind("bench", Vec3::new(1.2, 0.8, 0.5), 20),
                count: 15,
                min_spacing: 2.0,
            },
            SpawnEntry {
                kind: animal("chicken", Vec3::new(0.5, 0.6, 0.7), 15),
                count: 8,
                min_spacing: 2.0,
            },
        ],
    }];

    let mut second = LevelConfig::new(2, 900);
    second.seed = 0x51_4B_02;
    second.level_time_secs = 150.0;
    second.score_thresholds = vec![120, 300, 500, 700];
    second.spawn_zones = vec![
        SpawnZone {
            area: park,
            entries: vec![
                SpawnEntry {
                    kind: kind("crate", Vec3::new(0.8, 0.8, 0.8), 15),
                    count: 40,
                    min_spacing: 1.5,
                },
                SpawnEntry {
                    kind: kind("car", Vec3::new(2.0, 1.4, 1.1), 40),
                    count: 12,
                    min_spacing: 3.0,
                },
            ],
        },
        SpawnZone {
            area: ZoneShape::Circle {
                center: Vec2::new(10.0, 10.0),
                radius: 12.0,
            },
            entries: vec![SpawnEntry {
                kind: animal("sheep", Vec3::new(0.8, 1.0, 1.3), 25),
                count: 10,
                min_spacing: 2.5,
            }],
        },
    ];

    vec![first, second]
}
