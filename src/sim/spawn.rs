//! Collectible placement
//!
//! Rejection sampling inside each spawn zone. A draw is kept only if it is at
//! least `min_spacing` from every point already placed during the same run
//! and the ground collaborator confirms there is ground under it. Running out
//! of attempts is not an error: the level just has fewer objects.

use glam::Vec2;
use rand::Rng;

use crate::consts::SPAWN_ATTEMPTS_PER_INSTANCE;
use crate::level::{SpawnZone, ZoneShape};

/// Answers whether a ground-plane point has walkable ground under it
pub trait GroundProbe {
    fn is_ground(&self, point: Vec2) -> bool;
}

impl<F: Fn(Vec2) -> bool> GroundProbe for F {
    fn is_ground(&self, point: Vec2) -> bool {
        self(point)
    }
}

/// Ground everywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround;

impl GroundProbe for FlatGround {
    fn is_ground(&self, _point: Vec2) -> bool {
        true
    }
}

/// Ground only inside the shape
impl GroundProbe for ZoneShape {
    fn is_ground(&self, point: Vec2) -> bool {
        self.contains(point)
    }
}

/// One accepted position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub zone: usize,
    pub entry: usize,
    pub pos: Vec2,
    /// Facing in radians
    pub yaw: f32,
}

/// A spawn entry that could not be fully placed
#[derive(Debug, Clone, PartialEq)]
pub struct Shortfall {
    pub zone: usize,
    pub kind: String,
    pub requested: u32,
    pub placed: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnReport {
    pub placements: Vec<Placement>,
    pub shortfalls: Vec<Shortfall>,
}

/// Uniform point inside a zone; `None` when the zone has no interior
pub fn sample_point<R: Rng>(shape: &ZoneShape, rng: &mut R) -> Option<Vec2> {
    match *shape {
        ZoneShape::Rect { min, max } => {
            let span = max - min;
            if !(span.x > 0.0 && span.y > 0.0) || !span.is_finite() {
                return None;
            }
            Some(Vec2::new(
                rng.random_range(min.x..max.x),
                rng.random_range(min.y..max.y),
            ))
        }
        ZoneShape::Circle { center, radius } => {
            if !(radius >= 0.0) || !radius.is_finite() || !center.is_finite() {
                return None;
            }
            // sqrt keeps the density uniform over the disc
            let r = radius * rng.random::<f32>().sqrt();
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            Some(center + crate::heading_dir(theta) * r)
        }
    }
}

fn spacing_ok(occupied: &[Vec2], pos: Vec2, min_spacing: f32) -> bool {
    occupied.iter().all(|p| p.distance(pos) >= min_spacing)
}

/// Place every entry of every zone, in order
pub fn place_zones<R: Rng>(zones: &[SpawnZone], rng: &mut R, ground: &dyn GroundProbe) -> SpawnReport {
    let mut report = SpawnReport::default();
    let mut occupied: Vec<Vec2> = Vec::new();

    for (zone_index, zone) in zones.iter().enumerate() {
        for (entry_index, entry) in zone.entries.iter().enumerate() {
            let max_attempts = entry.count.saturating_mul(SPAWN_ATTEMPTS_PER_INSTANCE);
            let mut attempts = 0u32;
            let mut placed = 0u32;

            while placed < entry.count && attempts < max_attempts {
                attempts += 1;
                let Some(pos) = sample_point(&zone.area, rng) else {
                    continue;
                };
                if !spacing_ok(&occupied, pos, entry.min_spacing) || !ground.is_ground(pos) {
                    continue;
                }
                let yaw = rng.random_range(0.0..360.0f32).to_radians();
                occupied.push(pos);
                report.placements.push(Placement {
                    zone: zone_index,
                    entry: entry_index,
                    pos,
                    yaw,
                });
                placed += 1;
                log::debug!("Spawned {} at ({:.2}, {:.2})", entry.kind.name, pos.x, pos.y);
            }

            if placed < entry.count {
                log::warn!(
                    "Couldn't spawn all requested {} ({}/{}); space might be too crowded",
                    entry.kind.name,
                    placed,
                    entry.count
                );
                report.shortfalls.push(Shortfall {
                    zone: zone_index,
                    kind: entry.kind.name.clone(),
                    requested: entry.count,
                    placed,
                });
            }
        }
    }

    report
}
