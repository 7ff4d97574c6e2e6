//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; ground and obstacle queries come
//!   in through `GroundProbe` and `ObstacleProbe`

pub mod clock;
pub mod collection;
pub mod growth;
pub mod see_through;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wander;

pub use clock::{LevelClock, format_mm_ss};
pub use collection::{CollectionRule, center_inside, footprint_touches};
pub use growth::{GrowthEvent, ScoreGrowth};
pub use see_through::{SeeThrough, SeeThroughChanges};
pub use spawn::{FlatGround, GroundProbe, Placement, Shortfall, SpawnReport, place_zones};
pub use state::{Collectible, GameEvent, GamePhase, GameState, Hole};
pub use tick::{TickInput, tick};
pub use wander::{CircleObstacles, NoObstacles, ObstacleProbe, Wanderer};
