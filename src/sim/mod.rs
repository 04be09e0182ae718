//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only (frame rate sets game speed)
//! - Seeded RNG only
//! - Stable iteration order (level order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod level;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Interaction, resolve_collisions};
pub use geometry::{Rect, box_overlap, circle_box_distance_squared, point_in_triangle};
pub use level::{
    Level, LevelDescriptor, LevelError, LevelPack, ObjectEntry, Obstacle, ObstacleKind, Theme,
    generate_default_level,
};
pub use particles::{Particle, ParticleBurst, ParticlePool};
pub use player::{Camera, PlayerBody};
pub use state::{GameEvent, GameState, RenderView, RunPhase, RunStats, SoundEffect};
pub use tick::{TickInput, tick};
