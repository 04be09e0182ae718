//! Cube Dash - A side-scrolling reflex platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cube physics, obstacle collisions, run state)
//! - `tuning`: Data-driven physics balance
//! - `settings`: Player preferences (effects, audio levels)

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Horizontal scroll per frame (world units)
    pub const GAME_SPEED: f64 = 5.0;
    /// Downward acceleration applied to the cube (units/frame²)
    pub const GRAVITY: f64 = 0.8;
    /// Instantaneous vertical velocity on jump (negative = up)
    pub const JUMP_FORCE: f64 = -15.0;
    /// Orb boost as a fraction of the jump force
    pub const ORB_BOOST: f64 = 0.8;
    /// Airborne spin (degrees/frame)
    pub const ROTATION_SPEED_DEG: f64 = 5.0;

    /// Player cube, locked at a fixed screen x
    pub const PLAYER_X: f64 = 150.0;
    pub const PLAYER_SIZE: f64 = 40.0;

    /// Ground sits this far above the bottom of the viewport
    pub const GROUND_OFFSET: f64 = 100.0;
    pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 720.0;

    /// Extra run-out past the last obstacle before the level counts as won
    pub const LEVEL_END_MARGIN: f64 = 200.0;

    /// Half-width of the broad-phase band around the player (screen units)
    pub const BROAD_PHASE_RANGE: f64 = 100.0;
    /// Obstacles this far past either viewport edge are still drawn
    pub const RENDER_MARGIN: f64 = 100.0;

    /// Default edge-grazing margin for box tests
    pub const BOX_MARGIN: f64 = 2.0;
    /// Block footprint and its overlap margin
    pub const BLOCK_SIZE: f64 = 40.0;
    pub const BLOCK_MARGIN: f64 = 3.0;
    /// Player hitbox inset used against spikes
    pub const SPIKE_HITBOX_INSET: f64 = 8.0;
    /// Orb center offset from the obstacle origin, and its radius
    pub const ORB_OFFSET: f64 = 20.0;
    pub const ORB_RADIUS: f64 = 15.0;

    /// Cosmetic particle pull (units/frame²), independent of player gravity
    pub const PARTICLE_GRAVITY: f64 = 0.3;
}
