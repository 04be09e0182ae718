//! The player cube and the scrolling camera
//!
//! The cube's x is locked in screen space; the world scrolls past it via the
//! camera. Only the vertical axis is integrated.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Horizontal scroll offset, never decreases during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
}

impl Camera {
    #[inline]
    pub fn advance(&mut self, speed: f64) {
        self.x += speed;
    }

    /// World x to screen x
    #[inline]
    pub fn to_screen_x(&self, world_x: f64) -> f64 {
        world_x - self.x
    }
}

/// The player's cube
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Screen x (fixed)
    pub x: f64,
    /// Screen y of the top edge
    pub y: f64,
    pub velocity_y: f64,
    pub width: f64,
    pub height: f64,
    pub on_ground: bool,
    /// Visual spin in degrees
    pub rotation_deg: f64,
}

impl PlayerBody {
    /// A cube standing on the ground at `ground_y`
    pub fn new(ground_y: f64) -> Self {
        let mut player = Self {
            x: PLAYER_X,
            y: 0.0,
            velocity_y: 0.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            on_ground: true,
            rotation_deg: 0.0,
        };
        player.reset(ground_y);
        player
    }

    /// Put the cube back on the ground, at rest and square
    pub fn reset(&mut self, ground_y: f64) {
        self.x = PLAYER_X;
        self.y = ground_y - self.height;
        self.velocity_y = 0.0;
        self.on_ground = true;
        self.rotation_deg = 0.0;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bottom-center, where jump dust spawns
    pub fn feet(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height)
    }

    /// Ground jump. Returns true if the impulse was applied.
    ///
    /// No double jump and no buffering: airborne calls do nothing.
    pub fn jump(&mut self, jump_force: f64) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity_y = jump_force;
        self.on_ground = false;
        true
    }

    /// Mid-air boost from an orb, regardless of `on_ground`
    pub fn orb_boost(&mut self, tuning: &Tuning) {
        self.velocity_y = tuning.jump_force * tuning.orb_boost;
    }

    /// Stand on a surface whose top edge is at `top_y`
    pub fn land_on(&mut self, top_y: f64) {
        self.y = top_y - self.height;
        self.velocity_y = 0.0;
        self.on_ground = true;
    }

    /// Integrate one frame of vertical motion, spin, and ground clamp
    pub fn integrate(&mut self, tuning: &Tuning, ground_y: f64) {
        self.velocity_y += tuning.gravity;
        self.y += self.velocity_y;

        // Spin in the air, land square
        if !self.on_ground {
            self.rotation_deg += tuning.rotation_speed_deg;
        } else {
            self.rotation_deg = (self.rotation_deg / 90.0).round() * 90.0;
        }

        if self.y >= ground_y - self.height {
            self.land_on(ground_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f64 = 620.0;

    #[test]
    fn test_new_player_on_ground() {
        let p = PlayerBody::new(GROUND);
        assert_eq!(p.y, GROUND - PLAYER_SIZE);
        assert!(p.on_ground);
        assert_eq!(p.velocity_y, 0.0);
        assert_eq!(p.rotation_deg, 0.0);
        assert_eq!(p.x, PLAYER_X);
    }

    #[test]
    fn test_jump_sets_impulse() {
        let mut p = PlayerBody::new(GROUND);
        assert!(p.jump(JUMP_FORCE));
        assert_eq!(p.velocity_y, JUMP_FORCE);
        assert!(!p.on_ground);
    }

    #[test]
    fn test_jump_while_airborne_is_noop() {
        let tuning = Tuning::default();
        let mut p = PlayerBody::new(GROUND);
        p.jump(JUMP_FORCE);
        p.integrate(&tuning, GROUND);
        let vy = p.velocity_y;
        assert!(!p.jump(JUMP_FORCE));
        assert_eq!(p.velocity_y, vy);
    }

    #[test]
    fn test_gravity_integration() {
        let tuning = Tuning::default();
        let mut p = PlayerBody::new(GROUND);
        p.jump(JUMP_FORCE);
        let y0 = p.y;
        p.integrate(&tuning, GROUND);
        assert!((p.velocity_y - (-14.2)).abs() < 1e-9);
        assert!((p.y - (y0 - 14.2)).abs() < 1e-9);
        assert_eq!(p.rotation_deg, 5.0);
    }

    #[test]
    fn test_full_jump_lands_square() {
        let tuning = Tuning::default();
        let mut p = PlayerBody::new(GROUND);
        p.jump(JUMP_FORCE);
        let mut frames = 0;
        while !p.on_ground {
            p.integrate(&tuning, GROUND);
            frames += 1;
            assert!(frames < 100, "cube never landed");
        }
        assert_eq!(p.y, GROUND - PLAYER_SIZE);
        assert_eq!(p.velocity_y, 0.0);
        // Spin snaps to the nearest quarter turn on the next grounded frame
        p.integrate(&tuning, GROUND);
        assert_eq!(p.rotation_deg % 90.0, 0.0);
    }

    #[test]
    fn test_ground_clamp_never_sinks() {
        let tuning = Tuning::default();
        let mut p = PlayerBody::new(GROUND);
        for _ in 0..50 {
            p.integrate(&tuning, GROUND);
            assert!(p.y <= GROUND - PLAYER_SIZE);
        }
    }

    #[test]
    fn test_orb_boost_works_midair() {
        let tuning = Tuning::default();
        let mut p = PlayerBody::new(GROUND);
        p.jump(JUMP_FORCE);
        p.orb_boost(&tuning);
        assert_eq!(p.velocity_y, JUMP_FORCE * ORB_BOOST);
    }

    #[test]
    fn test_camera_screen_x() {
        let mut cam = Camera::default();
        cam.advance(5.0);
        cam.advance(5.0);
        assert_eq!(cam.to_screen_x(600.0), 590.0);
    }
}
