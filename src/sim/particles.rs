//! Cosmetic particle bursts
//!
//! Particles never affect gameplay. Emission is unbounded, lifetime is not:
//! each particle lives a fixed number of frames and is dropped at zero.

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::PARTICLE_GRAVITY;

/// Life (frames) that maps to full opacity
pub const FULL_ALPHA_LIFE: u32 = 60;

/// Which gameplay event a burst belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleBurst {
    Jump,
    Orb,
    Death,
}

impl ParticleBurst {
    /// Particles emitted per burst
    pub fn count(self) -> usize {
        match self {
            ParticleBurst::Jump => 5,
            ParticleBurst::Orb => 10,
            ParticleBurst::Death => 20,
        }
    }

    /// Starting life in frames
    pub fn life(self) -> u32 {
        match self {
            ParticleBurst::Jump => 30,
            ParticleBurst::Orb => 40,
            ParticleBurst::Death => 60,
        }
    }

    /// RGB color
    pub fn color(self) -> u32 {
        match self {
            ParticleBurst::Jump => 0xffffff,
            ParticleBurst::Orb => 0xffff00,
            ParticleBurst::Death => 0x00ff00,
        }
    }

    /// Random initial velocity for this burst shape
    fn velocity(self, rng: &mut Pcg32) -> DVec2 {
        match self {
            // Dust kicked off the ground: spread sideways, drift down
            ParticleBurst::Jump => DVec2::new(
                (rng.random::<f64>() - 0.5) * 4.0,
                rng.random::<f64>() * 2.0,
            ),
            ParticleBurst::Orb => DVec2::new(
                (rng.random::<f64>() - 0.5) * 6.0,
                (rng.random::<f64>() - 0.5) * 6.0,
            ),
            ParticleBurst::Death => DVec2::new(
                (rng.random::<f64>() - 0.5) * 10.0,
                (rng.random::<f64>() - 0.5) * 10.0,
            ),
        }
    }
}

/// A particle for visual feedback (screen space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Frames remaining
    pub life: u32,
    pub color: u32,
}

impl Particle {
    /// Opacity for rendering, fading with remaining life
    pub fn alpha(&self) -> f64 {
        (self.life as f64 / FULL_ALPHA_LIFE as f64).min(1.0)
    }
}

/// Owner of every live particle
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: Pcg32,
    enabled: bool,
}

impl ParticlePool {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            enabled: true,
        }
    }

    /// Disabled pools ignore emission (player turned effects off)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.particles.clear();
        }
    }

    /// Emit a burst centered on `origin`
    pub fn emit(&mut self, burst: ParticleBurst, origin: DVec2) {
        if !self.enabled {
            return;
        }
        for _ in 0..burst.count() {
            let vel = burst.velocity(&mut self.rng);
            self.particles.push(Particle {
                pos: origin,
                vel,
                life: burst.life(),
                color: burst.color(),
            });
        }
    }

    /// Advance one frame: move, pull down, age, drop the dead
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.vel.y += PARTICLE_GRAVITY;
            p.life = p.life.saturating_sub(1);
            p.life > 0
        });
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
