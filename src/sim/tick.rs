//! Fixed per-frame simulation step
//!
//! One call advances the run by exactly one frame, whatever the host's frame
//! rate. Higher refresh rates therefore scroll faster; see `GameState::step`.

use super::collision::{Interaction, resolve_collisions};
use super::particles::ParticleBurst;
use super::state::{GameState, SoundEffect};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump pressed since the last frame (edge, not held)
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }
    if input.jump {
        state.jump();
    }

    // Paused, idle or finished runs don't move
    if !state.is_running() {
        return;
    }

    state.frame += 1;

    state.camera.advance(state.tuning.game_speed);
    state.update_progress();

    state.player.integrate(&state.tuning, state.ground_y);

    let interactions = resolve_collisions(
        &mut state.player,
        &mut state.level,
        &state.camera,
        state.ground_y,
        &state.tuning,
    );
    for interaction in interactions {
        match interaction {
            Interaction::OrbTaken { center, .. } => {
                state.particles.emit(ParticleBurst::Orb, center);
                state.emit_sound(SoundEffect::Orb);
            }
            Interaction::Landed { index } => {
                log::debug!("Landed on block {}", index);
            }
            Interaction::Died { index, kind } => {
                log::debug!("Hit {:?} {}", kind, index);
                state.die();
                return;
            }
        }
    }

    state.particles.update();

    if state.camera.x >= state.level.length_units {
        state.win();
    }
}

impl GameState {
    /// Host frame callback: one fixed step per call.
    ///
    /// `timestamp` (ms, monotonically increasing) only feeds `last_delta`;
    /// physics is not scaled by it.
    pub fn step(&mut self, timestamp: f64) {
        self.step_with_input(timestamp, &TickInput::default());
    }

    /// `step` with queued input applied first
    pub fn step_with_input(&mut self, timestamp: f64, input: &TickInput) {
        if self.is_running() {
            self.last_delta = self
                .last_timestamp
                .map_or(0.0, |last| timestamp - last);
            self.last_timestamp = Some(timestamp);
        }
        tick(self, input);
    }
}
