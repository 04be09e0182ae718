//! Run state and the engine object hosts drive
//!
//! One `GameState` per level session. It owns the player, camera, level,
//! particles and the outgoing event queue; nothing here is global.

use serde::{Deserialize, Serialize};

use super::collision::obstacle_screen_pos;
use super::level::{Level, LevelDescriptor, ObstacleKind};
use super::particles::{ParticleBurst, ParticlePool};
use super::player::{Camera, PlayerBody};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress (before the first start, or after stop)
    #[default]
    Idle,
    /// Frames advance physics and collisions
    Running,
    /// Frozen mid-run, rendering may continue
    Paused,
    /// Attempt ended on an obstacle
    Dead,
    /// Attempt reached the end of the level
    Won,
}

impl RunPhase {
    /// Attempt is over (Dead or Won)
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Dead | RunPhase::Won)
    }
}

/// Sound cues for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    Jump,
    Orb,
    Death,
    Win,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Orb => "orb",
            SoundEffect::Death => "death",
            SoundEffect::Win => "win",
        }
    }
}

/// Fire-and-forget notifications to the host (UI, audio)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Sound { effect: SoundEffect },
    /// `progress` is the whole percentage reached (0-100)
    GameOver { progress: u32, attempts: u32 },
    Victory { attempts: u32 },
}

/// Stats that persist across attempts of one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub attempts: u32,
    /// 0-100
    pub progress_pct: f64,
}

/// Complete engine state for one level session
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub stats: RunStats,
    pub player: PlayerBody,
    pub camera: Camera,
    pub level: Level,
    pub particles: ParticlePool,
    /// Viewport size (screen units)
    pub width: f64,
    pub height: f64,
    /// Screen y of the ground line
    pub ground_y: f64,
    /// Frames simulated in the current attempt
    pub frame: u64,
    /// Host timestamp of the previous step (ms)
    pub last_timestamp: Option<f64>,
    /// Host-side frame delta (ms). Diagnostic only, physics is per frame.
    pub last_delta: f64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an engine with an empty level and the default viewport
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings) -> Self {
        let ground_y = DEFAULT_VIEWPORT_HEIGHT - GROUND_OFFSET;
        let mut particles = ParticlePool::new(seed);
        particles.set_enabled(settings.particles);

        Self {
            tuning,
            phase: RunPhase::Idle,
            stats: RunStats::default(),
            player: PlayerBody::new(ground_y),
            camera: Camera::default(),
            level: Level::from_descriptor(&LevelDescriptor::default()),
            particles,
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
            ground_y,
            frame: 0,
            last_timestamp: None,
            last_delta: 0.0,
            events: Vec::new(),
        }
    }

    /// Apply changed preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.particles.set_enabled(settings.particles);
    }

    /// Load a level, starting a fresh session (attempts back to 0).
    ///
    /// The descriptor is copied; edits to it afterwards never reach the run.
    pub fn load_level(&mut self, descriptor: &LevelDescriptor) {
        self.level = Level::from_descriptor(descriptor);
        self.stats.attempts = 0;
        self.reset_player();
        log::info!(
            "Loaded level {:?}: {} obstacles, length {}",
            self.level.name.as_deref().unwrap_or("untitled"),
            self.level.obstacles.len(),
            self.level.length_units
        );
    }

    /// Restore the start-of-attempt state: cube on the ground, camera at 0,
    /// progress 0, every orb available again
    pub fn reset_player(&mut self) {
        self.player.reset(self.ground_y);
        self.camera = Camera::default();
        self.stats.progress_pct = 0.0;
        self.level.reset_run_state();
    }

    /// Begin a new attempt
    pub fn start(&mut self) {
        self.stats.attempts += 1;
        self.reset_player();
        self.particles.clear();
        self.frame = 0;
        self.last_timestamp = None;
        self.last_delta = 0.0;
        self.phase = RunPhase::Running;
        log::info!("Attempt {} started", self.stats.attempts);
    }

    /// Halt the run. Idempotent; finished attempts keep their Dead/Won phase.
    pub fn stop(&mut self) {
        if matches!(self.phase, RunPhase::Running | RunPhase::Paused) {
            self.phase = RunPhase::Idle;
            log::info!("Run stopped at camera x={}", self.camera.x);
        }
    }

    /// Flip between Running and Paused; no-op in any other phase
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            RunPhase::Running => RunPhase::Paused,
            RunPhase::Paused => RunPhase::Running,
            other => other,
        };
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Jump input. Only a grounded cube in a running, unpaused run reacts.
    pub fn jump(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.player.jump(self.tuning.jump_force) {
            self.particles.emit(ParticleBurst::Jump, self.player.feet());
            self.emit_sound(SoundEffect::Jump);
        }
    }

    /// Viewport changed. Moves the ground line, leaves the player alone.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.ground_y = height - GROUND_OFFSET;
    }

    /// Recompute progress from the camera, clamped to 100
    pub(crate) fn update_progress(&mut self) {
        self.stats.progress_pct = progress_pct(self.camera.x, self.level.length_units);
    }

    pub(crate) fn die(&mut self) {
        self.particles.emit(ParticleBurst::Death, self.player.center());
        self.emit_sound(SoundEffect::Death);
        self.phase = RunPhase::Dead;

        let progress = self.stats.progress_pct.floor() as u32;
        log::info!(
            "Attempt {} died at {}% (camera x={})",
            self.stats.attempts,
            progress,
            self.camera.x
        );
        self.events.push(GameEvent::GameOver {
            progress,
            attempts: self.stats.attempts,
        });
    }

    pub(crate) fn win(&mut self) {
        self.emit_sound(SoundEffect::Win);
        self.phase = RunPhase::Won;
        log::info!("Level complete after {} attempts", self.stats.attempts);
        self.events.push(GameEvent::Victory {
            attempts: self.stats.attempts,
        });
    }

    pub(crate) fn emit_sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound { effect });
    }

    /// Hand queued events to the host, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything a renderer needs for the current frame
    pub fn render_view(&self) -> RenderView {
        let obstacles = self
            .level
            .obstacles
            .iter()
            .filter(|o| !(o.kind == ObstacleKind::Orb && o.used))
            .filter_map(|o| {
                let pos = obstacle_screen_pos(o.world_x, o.height, &self.camera, self.ground_y);
                (pos.x > -RENDER_MARGIN && pos.x < self.width + RENDER_MARGIN).then_some(
                    VisibleObstacle {
                        kind: o.kind,
                        x: pos.x,
                        y: pos.y,
                    },
                )
            })
            .collect();

        let particles = self
            .particles
            .iter()
            .map(|p| ParticleView {
                x: p.pos.x,
                y: p.pos.y,
                alpha: p.alpha(),
                color: p.color,
            })
            .collect();

        RenderView {
            phase: self.phase,
            camera_x: self.camera.x,
            ground_y: self.ground_y,
            progress_pct: self.stats.progress_pct,
            attempts: self.stats.attempts,
            player: PlayerView {
                x: self.player.x,
                y: self.player.y,
                size: self.player.width,
                rotation_deg: self.player.rotation_deg,
            },
            obstacles,
            particles,
        }
    }
}

/// Percentage of `length` covered by `camera_x`, in [0, 100]
pub fn progress_pct(camera_x: f64, length: f64) -> f64 {
    if length <= 0.0 {
        return 100.0;
    }
    (camera_x / length * 100.0).clamp(0.0, 100.0)
}

/// Player as drawn
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerView {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation_deg: f64,
}

/// On-screen obstacle, origin at its top-left
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VisibleObstacle {
    pub kind: ObstacleKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParticleView {
    pub x: f64,
    pub y: f64,
    pub alpha: f64,
    pub color: u32,
}

/// Read-only snapshot for the rendering collaborator
#[derive(Debug, Clone, Serialize)]
pub struct RenderView {
    pub phase: RunPhase,
    pub camera_x: f64,
    pub ground_y: f64,
    pub progress_pct: f64,
    pub attempts: u32,
    pub player: PlayerView,
    pub obstacles: Vec<VisibleObstacle>,
    pub particles: Vec<ParticleView>,
}
