//! Level model and level file loading
//!
//! A `LevelDescriptor` is the template as authored (editor export, level pack
//! file). `Level` is the per-run model built from it: obstacle shapes are fixed,
//! only the orb `used` flags change during an attempt.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts::LEVEL_END_MARGIN;

/// Errors raised while reading level files
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Level pack contains no levels")]
    NoLevels,

    #[error("Level index {index} out of range (pack has {len})")]
    LevelIndex { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, LevelError>;

/// Obstacle types the core knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Spike,
    Orb,
    Block,
    /// Decorative only, never collides
    Portal,
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Spike => "spike",
            ObstacleKind::Orb => "orb",
            ObstacleKind::Block => "block",
            ObstacleKind::Portal => "portal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "spike" => Some(ObstacleKind::Spike),
            "orb" => Some(ObstacleKind::Orb),
            "block" => Some(ObstacleKind::Block),
            "portal" => Some(ObstacleKind::Portal),
            _ => None,
        }
    }
}

/// Visual theme of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Night,
    Neon,
    Retro,
}

impl Theme {
    /// Unknown names fall back to the default theme
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "night" => Theme::Night,
            "neon" => Theme::Neon,
            "retro" => Theme::Retro,
            _ => Theme::Default,
        }
    }
}

/// One authored object. Every field is lenient: wrong types read as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectEntry {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
}

impl ObjectEntry {
    pub fn new(kind: ObstacleKind, x: f64, height: f64) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            x: Some(x),
            height: Some(height),
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// A level as authored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub objects: Vec<ObjectEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A level file: `{ "levels": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelPack {
    #[serde(default)]
    pub levels: Vec<LevelDescriptor>,
}

impl LevelPack {
    pub fn from_json(json: &str) -> Result<Self> {
        let pack: LevelPack = serde_json::from_str(json)?;
        if pack.levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        Ok(pack)
    }

    /// Read a level pack from disk (native hosts)
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, index: usize) -> Result<&LevelDescriptor> {
        self.levels.get(index).ok_or(LevelError::LevelIndex {
            index,
            len: self.levels.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// A level obstacle in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// World x of the left edge
    pub world_x: f64,
    /// Height of the obstacle's top above the ground
    pub height: f64,
    /// Orb consumed this attempt (orbs only)
    pub used: bool,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, world_x: f64, height: f64) -> Self {
        Self {
            kind,
            world_x,
            height,
            used: false,
        }
    }
}

/// Per-run level model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    pub name: Option<String>,
    pub theme: Theme,
    pub music: Option<String>,
    /// Camera distance at which the level is won
    pub length_units: f64,
    /// Obstacles in authored order
    pub obstacles: Vec<Obstacle>,
}

impl Level {
    /// Build the run model from a descriptor.
    ///
    /// Entries with an unknown type or a missing coordinate are skipped; they never
    /// fail the load. Any entry with a numeric `x` still stretches the level length.
    pub fn from_descriptor(descriptor: &LevelDescriptor) -> Self {
        let mut obstacles = Vec::with_capacity(descriptor.objects.len());
        let mut max_x: f64 = 0.0;

        for (i, entry) in descriptor.objects.iter().enumerate() {
            if let Some(x) = entry.x
                && x > max_x
            {
                max_x = x;
            }

            let kind = entry.kind.as_deref().and_then(ObstacleKind::from_str);
            match (kind, entry.x, entry.height) {
                (Some(kind), Some(x), Some(height)) => {
                    obstacles.push(Obstacle::new(kind, x, height));
                }
                (None, _, _) => {
                    log::debug!("Skipping object {} with unknown type {:?}", i, entry.kind);
                }
                _ => {
                    log::warn!("Skipping object {} with missing x/height", i);
                }
            }
        }

        Self {
            name: descriptor.name.clone(),
            theme: descriptor
                .theme
                .as_deref()
                .map(Theme::from_name)
                .unwrap_or_default(),
            music: descriptor.music.clone(),
            length_units: max_x + LEVEL_END_MARGIN,
            obstacles,
        }
    }

    /// Clear every orb's `used` flag (start of an attempt)
    pub fn reset_run_state(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.used = false;
        }
    }

    pub fn orbs_used(&self) -> usize {
        self.obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Orb && o.used)
            .count()
    }
}

/// Fallback level used when no level file is available.
///
/// Ten spikes from x=400, spaced 200-400 apart, with a 50% chance of an orb
/// hanging 100 units before each following spike.
pub fn generate_default_level(seed: u64) -> LevelDescriptor {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut objects = Vec::new();
    let mut x = 400.0;

    for _ in 0..10 {
        objects.push(ObjectEntry::new(ObstacleKind::Spike, x, 40.0));
        x += 200.0 + rng.random::<f64>() * 200.0;

        if rng.random::<f64>() > 0.5 {
            objects.push(ObjectEntry::new(ObstacleKind::Orb, x - 100.0, 150.0));
        }
    }

    LevelDescriptor {
        id: Some(serde_json::Value::from(1)),
        name: Some("Level 1".to_string()),
        difficulty: Some("Easy".to_string()),
        objects,
        theme: None,
        music: None,
    }
}
