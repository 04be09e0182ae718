//! Data-driven physics balance
//!
//! Every field defaults to the value in `consts`, so a partial JSON document
//! only overrides what it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning documents
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("Invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning value {field} = {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Physics knobs for one engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Camera scroll per frame
    pub game_speed: f64,
    /// Player gravity per frame
    pub gravity: f64,
    /// Jump impulse (negative = up)
    pub jump_force: f64,
    /// Orb impulse as a fraction of `jump_force`
    pub orb_boost: f64,
    /// Airborne spin per frame (degrees)
    pub rotation_speed_deg: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_speed: GAME_SPEED,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            orb_boost: ORB_BOOST,
            rotation_speed_deg: ROTATION_SPEED_DEG,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// The camera must scroll forward and every knob must be finite
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.game_speed.is_finite() && self.game_speed > 0.0) {
            return Err(TuningError::OutOfRange {
                field: "game_speed",
                value: self.game_speed,
            });
        }
        for (field, value) in [
            ("gravity", self.gravity),
            ("jump_force", self.jump_force),
            ("orb_boost", self.orb_boost),
            ("rotation_speed_deg", self.rotation_speed_deg),
        ] {
            if !value.is_finite() {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Same physics with a different scroll speed
    pub fn with_game_speed(mut self, game_speed: f64) -> Self {
        self.game_speed = game_speed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.game_speed, 5.0);
        assert_eq!(t.gravity, 0.8);
        assert_eq!(t.jump_force, -15.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let t = Tuning::from_json(r#"{"game_speed": 7.5}"#).unwrap();
        assert_eq!(t.game_speed, 7.5);
        assert_eq!(t.gravity, GRAVITY);
        assert_eq!(t.orb_boost, ORB_BOOST);
    }

    #[test]
    fn test_bad_json_is_rejected() {
        assert!(matches!(
            Tuning::from_json(r#"{"gravity": "heavy"}"#),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_non_forward_speed_is_rejected() {
        for json in [r#"{"game_speed": -5}"#, r#"{"game_speed": 0}"#] {
            assert!(matches!(
                Tuning::from_json(json),
                Err(TuningError::OutOfRange {
                    field: "game_speed",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_non_finite_knobs_are_rejected() {
        let t = Tuning {
            gravity: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            t.validate(),
            Err(TuningError::OutOfRange {
                field: "gravity",
                ..
            })
        ));

        let t = Tuning {
            jump_force: f64::NAN,
            ..Default::default()
        };
        assert!(t.validate().is_err());
        assert!(Tuning::default().validate().is_ok());
    }
}
