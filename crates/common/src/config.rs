use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from loading a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for one walkthrough session.
///
/// Defaults reproduce the chapel walkthrough as shipped. Any field missing
/// from a config file falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Distance moved per tick along each active axis.
    pub move_speed: f32,
    /// Radians of yaw/pitch per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Margin added to every collider once all loads complete.
    pub collision_margin: f32,
    /// Factor applied to the vertical axis of the collision probe.
    pub probe_vertical_scale: f32,
    /// Amplitude of the decorative bobbing animation.
    pub bob_amplitude: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub spawn_position: Vec3,
    pub spawn_yaw: f32,
    /// Seconds a load may stay pending before it is reported as stalled.
    pub stall_timeout_secs: f64,
    /// Directory holding the JSON model files.
    pub model_root: PathBuf,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.02,
            look_sensitivity: 0.01,
            collision_margin: 0.1,
            probe_vertical_scale: 0.5,
            bob_amplitude: 0.1,
            fov_degrees: 45.0,
            near: 0.1,
            far: 10_000.0,
            spawn_position: Vec3::new(0.0, 0.7, -3.0),
            spawn_yaw: std::f32::consts::PI,
            stall_timeout_secs: 30.0,
            model_root: PathBuf::from("./Models"),
        }
    }
}

impl WalkConfig {
    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Stall timeout as a duration. A value too large to represent never
    /// stalls.
    pub fn stall_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.stall_timeout_secs).unwrap_or(Duration::MAX)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_speed.is_finite() && self.move_speed >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "move_speed",
                reason: format!("{} is not a finite non-negative number", self.move_speed),
            });
        }
        if !(self.look_sensitivity.is_finite() && self.look_sensitivity >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "look_sensitivity",
                reason: format!("{} is not a finite non-negative number", self.look_sensitivity),
            });
        }
        if !(self.probe_vertical_scale.is_finite() && self.probe_vertical_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "probe_vertical_scale",
                reason: format!("{} must be positive", self.probe_vertical_scale),
            });
        }
        if !(self.collision_margin.is_finite() && self.collision_margin >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "collision_margin",
                reason: format!("{} must be non-negative", self.collision_margin),
            });
        }
        if !(self.stall_timeout_secs.is_finite() && self.stall_timeout_secs > 0.0) {
            return Err(ConfigError::Invalid {
                field: "stall_timeout_secs",
                reason: format!("{} must be positive", self.stall_timeout_secs),
            });
        }
        if let Err(e) = Duration::try_from_secs_f64(self.stall_timeout_secs) {
            return Err(ConfigError::Invalid {
                field: "stall_timeout_secs",
                reason: format!("{}: {e}", self.stall_timeout_secs),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_shipped_tuning() {
        let c = WalkConfig::default();
        assert_eq!(c.move_speed, 0.02);
        assert_eq!(c.look_sensitivity, 0.01);
        assert_eq!(c.collision_margin, 0.1);
        assert_eq!(c.probe_vertical_scale, 0.5);
        assert_eq!(c.spawn_position, Vec3::new(0.0, 0.7, -3.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = WalkConfig::from_json(r#"{ "move_speed": 0.05 }"#).unwrap();
        assert_eq!(c.move_speed, 0.05);
        assert_eq!(c.collision_margin, 0.1);
    }

    #[test]
    fn rejects_non_positive_probe_scale() {
        let err = WalkConfig::from_json(r#"{ "probe_vertical_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "probe_vertical_scale",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unbounded_look_sensitivity() {
        // 1e39 overflows f32 and parses as infinity.
        for text in [r#"{ "look_sensitivity": 1e39 }"#, r#"{ "look_sensitivity": -0.01 }"#] {
            let err = WalkConfig::from_json(text).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "look_sensitivity", .. }),
                "{text} gave {err}"
            );
        }
    }

    #[test]
    fn rejects_stall_timeout_beyond_duration_range() {
        let err = WalkConfig::from_json(r#"{ "stall_timeout_secs": 1e20 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "stall_timeout_secs",
                ..
            }
        ));
        assert!(WalkConfig::from_json(r#"{ "stall_timeout_secs": 86400.0 }"#).is_ok());
    }

    #[test]
    fn oversized_stall_timeout_never_stalls() {
        let c = WalkConfig {
            stall_timeout_secs: 1e20,
            ..WalkConfig::default()
        };
        assert_eq!(c.stall_timeout(), Duration::MAX);
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "spawn_position": [1.0, 2.0, 3.0], "stall_timeout_secs": 5.0 }}"#).unwrap();
        let c = WalkConfig::load(tmp.path()).unwrap();
        assert_eq!(c.spawn_position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.stall_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = WalkConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("here.json"));
    }
}
