#![forbid(unsafe_code)]

//! Panel configuration.
//!
//! [`PanelConfig`] holds every tunable the panel engine reads: geometry
//! offsets, default capability flags, the flick trigger velocity and the
//! transition duration. With the `config` feature it can be loaded from TOML
//! or JSON:
//!
//! ```toml
//! expands_fullscreen = false
//! maximum_offset = 330.0
//! minimum_offset = 150.0
//! trigger_velocity = 900.0
//! animation_duration = 0.25
//! ```
//!
//! ```rust,ignore
//! let config = PanelConfig::from_toml_file("flap.toml")?;
//! ```
//!
//! # Defaults
//!
//! `PanelConfig::default()` reproduces the stock flap behaviour: fullscreen
//! expansion, a 50pt peek, every capability allowed, a 700pt/s flick trigger
//! and a 400ms transition.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Tunables read by the panel engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    /// Expanded offset is the full host height when true, `maximum_offset`
    /// otherwise.
    pub expands_fullscreen: bool,
    /// Offset of the expanded panel when not fullscreen.
    pub maximum_offset: f64,
    /// Offset of the compressed (peeking) panel.
    pub minimum_offset: f64,
    /// Fallback for the dismiss capability when the delegate has no opinion.
    pub dismissable: bool,
    /// Fallback for the expand capability when the delegate has no opinion.
    pub expandable: bool,
    /// Fallback for the compress capability when the delegate has no opinion.
    pub compressable: bool,
    /// When **true**, live drag updates do not move the panel. The drag is
    /// still tracked and classified on release.
    ///
    /// The name reads inverted relative to its effect; the behaviour is kept
    /// as observed in the stock controller.
    pub pan_enabled: bool,
    /// Velocity magnitude (points/s) at or above which a release is treated
    /// as a flick.
    pub trigger_velocity: f64,
    /// Duration of an animated transition.
    #[cfg_attr(feature = "config", serde(with = "duration_secs"))]
    pub animation_duration: Duration,
    /// When false the panel captures every touch on its surface; when true
    /// touches outside the visible content pass through to the host.
    pub forwards_touches: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            expands_fullscreen: true,
            maximum_offset: 0.0,
            minimum_offset: 50.0,
            dismissable: true,
            expandable: true,
            compressable: true,
            pan_enabled: false,
            trigger_velocity: 700.0,
            animation_duration: Duration::from_millis(400),
            forwards_touches: false,
        }
    }
}

impl PanelConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fullscreen expansion.
    #[must_use]
    pub fn expands_fullscreen(mut self, fullscreen: bool) -> Self {
        self.expands_fullscreen = fullscreen;
        self
    }

    /// Set the expanded offset used when not fullscreen.
    #[must_use]
    pub fn maximum_offset(mut self, offset: f64) -> Self {
        self.maximum_offset = offset;
        self
    }

    /// Set the compressed offset.
    #[must_use]
    pub fn minimum_offset(mut self, offset: f64) -> Self {
        self.minimum_offset = offset;
        self
    }

    /// Set the three default capability flags at once.
    #[must_use]
    pub fn capabilities(mut self, dismissable: bool, expandable: bool, compressable: bool) -> Self {
        self.dismissable = dismissable;
        self.expandable = expandable;
        self.compressable = compressable;
        self
    }

    /// Set the live-drag suppression flag (see [`PanelConfig::pan_enabled`]).
    #[must_use]
    pub fn pan_enabled(mut self, enabled: bool) -> Self {
        self.pan_enabled = enabled;
        self
    }

    /// Set the flick trigger velocity.
    #[must_use]
    pub fn trigger_velocity(mut self, velocity: f64) -> Self {
        self.trigger_velocity = velocity;
        self
    }

    /// Set the transition duration.
    #[must_use]
    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.animation_duration = duration;
        self
    }

    /// Set touch forwarding.
    #[must_use]
    pub fn forwards_touches(mut self, forwards: bool) -> Self {
        self.forwards_touches = forwards;
        self
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.maximum_offset.is_finite() || self.maximum_offset < 0.0 {
            errors.push(format!(
                "maximum_offset must be finite and >= 0, got {}",
                self.maximum_offset
            ));
        }
        if !self.minimum_offset.is_finite() || self.minimum_offset < 0.0 {
            errors.push(format!(
                "minimum_offset must be finite and >= 0, got {}",
                self.minimum_offset
            ));
        }
        if !self.trigger_velocity.is_finite() || self.trigger_velocity <= 0.0 {
            errors.push(format!(
                "trigger_velocity must be finite and > 0, got {}",
                self.trigger_velocity
            ));
        }

        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a panel configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for Duration
// ---------------------------------------------------------------------------

/// `Duration` as fractional seconds.
#[cfg(feature = "config")]
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            D::Error::custom(format!(
                "animation_duration must be a finite, non-negative number of seconds, got {secs}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_controller() {
        let config = PanelConfig::default();
        assert!(config.expands_fullscreen);
        assert_eq!(config.maximum_offset, 0.0);
        assert_eq!(config.minimum_offset, 50.0);
        assert!(config.dismissable && config.expandable && config.compressable);
        assert!(!config.pan_enabled);
        assert_eq!(config.trigger_velocity, 700.0);
        assert_eq!(config.animation_duration, Duration::from_millis(400));
        assert!(!config.forwards_touches);
    }

    #[test]
    fn default_validates_clean() {
        assert!(PanelConfig::default().validate().is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let config = PanelConfig::new()
            .expands_fullscreen(false)
            .maximum_offset(330.0)
            .minimum_offset(150.0)
            .capabilities(false, true, false)
            .pan_enabled(true)
            .trigger_velocity(1200.0)
            .animation_duration(Duration::from_millis(250))
            .forwards_touches(true);
        assert!(!config.expands_fullscreen);
        assert_eq!(config.maximum_offset, 330.0);
        assert_eq!(config.minimum_offset, 150.0);
        assert!(!config.dismissable);
        assert!(config.expandable);
        assert!(!config.compressable);
        assert!(config.pan_enabled);
        assert_eq!(config.trigger_velocity, 1200.0);
        assert_eq!(config.animation_duration, Duration::from_millis(250));
        assert!(config.forwards_touches);
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let config = PanelConfig::new()
            .maximum_offset(f64::NAN)
            .minimum_offset(-1.0)
            .trigger_velocity(0.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn validation_error_display_joins_messages() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_partial_override_preserves_defaults() {
        let config = PanelConfig::from_toml_str(
            "expands_fullscreen = false\nmaximum_offset = 330.0\nanimation_duration = 0.25\n",
        )
        .expect("valid toml");
        assert!(!config.expands_fullscreen);
        assert_eq!(config.maximum_offset, 330.0);
        assert_eq!(config.animation_duration, Duration::from_millis(250));
        assert_eq!(config.minimum_offset, 50.0);
        assert_eq!(config.trigger_velocity, 700.0);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_rejects_invalid_values() {
        let err = PanelConfig::from_json_str(r#"{"trigger_velocity": -5.0}"#)
            .expect_err("negative trigger velocity");
        assert!(matches!(err, ConfigError::Validation(_)), "{err}");
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_rejects_negative_duration() {
        let err = PanelConfig::from_json_str(r#"{"animation_duration": -1.0}"#)
            .expect_err("negative duration");
        assert!(matches!(err, ConfigError::Json(_)), "{err}");
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_file_roundtrip() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "minimum_offset = 120.0\ndismissable = false").expect("write");
        let config = PanelConfig::from_toml_file(file.path()).expect("load");
        assert_eq!(config.minimum_offset, 120.0);
        assert!(!config.dismissable);
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = PanelConfig::from_json_file("/definitely/not/here/flap.json")
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
