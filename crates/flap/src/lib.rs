#![forbid(unsafe_code)]

//! Flap public facade crate.
//!
//! Re-exports the panel engine and its input primitives, and offers a
//! prelude for hosting a panel.
//!
//! ```ignore
//! use flap::prelude::*;
//!
//! let mut panel = FlapController::new(HeadlessHost::new(390.0, 844.0), PanelConfig::default())?;
//! panel.present(true, false);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use flap_core::animation::{Animation, Spring};
pub use flap_core::geometry::Rect;
pub use flap_core::gesture::{DragPhase, DragSample, PanConfig, PanRecognizer};

// --- Panel re-exports ------------------------------------------------------

pub use flap_panel::{
    Completion, ConfigError, FlapController, FlapDelegate, FlapError, FlapEvent, HeadlessHost,
    HookDelegate, HostSurface, PanOutcome, PanelConfig, PanelFrame, PanelState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error for applications hosting flap panels.
#[derive(Debug)]
pub enum Error {
    /// The controller could not be built.
    Panel(FlapError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panel(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Panel(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<FlapError> for Error {
    fn from(err: FlapError) -> Self {
        Self::Panel(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for flap APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a config file by extension (`.json` as JSON, anything else as TOML).
#[cfg(feature = "config")]
pub fn load_config(path: impl AsRef<std::path::Path>) -> Result<PanelConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => PanelConfig::from_json_file(path)?,
        _ => PanelConfig::from_toml_file(path)?,
    };
    Ok(config)
}

/// Build a controller and present it compressed without animation.
pub fn present_compressed<H: HostSurface>(host: H, config: PanelConfig) -> Result<FlapController<H>> {
    let mut panel = FlapController::new(host, config)?;
    panel.present(false, false);
    Ok(panel)
}

pub mod prelude {
    pub use crate::{
        Completion, DragPhase, DragSample, Error, FlapController, FlapDelegate, FlapEvent,
        HeadlessHost, HookDelegate, HostSurface, PanConfig, PanOutcome, PanRecognizer,
        PanelConfig, PanelFrame, PanelState, Result,
    };
}

pub use flap_core as core;
pub use flap_panel as panel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_wraps_construction_failures() {
        let err = present_compressed(HeadlessHost::new(320.0, 0.0), PanelConfig::default())
            .expect_err("zero height host");
        assert!(matches!(err, Error::Panel(FlapError::InvalidHost { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn present_compressed_is_attached() {
        let panel = present_compressed(HeadlessHost::new(320.0, 800.0), PanelConfig::default())
            .expect("valid");
        assert!(panel.is_attached());
        assert_eq!(panel.state(), PanelState::Compressed);
    }

    #[cfg(feature = "config")]
    #[test]
    fn load_config_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("temp dir");

        let toml_path = dir.path().join("panel.toml");
        std::fs::write(&toml_path, "minimum_offset = 80.0\n").expect("write toml");
        assert_eq!(load_config(&toml_path).expect("toml").minimum_offset, 80.0);

        let json_path = dir.path().join("panel.json");
        std::fs::write(&json_path, r#"{"minimum_offset": 90.0}"#).expect("write json");
        assert_eq!(load_config(&json_path).expect("json").minimum_offset, 90.0);

        let missing = load_config(dir.path().join("missing.toml")).expect_err("missing file");
        assert!(matches!(missing, Error::Config(ConfigError::Io(_))));
    }
}
