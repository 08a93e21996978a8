use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::{ArcRange, GaugeError, GaugeFace};
use crate::style::{ColorScheme, GaugeStyle, StylePreset};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "tacho.toml";

/// Prefix for environment overrides, e.g. `TACHO_MAX_SPEED=240`.
pub const ENV_PREFIX: &str = "TACHO";

const MIN_FRAMERATE: f64 = 1.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Gauge(#[from] GaugeError),
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Builder, Deserialize)]
#[serde(default)]
pub struct SpeedometerConfig {
    #[builder(default = "Tacho".to_string())]
    pub title: String,

    // Scale
    #[builder(default = 200.0)]
    pub max_speed: f64,
    #[builder(default = 10.0)]
    pub minor_step: f64,
    #[builder(default = 20.0)]
    pub major_step: f64,
    #[builder(default = -210.0)]
    pub arc_start_degrees: f64,
    #[builder(default = 30.0)]
    pub arc_end_degrees: f64,
    #[builder(default = "km/h".to_string())]
    pub unit_label: String,

    // Slider
    #[builder(default = 50.0)]
    pub initial_speed: f64,
    #[builder(default = 1.0)]
    pub speed_step: f64,

    // Look
    #[builder(default)]
    pub style: StylePreset,
    #[builder(default)]
    pub color_scheme: ColorScheme,
    pub font_path: Option<PathBuf>,

    // Window
    #[builder(default = 420)]
    pub window_width: u32,
    #[builder(default = 760)]
    pub window_height: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = 0.25)]
    pub needle_lerp_factor: f64,

    // Timers
    #[builder(default = 1000)]
    pub tick_interval_ms: u64,
    #[builder(default = -300)]
    pub countdown_reset_seconds: i64,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SpeedometerConfig {
    pub fn arc(&self) -> ArcRange {
        ArcRange::new(self.arc_start_degrees, self.arc_end_degrees)
    }

    pub fn gauge_face(&self) -> Result<GaugeFace, GaugeError> {
        GaugeFace::new(self.max_speed, self.minor_step, self.major_step, self.arc())
    }

    pub fn gauge_style(&self) -> GaugeStyle {
        self.style.resolve(self.color_scheme)
    }

    /// Checks everything that would otherwise only fail once the window is up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gauge_face()?;
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid("window_width", "window must not be empty"));
        }
        if !(self.max_framerate >= MIN_FRAMERATE) {
            return Err(invalid("max_framerate", "must be at least 1 frame per second"));
        }
        if !(self.needle_lerp_factor > 0.0 && self.needle_lerp_factor <= 1.0) {
            return Err(invalid("needle_lerp_factor", "must be in (0, 1]"));
        }
        if !(self.speed_step > 0.0) {
            return Err(invalid("speed_step", "must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("tick_interval_ms", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Loads `path` (or an optional `tacho.toml` next to the working directory),
/// applies `TACHO_*` environment overrides and validates the result.
pub fn load_config(path: Option<&Path>) -> Result<SpeedometerConfig, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    let config: SpeedometerConfig = settings.try_deserialize()?;
    config.validate()?;
    log::debug!("loaded config: {config:?}");
    Ok(config)
}

/// Parses and validates a TOML document.
pub fn from_toml_str(contents: &str) -> Result<SpeedometerConfig, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(contents, config::FileFormat::Toml))
        .build()?;
    let config: SpeedometerConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
