//! Errors surfaced by the speedometer window.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::geometry::GaugeError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gauge(#[from] GaugeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Could not open window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("Could not read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a usable font: {0}")]
    FontParse(PathBuf),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
