//! Startup error types. Nothing that happens during play is an error.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A sprite file could not be read
    #[error("failed to load sprite {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sprite file exists but contains nothing drawable
    #[error("sprite {path} is empty")]
    EmptySprite { path: PathBuf },

    /// The settings file could not be read
    #[error("failed to read settings {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid RON
    #[error("failed to parse settings {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Not even one row or column of aliens fits on the screen
    #[error("screen {width}x{height} is too small for the alien fleet")]
    ScreenTooSmall { width: i32, height: i32 },

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
