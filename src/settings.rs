//! Tunable parameters.
//!
//! `Tuning` is what a settings file can override.  `Settings` combines it
//! with the screen size reported by the display and the dynamic values that
//! reset at the start of every game and scale up after every cleared fleet.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "ALIEN_INVASION_CONFIG";

/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "alien_invasion.ron";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ── Static parameters & base values ─────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub ship_speed: f32,
    pub ship_limit: u32,
    pub ship_sprite: PathBuf,
    pub ship_color: Color,

    pub bullet_speed: f32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Color,
    pub bullets_allowed: usize,

    pub alien_speed: f32,
    pub alien_sprite: PathBuf,
    pub alien_color: Color,
    pub fleet_drop_speed: f32,
    pub alien_points: u32,

    /// How quickly the game speeds up per cleared fleet.
    pub speedup_scale: f32,
    /// How quickly alien point values grow per cleared fleet.
    pub score_scale: f32,

    pub bg_color: Color,
    pub text_color: Color,
    pub button_color: Color,
    pub button_text_color: Color,

    pub frame_millis: u64,
    pub hit_pause_millis: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_speed: 1.0,
            ship_limit: 3,
            ship_sprite: PathBuf::from("images/ship.txt"),
            ship_color: Color::rgb(40, 40, 40),

            bullet_speed: 1.0,
            bullet_width: 1,
            bullet_height: 1,
            bullet_color: Color::rgb(60, 60, 60),
            bullets_allowed: 3,

            alien_speed: 0.25,
            alien_sprite: PathBuf::from("images/alien.txt"),
            alien_color: Color::rgb(30, 120, 30),
            fleet_drop_speed: 1.0,
            alien_points: 50,

            speedup_scale: 1.1,
            score_scale: 1.5,

            bg_color: Color::rgb(230, 230, 230),
            text_color: Color::rgb(30, 30, 30),
            button_color: Color::rgb(0, 255, 0),
            button_text_color: Color::rgb(255, 255, 255),

            frame_millis: 33,
            hit_pause_millis: 500,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) RON document; missing fields keep their defaults.
    pub fn from_ron(source: &str, path: &Path) -> Result<Self> {
        let tuning: Tuning = ron::from_str(source).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&source, path)
    }

    /// Resolve the settings source: `$ALIEN_INVASION_CONFIG`, then
    /// `./alien_invasion.ron`, then the built-in defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            tracing::info!(path = %path.display(), "loading settings from {CONFIG_ENV}");
            return Self::from_file(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::info!(path = %local.display(), "loading settings");
            return Self::from_file(local);
        }
        tracing::info!("no settings file, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: &str) -> GameError {
            GameError::InvalidSetting {
                field,
                reason: reason.to_string(),
            }
        }

        if !(self.speedup_scale > 1.0) {
            return Err(invalid("speedup_scale", "must be greater than 1"));
        }
        if !(self.score_scale > 1.0) {
            return Err(invalid("score_scale", "must be greater than 1"));
        }
        if self.bullets_allowed == 0 {
            return Err(invalid("bullets_allowed", "must be at least 1"));
        }
        if self.ship_limit == 0 {
            return Err(invalid("ship_limit", "must be at least 1"));
        }
        let speeds = [
            ("ship_speed", self.ship_speed),
            ("bullet_speed", self.bullet_speed),
            ("alien_speed", self.alien_speed),
            ("fleet_drop_speed", self.fleet_drop_speed),
        ];
        for (field, speed) in speeds {
            if !(speed > 0.0) {
                return Err(invalid(field, "must be positive"));
            }
        }
        if self.bullet_width <= 0 || self.bullet_height <= 0 {
            return Err(invalid("bullet_width", "bullet size must be positive"));
        }
        if self.frame_millis == 0 {
            return Err(invalid("frame_millis", "must be positive"));
        }
        Ok(())
    }
}

// ── Resolved settings ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Settings {
    pub screen_width: i32,
    pub screen_height: i32,
    pub tuning: Tuning,

    // Dynamic: reset per game, scaled per level.
    pub ship_speed: f32,
    pub bullet_speed: f32,
    pub alien_speed: f32,
    pub fleet_drop_speed: f32,
    pub alien_points: u32,
    /// 1.0 moves the fleet right, -1.0 left.
    pub fleet_direction: f32,
}

impl Settings {
    pub fn new(tuning: Tuning, screen_width: i32, screen_height: i32) -> Self {
        let mut settings = Self {
            screen_width,
            screen_height,
            ship_speed: tuning.ship_speed,
            bullet_speed: tuning.bullet_speed,
            alien_speed: tuning.alien_speed,
            fleet_drop_speed: tuning.fleet_drop_speed,
            alien_points: tuning.alien_points,
            fleet_direction: 1.0,
            tuning,
        };
        settings.initialize_dynamic_settings();
        settings
    }

    pub fn initialize_dynamic_settings(&mut self) {
        self.ship_speed = self.tuning.ship_speed;
        self.bullet_speed = self.tuning.bullet_speed;
        self.alien_speed = self.tuning.alien_speed;
        self.fleet_drop_speed = self.tuning.fleet_drop_speed;
        self.alien_points = self.tuning.alien_points;
        self.fleet_direction = 1.0;
    }

    /// Speed everything up and raise the alien point value. Unbounded.
    pub fn increase_speed(&mut self) {
        let scale = self.tuning.speedup_scale;
        self.ship_speed *= scale;
        self.bullet_speed *= scale;
        self.alien_speed *= scale;
        self.fleet_drop_speed *= scale;

        self.alien_points = (self.alien_points as f32 * self.tuning.score_scale).round() as u32;
        tracing::debug!(
            alien_speed = self.alien_speed,
            alien_points = self.alien_points,
            "difficulty increased"
        );
    }

    pub fn bullets_allowed(&self) -> usize {
        self.tuning.bullets_allowed
    }
}
