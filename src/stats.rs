//! Game statistics and the scoreboard built from them.

use std::io;

use crate::display::Surface;
use crate::entities::{Rect, Sprite};
use crate::settings::Settings;

#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u32,
    pub level: u32,
    /// Survives `reset_stats`; lives as long as the process.
    pub high_score: u32,
    pub game_active: bool,
    ship_limit: u32,
}

impl GameStats {
    /// Fresh stats; the game starts inactive until the play button is clicked.
    pub fn new(settings: &Settings) -> Self {
        let mut stats = Self {
            ships_left: 0,
            score: 0,
            level: 1,
            high_score: 0,
            game_active: false,
            ship_limit: settings.tuning.ship_limit,
        };
        stats.reset_stats();
        stats
    }

    pub fn reset_stats(&mut self) {
        self.ships_left = self.ship_limit;
        self.score = 0;
        self.level = 1;
    }
}

// ── Formatting ───────────────────────────────────────────────────────────────

/// Round to the nearest ten, ties to even (`25 -> 20`, `35 -> 40`).
/// Saturates at `u32::MAX`.
pub fn round_to_ten(value: u32) -> u32 {
    let (tens, rem) = (value / 10, value % 10);
    let up = match rem {
        0..=4 => false,
        5 => tens % 2 == 1,
        _ => true,
    };
    if up {
        tens.saturating_add(1).saturating_mul(10)
    } else {
        tens * 10
    }
}

/// `1234567 -> "1,234,567"`
pub fn with_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Scoreboard ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Pre-laid-out score text and remaining-ship icons. Each `prep_*` rebuilds
/// one part from scratch whenever the stat behind it changes.
#[derive(Clone, Debug)]
pub struct Scoreboard {
    pub score: Label,
    pub high_score: Label,
    pub level: Label,
    pub ships: Vec<Rect>,
    screen_width: i32,
    ship_size: (i32, i32),
}

impl Scoreboard {
    pub fn new(settings: &Settings, stats: &GameStats, ship_sprite: &Sprite) -> Self {
        let mut sb = Self {
            score: Label::default(),
            high_score: Label::default(),
            level: Label::default(),
            ships: Vec::new(),
            screen_width: settings.screen_width,
            ship_size: (ship_sprite.width(), ship_sprite.height()),
        };
        sb.prep_score(stats);
        sb.prep_high_score(stats);
        sb.prep_level(stats);
        sb.prep_ships(stats);
        sb
    }

    /// Score, right-aligned on the top row.
    pub fn prep_score(&mut self, stats: &GameStats) {
        let text = with_thousands(round_to_ten(stats.score));
        self.score = self.right_aligned(text, 0);
    }

    /// High score, centred on the top row.
    pub fn prep_high_score(&mut self, stats: &GameStats) {
        let text = with_thousands(round_to_ten(stats.high_score));
        let x = (self.screen_width - text.chars().count() as i32) / 2;
        self.high_score = Label { text, x, y: 0 };
    }

    /// Level, right-aligned just below the score.
    pub fn prep_level(&mut self, stats: &GameStats) {
        let y = self.score.y + 1;
        self.level = self.right_aligned(stats.level.to_string(), y);
    }

    /// One ship icon per remaining ship, from the top-left corner.
    pub fn prep_ships(&mut self, stats: &GameStats) {
        let (w, h) = self.ship_size;
        self.ships = (0..stats.ships_left as i32)
            .map(|i| Rect::new(1 + i * (w + 1), 0, w, h))
            .collect();
    }

    /// Promote the current score to high score if it beats it.
    pub fn check_high_score(&mut self, stats: &mut GameStats) -> bool {
        if stats.score > stats.high_score {
            stats.high_score = stats.score;
            self.prep_high_score(stats);
            tracing::info!(high_score = stats.high_score, "new high score");
            true
        } else {
            false
        }
    }

    pub fn show_score<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        settings: &Settings,
        ship_sprite: &Sprite,
    ) -> io::Result<()> {
        let color = settings.tuning.text_color;
        for label in [&self.score, &self.high_score, &self.level] {
            surface.draw_text(&label.text, label.x, label.y, color, None)?;
        }
        for rect in &self.ships {
            surface.blit(ship_sprite, rect.x, rect.y)?;
        }
        Ok(())
    }

    fn right_aligned(&self, text: String, y: i32) -> Label {
        let x = self.screen_width - 1 - text.chars().count() as i32;
        Label { text, x, y }
    }
}
