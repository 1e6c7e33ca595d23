//! The game session: owns every piece of state and runs the frame loop.
//!
//! Each frame drains input, advances the simulation while a game is active,
//! and redraws the whole screen.  A lost ship (with ships to spare) freezes
//! the loop for a moment before play resumes; input is not read meanwhile.

use std::io;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crate::button::Button;
use crate::compute::{self, HitOutcome};
use crate::display::{InputEvent, InputSource, Key, Surface};
use crate::entities::{Bullet, Entity, Ship, Sprite};
use crate::error::Result;
use crate::fleet::{self, Fleet};
use crate::settings::{Settings, Tuning};
use crate::stats::{GameStats, Scoreboard};

/// Whether the frame loop should keep going after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// What one simulation step asks of the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// A ship was lost and the board reset; hold still for `pause`.
    Respawned { pause: Duration },
    GameOver,
}

pub struct AlienInvasion {
    pub settings: Settings,
    pub stats: GameStats,
    pub scoreboard: Scoreboard,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub fleet: Fleet,
    pub play_button: Button,
}

impl AlienInvasion {
    /// Load the sprites named in `tuning` and size the game to the screen.
    /// Fails if the screen cannot hold a single row of aliens.
    pub fn load(tuning: Tuning, screen_width: u16, screen_height: u16) -> Result<Self> {
        let ship_sprite = Sprite::load(&tuning.ship_sprite, tuning.ship_color)?;
        let alien_sprite = Sprite::load(&tuning.alien_sprite, tuning.alien_color)?;
        let settings = Settings::new(tuning, screen_width as i32, screen_height as i32);
        let grid = fleet::check_fits(&settings, &alien_sprite, ship_sprite.height())?;
        tracing::debug!(columns = grid.columns, rows = grid.rows, "screen fits the fleet");
        Ok(Self::new(settings, ship_sprite, alien_sprite))
    }

    pub fn new(settings: Settings, ship_sprite: Sprite, alien_sprite: Sprite) -> Self {
        let stats = GameStats::new(&settings);
        let scoreboard = Scoreboard::new(&settings, &stats, &ship_sprite);
        let ship = Ship::new(ship_sprite, &settings);
        let play_button = Button::new(&settings, "Play");
        let mut fleet = Fleet::new(Rc::new(alien_sprite));
        fleet.create_fleet(&settings, ship.rect().height);

        Self {
            settings,
            stats,
            scoreboard,
            ship,
            bullets: Vec::new(),
            fleet,
            play_button,
        }
    }

    pub fn cursor_visible(&self) -> bool {
        !self.stats.game_active
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: InputEvent) -> Control {
        match event {
            InputEvent::Quit => return Control::Quit,
            InputEvent::KeyDown(key) => return self.check_keydown_event(key),
            InputEvent::KeyUp(key) => self.check_keyup_event(key),
            InputEvent::PointerDown { x, y } => {
                self.check_play_button(x, y);
            }
        }
        Control::Continue
    }

    fn check_keydown_event(&mut self, key: Key) -> Control {
        match key {
            Key::Right => self.ship.moving_right = true,
            Key::Left => self.ship.moving_left = true,
            Key::Quit => return Control::Quit,
            Key::Fire => {
                self.fire_bullet();
            }
            Key::Other => {}
        }
        Control::Continue
    }

    fn check_keyup_event(&mut self, key: Key) {
        match key {
            Key::Right => self.ship.moving_right = false,
            Key::Left => self.ship.moving_left = false,
            _ => {}
        }
    }

    /// Start a new game if the click landed on the play button while idle.
    pub fn check_play_button(&mut self, x: i32, y: i32) -> bool {
        if self.play_button.is_clicked(x, y) && !self.stats.game_active {
            self.start_game();
            true
        } else {
            false
        }
    }

    pub fn start_game(&mut self) {
        self.settings.initialize_dynamic_settings();

        self.stats.reset_stats();
        self.stats.game_active = true;
        self.scoreboard.prep_score(&self.stats);
        self.scoreboard.prep_high_score(&self.stats);
        self.scoreboard.prep_level(&self.stats);
        self.scoreboard.prep_ships(&self.stats);

        self.fleet.clear();
        self.bullets.clear();
        self.fleet
            .create_fleet(&self.settings, self.ship.rect().height);
        self.ship.center_ship();

        tracing::info!(
            ships = self.stats.ships_left,
            high_score = self.stats.high_score,
            "game started"
        );
    }

    /// Fire from the ship unless the bullet cap is reached. Returns whether it fired.
    pub fn fire_bullet(&mut self) -> bool {
        if self.bullets.len() < self.settings.bullets_allowed() {
            self.bullets.push(Bullet::new(&self.ship, &self.settings));
            true
        } else {
            false
        }
    }

    // ── Simulation ───────────────────────────────────────────────────────────

    /// Advance one frame. Does nothing while no game is running.
    pub fn update(&mut self) -> FrameOutcome {
        if !self.stats.game_active {
            return FrameOutcome::Continue;
        }
        self.ship.update(&self.settings);
        compute::update_bullets(self);

        match compute::update_aliens(self) {
            HitOutcome::Clear => FrameOutcome::Continue,
            HitOutcome::Respawned => FrameOutcome::Respawned {
                pause: Duration::from_millis(self.settings.tuning.hit_pause_millis),
            },
            HitOutcome::GameOver => FrameOutcome::GameOver,
        }
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    pub fn update_screen<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.fill(self.settings.tuning.bg_color)?;
        surface.draw(self.ship.appearance(), self.ship.rect())?;

        for bullet in &self.bullets {
            surface.draw(bullet.appearance(), bullet.rect())?;
        }
        for alien in self.fleet.iter() {
            surface.draw(alien.appearance(), alien.rect())?;
        }

        self.scoreboard
            .show_score(surface, &self.settings, self.ship.sprite())?;

        if !self.stats.game_active {
            self.play_button.draw_button(surface)?;
        }
        surface.present()
    }

    // ── Frame loop ───────────────────────────────────────────────────────────

    /// Run until the player quits.
    pub fn run<S, I>(&mut self, surface: &mut S, input: &mut I) -> io::Result<()>
    where
        S: Surface + ?Sized,
        I: InputSource + ?Sized,
    {
        let frame = Duration::from_millis(self.settings.tuning.frame_millis);
        let mut cursor_visible = self.cursor_visible();
        surface.set_cursor_visible(cursor_visible)?;

        loop {
            let frame_start = Instant::now();

            for event in input.poll()? {
                if self.handle_event(event) == Control::Quit {
                    tracing::info!(score = self.stats.score, "quit");
                    return Ok(());
                }
            }

            if let FrameOutcome::Respawned { pause } = self.update() {
                thread::sleep(pause);
            }

            if self.cursor_visible() != cursor_visible {
                cursor_visible = self.cursor_visible();
                surface.set_cursor_visible(cursor_visible)?;
            }

            self.update_screen(surface)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }
        }
    }
}
