//! Game entities: the ship, its bullets and the aliens.
//!
//! Each entity keeps its position as floats so sub-cell speeds accumulate,
//! and derives an integer `Rect` from them for collisions and drawing.

use std::path::Path;
use std::rc::Rc;

use crate::error::{GameError, Result};
use crate::settings::{Color, Settings};

// ── Geometry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Overlap test. Touching edges do not count, and empty rects never collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Place the rect so its bottom edge is centred on (`x`, `bottom`).
    pub fn set_mid_bottom(&mut self, x: i32, bottom: i32) {
        self.x = x - self.width / 2;
        self.y = bottom - self.height;
    }

    /// Place the rect so its top edge is centred on (`x`, `top`).
    pub fn set_mid_top(&mut self, x: i32, top: i32) {
        self.x = x - self.width / 2;
        self.y = top;
    }
}

// ── Sprites ──────────────────────────────────────────────────────────────────

/// ASCII-art image. Spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<String>,
    width: i32,
    color: Color,
}

impl Sprite {
    /// Build a sprite from its rows. Returns `None` when nothing is drawable.
    pub fn from_rows<S: Into<String>>(rows: Vec<S>, color: Color) -> Option<Self> {
        let mut rows: Vec<String> = rows
            .into_iter()
            .map(|r| {
                let row: String = r.into();
                row.trim_end().to_string()
            })
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        if width == 0 {
            return None;
        }
        Some(Self { rows, width, color })
    }

    pub fn load(path: &Path, color: Color) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        let sprite = Self::from_rows(text.lines().collect::<Vec<&str>>(), color).ok_or_else(|| {
            GameError::EmptySprite {
                path: path.to_path_buf(),
            }
        })?;
        tracing::debug!(
            path = %path.display(),
            width = sprite.width(),
            height = sprite.height(),
            "sprite loaded"
        );
        Ok(sprite)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }
}

// ── Entity capability ───────────────────────────────────────────────────────

/// How an entity wants to be drawn.
#[derive(Clone, Copy, Debug)]
pub enum Appearance<'a> {
    Image(&'a Sprite),
    Fill(Color),
}

/// A movable rectangle that advances once per frame.
pub trait Entity {
    fn rect(&self) -> Rect;
    fn update(&mut self, settings: &Settings);
    fn appearance(&self) -> Appearance<'_>;
}

// ── Ship ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    sprite: Sprite,
    rect: Rect,
    screen: Rect,
    x: f32,
    pub moving_right: bool,
    pub moving_left: bool,
}

impl Ship {
    pub fn new(sprite: Sprite, settings: &Settings) -> Self {
        let mut ship = Self {
            rect: sprite.rect(),
            sprite,
            screen: Rect::new(0, 0, settings.screen_width, settings.screen_height),
            x: 0.0,
            moving_right: false,
            moving_left: false,
        };
        ship.center_ship();
        ship
    }

    /// Put the ship back at the bottom centre of the screen.
    pub fn center_ship(&mut self) {
        self.rect
            .set_mid_bottom(self.screen.center_x(), self.screen.bottom());
        self.x = self.rect.x as f32;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }
}

impl Entity for Ship {
    fn rect(&self) -> Rect {
        self.rect
    }

    // Both flags set: each branch applies, so the ship stays put.
    fn update(&mut self, settings: &Settings) {
        if self.moving_right && self.rect.right() < self.screen.right() {
            self.x += settings.ship_speed;
        }
        if self.moving_left && self.rect.left() > 0 {
            self.x -= settings.ship_speed;
        }
        self.rect.x = self.x as i32;
    }

    fn appearance(&self) -> Appearance<'_> {
        Appearance::Image(&self.sprite)
    }
}

// ── Bullet ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    rect: Rect,
    y: f32,
    color: Color,
}

impl Bullet {
    /// A bullet leaving the top centre of `ship`.
    pub fn new(ship: &Ship, settings: &Settings) -> Self {
        let tuning = &settings.tuning;
        let mut rect = Rect::new(0, 0, tuning.bullet_width, tuning.bullet_height);
        let origin = ship.rect();
        rect.set_mid_top(origin.center_x(), origin.top());
        Self::at(rect, tuning.bullet_color)
    }

    /// A bullet occupying `rect`.
    pub fn at(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            y: rect.y as f32,
            color,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// True once the bullet has left through the top of the screen.
    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() <= 0
    }
}

impl Entity for Bullet {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, settings: &Settings) {
        self.y -= settings.bullet_speed;
        self.rect.y = self.y as i32;
    }

    fn appearance(&self) -> Appearance<'_> {
        Appearance::Fill(self.color)
    }
}

// ── Alien ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    sprite: Rc<Sprite>,
    rect: Rect,
    x: f32,
    y: f32,
}

impl Alien {
    pub fn new(sprite: Rc<Sprite>, x: i32, y: i32) -> Self {
        let rect = Rect::new(x, y, sprite.width(), sprite.height());
        Self {
            sprite,
            rect,
            x: x as f32,
            y: y as f32,
        }
    }

    /// True when the alien touches either side of the screen.
    pub fn check_edges(&self, settings: &Settings) -> bool {
        self.rect.right() >= settings.screen_width || self.rect.left() <= 0
    }

    pub fn drop_by(&mut self, distance: f32) {
        self.y += distance;
        self.rect.y = self.y as i32;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}

impl Entity for Alien {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn update(&mut self, settings: &Settings) {
        self.x += settings.alien_speed * settings.fleet_direction;
        self.rect.x = self.x as i32;
    }

    fn appearance(&self) -> Appearance<'_> {
        Appearance::Image(&self.sprite)
    }
}
