//! Display and input collaborators.
//!
//! The game only talks to these traits.  `terminal` implements them over
//! crossterm; tests implement them in memory.

pub mod input;
pub mod terminal;

use std::io;

use crate::entities::{Appearance, Rect, Sprite};
use crate::settings::Color;

// ── Output ───────────────────────────────────────────────────────────────────

/// A drawable screen measured in cells, presented once per frame.
pub trait Surface {
    /// Drawable (width, height), read once at startup.
    fn size(&self) -> (u16, u16);

    fn fill(&mut self, color: Color) -> io::Result<()>;

    fn draw_rect(&mut self, color: Color, rect: Rect) -> io::Result<()>;

    /// Draw `sprite` with its top-left corner at (`x`, `y`).
    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) -> io::Result<()>;

    /// Draw `text` starting at (`x`, `y`). `bg: None` keeps the fill colour.
    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        fg: Color,
        bg: Option<Color>,
    ) -> io::Result<()>;

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// Make everything drawn since the last call visible.
    fn present(&mut self) -> io::Result<()>;

    fn draw(&mut self, appearance: Appearance<'_>, rect: Rect) -> io::Result<()> {
        match appearance {
            Appearance::Image(sprite) => self.blit(sprite, rect.x, rect.y),
            Appearance::Fill(color) => self.draw_rect(color, rect),
        }
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Quit,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// The player closed the game (window close / Ctrl-C).
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    PointerDown { x: i32, y: i32 },
}

pub trait InputSource {
    /// Drain every event that arrived since the previous call.
    fn poll(&mut self) -> io::Result<Vec<InputEvent>>;
}
