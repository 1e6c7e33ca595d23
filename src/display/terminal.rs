//! Terminal rendering. All crossterm output lives here.
//!
//! One cell is one unit of the play field.  Frames are repainted in full:
//! `fill` paints every cell with the background, later calls draw on top,
//! and `present` flushes the queued commands.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Print},
    QueueableCommand,
};

use super::Surface;
use crate::entities::{Rect, Sprite};
use crate::settings::Color;

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    width: u16,
    height: u16,
    background: Color,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width,
            height,
            background: Color::rgb(0, 0, 0),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print `text` at (`x`, `y`), clipped to the screen.
    fn put(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Color) -> io::Result<()> {
        if y < 0 || y >= self.height as i32 {
            return Ok(());
        }
        let skip = (-x).max(0) as usize;
        let start = x.max(0);
        let room = (self.width as i32 - start).max(0) as usize;
        let visible: String = text.chars().skip(skip).take(room).collect();
        if visible.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(start as u16, y as u16))?;
        self.out.queue(style::SetForegroundColor(term_color(fg)))?;
        self.out.queue(style::SetBackgroundColor(term_color(bg)))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Color) -> io::Result<()> {
        self.background = color;
        let blank = " ".repeat(self.width as usize);
        for row in 0..self.height as i32 {
            self.put(0, row, &blank, color, color)?;
        }
        Ok(())
    }

    fn draw_rect(&mut self, color: Color, rect: Rect) -> io::Result<()> {
        let blank = " ".repeat(rect.width.max(0) as usize);
        for row in rect.top()..rect.bottom() {
            self.put(rect.x, row, &blank, color, color)?;
        }
        Ok(())
    }

    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) -> io::Result<()> {
        let bg = self.background;
        for (dy, line) in sprite.rows().iter().enumerate() {
            let row = y + dy as i32;
            // Draw each run of non-blank characters so spaces stay transparent.
            let mut run = String::new();
            let mut run_start = 0;
            for (dx, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    if !run.is_empty() {
                        self.put(x + run_start, row, &run, sprite.color(), bg)?;
                        run.clear();
                    }
                    continue;
                }
                if run.is_empty() {
                    run_start = dx as i32;
                }
                run.push(ch);
            }
            if !run.is_empty() {
                self.put(x + run_start, row, &run, sprite.color(), bg)?;
            }
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        fg: Color,
        bg: Option<Color>,
    ) -> io::Result<()> {
        let bg = bg.unwrap_or(self.background);
        self.put(x, y, text, fg, bg)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            self.out.queue(cursor::Show)?;
        } else {
            self.out.queue(cursor::Hide)?;
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out
            .queue(cursor::MoveTo(0, self.height.saturating_sub(1)))?;
        self.out.flush()
    }
}
