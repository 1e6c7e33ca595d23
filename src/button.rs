//! The play button shown while no game is running.

use std::io;

use crate::display::Surface;
use crate::entities::Rect;
use crate::settings::{Color, Settings};

pub const BUTTON_WIDTH: i32 = 12;
pub const BUTTON_HEIGHT: i32 = 3;

#[derive(Clone, Debug)]
pub struct Button {
    pub rect: Rect,
    pub msg: String,
    button_color: Color,
    text_color: Color,
}

impl Button {
    /// A button centred on the screen.
    pub fn new(settings: &Settings, msg: &str) -> Self {
        let rect = Rect::new(
            (settings.screen_width - BUTTON_WIDTH) / 2,
            (settings.screen_height - BUTTON_HEIGHT) / 2,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        );
        Self {
            rect,
            msg: msg.to_string(),
            button_color: settings.tuning.button_color,
            text_color: settings.tuning.button_text_color,
        }
    }

    pub fn is_clicked(&self, x: i32, y: i32) -> bool {
        self.rect.contains_point(x, y)
    }

    pub fn draw_button<S: Surface + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.draw_rect(self.button_color, self.rect)?;
        let x = self.rect.center_x() - self.msg.chars().count() as i32 / 2;
        let y = self.rect.y + self.rect.height / 2;
        surface.draw_text(&self.msg, x, y, self.text_color, Some(self.button_color))
    }
}
