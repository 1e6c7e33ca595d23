//! The alien formation: grid layout, edge bounce and sideways march.

use std::rc::Rc;

use crate::entities::{Alien, Entity, Sprite};
use crate::error::{GameError, Result};
use crate::settings::Settings;

/// Columns and rows of a full formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub columns: i32,
    pub rows: i32,
}

/// Fit as many aliens as possible, one alien-size apart, leaving a margin at
/// the sides and top and room above the ship.
pub fn grid_for(settings: &Settings, alien: &Sprite, ship_height: i32) -> Grid {
    let (w, h) = (alien.width(), alien.height());
    let available_x = settings.screen_width - 2 * w;
    let available_y = settings.screen_height - ship_height - 3 * h;
    Grid {
        columns: (available_x / (2 * w)).max(0),
        rows: (available_y / (2 * h)).max(0),
    }
}

/// The grid for this screen, or an error if it holds no aliens at all.
/// An empty formation would count as cleared on every frame.
pub fn check_fits(settings: &Settings, alien: &Sprite, ship_height: i32) -> Result<Grid> {
    let grid = grid_for(settings, alien, ship_height);
    if grid.columns == 0 || grid.rows == 0 {
        return Err(GameError::ScreenTooSmall {
            width: settings.screen_width,
            height: settings.screen_height,
        });
    }
    Ok(grid)
}

#[derive(Clone, Debug)]
pub struct Fleet {
    sprite: Rc<Sprite>,
    pub aliens: Vec<Alien>,
}

impl Fleet {
    pub fn new(sprite: Rc<Sprite>) -> Self {
        Self {
            sprite,
            aliens: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.aliens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    pub fn clear(&mut self) {
        self.aliens.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Alien> {
        self.aliens.iter()
    }

    /// Add a full grid of aliens.
    pub fn create_fleet(&mut self, settings: &Settings, ship_height: i32) {
        let grid = grid_for(settings, &self.sprite, ship_height);
        let (w, h) = (self.sprite.width(), self.sprite.height());

        for row in 0..grid.rows {
            for col in 0..grid.columns {
                let x = w + 2 * w * col;
                let y = h + 2 * h * row;
                self.aliens.push(Alien::new(Rc::clone(&self.sprite), x, y));
            }
        }
        tracing::debug!(
            columns = grid.columns,
            rows = grid.rows,
            aliens = self.aliens.len(),
            "fleet created"
        );
    }

    /// Drop and reverse the fleet if any alien touches a side. Returns whether it did.
    pub fn check_fleet_edges(&mut self, settings: &mut Settings) -> bool {
        if self.aliens.iter().any(|alien| alien.check_edges(settings)) {
            self.change_fleet_direction(settings);
            true
        } else {
            false
        }
    }

    pub fn change_fleet_direction(&mut self, settings: &mut Settings) {
        for alien in &mut self.aliens {
            alien.drop_by(settings.fleet_drop_speed);
        }
        settings.fleet_direction *= -1.0;
    }

    /// March every alien sideways in the current fleet direction.
    pub fn update(&mut self, settings: &Settings) {
        for alien in &mut self.aliens {
            alien.update(settings);
        }
    }
}
