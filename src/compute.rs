//! Collision and scoring.
//!
//! These functions run inside the frame update and apply every consequence
//! of a collision: removal, points, level advance and the ship-hit response.
//! Collections are never mutated while being iterated; hits are collected
//! first and the survivors are rebuilt afterwards.

use crate::entities::{Bullet, Entity, Ship};
use crate::fleet::Fleet;
use crate::game::AlienInvasion;
use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// No contact this frame.
    Clear,
    /// A ship was lost but others remain; the board was reset.
    Respawned,
    /// The last ship was lost.
    GameOver,
}

// ── Bullets ──────────────────────────────────────────────────────────────────

/// Drop bullets that have left through the top. Returns how many were removed.
pub fn prune_bullets(bullets: &mut Vec<Bullet>) -> usize {
    let before = bullets.len();
    bullets.retain(|b| !b.is_off_screen());
    before - bullets.len()
}

/// Remove every overlapping bullet/alien pair.
///
/// Bullets are checked in firing order.  A bullet destroys every alien it
/// overlaps; an alien already destroyed by an earlier bullet is not hit
/// again.  Returns the number of aliens each spent bullet destroyed.
pub fn collide_bullets_with_fleet(bullets: &mut Vec<Bullet>, fleet: &mut Fleet) -> Vec<usize> {
    let mut dead_aliens = vec![false; fleet.len()];
    let mut spent_bullets = vec![false; bullets.len()];
    let mut kills = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        let rect = bullet.rect();
        let mut hits = 0;
        for (ai, alien) in fleet.iter().enumerate() {
            if !dead_aliens[ai] && rect.intersects(&alien.rect()) {
                dead_aliens[ai] = true;
                hits += 1;
            }
        }
        if hits > 0 {
            spent_bullets[bi] = true;
            kills.push(hits);
        }
    }

    if !kills.is_empty() {
        let mut spent = spent_bullets.into_iter();
        bullets.retain(|_| !spent.next().unwrap_or(false));
        let mut dead = dead_aliens.into_iter();
        fleet.aliens.retain(|_| !dead.next().unwrap_or(false));
    }
    kills
}

/// Points for one frame's kills: the current alien value per alien destroyed.
pub fn score_for(kills: &[usize], settings: &Settings) -> u32 {
    kills.iter().fold(0u32, |total, &n| {
        total.saturating_add(settings.alien_points.saturating_mul(n as u32))
    })
}

/// Move bullets, drop the ones that left the screen, then resolve hits.
pub fn update_bullets(game: &mut AlienInvasion) {
    for bullet in &mut game.bullets {
        bullet.update(&game.settings);
    }
    let pruned = prune_bullets(&mut game.bullets);
    if pruned > 0 {
        tracing::trace!(pruned, in_flight = game.bullets.len(), "bullets left the screen");
    }
    check_bullet_alien_collisions(game);
}

/// Score this frame's hits and start the next level once the fleet is gone.
pub fn check_bullet_alien_collisions(game: &mut AlienInvasion) {
    let kills = collide_bullets_with_fleet(&mut game.bullets, &mut game.fleet);

    if !kills.is_empty() {
        let points = score_for(&kills, &game.settings);
        game.stats.score = game.stats.score.saturating_add(points);
        game.scoreboard.prep_score(&game.stats);
        game.scoreboard.check_high_score(&mut game.stats);
        tracing::debug!(points, score = game.stats.score, "aliens destroyed");
    }

    if game.fleet.is_empty() {
        start_next_level(game);
    }
}

/// Clear bullets, raise the difficulty, bump the level and bring in a new fleet.
pub fn start_next_level(game: &mut AlienInvasion) {
    game.bullets.clear();
    game.settings.increase_speed();
    game.stats.level += 1;
    game.scoreboard.prep_level(&game.stats);
    game.fleet
        .create_fleet(&game.settings, game.ship.rect().height);
    tracing::info!(
        level = game.stats.level,
        alien_points = game.settings.alien_points,
        "fleet cleared"
    );
}

// ── Aliens ───────────────────────────────────────────────────────────────────

pub fn ship_collides(ship: &Ship, fleet: &Fleet) -> bool {
    let rect = ship.rect();
    fleet.iter().any(|alien| rect.intersects(&alien.rect()))
}

pub fn fleet_reached_bottom(fleet: &Fleet, settings: &Settings) -> bool {
    fleet
        .iter()
        .any(|alien| alien.rect().bottom() >= settings.screen_height)
}

/// Bounce at the edges, march, then check for contact with the ship or the
/// bottom of the screen.  At most one ship is lost per frame.
pub fn update_aliens(game: &mut AlienInvasion) -> HitOutcome {
    game.fleet.check_fleet_edges(&mut game.settings);
    game.fleet.update(&game.settings);

    if ship_collides(&game.ship, &game.fleet) {
        tracing::debug!("alien rammed the ship");
        return ship_hit(game);
    }
    if fleet_reached_bottom(&game.fleet, &game.settings) {
        tracing::debug!("alien reached the bottom");
        return ship_hit(game);
    }
    HitOutcome::Clear
}

/// Lose a ship.  With ships to spare the board is reset; the caller owes the
/// player the hit pause.  Without, the game ends.
pub fn ship_hit(game: &mut AlienInvasion) -> HitOutcome {
    game.stats.ships_left = game.stats.ships_left.saturating_sub(1);
    game.scoreboard.prep_ships(&game.stats);

    if game.stats.ships_left > 0 {
        game.bullets.clear();
        game.fleet.clear();
        game.fleet
            .create_fleet(&game.settings, game.ship.rect().height);
        game.ship.center_ship();
        tracing::info!(ships_left = game.stats.ships_left, "ship hit");
        HitOutcome::Respawned
    } else {
        game.stats.game_active = false;
        tracing::info!(
            score = game.stats.score,
            level = game.stats.level,
            high_score = game.stats.high_score,
            "game over"
        );
        HitOutcome::GameOver
    }
}
