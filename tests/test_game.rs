use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use alien_invasion::display::{InputEvent, InputSource, Key, Surface};
use alien_invasion::entities::{Alien, Entity, Rect, Sprite};
use alien_invasion::error::GameError;
use alien_invasion::fleet::Fleet;
use alien_invasion::game::*;
use alien_invasion::settings::{Color, Settings, Tuning};

const BLACK: Color = Color::rgb(0, 0, 0);

fn block(width: usize, height: usize) -> Sprite {
    Sprite::from_rows(vec!["#".repeat(width); height], BLACK).unwrap()
}

/// 800x600 screen, 60x48 ship, 20x20 aliens. Not started.
fn make_game() -> AlienInvasion {
    let tuning = Tuning {
        frame_millis: 1,
        ..Tuning::default()
    };
    let settings = Settings::new(tuning, 800, 600);
    AlienInvasion::new(settings, block(60, 48), block(20, 20))
}

fn started_game() -> AlienInvasion {
    let mut game = make_game();
    let (x, y) = button_centre(&game);
    assert!(game.check_play_button(x, y));
    game
}

fn button_centre(game: &AlienInvasion) -> (i32, i32) {
    let r = game.play_button.rect;
    (r.center_x(), r.y + r.height / 2)
}

fn single_alien(x: i32, y: i32) -> Fleet {
    let sprite = Rc::new(block(20, 20));
    let mut fleet = Fleet::new(Rc::clone(&sprite));
    fleet.aliens.push(Alien::new(sprite, x, y));
    fleet
}

// ── In-memory collaborators ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Op {
    Fill(Color),
    Rect(Color, Rect),
    Blit(i32, i32),
    Text(String),
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
    cursor: Vec<bool>,
    presents: usize,
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn blits(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Blit(..))).count()
    }
}

impl Surface for Recorder {
    fn size(&self) -> (u16, u16) {
        (800, 600)
    }

    fn fill(&mut self, color: Color) -> io::Result<()> {
        self.ops.push(Op::Fill(color));
        Ok(())
    }

    fn draw_rect(&mut self, color: Color, rect: Rect) -> io::Result<()> {
        self.ops.push(Op::Rect(color, rect));
        Ok(())
    }

    fn blit(&mut self, _sprite: &Sprite, x: i32, y: i32) -> io::Result<()> {
        self.ops.push(Op::Blit(x, y));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        _x: i32,
        _y: i32,
        _fg: Color,
        _bg: Option<Color>,
    ) -> io::Result<()> {
        self.ops.push(Op::Text(text.to_string()));
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor.push(visible);
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.presents += 1;
        Ok(())
    }
}

/// Hands out one batch of events per frame.
struct Script(VecDeque<Vec<InputEvent>>);

impl InputSource for Script {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self
            .0
            .pop_front()
            .unwrap_or_else(|| vec![InputEvent::Quit]))
    }
}

// ── Start-up & play button ───────────────────────────────────────────────────

fn bundled_tuning() -> Tuning {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    Tuning {
        ship_sprite: root.join("images/ship.txt"),
        alien_sprite: root.join("images/alien.txt"),
        ..Tuning::default()
    }
}

#[test]
fn load_sizes_the_game_to_the_terminal() {
    let game = AlienInvasion::load(bundled_tuning(), 80, 24).unwrap();
    assert_eq!((game.settings.screen_width, game.settings.screen_height), (80, 24));
    assert!(!game.fleet.is_empty());
}

#[test]
fn load_rejects_a_terminal_too_short_for_the_fleet() {
    let err = AlienInvasion::load(bundled_tuning(), 80, 12).err().unwrap();
    assert!(matches!(
        err,
        GameError::ScreenTooSmall { width: 80, height: 12 }
    ));
}

#[test]
fn smallest_playable_terminal_never_runs_out_of_aliens() {
    let mut game = AlienInvasion::load(bundled_tuning(), 80, 13).unwrap();
    let (x, y) = button_centre(&game);
    assert!(game.check_play_button(x, y));
    for _ in 0..60 {
        assert!(!game.fleet.is_empty());
        game.update();
        if !game.stats.game_active {
            break;
        }
    }
    assert_eq!(game.stats.level, 1);
}

#[test]
fn game_starts_inactive_with_a_fleet() {
    let game = make_game();
    assert!(!game.stats.game_active);
    assert!(game.cursor_visible());
    assert_eq!(game.stats.ships_left, 3);
    assert_eq!(game.stats.level, 1);
    assert_eq!(game.fleet.len(), 19 * 12);
    assert!(game.bullets.is_empty());
}

#[test]
fn click_outside_the_button_does_nothing() {
    let mut game = make_game();
    assert!(!game.check_play_button(0, 0));
    assert_eq!(
        game.handle_event(InputEvent::PointerDown { x: 5, y: 5 }),
        Control::Continue
    );
    assert!(!game.stats.game_active);
}

#[test]
fn click_on_the_button_starts_a_game() {
    let mut game = make_game();
    let (x, y) = button_centre(&game);
    game.handle_event(InputEvent::PointerDown { x, y });
    assert!(game.stats.game_active);
    assert!(!game.cursor_visible());
}

#[test]
fn click_during_play_does_not_restart() {
    let mut game = started_game();
    game.stats.score = 500;
    let (x, y) = button_centre(&game);
    assert!(!game.check_play_button(x, y));
    assert_eq!(game.stats.score, 500);
}

#[test]
fn new_game_resets_stats_but_keeps_high_score() {
    let mut game = started_game();
    game.stats.score = 1_200;
    game.stats.high_score = 1_200;
    game.stats.level = 4;
    game.stats.ships_left = 0;
    game.stats.game_active = false;
    game.settings.increase_speed();
    game.bullets.push(alien_invasion::entities::Bullet::new(&game.ship, &game.settings));
    game.fleet = single_alien(100, 100);

    let (x, y) = button_centre(&game);
    assert!(game.check_play_button(x, y));
    assert_eq!(game.stats.score, 0);
    assert_eq!(game.stats.level, 1);
    assert_eq!(game.stats.ships_left, 3);
    assert_eq!(game.stats.high_score, 1_200);
    assert_eq!(game.settings.alien_points, 50);
    assert!(game.bullets.is_empty());
    assert_eq!(game.fleet.len(), 19 * 12);
    assert_eq!(game.scoreboard.score.text, "0");
    assert_eq!(game.scoreboard.high_score.text, "1,200");
    assert_eq!(game.scoreboard.ships.len(), 3);
}

// ── Keys ─────────────────────────────────────────────────────────────────────

#[test]
fn arrow_keys_set_and_clear_movement_flags() {
    let mut game = started_game();
    game.handle_event(InputEvent::KeyDown(Key::Right));
    game.handle_event(InputEvent::KeyDown(Key::Left));
    assert!(game.ship.moving_right && game.ship.moving_left);
    game.handle_event(InputEvent::KeyUp(Key::Right));
    assert!(!game.ship.moving_right);
    assert!(game.ship.moving_left);
    game.handle_event(InputEvent::KeyUp(Key::Left));
    assert!(!game.ship.moving_left);
}

#[test]
fn quit_key_and_quit_event_stop_the_loop() {
    let mut game = make_game();
    assert_eq!(game.handle_event(InputEvent::KeyDown(Key::Quit)), Control::Quit);
    assert_eq!(game.handle_event(InputEvent::Quit), Control::Quit);
    assert_eq!(game.handle_event(InputEvent::KeyDown(Key::Other)), Control::Continue);
    assert_eq!(game.handle_event(InputEvent::KeyUp(Key::Quit)), Control::Continue);
}

#[test]
fn fire_key_adds_a_bullet() {
    let mut game = started_game();
    game.handle_event(InputEvent::KeyDown(Key::Fire));
    assert_eq!(game.bullets.len(), 1);
}

#[test]
fn firing_stops_at_the_bullet_cap() {
    let mut game = started_game();
    for _ in 0..3 {
        assert!(game.fire_bullet());
    }
    assert!(!game.fire_bullet());
    assert_eq!(game.bullets.len(), 3);

    game.bullets.pop();
    assert!(game.fire_bullet());
    assert_eq!(game.bullets.len(), 3);
}

#[test]
fn bullets_in_flight_never_exceed_the_cap() {
    let mut game = started_game();
    for _ in 0..300 {
        game.handle_event(InputEvent::KeyDown(Key::Fire));
        game.update();
        assert!(game.bullets.len() <= game.settings.bullets_allowed());
    }
}

// ── update ───────────────────────────────────────────────────────────────────

#[test]
fn nothing_moves_while_inactive() {
    let mut game = make_game();
    game.ship.moving_right = true;
    let before = game.ship.rect();
    let alien_before = game.fleet.iter().next().unwrap().rect();
    assert_eq!(game.update(), FrameOutcome::Continue);
    assert_eq!(game.ship.rect(), before);
    assert_eq!(game.fleet.iter().next().unwrap().rect(), alien_before);
}

#[test]
fn active_update_moves_the_ship() {
    let mut game = started_game();
    game.handle_event(InputEvent::KeyDown(Key::Right));
    game.update();
    assert_eq!(game.ship.rect().x, 371);
}

#[test]
fn losing_a_ship_requests_the_hit_pause() {
    let mut game = started_game();
    game.fleet = single_alien(100, 585);
    assert_eq!(
        game.update(),
        FrameOutcome::Respawned {
            pause: Duration::from_millis(500)
        }
    );
    assert!(game.stats.game_active);
}

#[test]
fn losing_the_last_ship_shows_the_cursor() {
    let mut game = started_game();
    game.stats.ships_left = 1;
    game.fleet = single_alien(100, 585);
    assert_eq!(game.update(), FrameOutcome::GameOver);
    assert!(!game.stats.game_active);
    assert!(game.cursor_visible());
}

// ── Drawing ──────────────────────────────────────────────────────────────────

#[test]
fn idle_screen_shows_the_play_button() {
    let game = make_game();
    let mut surface = Recorder::default();
    game.update_screen(&mut surface).unwrap();

    assert_eq!(surface.ops[0], Op::Fill(game.settings.tuning.bg_color));
    assert!(surface.texts().contains(&"Play"));
    assert!(surface
        .ops
        .contains(&Op::Rect(game.settings.tuning.button_color, game.play_button.rect)));
    // ship + aliens + one icon per remaining ship
    assert_eq!(surface.blits(), 1 + game.fleet.len() + 3);
    assert_eq!(surface.presents, 1);
}

#[test]
fn active_screen_hides_the_play_button_and_draws_bullets() {
    let mut game = started_game();
    game.fire_bullet();
    let mut surface = Recorder::default();
    game.update_screen(&mut surface).unwrap();

    assert!(!surface.texts().contains(&"Play"));
    let bullet = game.bullets[0].rect();
    assert!(surface
        .ops
        .contains(&Op::Rect(game.settings.tuning.bullet_color, bullet)));
    assert!(surface.texts().contains(&"0"));
    assert!(surface.texts().contains(&"1"));
}

// ── Frame loop ───────────────────────────────────────────────────────────────

#[test]
fn run_plays_until_quit() {
    let mut game = make_game();
    let (x, y) = button_centre(&game);
    let mut input = Script(VecDeque::from(vec![
        vec![InputEvent::PointerDown { x, y }],
        vec![InputEvent::KeyDown(Key::Fire)],
        vec![InputEvent::KeyDown(Key::Quit)],
    ]));
    let mut surface = Recorder::default();

    game.run(&mut surface, &mut input).unwrap();

    assert!(game.stats.game_active);
    assert_eq!(game.bullets.len(), 1);
    assert_eq!(surface.cursor, vec![true, false]);
    assert_eq!(surface.presents, 2);
}
