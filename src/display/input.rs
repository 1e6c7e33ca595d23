//! Terminal input: turns crossterm events into `InputEvent`s.
//!
//! Terminals speaking the keyboard-enhancement protocol (kitty, Ghostty, ...)
//! report key releases, so movement keys map straight to `KeyDown`/`KeyUp`.
//! Classic terminals only send presses, with OS key-repeat showing up as more
//! presses.  There a movement key counts as held while presses keep arriving
//! and a `KeyUp` is synthesised once they stop.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::{InputEvent, InputSource, Key};

/// Quiet time after the first press before a key counts as released.
/// Covers the OS delay before key-repeat starts.
const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(550);

/// Quiet time between repeats before a key counts as released.
const REPEAT_WINDOW: Duration = Duration::from_millis(130);

pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Fire,
        KeyCode::Char('q') | KeyCode::Char('Q') => Key::Quit,
        _ => Key::Other,
    }
}

fn is_movement(key: Key) -> bool {
    matches!(key, Key::Left | Key::Right)
}

#[derive(Clone, Copy, Debug)]
struct Held {
    last_seen: Instant,
    repeating: bool,
}

/// Event translation with no I/O, so it can be driven with synthetic events.
#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Release events are reported by the terminal.
    reports_release: bool,
    held: HashMap<Key, Held>,
}

impl KeyTracker {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            held: HashMap::new(),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains_key(&key)
    }

    pub fn on_event(&mut self, ev: Event, now: Instant, out: &mut Vec<InputEvent>) {
        match ev {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) => {
                out.push(InputEvent::Quit);
            }
            Event::Key(KeyEvent { code, kind, .. }) => self.on_key(map_key(code), kind, now, out),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => out.push(InputEvent::PointerDown {
                x: column as i32,
                y: row as i32,
            }),
            _ => {}
        }
    }

    fn on_key(&mut self, key: Key, kind: KeyEventKind, now: Instant, out: &mut Vec<InputEvent>) {
        match kind {
            KeyEventKind::Press if is_movement(key) => {
                // A second press without a release is key-repeat.
                if !self.reports_release && self.is_held(key) {
                    self.touch(key, now);
                } else {
                    self.held.insert(
                        key,
                        Held {
                            last_seen: now,
                            repeating: false,
                        },
                    );
                    out.push(InputEvent::KeyDown(key));
                }
            }
            KeyEventKind::Press => out.push(InputEvent::KeyDown(key)),
            KeyEventKind::Repeat => self.touch(key, now),
            KeyEventKind::Release => {
                self.held.remove(&key);
                out.push(InputEvent::KeyUp(key));
            }
        }
    }

    fn touch(&mut self, key: Key, now: Instant) {
        if let Some(held) = self.held.get_mut(&key) {
            held.last_seen = now;
            held.repeating = true;
        }
    }

    /// Release movement keys that have gone quiet. No-op when releases are reported.
    pub fn expire(&mut self, now: Instant, out: &mut Vec<InputEvent>) {
        if self.reports_release {
            return;
        }
        let stale: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, held)| {
                let window = if held.repeating {
                    REPEAT_WINDOW
                } else {
                    FIRST_REPEAT_WINDOW
                };
                now.saturating_duration_since(held.last_seen) > window
            })
            .map(|(key, _)| *key)
            .collect();
        for key in stale {
            self.held.remove(&key);
            out.push(InputEvent::KeyUp(key));
        }
    }
}

/// Non-blocking reader over the terminal's event queue.
pub struct TerminalInput {
    tracker: KeyTracker,
}

impl TerminalInput {
    pub fn new(reports_release: bool) -> Self {
        Self {
            tracker: KeyTracker::new(reports_release),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            self.tracker.on_event(ev, Instant::now(), &mut events);
        }
        self.tracker.expire(Instant::now(), &mut events);
        Ok(events)
    }
}
