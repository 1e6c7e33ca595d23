use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::Mutex;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::EnvFilter;

use alien_invasion::display::input::TerminalInput;
use alien_invasion::display::terminal::TerminalSurface;
use alien_invasion::game::AlienInvasion;
use alien_invasion::settings::Tuning;

const LOG_FILE: &str = "alien_invasion.log";

/// The terminal belongs to the game, so logs go to a file.
fn init_tracing() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("failed to create {LOG_FILE}"))?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;

    let tuning = Tuning::discover().context("failed to load settings")?;
    let (width, height) = terminal::size().context("failed to read terminal size")?;

    // Sprites load and the screen is checked before the terminal switches
    // modes so a missing file or a too-small terminal is reported on a
    // normal screen.
    let mut game =
        AlienInvasion::load(tuning, width, height).context("failed to set up the game")?;
    tracing::info!(width, height, aliens = game.fleet.len(), "alien invasion ready");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let setup = out
        .execute(terminal::EnterAlternateScreen)
        .and_then(|out| out.execute(EnableMouseCapture))
        .map(|_| ());

    // Ask for key-release events where the terminal supports them.
    let keyboard_enhanced = setup.is_ok()
        && terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    tracing::debug!(keyboard_enhanced, "terminal configured");

    let mut surface = TerminalSurface::new(out, width, height);
    let result = match setup {
        Ok(()) => game.run(&mut surface, &mut TerminalInput::new(keyboard_enhanced)),
        Err(err) => Err(err),
    };

    // Always restore the terminal
    let mut out = surface.into_inner();
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = out.flush();
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}
