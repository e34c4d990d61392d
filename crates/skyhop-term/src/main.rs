mod keys;
mod render;

use std::fs::File;
use std::io::{self, Stdout, stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};
use tracing_subscriber::EnvFilter;

use skyhop_core::frame::drive_frame;
use skyhop_core::game_trait::ArcadeGame;
use skyhop_core::input::InputState;
use skyhop_jumper::SkyJumper;

use keys::{DEFAULT_HOLD_FRAMES, KeyTracker};
use render::TermPresenter;

/// Environment variable naming a file to receive log output.
const LOG_FILE_ENV_VAR: &str = "SKYHOP_LOG_FILE";

/// Raw mode plus alternate screen for as long as it lives.
struct TerminalGuard {
    enhanced_keys: bool,
}

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced_keys {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { enhanced_keys })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.enhanced_keys {
            let _ = execute!(out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Logs go to a file, never the screen the game is drawn on.
fn init_tracing() {
    let Some(path) = std::env::var_os(LOG_FILE_ENV_VAR) else {
        return;
    };
    match File::create(&path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(e) => eprintln!("Cannot open log file {}: {e}", path.to_string_lossy()),
    }
}

fn main() -> io::Result<()> {
    init_tracing();

    let mut game = SkyJumper::new().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing::info!(name = %game.metadata().name, seed = game.seed(), "Starting");

    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out)?;
    let result = run(&mut game, out, guard.enhanced_keys);
    drop(guard);

    tracing::info!(score = game.score(), "Exiting");
    result
}

fn run(game: &mut SkyJumper, out: Stdout, enhanced_keys: bool) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut presenter = TermPresenter::new(out, cols, rows);
    let mut input = InputState::new();
    let mut keys = KeyTracker::new(enhanced_keys, DEFAULT_HOLD_FRAMES);
    let frame_dur = Duration::from_secs_f32(1.0 / game.tick_rate());

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if keys.handle(&key, &mut input) {
                        return Ok(());
                    }
                },
                Event::Resize(c, r) => presenter.resize(c, r),
                _ => {},
            }
        }

        drive_frame(game, &mut presenter, &input.frame_input())?;
        input.end_frame();
        keys.end_frame(&mut input);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
