//! # Terminal Adapter
//!
//! The layer that touches the real terminal: termios, stdin, stdout.
//! Core types come in from `crate::core`; everything here is I/O.
//!
//! ## Lifecycle
//!
//! ```text
//! RawModeGuard::enter ─▶ resolve_geometry ─▶ ┌ render_frame ◀─┐
//!                                            │ read_key       │
//!                                            └ update ────────┘
//!                                                  │ Quit
//!                                                  ▼
//!                                      reset screen ─▶ guard.restore()
//! ```
//!
//! The guard is restored on every way out of [`run`]: normal quit, an error
//! returned with `?`, or a panic unwinding through it. Fatal errors are
//! handed back to the caller, which passes them to [`fatal::die`] once the
//! terminal is already back in its original mode.

pub mod error;
pub mod fatal;
pub mod geometry;
pub mod input;
pub mod render;
pub mod terminal;

use log::info;
use std::io::{self, Read, Write};

use crate::core::action::{Effect, dispatch, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::error::TerminalError;
use crate::tui::geometry::{GeometryProbe, probes_for, resolve_geometry};
use crate::tui::input::{TerminalInput, read_key};
use crate::tui::render::render_frame;
use crate::tui::terminal::RawModeGuard;

pub fn run(config: &ResolvedConfig) -> Result<(), TerminalError> {
    let guard = RawModeGuard::enter(io::stdin())?;

    let probes = probes_for(config.geometry);
    let mut input = TerminalInput::stdin();
    let mut output = io::stdout();
    let result = run_session(&probes, &config.row_marker, &mut input, &mut output);

    let restored = guard.restore();
    match (result, restored) {
        (Err(e), Err(restore_err)) => {
            // The session error goes to die(); the restore failure is only reported.
            fatal::report(&restore_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => restored,
    }
}

/// Resolve geometry once, then render → read → dispatch until quit.
///
/// Expects the terminal behind `input`/`output` to already be in raw mode.
pub fn run_session<R: Read, W: Write>(
    probes: &[Box<dyn GeometryProbe>],
    row_marker: &str,
    input: &mut R,
    output: &mut W,
) -> Result<(), TerminalError> {
    let geometry = resolve_geometry(probes, input, output)?;
    let mut app = App::new(geometry, row_marker.to_string());

    while app.is_running() {
        render_frame(output, app.geometry, &app.row_marker)?;
        let byte = read_key(input)?;
        if update(&mut app, dispatch(byte)) == Effect::Quit {
            fatal::write_reset(output).map_err(TerminalError::Write)?;
            info!("Quit by user");
        }
    }
    Ok(())
}
