//! # Fatal Errors
//!
//! Last-resort exit path. Clears the screen, names the failing operation and
//! the OS reason, exits with status 1.
//!
//! `die` does not touch terminal attributes. Callers reach it only after the
//! `RawModeGuard` is gone, so restoration has already happened by then.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use log::error;

use crate::tui::error::TerminalError;
use crate::tui::render::CursorHome;

/// Exit status for any fatal path.
pub const FATAL_EXIT_CODE: u8 = 1;

/// Write clear-screen + cursor-home to `out`.
pub fn write_reset<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), CursorHome)?;
    out.flush()
}

/// Report `err` to the operator without exiting.
pub fn report(err: &TerminalError) {
    error!("{err}");
    eprintln!("{err}");
}

pub fn die(err: &TerminalError) -> ! {
    // Failures here are ignored; there is nothing left to fall back to.
    let _ = write_reset(&mut io::stdout());
    report(err);
    std::process::exit(i32::from(FATAL_EXIT_CODE))
}
