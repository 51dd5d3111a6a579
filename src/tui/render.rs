//! # Frame Renderer
//!
//! Draws the static frame: clear, home, one marker per row, home again.
//! The whole frame is queued into a buffer first and handed to the terminal
//! in a single write, so nothing half-drawn is flushed between commands.

use std::fmt;
use std::io::{self, Write};

use crossterm::terminal::{Clear, ClearType};
use crossterm::{Command, queue};

use crate::core::state::ScreenGeometry;
use crate::tui::error::TerminalError;

/// `ESC[H`. crossterm's `MoveTo(0, 0)` spells it `ESC[1;1H`.
#[derive(Debug, Clone, Copy)]
pub struct CursorHome;

impl Command for CursorHome {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[H")
    }
}

fn frame_bytes(geometry: ScreenGeometry, marker: &str) -> io::Result<Vec<u8>> {
    let rows = usize::from(geometry.rows());
    let mut buf = Vec::with_capacity(8 + rows * (marker.len() + 2));
    queue!(buf, Clear(ClearType::All), CursorHome)?;
    for _ in 0..rows {
        // OPOST is off, so "\n" alone would not return to column 1.
        buf.extend_from_slice(marker.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    queue!(buf, CursorHome)?;
    Ok(buf)
}

pub fn render_frame<W: Write>(
    out: &mut W,
    geometry: ScreenGeometry,
    marker: &str,
) -> Result<(), TerminalError> {
    let frame = frame_bytes(geometry, marker).map_err(TerminalError::Write)?;
    out.write_all(&frame).map_err(TerminalError::Write)?;
    out.flush().map_err(TerminalError::Write)
}
