//! # Geometry Resolution
//!
//! Screen size comes from an ordered list of [`GeometryProbe`]s. The first one
//! that yields a non-zero size wins; if none does, their failures are folded
//! into a single `TerminalError::GeometryProbe`.
//!
//! - [`WindowSizeQuery`]: asks the OS directly (`TIOCGWINSZ` via crossterm's
//!   `window_size`). Unlike `terminal::size` it never falls back to `tput`
//!   defaults, so a missing tty is an error here.
//! - [`CursorPositionProbe`]: pushes the cursor to the bottom-right corner with
//!   `ESC[999C ESC[999B`, asks where it ended up with `ESC[6n` and decodes the
//!   `ESC[<rows>;<cols>R` reply. Works wherever the terminal speaks ANSI, even
//!   when the size ioctl does not.
//!
//! The probe assumes the reply is the next thing on the input stream. Raw mode
//! must already be active, or the reply is echoed and line-buffered.

use std::fmt;
use std::io::{self, Read, Write};

use crossterm::cursor::{MoveDown, MoveRight};
use crossterm::{Command, queue, terminal};
use log::{debug, info, trace, warn};

use crate::GeometryStrategy;
use crate::core::cursor_report::{CursorReportParser, ReportError, Step};
use crate::core::state::ScreenGeometry;
use crate::tui::error::TerminalError;
use crate::tui::input::poll_byte;

/// Cursor moves are clamped at the screen edge; 999 reaches it on any real terminal.
const FAR_EDGE: u16 = 999;

/// Consecutive empty reads (~100ms each) tolerated while waiting for the reply.
const REPORT_TIMEOUT_POLLS: usize = 10;

/// `ESC[6n`: ask the terminal to report the cursor position.
#[derive(Debug, Clone, Copy)]
pub struct RequestCursorPosition;

impl Command for RequestCursorPosition {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[6n")
    }
}

pub trait GeometryProbe {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    fn probe(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<ScreenGeometry, TerminalError>;
}

/// Direct size query. Never touches the byte streams.
#[derive(Debug, Default)]
pub struct WindowSizeQuery;

impl GeometryProbe for WindowSizeQuery {
    fn name(&self) -> &'static str {
        "window-size"
    }

    fn probe(
        &self,
        _input: &mut dyn Read,
        _output: &mut dyn Write,
    ) -> Result<ScreenGeometry, TerminalError> {
        geometry_from_window_size(terminal::window_size().map(|ws| (ws.rows, ws.columns)))
    }
}

/// Turn a `(rows, cols)` size query result into a geometry. A query error or
/// a zero dimension both count as the query being unavailable.
pub fn geometry_from_window_size(
    size: io::Result<(u16, u16)>,
) -> Result<ScreenGeometry, TerminalError> {
    let (rows, cols) =
        size.map_err(|e| TerminalError::GeometryProbe(format!("size query failed: {e}")))?;
    ScreenGeometry::new(rows, cols).ok_or_else(|| {
        TerminalError::GeometryProbe(format!("size query reported {cols}x{rows}"))
    })
}

#[derive(Debug, Default)]
pub struct CursorPositionProbe;

impl GeometryProbe for CursorPositionProbe {
    fn name(&self) -> &'static str {
        "cursor-probe"
    }

    fn probe(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> Result<ScreenGeometry, TerminalError> {
        let mut request = Vec::with_capacity(16);
        queue!(
            request,
            MoveRight(FAR_EDGE),
            MoveDown(FAR_EDGE),
            RequestCursorPosition
        )
        .map_err(TerminalError::Write)?;
        output.write_all(&request).map_err(TerminalError::Write)?;
        output.flush().map_err(TerminalError::Write)?;

        read_cursor_report(input)
    }
}

/// Read a cursor position report byte by byte, stopping right after `R`.
///
/// The parser caps each field at five digits, so a reply can never run on.
pub fn read_cursor_report(input: &mut dyn Read) -> Result<ScreenGeometry, TerminalError> {
    let mut parser = CursorReportParser::new();
    let mut idle_polls = 0;

    loop {
        let Some(byte) = poll_byte(input)? else {
            idle_polls += 1;
            if idle_polls == REPORT_TIMEOUT_POLLS {
                return Err(ReportError::Truncated.into());
            }
            continue;
        };
        idle_polls = 0;

        if byte.is_ascii_graphic() {
            trace!("cursor report byte {byte} ('{}')", char::from(byte));
        } else {
            trace!("cursor report byte {byte}");
        }

        if let Step::Complete(geometry) = parser.feed(byte)? {
            return Ok(geometry);
        }
    }
}

/// The probe chain for a configured strategy, in the order it is tried.
pub fn probes_for(strategy: GeometryStrategy) -> Vec<Box<dyn GeometryProbe>> {
    match strategy {
        GeometryStrategy::Auto => vec![Box::new(WindowSizeQuery), Box::new(CursorPositionProbe)],
        GeometryStrategy::WindowSize => vec![Box::new(WindowSizeQuery)],
        GeometryStrategy::CursorProbe => vec![Box::new(CursorPositionProbe)],
    }
}

pub fn resolve_geometry(
    probes: &[Box<dyn GeometryProbe>],
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> Result<ScreenGeometry, TerminalError> {
    let mut failures = Vec::with_capacity(probes.len());

    for probe in probes {
        debug!("Trying geometry probe {}", probe.name());
        match probe.probe(input, output) {
            Ok(geometry) => {
                info!("Screen geometry {geometry} from {}", probe.name());
                return Ok(geometry);
            }
            Err(e) => {
                warn!("Geometry probe {} failed: {e}", probe.name());
                let reason = match e {
                    TerminalError::GeometryProbe(reason) => reason,
                    other => other.to_string(),
                };
                failures.push(format!("{}: {reason}", probe.name()));
            }
        }
    }

    if failures.is_empty() {
        return Err(TerminalError::GeometryProbe(
            "no geometry probe configured".to_string(),
        ));
    }
    Err(TerminalError::GeometryProbe(failures.join("; ")))
}
