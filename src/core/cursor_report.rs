//! # Cursor Position Report Decoder
//!
//! Decodes the terminal's answer to `ESC[6n`, which has the shape
//! `ESC [ <rows> ; <cols> R`.
//!
//! Bytes are fed one at a time so the caller stops reading the moment the
//! terminating `R` is consumed and never reads past the reply.
//!
//! ```text
//! ExpectEsc ─ESC─▶ ExpectBracket ─[─▶ Rows ─;─▶ Cols ─R─▶ Done
//!                                      ▲ digit   ▲ digit
//! ```
//!
//! Anything else in any state is a hard failure.

use std::fmt;

use crate::core::state::ScreenGeometry;

const ESC: u8 = 0x1b;

/// Longest field we accept. `u16::MAX` has five digits.
const MAX_FIELD_DIGITS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The reply did not open with `ESC [`.
    BadIntroducer(u8),
    /// A byte that is neither a digit nor the expected separator.
    UnexpectedByte { byte: u8, state: &'static str },
    /// A numeric field was empty, too long, or zero.
    BadField(&'static str),
    /// Input stopped before the terminating `R`.
    Truncated,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::BadIntroducer(b) => {
                write!(f, "cursor report does not start with ESC[ (got 0x{b:02x})")
            }
            ReportError::UnexpectedByte { byte, state } => {
                write!(f, "unexpected byte 0x{byte:02x} while reading {state}")
            }
            ReportError::BadField(name) => write!(f, "invalid {name} field in cursor report"),
            ReportError::Truncated => write!(f, "cursor report ended before terminating 'R'"),
        }
    }
}

impl std::error::Error for ReportError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectEsc,
    ExpectBracket,
    Rows,
    Cols,
    Done,
}

/// Outcome of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NeedMore,
    Complete(ScreenGeometry),
}

#[derive(Debug)]
pub struct CursorReportParser {
    state: State,
    rows: Field,
    cols: Field,
}

impl Default for CursorReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorReportParser {
    pub fn new() -> Self {
        Self {
            state: State::ExpectEsc,
            rows: Field::default(),
            cols: Field::default(),
        }
    }

    /// Advance by one byte. After `Complete` or an error the parser must not
    /// be fed again; doing so yields `UnexpectedByte`.
    pub fn feed(&mut self, byte: u8) -> Result<Step, ReportError> {
        match (self.state, byte) {
            (State::ExpectEsc, ESC) => self.state = State::ExpectBracket,
            (State::ExpectEsc, b) => return Err(ReportError::BadIntroducer(b)),
            (State::ExpectBracket, b'[') => self.state = State::Rows,
            (State::ExpectBracket, b) => return Err(ReportError::BadIntroducer(b)),
            (State::Rows, b'0'..=b'9') => self.rows.push(byte, "row")?,
            (State::Rows, b';') => {
                self.rows.finish("row")?;
                self.state = State::Cols;
            }
            (State::Cols, b'0'..=b'9') => self.cols.push(byte, "column")?,
            (State::Cols, b'R') => {
                let rows = self.rows.finish("row")?;
                let cols = self.cols.finish("column")?;
                self.state = State::Done;
                let geometry = ScreenGeometry::new(rows, cols).ok_or(if rows == 0 {
                    ReportError::BadField("row")
                } else {
                    ReportError::BadField("column")
                })?;
                return Ok(Step::Complete(geometry));
            }
            (state, byte) => {
                return Err(ReportError::UnexpectedByte {
                    byte,
                    state: state.describe(),
                });
            }
        }
        Ok(Step::NeedMore)
    }

    #[cfg(test)]
    fn is_done(&self) -> bool {
        self.state == State::Done
    }
}

impl State {
    fn describe(self) -> &'static str {
        match self {
            State::ExpectEsc => "escape",
            State::ExpectBracket => "bracket",
            State::Rows => "row",
            State::Cols => "column",
            State::Done => "finished report",
        }
    }
}

#[derive(Debug, Default)]
struct Field {
    value: u32,
    digits: usize,
}

impl Field {
    fn push(&mut self, digit: u8, name: &'static str) -> Result<(), ReportError> {
        if self.digits == MAX_FIELD_DIGITS {
            return Err(ReportError::BadField(name));
        }
        self.value = self.value * 10 + u32::from(digit - b'0');
        self.digits += 1;
        Ok(())
    }

    /// Zero is left to `ScreenGeometry::new`, which rejects it for both fields.
    fn finish(&self, name: &'static str) -> Result<u16, ReportError> {
        if self.digits == 0 {
            return Err(ReportError::BadField(name));
        }
        u16::try_from(self.value).map_err(|_| ReportError::BadField(name))
    }
}

/// Parse a complete reply held in memory. Trailing bytes after `R` are rejected.
pub fn parse_cursor_report(bytes: &[u8]) -> Result<ScreenGeometry, ReportError> {
    let mut parser = CursorReportParser::new();
    let mut iter = bytes.iter();
    while let Some(&byte) = iter.next() {
        if let Step::Complete(geometry) = parser.feed(byte)? {
            if let Some(&extra) = iter.next() {
                return Err(ReportError::UnexpectedByte {
                    byte: extra,
                    state: State::Done.describe(),
                });
            }
            return Ok(geometry);
        }
    }
    Err(ReportError::Truncated)
}
