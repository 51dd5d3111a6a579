use std::fmt;
use std::io;

use crate::core::cursor_report::ReportError;

/// Failures in the terminal core. Every variant is fatal.
#[derive(Debug)]
pub enum TerminalError {
    /// `tcgetattr` failed while capturing the original attributes.
    Query(io::Error),
    /// `tcsetattr` failed while entering raw mode.
    Configure(io::Error),
    /// `tcsetattr` failed while putting the original attributes back.
    Restore(io::Error),
    /// No geometry strategy produced a usable size.
    GeometryProbe(String),
    /// `read` failed for a reason other than the VTIME timeout.
    Read(io::Error),
    /// Output to the terminal failed.
    Write(io::Error),
}

impl TerminalError {
    /// The operation that failed, as shown to the operator.
    pub fn operation(&self) -> &'static str {
        match self {
            TerminalError::Query(_) => "tcgetattr",
            TerminalError::Configure(_) | TerminalError::Restore(_) => "tcsetattr",
            TerminalError::GeometryProbe(_) => "get window size",
            TerminalError::Read(_) => "read",
            TerminalError::Write(_) => "write",
        }
    }
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.operation();
        match self {
            TerminalError::Query(e)
            | TerminalError::Configure(e)
            | TerminalError::Restore(e)
            | TerminalError::Read(e)
            | TerminalError::Write(e) => write!(f, "{op}: {e}"),
            TerminalError::GeometryProbe(reason) => write!(f, "{op}: {reason}"),
        }
    }
}

impl std::error::Error for TerminalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerminalError::Query(e)
            | TerminalError::Configure(e)
            | TerminalError::Restore(e)
            | TerminalError::Read(e)
            | TerminalError::Write(e) => Some(e),
            TerminalError::GeometryProbe(_) => None,
        }
    }
}

impl From<ReportError> for TerminalError {
    fn from(e: ReportError) -> Self {
        TerminalError::GeometryProbe(e.to_string())
    }
}
