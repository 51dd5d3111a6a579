//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use crate::core::state::{App, ScreenGeometry};
use crate::tui::error::TerminalError;
use crate::tui::geometry::GeometryProbe;

enum ScriptStep {
    Byte(u8),
    Timeout,
    Fail(io::ErrorKind),
}

/// Input side of a fake terminal. Once the script runs out, every read
/// behaves like a VTIME timeout.
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
}

impl ScriptedInput {
    /// Bytes not consumed yet, skipping scripted timeouts and failures.
    pub fn remaining(&self) -> Vec<u8> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                ScriptStep::Byte(b) => Some(*b),
                _ => None,
            })
            .collect()
    }
}

impl Read for ScriptedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.steps.pop_front() {
            Some(ScriptStep::Byte(b)) => {
                buf[0] = b;
                Ok(1)
            }
            Some(ScriptStep::Fail(kind)) => Err(io::Error::from(kind)),
            Some(ScriptStep::Timeout) | None => Ok(0),
        }
    }
}

/// A fake terminal: scripted input, captured output.
pub struct ScriptedTerminal {
    pub input: ScriptedInput,
    pub output: Vec<u8>,
}

impl ScriptedTerminal {
    fn from_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            input: ScriptedInput {
                steps: steps.into_iter().collect(),
            },
            output: Vec::new(),
        }
    }

    pub fn new(bytes: &[u8]) -> Self {
        Self::from_steps(bytes.iter().copied().map(ScriptStep::Byte))
    }

    /// `None` entries are reads that time out with nothing available.
    pub fn with_timeouts(script: &[Option<u8>]) -> Self {
        Self::from_steps(script.iter().map(|step| match step {
            Some(b) => ScriptStep::Byte(*b),
            None => ScriptStep::Timeout,
        }))
    }

    /// The first read fails with `kind`.
    pub fn failing(kind: io::ErrorKind) -> Self {
        Self::from_steps([ScriptStep::Fail(kind)])
    }
}

impl Read for ScriptedTerminal {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A geometry probe with a canned answer.
pub struct FixedProbe {
    result: Result<(u16, u16), &'static str>,
}

impl FixedProbe {
    pub fn ok(rows: u16, cols: u16) -> Self {
        Self {
            result: Ok((rows, cols)),
        }
    }

    pub fn failing(reason: &'static str) -> Self {
        Self {
            result: Err(reason),
        }
    }
}

impl GeometryProbe for FixedProbe {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn probe(
        &self,
        _input: &mut dyn Read,
        _output: &mut dyn Write,
    ) -> Result<ScreenGeometry, TerminalError> {
        let (rows, cols) = self
            .result
            .map_err(|reason| TerminalError::GeometryProbe(reason.to_string()))?;
        ScreenGeometry::new(rows, cols)
            .ok_or_else(|| TerminalError::GeometryProbe("zero dimension".to_string()))
    }
}

/// Creates a test App with a 24x80 screen and the default marker.
pub fn test_app() -> App {
    App::new(ScreenGeometry::new(24, 80).unwrap(), "~".to_string())
}

/// A pseudo-terminal pair, so termios calls have a real tty to act on.
#[cfg(target_os = "linux")]
pub struct OpenPty {
    pub master: std::os::fd::OwnedFd,
    pub slave: std::fs::File,
}

#[cfg(target_os = "linux")]
impl OpenPty {
    /// `None` when the environment has no pty support (some sandboxes).
    pub fn open() -> Option<Self> {
        use rustix::fs::{Mode, OFlags};
        use rustix::pty::{OpenptFlags, grantpt, openpt, ptsname, unlockpt};

        let master = openpt(OpenptFlags::RDWR | OpenptFlags::NOCTTY).ok()?;
        grantpt(&master).ok()?;
        unlockpt(&master).ok()?;
        let path = ptsname(&master, Vec::new()).ok()?;

        let slave = rustix::fs::open(path.as_c_str(), OFlags::RDWR | OFlags::NOCTTY, Mode::empty())
            .ok()?;
        Some(Self {
            master,
            slave: std::fs::File::from(slave),
        })
    }
}

/// Compares the parts of two termios values that raw mode can change.
pub fn same_attributes(a: &rustix::termios::Termios, b: &rustix::termios::Termios) -> bool {
    use rustix::termios::SpecialCodeIndex;

    let codes = [
        SpecialCodeIndex::VMIN,
        SpecialCodeIndex::VTIME,
        SpecialCodeIndex::VINTR,
        SpecialCodeIndex::VEOF,
    ];
    a.input_modes == b.input_modes
        && a.output_modes == b.output_modes
        && a.control_modes == b.control_modes
        && a.local_modes == b.local_modes
        && codes
            .iter()
            .all(|&i| a.special_codes[i] == b.special_codes[i])
}
