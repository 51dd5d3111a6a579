//! # Raw Input
//!
//! Reads one byte at a time from the terminal. With `VMIN = 0, VTIME = 1`
//! a read returns zero bytes after ~100ms of silence; that is a normal
//! "nothing yet" answer and never an error.

use std::io::{self, Read};
use std::os::fd::AsFd;

use crate::tui::error::TerminalError;

/// Unbuffered reader over a file descriptor.
///
/// `std::io::Stdin` keeps its own buffer, which would swallow bytes that
/// belong to the next key or to a cursor report.
#[derive(Debug)]
pub struct TerminalInput<F: AsFd> {
    fd: F,
}

impl<F: AsFd> TerminalInput<F> {
    pub fn new(fd: F) -> Self {
        Self { fd }
    }
}

impl TerminalInput<io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<F: AsFd> Read for TerminalInput<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(rustix::io::read(&self.fd, buf)?)
    }
}

/// Issue a single read. `Ok(None)` means the timeout elapsed with no input.
pub fn poll_byte<R: Read + ?Sized>(input: &mut R) -> Result<Option<u8>, TerminalError> {
    let mut byte = [0u8; 1];
    match input.read(&mut byte) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(byte[0])),
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
            Ok(None)
        }
        Err(e) => Err(TerminalError::Read(e)),
    }
}

/// Block (in timeout-sized steps) until one byte arrives.
pub fn read_key<R: Read + ?Sized>(input: &mut R) -> Result<u8, TerminalError> {
    loop {
        if let Some(byte) = poll_byte(input)? {
            return Ok(byte);
        }
    }
}
