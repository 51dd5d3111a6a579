//! # Raw Mode
//!
//! `RawModeGuard` captures the terminal's line discipline, switches it to raw
//! mode and puts the captured attributes back exactly once: either through
//! [`RawModeGuard::restore`] or, if that never happens, when the guard drops
//! (early `?` return, panic unwind).
//!
//! Raw mode here is not `cfmakeraw`. The flag set is spelled out in
//! [`raw_attributes`] and reads use `VMIN = 0`, `VTIME = 1` so a read returns
//! after a tenth of a second even with nothing typed.

use std::io;
use std::os::fd::{AsFd, AsRawFd};

use log::{error, info};
use rustix::termios::{
    self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex,
    Termios,
};

use crate::tui::error::TerminalError;
use crate::tui::fatal;

/// Attributes captured before raw mode was entered. Never modified.
#[derive(Clone)]
pub struct SavedTerminalState(Termios);

impl SavedTerminalState {
    pub fn attributes(&self) -> &Termios {
        &self.0
    }
}

/// Read the current attributes of `fd`.
pub fn current_attributes<F: AsFd>(fd: F) -> Result<Termios, TerminalError> {
    termios::tcgetattr(fd).map_err(|e| TerminalError::Query(e.into()))
}

/// Apply `attributes` to `fd` after pending output drains (TCSAFLUSH).
fn apply_attributes<F: AsFd>(fd: F, attributes: &Termios) -> io::Result<()> {
    termios::tcsetattr(fd, OptionalActions::Flush, attributes)?;
    Ok(())
}

/// Derive raw-mode attributes from `original`, which is left untouched.
pub fn raw_attributes(original: &Termios) -> Termios {
    let mut raw = original.clone();
    raw.input_modes.remove(
        InputModes::BRKINT
            | InputModes::ICRNL
            | InputModes::INPCK
            | InputModes::ISTRIP
            | InputModes::IXON,
    );
    raw.output_modes.remove(OutputModes::OPOST);
    raw.control_modes.insert(ControlModes::CS8);
    raw.local_modes
        .remove(LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG);
    // read() returns as soon as any input exists, or after 100ms with none.
    raw.special_codes[SpecialCodeIndex::VMIN] = 0;
    raw.special_codes[SpecialCodeIndex::VTIME] = 1;
    raw
}

/// Owns the saved attributes for one raw-mode session on one descriptor.
pub struct RawModeGuard<F: AsFd> {
    fd: F,
    saved: Option<SavedTerminalState>,
}

impl<F: AsFd> RawModeGuard<F> {
    /// Enter raw mode on `fd`.
    pub fn enter(fd: F) -> Result<Self, TerminalError> {
        let saved = SavedTerminalState(current_attributes(&fd)?);
        let raw = raw_attributes(saved.attributes());
        apply_attributes(&fd, &raw).map_err(TerminalError::Configure)?;
        info!("Raw mode enabled on fd {}", fd.as_fd().as_raw_fd());
        Ok(Self {
            fd,
            saved: Some(saved),
        })
    }

    #[cfg(test)]
    fn saved(&self) -> Option<&SavedTerminalState> {
        self.saved.as_ref()
    }

    /// Put the original attributes back. Not retried on failure: the
    /// attributes may already be partially applied.
    pub fn restore(mut self) -> Result<(), TerminalError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), TerminalError> {
        let Some(saved) = self.saved.take() else {
            return Ok(());
        };
        apply_attributes(&self.fd, saved.attributes()).map_err(TerminalError::Restore)?;
        info!(
            "Terminal attributes restored on fd {}",
            self.fd.as_fd().as_raw_fd()
        );
        Ok(())
    }
}

impl<F: AsFd> Drop for RawModeGuard<F> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            error!("Failed to restore terminal during unwind: {e}");
            fatal::report(&e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_on_non_terminal_fails_with_query() {
        let file = tempfile::tempfile().unwrap();
        let err = RawModeGuard::enter(&file).err().unwrap();
        assert!(matches!(err, TerminalError::Query(_)));
    }

    #[cfg(target_os = "linux")]
    mod pty {
        use super::super::*;
        use crate::test_support::{OpenPty, same_attributes};

        /// Slave attributes with every flag raw mode touches switched on.
        fn cooked(pty: &OpenPty) -> Termios {
            let mut t = current_attributes(&pty.slave).unwrap();
            t.input_modes.insert(
                InputModes::BRKINT
                    | InputModes::ICRNL
                    | InputModes::INPCK
                    | InputModes::ISTRIP
                    | InputModes::IXON,
            );
            t.output_modes.insert(OutputModes::OPOST);
            t.local_modes.insert(
                LocalModes::ECHO
                    | LocalModes::ICANON
                    | LocalModes::IEXTEN
                    | LocalModes::ISIG
                    | LocalModes::ECHOE,
            );
            t.special_codes[SpecialCodeIndex::VMIN] = 1;
            t.special_codes[SpecialCodeIndex::VTIME] = 0;
            t
        }

        #[test]
        fn test_raw_attributes_clear_expected_flags() {
            let Some(pty) = OpenPty::open() else { return };
            let raw = raw_attributes(&cooked(&pty));
            assert!(!raw.input_modes.intersects(
                InputModes::BRKINT
                    | InputModes::ICRNL
                    | InputModes::INPCK
                    | InputModes::ISTRIP
                    | InputModes::IXON
            ));
            assert!(!raw.output_modes.contains(OutputModes::OPOST));
            assert!(!raw.local_modes.intersects(
                LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG
            ));
            assert!(raw.control_modes.contains(ControlModes::CS8));
            assert_eq!(raw.special_codes[SpecialCodeIndex::VMIN], 0);
            assert_eq!(raw.special_codes[SpecialCodeIndex::VTIME], 1);
        }

        #[test]
        fn test_raw_attributes_keep_unrelated_flags_and_original() {
            let Some(pty) = OpenPty::open() else { return };
            let original = cooked(&pty);
            let raw = raw_attributes(&original);
            assert!(raw.local_modes.contains(LocalModes::ECHOE));
            assert!(original.local_modes.contains(LocalModes::ICANON));
            assert_eq!(original.special_codes[SpecialCodeIndex::VMIN], 1);
        }

        #[test]
        fn test_restore_puts_back_captured_attributes() {
            let Some(pty) = OpenPty::open() else { return };
            let before = current_attributes(&pty.slave).unwrap();

            let guard = RawModeGuard::enter(&pty.slave).unwrap();
            let during = current_attributes(&pty.slave).unwrap();
            assert!(!during.local_modes.contains(LocalModes::ICANON));
            assert_eq!(during.special_codes[SpecialCodeIndex::VTIME], 1);
            assert!(same_attributes(guard.saved().unwrap().attributes(), &before));

            guard.restore().unwrap();
            assert!(same_attributes(
                &current_attributes(&pty.slave).unwrap(),
                &before
            ));
        }

        #[test]
        fn test_drop_restores_when_restore_was_not_called() {
            let Some(pty) = OpenPty::open() else { return };
            let before = current_attributes(&pty.slave).unwrap();

            fn fail_while_raw(tty: &std::fs::File) -> Result<(), TerminalError> {
                let _guard = RawModeGuard::enter(tty)?;
                Err(TerminalError::GeometryProbe("simulated".to_string()))
            }

            assert!(fail_while_raw(&pty.slave).is_err());
            assert!(same_attributes(
                &current_attributes(&pty.slave).unwrap(),
                &before
            ));
        }
    }
}
