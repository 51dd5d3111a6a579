//! # Key Commands
//!
//! Every byte read from the terminal becomes a `KeyCommand`.
//! Ctrl+Q? That's `KeyCommand::Quit`. Anything else is `Unrecognized`.
//!
//! The `update()` function takes the current state and a command,
//! then returns the effect the caller must carry out. No I/O here.
//!
//! ```text
//! App + KeyCommand  →  update()  →  Effect
//! ```

use log::debug;

use crate::core::state::{App, RunState};

/// Mirrors what the Ctrl modifier does on a terminal: keeps the low five bits.
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1f
}

/// Reserved quit combination (Ctrl+Q, 0x11).
pub const QUIT_KEY: u8 = ctrl_key(b'q');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Unrecognized(u8),
}

/// What the main loop must do after a command has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
}

pub fn dispatch(byte: u8) -> KeyCommand {
    if byte == QUIT_KEY {
        KeyCommand::Quit
    } else {
        KeyCommand::Unrecognized(byte)
    }
}

pub fn update(app: &mut App, command: KeyCommand) -> Effect {
    if app.run_state == RunState::Terminated {
        return Effect::Quit;
    }
    match command {
        KeyCommand::Quit => {
            debug!("Quit requested");
            app.run_state = RunState::Terminated;
            Effect::Quit
        }
        KeyCommand::Unrecognized(byte) => {
            debug!("Ignoring key 0x{byte:02x}");
            Effect::None
        }
    }
}
