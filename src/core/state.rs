//! # Application State
//!
//! Core state for tilde. Domain values only - no terminal handles.
//! The raw-mode guard lives in the `tui` module next to the file descriptor it owns.
//!
//! ```text
//! App
//! ├── geometry: ScreenGeometry   // resolved once at startup
//! ├── run_state: RunState        // Running → Terminated
//! └── row_marker: String         // drawn at the start of every row
//! ```
//!
//! State changes only happen through `update(state, command)` in action.rs.

use std::fmt;

/// Visible terminal size in character cells.
///
/// Both fields are always non-zero; `new` refuses anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    rows: u16,
    cols: u16,
}

impl ScreenGeometry {
    pub fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self { rows, cols })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }
}

impl fmt::Display for ScreenGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Lifecycle of the main loop. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

pub struct App {
    pub geometry: ScreenGeometry,
    pub run_state: RunState,
    pub row_marker: String,
}

impl App {
    pub fn new(geometry: ScreenGeometry, row_marker: String) -> Self {
        Self {
            geometry,
            run_state: RunState::Running,
            row_marker,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }
}
