//! # Core Logic
//!
//! Everything here is pure: no file descriptors, no escape sequences written,
//! no reads. The `tui` module drives these pieces against a real terminal.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (App)          │
//!                    │  • KeyCommand + update  │
//!                    │  • Cursor report parser │
//!                    │  • Config resolution    │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  (termios, │
//!                         │   stdin)   │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `App` and `ScreenGeometry`
//! - [`action`]: `KeyCommand`, `dispatch()` and the `update()` reducer
//! - [`cursor_report`]: decoder for `ESC[<rows>;<cols>R`
//! - [`config`]: `~/.tilde/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod cursor_report;
pub mod state;
