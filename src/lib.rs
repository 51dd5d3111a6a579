//! tilde library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where the screen size comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryStrategy {
    /// Ask the OS for the window size, fall back to the cursor probe
    #[default]
    Auto,
    /// Only ask the OS for the window size
    WindowSize,
    /// Only use the cursor position report
    CursorProbe,
}
