//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tilde/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Only process wiring reads this. The terminal core receives plain values.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::GeometryStrategy;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TildeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScreenConfig {
    pub row_marker: Option<String>,
    pub geometry: Option<GeometryStrategy>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub geometry: Option<GeometryStrategy>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "tilde.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const DEFAULT_ROW_MARKER: &str = "~";

pub const ENV_LOG_LEVEL: &str = "TILDE_LOG";
pub const ENV_LOG_FILE: &str = "TILDE_LOG_FILE";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub row_marker: String,
    pub geometry: GeometryStrategy,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config value: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.tilde/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tilde").join("config.toml"))
}

/// Load config from `explicit` if given, otherwise from `~/.tilde/config.toml`.
///
/// A missing explicit path is an error. A missing default file is generated
/// and `TildeConfig::default()` returned.
pub fn load_config(explicit: Option<&Path>) -> Result<TildeConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(TildeConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TildeConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<TildeConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TildeConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# tilde configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "tilde.log"             # Or set TILDE_LOG_FILE
# log_level = "info"                 # off, error, warn, info, debug, trace (or TILDE_LOG)

# [screen]
# row_marker = "~"                   # Drawn at the start of every empty row
# geometry = "auto"                  # "auto", "window-size" or "cursor-probe"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TildeConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env<F>(
    config: &TildeConfig,
    cli: &CliOverrides,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Log file: CLI → env → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env(ENV_LOG_FILE).map(PathBuf::from))
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Log level: CLI → env → config → default
    let log_level = match cli
        .log_level
        .clone()
        .or_else(|| env(ENV_LOG_LEVEL))
        .or_else(|| config.general.log_level.clone())
    {
        Some(level) => level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{level}'")))?,
        None => DEFAULT_LOG_LEVEL,
    };

    let row_marker = config
        .screen
        .row_marker
        .clone()
        .unwrap_or_else(|| DEFAULT_ROW_MARKER.to_string());
    if row_marker.contains(['\r', '\n']) {
        return Err(ConfigError::Invalid(
            "row_marker must not contain line breaks".to_string(),
        ));
    }

    // Geometry: CLI → config → default
    let geometry = cli
        .geometry
        .or(config.screen.geometry)
        .unwrap_or_default();

    Ok(ResolvedConfig {
        log_file,
        log_level,
        row_marker,
        geometry,
    })
}
