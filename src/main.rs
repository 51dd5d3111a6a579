use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tilde::GeometryStrategy;
use tilde::core::config::{self, CliOverrides, ResolvedConfig};
use tilde::tui::{self, fatal};

#[derive(Parser)]
#[command(name = "tilde", about = "Full-screen raw terminal, quit with Ctrl+Q")]
struct Args {
    /// How to determine the screen size
    #[arg(short, long, value_enum)]
    geometry: Option<GeometryStrategy>,

    /// Config file to read instead of ~/.tilde/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(config: &ResolvedConfig) {
    if config.log_level == LevelFilter::Off {
        return;
    }

    // Stdout belongs to the screen, so logs go to a file.
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let cli = CliOverrides {
        geometry: args.geometry,
        log_file: args.log_file,
        log_level: args.log_level,
    };

    let resolved = config::load_config(args.config.as_deref())
        .and_then(|file_config| config::resolve(&file_config, &cli));
    let resolved = match resolved {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("tilde: {e}");
            return ExitCode::from(fatal::FATAL_EXIT_CODE);
        }
    };

    init_logging(&resolved);
    log::info!("tilde starting, geometry strategy {:?}", resolved.geometry);

    if let Err(e) = tui::run(&resolved) {
        fatal::die(&e);
    }

    log::info!("tilde exited cleanly");
    ExitCode::SUCCESS
}
