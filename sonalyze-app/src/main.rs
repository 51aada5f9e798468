//! Sonalyze terminal application entry point.
//!
//! Wiring: settings load → session state → optional input-directory
//! autoload → line-oriented REPL. Diagnostics go to stderr through
//! `tracing` so command output on stdout stays clean.

mod commands;
mod settings;
mod state;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sonalyze_core::EndpointDetector;

use commands::Outcome;
use settings::{default_settings_path, load_settings, save_settings};
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "sonalyze")]
#[command(about = "Interactive speech endpoint analysis")]
struct Cli {
    /// Settings file (platform data directory when omitted).
    #[arg(short = 's', long = "settings")]
    settings_path: Option<PathBuf>,

    /// Override the input directory waves are loaded from.
    #[arg(short = 'i', long = "input")]
    input_dir: Option<PathBuf>,

    /// Override the output directory exports are written to.
    #[arg(short = 'o', long = "output")]
    output_dir: Option<PathBuf>,

    /// Load every WAV file from the input directory at startup.
    #[arg(long = "autoload", default_value_t = false)]
    autoload: bool,

    /// Seed for the harmonic generator (entropy when omitted).
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let settings_path = cli.settings_path.unwrap_or_else(default_settings_path);
    let mut settings = load_settings(&settings_path);
    if !settings_path.exists() {
        // First run: write the defaults so the operator has a file to edit.
        if let Err(e) = save_settings(&settings_path, &settings) {
            tracing::warn!(path = %settings_path.display(), error = %e, "cannot write settings file");
        }
    }
    if let Some(dir) = cli.input_dir {
        settings.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        settings.output_dir = dir;
    }

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut state = AppState::new(EndpointDetector::new(settings.endpoint_config()), rng);

    info!(
        settings = %settings_path.display(),
        input_dir = %settings.input_dir.display(),
        output_dir = %settings.output_dir.display(),
        "session started"
    );

    if cli.autoload {
        commands::autoload(&mut state, &settings);
    }

    println!("sonalyze — type 'help' for commands");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF — same graceful exit as `quit`.
            println!();
            break;
        }
        if commands::dispatch(&mut state, &settings, &line) == Outcome::Quit {
            break;
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_env_var("SONALYZE_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
