//! stenospeak main entry point
//!
//! Usage: `stenospeak [--debug|-d] [all|index|speak]`
//!
//! `all` (the default) indexes the steno dictionary, then reads the sentence
//! script aloud. `index` prints the simple pairs as JSON. `speak` only reads
//! the script.

use log::{debug, error, info};
use std::process;
use stenospeak::app::{index_dictionary, open_session, speak_script};
use stenospeak::config::Config;
use stenospeak::Result;

/// Which flows to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    All,
    Index,
    Speak,
}

fn main() {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug_mode = args.iter().any(|arg| arg == "--debug" || arg == "-d");

    // Initialize logger
    if debug_mode {
        // Debug mode: write to stenospeak.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("stenospeak.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open stenospeak.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "stenospeak version {} starting (debug mode, logging to stenospeak.log)",
            stenospeak::VERSION
        );
    } else {
        // Normal mode: minimal logging to stderr, only errors
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }

    let mut mode = Mode::All;
    for arg in args.iter().filter(|arg| *arg != "--debug" && *arg != "-d") {
        mode = match arg.as_str() {
            "all" => Mode::All,
            "index" => Mode::Index,
            "speak" => Mode::Speak,
            "-h" | "--help" => {
                println!("Usage: {} [--debug|-d] [all|index|speak]", stenospeak::APP_NAME);
                return;
            }
            other => {
                eprintln!("Error: unknown argument '{}'", other);
                eprintln!("Usage: {} [--debug|-d] [all|index|speak]", stenospeak::APP_NAME);
                process::exit(2);
            }
        };
    }

    // Run the application
    if let Err(e) = run(mode) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(mode: Mode) -> Result<()> {
    debug!("Running in {:?} mode", mode);

    let config = Config::load()?;
    info!("Configuration loaded from {:?}", config.path());

    if mode != Mode::Speak {
        let pairs = index_dictionary(&config)?;
        if mode == Mode::Index {
            println!("{}", serde_json::to_string_pretty(&pairs)?);
            return Ok(());
        }
    }

    let mut session = open_session(&config)?;
    speak_script(&config, &mut session)
}
