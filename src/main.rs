//! CLI entry point for the screen text extractor.
//!
//! Replays a recorded screen through the full extraction pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Extract text from a recorded screen fixture
//! screen-text --replay feed.json
//!
//! # Same, with a specific configuration file
//! screen-text --replay feed.json --config-file ./config.toml
//!
//! # Print the effective configuration
//! screen-text --config
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use screen_text_extractor::{
    ExtractionSession, ExtractorConfig, ScreenTextExtractor, SimulatedScreen,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI command to execute
#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Run the extraction against a fixture
    Replay(PathBuf),
    /// Print the effective configuration as TOML
    PrintConfig,
    /// Show help message
    Help,
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    command: Command,
    config_path: Option<PathBuf>,
}

/// Parse command line arguments (without the program name)
fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut command = None;
    let mut config_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let next = match arg.as_str() {
            "--replay" | "-r" => {
                let path = iter
                    .next()
                    .ok_or("--replay requires a fixture path (e.g., --replay feed.json)")?;
                Command::Replay(PathBuf::from(path))
            }
            "--config" | "-c" => Command::PrintConfig,
            "--config-file" => {
                let path = iter.next().ok_or("--config-file requires a path")?;
                config_path = Some(PathBuf::from(path));
                continue;
            }
            "--help" | "-h" => Command::Help,
            other => return Err(format!("Unknown argument: {}", other)),
        };
        if command.replace(next).is_some() {
            return Err("Only one of --replay, --config, --help may be given".into());
        }
    }

    Ok(Invocation {
        command: command.unwrap_or(Command::Help),
        config_path,
    })
}

/// Print help message to stdout
fn print_help() {
    println!("screen-text - Reconstruct the full text of a screen from its element tree");
    println!();
    println!("USAGE:");
    println!("    screen-text [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -r, --replay <FIXTURE>     Extract text from a recorded screen (JSON)");
    println!("    -c, --config               Print the effective configuration");
    println!("        --config-file <PATH>   Read configuration from PATH");
    println!("    -h, --help                 Print this help message");
    println!();
    println!("OUTPUT:");
    println!("    All output is JSON formatted to stdout.");
    println!("    Logs are written to stderr (RUST_LOG overrides the configured level).");
}

fn load_config(path: Option<&Path>) -> ExtractorConfig {
    match path {
        Some(path) => ExtractorConfig::load_from_path(path.to_path_buf()),
        None => ExtractorConfig::load(),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the --replay command
async fn handle_replay(fixture: &Path, config: ExtractorConfig) -> i32 {
    let screen = match SimulatedScreen::load(fixture) {
        Ok(screen) => screen,
        Err(e) => {
            eprintln!("Error: cannot load {}: {}", fixture.display(), e);
            return 1;
        }
    };

    let extractor = ScreenTextExtractor::new(screen.clone(), screen.clipboard(), config);
    let session = ExtractionSession::start(extractor);
    let result = session.run().await;
    session.stop();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: extraction failed: {}", e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&outcome) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: cannot serialize output: {}", e);
            1
        }
    }
}

/// Handle the --config command
fn handle_print_config(config: &ExtractorConfig) -> i32 {
    match config.to_toml() {
        Ok(toml) => {
            print!("{}", toml);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information.");
            process::exit(1);
        }
    };

    let config = load_config(invocation.config_path.as_deref());
    init_logging(&config.general.log_level);
    debug!("Executing command: {:?}", invocation.command);

    let exit_code = match invocation.command {
        Command::Replay(fixture) => handle_replay(&fixture, config).await,
        Command::PrintConfig => handle_print_config(&config),
        Command::Help => {
            print_help();
            0
        }
    };

    process::exit(exit_code);
}
