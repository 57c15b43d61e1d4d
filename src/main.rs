mod core;

use crate::core::{
    ConfigManagerOperations, CoreConfigManager, CoreExtractor, CoreLookupLoader,
    ExtractionRequest, execute_run,
};
use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

/// Copies files from source trees into a flat destination folder, renaming
/// each file with the display name looked up from the 6-digit identifier in
/// its folder's name. Files under a "TE LAAT" folder are routed to the
/// destination's "TE LAAT" subfolder and counted separately.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Source folder(s) to extract from (repeatable)
    #[arg(short = 'f', long = "from", required = true, num_args = 1..)]
    sources: Vec<PathBuf>,

    /// Destination folder to extract to
    #[arg(short = 't', long = "to")]
    destination: PathBuf,

    /// Lookup table file (CSV: identifier, display name). Defaults to the
    /// last used path when omitted.
    #[arg(short = 'l', long = "lookup")]
    lookup: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {e}");
    }

    let config_manager = CoreConfigManager::new();

    // Resolve the lookup path: an explicit --lookup wins and becomes the new
    // remembered path; otherwise fall back to the persisted last-used one.
    // Persistence failures are logged and never block the run.
    let lookup_path = match &cli.lookup {
        Some(path) => {
            if let Err(e) = config_manager.save_last_lookup_path(path) {
                log::warn!("Could not remember lookup path {path:?}: {e}");
            }
            path.clone()
        }
        None => {
            let remembered = match config_manager.load_last_lookup_path() {
                Ok(remembered) => remembered,
                Err(e) => {
                    log::warn!("Could not load remembered lookup path: {e}");
                    None
                }
            };
            match remembered {
                Some(path) => {
                    log::info!("Using remembered lookup table: {path:?}");
                    path
                }
                None => {
                    eprintln!(
                        "Error: no lookup table given (--lookup) and no remembered path found."
                    );
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    let request = ExtractionRequest::new(cli.sources, cli.destination, lookup_path);

    match execute_run(&request, &CoreLookupLoader::new(), &CoreExtractor::new()) {
        Ok(counters) => {
            println!(
                "Files have been extracted and renamed: {} on time, {} too late.",
                counters.on_time, counters.late
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
