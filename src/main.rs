// AmfDigest - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Running the pipeline from the chosen input to stdout

use amfdigest::app::pipeline;
use amfdigest::app::source::InputSource;
use amfdigest::core::emitter::SystemClock;
use amfdigest::core::model::RunSummary;
use amfdigest::core::output::OutputFormat;
use amfdigest::platform::config::{load_config, PlatformPaths};
use amfdigest::util;
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// AmfDigest - condense AMF/NAS/NGAP trace logs into one line per event.
///
/// Reads a trace file (or standard input), prints each notable protocol or
/// state event as `[timestamp] label`, and drops immediate repeats.
#[derive(Parser, Debug)]
#[command(name = "amfdigest", version, about)]
struct Cli {
    /// Trace file to read (standard input if omitted).
    path: Option<PathBuf>,

    /// Output format: text, json, or csv.
    #[arg(short = 'f', long = "format")]
    format: Option<OutputFormat>,

    /// Enable debug logging on stderr (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging starts so its level can take effect;
    // problems are reported once the subscriber is up.
    let platform_paths = PlatformPaths::resolve();
    let (config, config_problems) = load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %platform_paths.config_file().display(),
        "AmfDigest starting"
    );
    for problem in &config_problems {
        tracing::warn!(error = %problem, "Config problem; using default");
    }

    let format = cli.format.unwrap_or(config.output_format);
    let source = InputSource::from_arg(cli.path);
    tracing::debug!(input = %source, format = %format, "Input resolved");

    match run(&source, format) {
        Ok(_) => {}
        Err(e) if e.is_broken_pipe() => {
            tracing::debug!("Output closed by reader; stopping");
        }
        Err(e) => {
            tracing::error!(error = %e, input = %source, "Run failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(source: &InputSource, format: OutputFormat) -> util::error::Result<RunSummary> {
    let reader = source.open()?;
    let (summary, _) = pipeline::run(reader, io::stdout().lock(), format, &SystemClock)?;
    Ok(summary)
}
