/// Font scaling utility binary entry point
///
/// Rescales the vertical (and optionally horizontal) metrics of a font.
///
/// # Examples
///
/// Shrink a font vertically to 90%:
/// ```sh
/// cargo run --bin fontscale -- fonts/DejaVuSans.ttf out/DejaVuSans-short.ttf
/// ```
///
/// Explicit factors with debug output:
/// ```sh
/// cargo run --bin fontscale -- -v fonts/DejaVuSans.ttf out.ttf 0.85 1.05
/// ```
use clap::Parser;
use fontscale::summary::FontSummary;
use fontscale::ScaleError;
use log::{debug, error, info};
use std::fs;
use std::process;

mod args;
mod logging;

use args::ScaleArgs;
use logging::init_logging;

fn main() {
    let args = ScaleArgs::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    debug!("Parsed arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

/// Main entry point for font scaling logic
fn run(args: &ScaleArgs) -> Result<(), ScaleError> {
    let factors = args.scale_factors();
    log_summary("Input", &args.input);

    let report = fontscale::scale_font(&args.input, &args.output, factors)?;
    info!(
        "{} simple and {} composite glyphs scaled, {} metrics updated",
        report.stats.simple_glyphs, report.stats.composite_glyphs, report.stats.metrics
    );

    log_summary("Output", &args.output);
    println!("{}", report);
    Ok(())
}

/// Logs the global metrics of a font file at debug level
fn log_summary(label: &str, path: &std::path::Path) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    match fs::read(path).map_err(|e| e.to_string()).and_then(|data| {
        FontSummary::from_bytes(&data).map_err(|e| e.to_string())
    }) {
        Ok(summary) => debug!("{} font: {}", label, summary),
        Err(e) => debug!("{} font summary unavailable: {}", label, e),
    }
}
