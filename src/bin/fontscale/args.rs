/// Command-line argument parsing module
///
/// Positional arguments follow `<INPUT> <OUTPUT> [SCALE_Y] [SCALE_X]`. Verbosity
/// is controlled with -v, -vv, -q, --verbose-level or the RUST_LOG environment
/// variable.

use clap::Parser;
use fontscale::config::{load_config_from_source, ConfigSource, ScaleFactors};
use std::path::PathBuf;

/// Rescale the vertical (and optionally horizontal) metrics of a font
///
/// Scales glyph outlines, composite offsets, advance widths and global metrics
/// (bounding box, ascender, descender, line gap, win metrics, cap/x-height)
/// of a TrueType/OpenType font and writes the result to a new file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ScaleArgs {
    /// Path to the font to scale
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path of the scaled font to write (overwritten if it exists)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Vertical scale factor [default: 0.9]
    #[arg(value_name = "SCALE_Y", allow_negative_numbers = true)]
    pub scale_y: Option<f64>,

    /// Horizontal scale factor [default: 1.0]
    #[arg(value_name = "SCALE_X", allow_negative_numbers = true)]
    pub scale_x: Option<f64>,

    /// TOML file providing default scale factors ([scale] y = .., x = ..)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease verbosity level (suppress most output except errors)
    #[arg(short)]
    pub quiet: bool,

    /// Set explicit verbosity level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub verbose_level: Option<String>,
}

impl ScaleArgs {
    /// Resolve the scale factors: positional values override the config file,
    /// which overrides the built-in defaults
    pub fn scale_factors(&self) -> ScaleFactors {
        let source = match &self.config {
            Some(path) => ConfigSource::File(path),
            None => ConfigSource::Default,
        };
        load_config_from_source(source).with_overrides(self.scale_y, self.scale_x)
    }

    /// Determine the effective log level based on CLI flags and environment variables
    ///
    /// Priority:
    /// 1. RUST_LOG environment variable (highest priority)
    /// 2. --verbose-level flag
    /// 3. -q flag, then the count of -v flags (lowest priority)
    pub fn effective_log_level(&self) -> String {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            return rust_log;
        }
        self.log_level_from_flags()
    }

    fn log_level_from_flags(&self) -> String {
        if let Some(level) = &self.verbose_level {
            return level.clone();
        }

        if self.quiet {
            return "error".to_string();
        }

        match self.verbose {
            0 => "info".to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}
