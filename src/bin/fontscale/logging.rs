/// Logging initialization module
///
/// Handles initialization of env_logger based on CLI arguments and environment variables.
/// The RUST_LOG environment variable takes precedence over CLI flags.

use crate::args::ScaleArgs;
use env_logger::Builder;
use log::LevelFilter;

/// Map a level name to a filter, `None` for module-style RUST_LOG directives
fn level_filter(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "off" => Some(LevelFilter::Off),
        _ => None,
    }
}

/// Initialize logging based on CLI arguments and environment variables
///
/// Log records go to stderr as `[LEVEL] message`, leaving stdout for the
/// confirmation line.
pub fn init_logging(args: &ScaleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Builder::new();

    let level_str = args.effective_log_level();
    match level_filter(&level_str) {
        Some(filter) => {
            builder.filter_level(filter);
        }
        None => {
            builder.filter_level(LevelFilter::Info);
            builder.parse_filters(&level_str);
        }
    }

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    builder
        .try_init()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(level_filter("off"), Some(LevelFilter::Off));
        assert_eq!(level_filter("fontscale=trace"), None);
    }
}
