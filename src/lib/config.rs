//! Configuration of scale factors.
//!
//! Scale factors normally come from the command line, but default values can be
//! provided in a TOML file:
//!
//! ```toml
//! [scale]
//! y = 0.85   # vertical factor, default 0.9
//! x = 1      # horizontal factor, default 1.0
//! ```
//!
//! Both integers and floats are accepted. Missing keys keep their built-in
//! defaults, and a file that cannot be read or parsed yields the defaults
//! with a warning rather than an error.

use log::{debug, warn};
use std::fs;
use std::path::Path;
use toml::Value;

/// Default vertical scale factor.
pub const DEFAULT_SCALE_Y: f64 = 0.9;

/// Default horizontal scale factor.
pub const DEFAULT_SCALE_X: f64 = 1.0;

/// Horizontal and vertical scale factors applied to one font.
///
/// Zero and negative values are accepted as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// Creates factors from the vertical and horizontal values, in CLI order.
    pub fn new(y: f64, x: f64) -> Self {
        ScaleFactors { x, y }
    }

    /// Factors that leave every value unchanged.
    pub fn identity() -> Self {
        ScaleFactors { x: 1.0, y: 1.0 }
    }

    /// Returns a copy with the provided overrides applied.
    pub fn with_overrides(self, y: Option<f64>, x: Option<f64>) -> Self {
        ScaleFactors {
            x: x.unwrap_or(self.x),
            y: y.unwrap_or(self.y),
        }
    }
}

impl Default for ScaleFactors {
    fn default() -> Self {
        ScaleFactors {
            x: DEFAULT_SCALE_X,
            y: DEFAULT_SCALE_Y,
        }
    }
}

/// Where the configuration is loaded from.
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource<'a> {
    /// Use the built-in defaults
    Default,
    /// Load configuration from a file path
    File(&'a Path),
    /// Use an in-memory TOML string
    Embedded(&'a str),
}

/// Reads a number that may be written as a TOML integer or float.
fn parse_number(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    if let Some(f) = value.as_float() {
        Some(f)
    } else {
        value.as_integer().map(|i| i as f64)
    }
}

/// Parses scale factors from a TOML string, falling back to defaults.
pub fn parse_config_string(config_str: &str) -> ScaleFactors {
    let config: Value = match toml::from_str(config_str) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring invalid configuration: {}", e);
            return ScaleFactors::default();
        }
    };

    let scale = config.get("scale");
    let factors = ScaleFactors::default().with_overrides(
        parse_number(scale.and_then(|s| s.get("y"))),
        parse_number(scale.and_then(|s| s.get("x"))),
    );
    debug!("Configured scale factors: {:?}", factors);
    factors
}

/// Loads scale factors from the given source.
pub fn load_config_from_source(source: ConfigSource) -> ScaleFactors {
    match source {
        ConfigSource::Default => ScaleFactors::default(),
        ConfigSource::File(path) => match fs::read_to_string(path) {
            Ok(s) => parse_config_string(&s),
            Err(e) => {
                warn!("Cannot read configuration {:?}: {}", path, e);
                ScaleFactors::default()
            }
        },
        ConfigSource::Embedded(content) => parse_config_string(content),
    }
}
