//! The fontscale library rescales the metrics of TrueType/OpenType fonts.
//!
//! Every glyph outline coordinate, composite component offset and matrix, advance
//! width, and global metric (head bounding box, OS/2 typographic and win metrics,
//! hhea ascender/descender/line gap) is multiplied by a fixed pair of scale
//! factors and truncated toward zero. The font is then re-serialized with
//! `write-fonts`, which takes care of table offsets, checksums and the `loca`
//! format.
//!
//! Basic usage scales a font vertically by the default factor of 0.9:
//! ```no_run
//! use fontscale::config::ScaleFactors;
//! use std::error::Error;
//!
//! fn example() -> Result<(), Box<dyn Error>> {
//!     let report = fontscale::scale_font("in.ttf", "out.ttf", ScaleFactors::default())?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! For finer control the font can be loaded, scaled and saved in separate steps:
//! ```no_run
//! use fontscale::config::ScaleFactors;
//! use fontscale::font::Font;
//! use fontscale::scaler::FontScaler;
//!
//! fn example() -> Result<(), fontscale::ScaleError> {
//!     let mut font = Font::load("in.ttf")?;
//!     let scaler = FontScaler::new(ScaleFactors::new(0.8, 1.1));
//!     let stats = scaler.scale(&mut font);
//!     println!("{} simple glyphs scaled", stats.simple_glyphs);
//!     font.save("out.ttf")
//! }
//! ```
//!
//! ## Processing Flow
//! ```text
//! +-------------+     +------------------+     +----------------+
//! |  Input      |     |  Owned tables    |     |  Output        |
//! |  font bytes | --> |  glyf  hmtx head | --> |  FontBuilder   |
//! |  (FontRef)  |     |  OS/2  hhea      |     |  + raw tables  |
//! +-------------+     +------------------+     +----------------+
//!                              |
//!                        FontScaler::scale
//! ```

pub mod config;
pub mod font;
pub mod outline;
pub mod scaler;
pub mod summary;

use config::ScaleFactors;
use font::Font;
use log::{debug, info};
use scaler::{FontScaler, ScaleStats};
use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Represents errors that can occur while loading, scaling or saving a font.
#[derive(Debug)]
pub enum ScaleError {
    /// The input could not be read or the output could not be written
    FileError {
        message: String,
        path: String,
        suggestion: String,
        source: Option<io::Error>,
    },
    /// The data is not a parseable sfnt font, or one of its tables is malformed
    FormatError {
        message: String,
        table: Option<String>,
        suggestion: String,
    },
}

impl Error for ScaleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScaleError::FileError {
                source: Some(err), ..
            } => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScaleError::FileError {
                message,
                path,
                suggestion,
                ..
            } => {
                write!(f, "File Error: {}", message)?;
                write!(f, "\n   Path: {}", path)?;
                write!(f, "\n   Suggestion: {}", suggestion)?;
                Ok(())
            }
            ScaleError::FormatError {
                message,
                table,
                suggestion,
            } => {
                write!(f, "Font Format Error: {}", message)?;
                if let Some(tag) = table {
                    write!(f, " (table '{}')", tag)?;
                }
                write!(f, "\n   Suggestion: {}", suggestion)?;
                Ok(())
            }
        }
    }
}

impl ScaleError {
    /// Creates a file error for an input that could not be read
    pub fn unreadable(path: &Path, err: io::Error) -> Self {
        ScaleError::FileError {
            message: format!("Cannot read font file: {}", err),
            path: path.display().to_string(),
            suggestion: "Check that the file exists and is readable".to_string(),
            source: Some(err),
        }
    }

    /// Creates a file error for an output that could not be written
    pub fn unwritable(path: &Path, err: io::Error) -> Self {
        ScaleError::FileError {
            message: format!("Cannot write font file: {}", err),
            path: path.display().to_string(),
            suggestion: "Check that the output directory exists and you have write permissions"
                .to_string(),
            source: Some(err),
        }
    }

    /// Creates a format error that is not tied to a particular table
    pub fn format(message: impl Into<String>) -> Self {
        ScaleError::FormatError {
            message: message.into(),
            table: None,
            suggestion: "Make sure the input is a TrueType or OpenType font (.ttf/.otf)"
                .to_string(),
        }
    }

    /// Creates a format error for a malformed or rejected table
    pub fn table(tag: impl fmt::Display, message: impl Into<String>) -> Self {
        ScaleError::FormatError {
            message: message.into(),
            table: Some(tag.to_string()),
            suggestion: "The font may be damaged; try re-exporting it from its source".to_string(),
        }
    }

    /// Returns true for errors caused by the file system rather than the font data
    pub fn is_file_error(&self) -> bool {
        matches!(self, ScaleError::FileError { .. })
    }
}

/// Outcome of a successful [`scale_font`] call.
///
/// The `Display` implementation is the one-line confirmation printed by the CLI.
#[derive(Debug, Clone)]
pub struct ScaleReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub factors: ScaleFactors,
    pub stats: ScaleStats,
}

impl fmt::Display for ScaleReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "✓ Scaled: {} → {} (X={:?}, Y={:?})",
            self.input.display(),
            self.output.display(),
            self.factors.x,
            self.factors.y
        )
    }
}

/// Loads the font at `input`, scales it by `factors` and writes it to `output`.
///
/// The output file is created or overwritten. Nothing is written when loading or
/// scaling fails; a failure while writing may leave a partial file behind.
///
/// # Arguments
/// * `input` - Path of a TrueType/OpenType font
/// * `output` - Destination path for the scaled font
/// * `factors` - Horizontal and vertical scale factors
///
/// # Returns
/// * `Ok(ScaleReport)` describing what was scaled
/// * `Err(ScaleError)` if the font cannot be read, parsed or written
pub fn scale_font(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    factors: ScaleFactors,
) -> Result<ScaleReport, ScaleError> {
    let input = input.as_ref();
    let output = output.as_ref();

    debug!("Loading font from: {:?}", input);
    let mut font = Font::load(input)?;
    info!(
        "Loaded font with {} glyphs ({:?} outlines)",
        font.num_glyphs(),
        font.outline_kind()
    );

    let stats = FontScaler::new(factors).scale(&mut font);

    debug!("Writing scaled font to: {:?}", output);
    font.save(output)?;

    Ok(ScaleReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        factors,
        stats,
    })
}
