/// Font metric summaries
///
/// Provides a read-only snapshot of the metrics a shaping engine would see,
/// used to log the effect of a scaling pass.

use log::debug;
use skrifa::instance::{LocationRef, Size};
use skrifa::{FontRef, MetadataProvider};
use std::fmt;

/// Global metrics of a font in font units
#[derive(Debug, Clone, PartialEq)]
pub struct FontSummary {
    pub units_per_em: u16,
    pub glyph_count: u16,
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    pub cap_height: Option<f32>,
    pub x_height: Option<f32>,
    /// Font-wide bounding box: (xMin, yMin, xMax, yMax)
    pub bounds: Option<(f32, f32, f32, f32)>,
}

impl FontSummary {
    /// Summarize raw font bytes
    ///
    /// # Arguments
    ///
    /// * `data` - Raw font file bytes
    ///
    /// # Returns
    ///
    /// * `Result<Self, Box<dyn std::error::Error>>` - Summary or parse error
    pub fn from_bytes(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        let font = FontRef::new(data).map_err(|e| format!("Failed to parse font: {:?}", e))?;
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());

        let summary = FontSummary {
            units_per_em: metrics.units_per_em,
            glyph_count: metrics.glyph_count,
            ascent: metrics.ascent,
            descent: metrics.descent,
            leading: metrics.leading,
            cap_height: metrics.cap_height,
            x_height: metrics.x_height,
            bounds: metrics
                .bounds
                .map(|b| (b.x_min, b.y_min, b.x_max, b.y_max)),
        };
        debug!("Font summary: {}", summary);
        Ok(summary)
    }

    /// Distance from ascent to descent, in font units
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.leading
    }
}

impl fmt::Display for FontSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} glyphs, {} upem, ascent {}, descent {}, leading {}",
            self.glyph_count, self.units_per_em, self.ascent, self.descent, self.leading
        )?;
        if let Some(cap) = self.cap_height {
            write!(f, ", cap height {}", cap)?;
        }
        if let Some(x) = self.x_height {
            write!(f, ", x-height {}", x)?;
        }
        Ok(())
    }
}
