//! The scaling pass.
//!
//! Every quantity is multiplied in `f64` and truncated toward zero. Results
//! outside the range of the destination field saturate at its bounds, so a
//! negative factor applied to an unsigned field yields 0.

use crate::config::ScaleFactors;
use crate::font::{Font, HorizontalMetrics, OutlineKind};
use crate::outline::{Component, Glyph, Placement, SimpleOutline};
use log::{debug, info, trace, warn};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::os2::Os2;
use write_fonts::types::FWord;

/// Extra factor applied to line gaps on top of the vertical scale.
pub const LINE_GAP_DAMPING: f64 = 0.8;

/// Truncates `value * factor` toward zero into an `i16`.
pub fn scale_i16(value: i16, factor: f64) -> i16 {
    (value as f64 * factor) as i16
}

/// Truncates `value * factor` toward zero into a `u16`.
pub fn scale_u16(value: u16, factor: f64) -> u16 {
    (value as f64 * factor) as u16
}

fn scale_fword(value: FWord, factor: f64) -> FWord {
    FWord::new(scale_i16(value.to_i16(), factor))
}

fn scale_line_gap(value: i16, scale_y: f64) -> i16 {
    (value as f64 * scale_y * LINE_GAP_DAMPING) as i16
}

/// Counts of what one pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleStats {
    pub simple_glyphs: usize,
    pub composite_glyphs: usize,
    pub empty_glyphs: usize,
    pub metrics: usize,
    /// Outline format left unscaled, if any
    pub skipped_outlines: Option<OutlineKind>,
}

/// Applies one pair of scale factors to every spatial table of a font.
#[derive(Debug, Clone, Copy)]
pub struct FontScaler {
    factors: ScaleFactors,
}

impl FontScaler {
    pub fn new(factors: ScaleFactors) -> Self {
        FontScaler { factors }
    }

    pub fn factors(&self) -> ScaleFactors {
        self.factors
    }

    /// Scales all tables present in `font` and marks it for bbox recomputation.
    pub fn scale(&self, font: &mut Font) -> ScaleStats {
        let mut stats = ScaleStats::default();
        info!(
            "Scaling font: X={} Y={}",
            self.factors.x, self.factors.y
        );

        match font.outline_kind() {
            OutlineKind::TrueType => {
                if let Some(glyphs) = font.glyphs_mut() {
                    for glyph in glyphs.iter_mut() {
                        match glyph {
                            Glyph::Empty => stats.empty_glyphs += 1,
                            Glyph::Simple(simple) => {
                                self.scale_simple(simple);
                                stats.simple_glyphs += 1;
                            }
                            Glyph::Composite(composite) => {
                                for component in composite.components.iter_mut() {
                                    self.scale_component(component);
                                }
                                stats.composite_glyphs += 1;
                            }
                        }
                    }
                }
                debug!(
                    "glyf: {} simple, {} composite, {} empty",
                    stats.simple_glyphs, stats.composite_glyphs, stats.empty_glyphs
                );
            }
            kind @ (OutlineKind::Cff | OutlineKind::Cff2) => {
                warn!("CFF font scaling not implemented; {:?} outlines left unchanged", kind);
                stats.skipped_outlines = Some(kind);
            }
            OutlineKind::None => debug!("No outline table"),
        }

        if let Some(hmtx) = font.hmtx_mut() {
            stats.metrics = self.scale_hmtx(hmtx);
            debug!("hmtx: {} metrics scaled", stats.metrics);
        }
        if let Some(head) = font.head_mut() {
            self.scale_head(head);
        }
        if let Some(os2) = font.os2_mut() {
            self.scale_os2(os2);
        }
        if let Some(hhea) = font.hhea_mut() {
            self.scale_hhea(hhea);
        }

        font.set_recalc_bboxes(true);
        stats
    }

    /// Scales every point of a simple glyph.
    pub fn scale_simple(&self, simple: &mut SimpleOutline) {
        for point in simple.points_mut() {
            point.x = scale_i16(point.x, self.factors.x);
            point.y = scale_i16(point.y, self.factors.y);
        }
    }

    /// Scales a component's offset and, when present, its matrix.
    ///
    /// Point-anchored components carry no offset and keep their placement.
    pub fn scale_component(&self, component: &mut Component) {
        let ScaleFactors { x, y } = self.factors;
        if let Placement::Offset { dx, dy } = &mut component.placement {
            *dx = scale_i16(*dx, x);
            *dy = scale_i16(*dy, y);
        }
        if let Some(m) = component.matrix.as_mut() {
            m.xx = (m.xx as f64 * x) as f32;
            m.xy = (m.xy as f64 * x) as f32;
            m.yx = (m.yx as f64 * y) as f32;
            m.yy = (m.yy as f64 * y) as f32;
        }
    }

    /// Scales advances and left side bearings, both horizontally.
    pub fn scale_hmtx(&self, hmtx: &mut HorizontalMetrics) -> usize {
        for metric in hmtx.metrics.iter_mut() {
            metric.advance = scale_u16(metric.advance, self.factors.x);
            metric.lsb = scale_i16(metric.lsb, self.factors.x);
        }
        hmtx.metrics.len()
    }

    pub fn scale_head(&self, head: &mut Head) {
        let ScaleFactors { x, y } = self.factors;
        head.x_min = scale_i16(head.x_min, x);
        head.x_max = scale_i16(head.x_max, x);
        head.y_min = scale_i16(head.y_min, y);
        head.y_max = scale_i16(head.y_max, y);
        trace!(
            "head bbox: ({}, {}) - ({}, {})",
            head.x_min,
            head.y_min,
            head.x_max,
            head.y_max
        );
    }

    pub fn scale_os2(&self, os2: &mut Os2) {
        let y = self.factors.y;
        os2.s_typo_ascender = scale_i16(os2.s_typo_ascender, y);
        os2.s_typo_descender = scale_i16(os2.s_typo_descender, y);
        os2.s_typo_line_gap = scale_line_gap(os2.s_typo_line_gap, y);
        os2.us_win_ascent = scale_u16(os2.us_win_ascent, y);
        os2.us_win_descent = scale_u16(os2.us_win_descent, y);
        if let Some(cap_height) = os2.s_cap_height.as_mut() {
            *cap_height = scale_i16(*cap_height, y);
        }
        if let Some(x_height) = os2.sx_height.as_mut() {
            *x_height = scale_i16(*x_height, y);
        }
        trace!(
            "OS/2: typo {}/{}/{} win {}/{}",
            os2.s_typo_ascender,
            os2.s_typo_descender,
            os2.s_typo_line_gap,
            os2.us_win_ascent,
            os2.us_win_descent
        );
    }

    pub fn scale_hhea(&self, hhea: &mut Hhea) {
        let y = self.factors.y;
        hhea.ascender = scale_fword(hhea.ascender, y);
        hhea.descender = scale_fword(hhea.descender, y);
        hhea.line_gap = FWord::new(scale_line_gap(hhea.line_gap.to_i16(), y));
    }
}
