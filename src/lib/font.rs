//! Owned, mutable view of a font.
//!
//! [`Font`] parses the tables that carry spatial or metric quantities into owned
//! values and keeps the original bytes so every other table can be copied
//! through unchanged when the font is saved.

use crate::outline::{self, Glyph};
use crate::ScaleError;
use log::{debug, trace, warn};
use read_fonts::types::{GlyphId, GlyphId16, Tag};
use read_fonts::{FontRef, ReadError, TableProvider};
use std::fs;
use std::path::Path;
use write_fonts::from_obj::ToOwnedTable;
use write_fonts::tables::glyf::{Bbox, GlyfLocaBuilder};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::os2::Os2;
use write_fonts::types::{FWord, UfWord};
use write_fonts::FontBuilder;

const GLYF: Tag = Tag::new(b"glyf");
const CFF: Tag = Tag::new(b"CFF ");
const CFF2: Tag = Tag::new(b"CFF2");

/// Which outline table a font uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    TrueType,
    Cff,
    Cff2,
    /// No outline table at all
    None,
}

/// Advance width and left side bearing of one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metric {
    pub advance: u16,
    pub lsb: i16,
}

/// Contents of the `hmtx` table, indexed by glyph id.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalMetrics {
    pub metrics: Vec<Metric>,
    /// Number of entries stored as full (advance, lsb) records
    pub number_of_long_metrics: usize,
}

impl HorizontalMetrics {
    fn to_write(&self) -> Hmtx {
        let long = self.number_of_long_metrics.min(self.metrics.len());
        let h_metrics = self.metrics[..long]
            .iter()
            .map(|m| LongMetric {
                advance: m.advance,
                side_bearing: m.lsb,
            })
            .collect();
        let left_side_bearings = self.metrics[long..].iter().map(|m| m.lsb).collect();
        Hmtx {
            h_metrics,
            left_side_bearings,
        }
    }
}

/// A font loaded into memory with typed access to the tables it modifies.
///
/// Every table is optional: a table that is absent in the source stays absent,
/// and a table that is not modeled here is copied through as raw bytes.
pub struct Font {
    data: Vec<u8>,
    glyph_order: Vec<String>,
    outline_kind: OutlineKind,
    glyphs: Option<Vec<Glyph>>,
    hmtx: Option<HorizontalMetrics>,
    head: Option<Head>,
    hhea: Option<Hhea>,
    os2: Option<Os2>,
    recalc_bboxes: bool,
}

/// Maps a missing table to `None` and any other read failure to a format error.
fn optional<T>(tag: &str, result: Result<T, ReadError>) -> Result<Option<T>, ScaleError> {
    match result {
        Ok(table) => Ok(Some(table)),
        Err(ReadError::TableIsMissing(_)) => Ok(None),
        Err(e) => Err(ScaleError::table(tag, e.to_string())),
    }
}

/// Name used for glyphs that have none in the `post` table.
pub fn fallback_glyph_name(gid: u32) -> String {
    if gid == 0 {
        ".notdef".to_string()
    } else {
        format!("glyph{:05}", gid)
    }
}

impl Font {
    /// Loads a font from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScaleError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| ScaleError::unreadable(path, e))?;
        Self::from_bytes(data)
    }

    /// Parses a font from raw sfnt bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ScaleError> {
        let font = FontRef::new(&data)
            .map_err(|e| ScaleError::format(format!("Failed to parse font: {}", e)))?;

        let num_glyphs = font
            .maxp()
            .map_err(|e| ScaleError::table("maxp", e.to_string()))?
            .num_glyphs() as u32;
        let glyph_order = read_glyph_order(&font, num_glyphs);

        let outline_kind = if font.table_data(GLYF).is_some() {
            OutlineKind::TrueType
        } else if font.table_data(CFF).is_some() {
            OutlineKind::Cff
        } else if font.table_data(CFF2).is_some() {
            OutlineKind::Cff2
        } else {
            OutlineKind::None
        };

        let glyphs = if outline_kind == OutlineKind::TrueType {
            Some(read_glyphs(&font, num_glyphs)?)
        } else {
            None
        };

        let hmtx = optional("hmtx", font.hmtx())?
            .map(|hmtx| {
                let metrics = (0..num_glyphs)
                    .map(|gid| {
                        let gid = GlyphId::new(gid);
                        Metric {
                            advance: hmtx.advance(gid).unwrap_or(0),
                            lsb: hmtx.side_bearing(gid).unwrap_or(0),
                        }
                    })
                    .collect();
                HorizontalMetrics {
                    metrics,
                    number_of_long_metrics: hmtx.h_metrics().len(),
                }
            });

        let head: Option<Head> = optional("head", font.head())?.map(|t| t.to_owned_table());
        let hhea: Option<Hhea> = optional("hhea", font.hhea())?.map(|t| t.to_owned_table());
        let os2: Option<Os2> = optional("OS/2", font.os2())?.map(|t| t.to_owned_table());

        debug!(
            "Parsed font: glyf={} hmtx={} head={} hhea={} OS/2={}",
            glyphs.is_some(),
            hmtx.is_some(),
            head.is_some(),
            hhea.is_some(),
            os2.is_some()
        );

        Ok(Font {
            data,
            glyph_order,
            outline_kind,
            glyphs,
            hmtx,
            head,
            hhea,
            os2,
            recalc_bboxes: false,
        })
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyph_order.len()
    }

    /// Glyph names indexed by glyph id.
    pub fn glyph_order(&self) -> &[String] {
        &self.glyph_order
    }

    /// Glyph id of the glyph with the given name.
    pub fn glyph_id(&self, name: &str) -> Option<usize> {
        self.glyph_order.iter().position(|n| n == name)
    }

    pub fn outline_kind(&self) -> OutlineKind {
        self.outline_kind
    }

    /// TrueType outlines, `None` when the font has no `glyf` table.
    pub fn glyphs(&self) -> Option<&[Glyph]> {
        self.glyphs.as_deref()
    }

    pub fn glyphs_mut(&mut self) -> Option<&mut Vec<Glyph>> {
        self.glyphs.as_mut()
    }

    pub fn hmtx(&self) -> Option<&HorizontalMetrics> {
        self.hmtx.as_ref()
    }

    pub fn hmtx_mut(&mut self) -> Option<&mut HorizontalMetrics> {
        self.hmtx.as_mut()
    }

    /// Horizontal metric of the glyph with the given name.
    pub fn metric(&self, name: &str) -> Option<Metric> {
        let gid = self.glyph_id(name)?;
        self.hmtx.as_ref()?.metrics.get(gid).copied()
    }

    pub fn head(&self) -> Option<&Head> {
        self.head.as_ref()
    }

    pub fn head_mut(&mut self) -> Option<&mut Head> {
        self.head.as_mut()
    }

    pub fn hhea(&self) -> Option<&Hhea> {
        self.hhea.as_ref()
    }

    pub fn hhea_mut(&mut self) -> Option<&mut Hhea> {
        self.hhea.as_mut()
    }

    pub fn os2(&self) -> Option<&Os2> {
        self.os2.as_ref()
    }

    pub fn os2_mut(&mut self) -> Option<&mut Os2> {
        self.os2.as_mut()
    }

    /// Requests bounding boxes be recomputed from the final coordinates on save.
    pub fn set_recalc_bboxes(&mut self, recalc: bool) {
        self.recalc_bboxes = recalc;
    }

    pub fn recalc_bboxes(&self) -> bool {
        self.recalc_bboxes
    }

    /// Serializes the font, recomputing bounding boxes first when requested.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, ScaleError> {
        if self.recalc_bboxes {
            if let Some(glyphs) = self.glyphs.as_mut() {
                outline::recompute_bboxes(glyphs);
                debug!("Recomputed bounding boxes of {} glyphs", glyphs.len());
            }
            self.recalc_head_bbox();
            self.recalc_hhea_extents();
        }

        let source = FontRef::new(&self.data)
            .map_err(|e| ScaleError::format(format!("Failed to parse font: {}", e)))?;
        let mut builder = FontBuilder::new();

        if let Some(glyphs) = &self.glyphs {
            let hinted = outline::hinted_composites(glyphs);
            if hinted > 0 {
                warn!(
                    "Hinting instructions of {} composite glyphs are not preserved",
                    hinted
                );
            }
            let mut glyf_builder = GlyfLocaBuilder::new();
            for (gid, glyph) in glyphs.iter().enumerate() {
                glyf_builder
                    .add_glyph(&glyph.to_write())
                    .map_err(|e| ScaleError::table("glyf", format!("glyph {}: {}", gid, e)))?;
            }
            let (glyf, loca, loca_format) = glyf_builder.build();
            builder
                .add_table(&glyf)
                .map_err(|e| ScaleError::table("glyf", e.to_string()))?;
            builder
                .add_table(&loca)
                .map_err(|e| ScaleError::table("loca", e.to_string()))?;
            if let Some(head) = self.head.as_mut() {
                head.index_to_loc_format = match loca_format {
                    LocaFormat::Short => 0,
                    LocaFormat::Long => 1,
                };
            }
        }

        if let Some(hmtx) = &self.hmtx {
            builder
                .add_table(&hmtx.to_write())
                .map_err(|e| ScaleError::table("hmtx", e.to_string()))?;
        }
        if let Some(head) = &self.head {
            builder
                .add_table(head)
                .map_err(|e| ScaleError::table("head", e.to_string()))?;
        }
        if let Some(hhea) = &self.hhea {
            builder
                .add_table(hhea)
                .map_err(|e| ScaleError::table("hhea", e.to_string()))?;
        }
        if let Some(os2) = &self.os2 {
            builder
                .add_table(os2)
                .map_err(|e| ScaleError::table("OS/2", e.to_string()))?;
        }

        builder.copy_missing_tables(source);
        let output = builder.build();
        debug!("Serialized font: {} bytes", output.len());
        Ok(output)
    }

    /// Writes the font to a file, creating or overwriting it.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ScaleError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|e| ScaleError::unwritable(path, e))
    }

    /// Sets the head bbox to the union of all glyph bboxes.
    ///
    /// Left alone when the font has no `glyf` table or no glyph has an outline.
    fn recalc_head_bbox(&mut self) {
        let (Some(head), Some(glyphs)) = (self.head.as_mut(), self.glyphs.as_ref()) else {
            return;
        };
        let Some(bbox) = glyphs.iter().filter_map(Glyph::bbox).reduce(|a, b| Bbox {
            x_min: a.x_min.min(b.x_min),
            y_min: a.y_min.min(b.y_min),
            x_max: a.x_max.max(b.x_max),
            y_max: a.y_max.max(b.y_max),
        }) else {
            return;
        };
        head.x_min = bbox.x_min;
        head.y_min = bbox.y_min;
        head.x_max = bbox.x_max;
        head.y_max = bbox.y_max;
        trace!(
            "head bbox from glyphs: ({}, {}) - ({}, {})",
            bbox.x_min,
            bbox.y_min,
            bbox.x_max,
            bbox.y_max
        );
    }

    /// Recomputes the hhea fields derived from glyph extents and advances.
    ///
    /// `advance_width_max` only needs `hmtx`; the side bearing and extent
    /// fields also need TrueType outlines.
    fn recalc_hhea_extents(&mut self) {
        let (Some(hhea), Some(hmtx)) = (self.hhea.as_mut(), self.hmtx.as_ref()) else {
            return;
        };
        let advance_width_max = hmtx.metrics.iter().map(|m| m.advance).max().unwrap_or(0);
        hhea.advance_width_max = UfWord::new(advance_width_max);
        let Some(glyphs) = self.glyphs.as_ref() else {
            trace!("hhea advance_width_max={}", advance_width_max);
            return;
        };

        let mut min_lsb = i16::MAX;
        let mut min_rsb = i16::MAX;
        let mut x_max_extent = i16::MIN;
        for (glyph, metric) in glyphs.iter().zip(&hmtx.metrics) {
            let Some(bbox) = glyph.bbox() else {
                continue;
            };
            let width = bbox.x_max.saturating_sub(bbox.x_min);
            let rsb = (metric.advance.min(i16::MAX as u16) as i16)
                .saturating_sub(metric.lsb)
                .saturating_sub(width);
            min_lsb = min_lsb.min(metric.lsb);
            min_rsb = min_rsb.min(rsb);
            x_max_extent = x_max_extent.max(metric.lsb.saturating_add(width));
        }
        if min_lsb == i16::MAX {
            min_lsb = 0;
            min_rsb = 0;
            x_max_extent = 0;
        }

        trace!(
            "hhea extents: advance_width_max={} min_lsb={} min_rsb={} x_max_extent={}",
            advance_width_max,
            min_lsb,
            min_rsb,
            x_max_extent
        );
        hhea.min_left_side_bearing = FWord::new(min_lsb);
        hhea.min_right_side_bearing = FWord::new(min_rsb);
        hhea.x_max_extent = FWord::new(x_max_extent);
    }
}

fn read_glyph_order(font: &FontRef, num_glyphs: u32) -> Vec<String> {
    let post = font.post().ok();
    if post.is_none() {
        debug!("No post table, using synthesized glyph names");
    }
    (0..num_glyphs)
        .map(|gid| {
            post.as_ref()
                .and_then(|p| p.glyph_name(GlyphId16::new(gid as u16)))
                .map(str::to_string)
                .unwrap_or_else(|| fallback_glyph_name(gid))
        })
        .collect()
}

fn read_glyphs(font: &FontRef, num_glyphs: u32) -> Result<Vec<Glyph>, ScaleError> {
    let glyf = font
        .glyf()
        .map_err(|e| ScaleError::table("glyf", e.to_string()))?;
    let loca = font
        .loca(None)
        .map_err(|e| ScaleError::table("loca", e.to_string()))?;

    let mut glyphs = Vec::with_capacity(num_glyphs as usize);
    for gid in 0..num_glyphs {
        let glyph = loca
            .get_glyf(GlyphId::new(gid), &glyf)
            .map_err(|e| ScaleError::table("glyf", format!("glyph {}: {}", gid, e)))?;
        glyphs.push(Glyph::from_read(glyph));
    }
    let empty = glyphs.iter().filter(|g| g.is_empty()).count();
    if empty == glyphs.len() && !glyphs.is_empty() {
        warn!("glyf table contains no outlines");
    }
    trace!("Read {} glyphs ({} without outlines)", glyphs.len(), empty);
    Ok(glyphs)
}
