//! Synthesized test fonts.
//!
//! Fonts are assembled with write-fonts so every coordinate and metric is known
//! up front.

#![allow(dead_code)]

use read_fonts::tables::glyf::CurvePoint;
use write_fonts::tables::glyf::{
    Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, GlyfLocaBuilder, Glyph,
    SimpleGlyph, Transform,
};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::os2::Os2;
use write_fonts::types::{F2Dot14, FWord, GlyphId16, Tag};
use write_fonts::FontBuilder;

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;
pub const LINE_GAP: i16 = 100;
pub const WIN_ASCENT: u16 = 900;
pub const WIN_DESCENT: u16 = 250;
pub const CAP_HEIGHT: i16 = 700;
pub const X_HEIGHT: i16 = 500;
/// (xMin, yMin, xMax, yMax)
pub const HEAD_BBOX: (i16, i16, i16, i16) = (-51, -251, 1049, 951);

pub const CFF_BYTES: [u8; 4] = [1, 0, 4, 1];

/// One component of a composite test glyph.
#[derive(Debug, Clone, Copy)]
pub struct Part {
    pub glyph: u16,
    pub dx: i16,
    pub dy: i16,
    /// [xx, yx, xy, yy]
    pub matrix: Option<[f32; 4]>,
    pub flags: ComponentFlags,
}

#[derive(Debug, Clone)]
pub enum Outline {
    Empty,
    Simple(Vec<(i16, i16)>),
    Composite(Vec<Part>),
}

fn bbox_of(points: &[(i16, i16)]) -> Bbox {
    Bbox {
        x_min: points.iter().map(|p| p.0).min().unwrap_or(0),
        y_min: points.iter().map(|p| p.1).min().unwrap_or(0),
        x_max: points.iter().map(|p| p.0).max().unwrap_or(0),
        y_max: points.iter().map(|p| p.1).max().unwrap_or(0),
    }
}

fn write_glyph(outline: &Outline) -> Glyph {
    match outline {
        Outline::Empty => Glyph::Empty,
        Outline::Simple(points) => {
            let curve: Vec<CurvePoint> = points
                .iter()
                .map(|&(x, y)| CurvePoint::new(x, y, true))
                .collect();
            Glyph::Simple(SimpleGlyph {
                bbox: bbox_of(points),
                contours: vec![Contour::from(curve)],
                instructions: vec![],
            })
        }
        Outline::Composite(parts) => {
            let mut components = parts.iter().map(|part| {
                let [xx, yx, xy, yy] = part.matrix.unwrap_or([1.0, 0.0, 0.0, 1.0]);
                let transform = Transform {
                    xx: F2Dot14::from_f32(xx),
                    yx: F2Dot14::from_f32(yx),
                    xy: F2Dot14::from_f32(xy),
                    yy: F2Dot14::from_f32(yy),
                };
                Component::new(
                    GlyphId16::new(part.glyph),
                    Anchor::Offset {
                        x: part.dx,
                        y: part.dy,
                    },
                    transform,
                    part.flags,
                )
            });
            let first = components.next().expect("composite needs a component");
            let mut glyph = CompositeGlyph::new(first, Bbox::default());
            for component in components {
                glyph.add_component(component, Bbox::default());
            }
            Glyph::Composite(glyph)
        }
    }
}

/// Advance width given to glyph `gid` in synthesized fonts.
pub fn advance_for(gid: usize) -> u16 {
    500 + 11 * gid as u16
}

/// Left side bearing given to glyph `gid` in synthesized fonts.
pub fn lsb_for(gid: usize) -> i16 {
    gid as i16 * 7 - 3
}

fn add_metric_tables(builder: &mut FontBuilder, num_glyphs: u16, index_to_loc_format: i16) {
    let head = Head {
        units_per_em: UNITS_PER_EM,
        x_min: HEAD_BBOX.0,
        y_min: HEAD_BBOX.1,
        x_max: HEAD_BBOX.2,
        y_max: HEAD_BBOX.3,
        index_to_loc_format,
        ..Default::default()
    };
    let hhea = Hhea {
        ascender: FWord::new(ASCENDER),
        descender: FWord::new(DESCENDER),
        line_gap: FWord::new(LINE_GAP),
        number_of_h_metrics: num_glyphs,
        ..Default::default()
    };
    let maxp = Maxp {
        num_glyphs,
        ..Default::default()
    };
    let hmtx = Hmtx {
        h_metrics: (0..num_glyphs as usize)
            .map(|gid| LongMetric {
                advance: advance_for(gid),
                side_bearing: lsb_for(gid),
            })
            .collect(),
        left_side_bearings: vec![],
    };
    let os2 = Os2 {
        s_typo_ascender: ASCENDER,
        s_typo_descender: DESCENDER,
        s_typo_line_gap: LINE_GAP,
        us_win_ascent: WIN_ASCENT,
        us_win_descent: WIN_DESCENT,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(X_HEIGHT),
        s_cap_height: Some(CAP_HEIGHT),
        us_default_char: Some(0),
        us_break_char: Some(32),
        us_max_context: Some(0),
        ..Default::default()
    };

    builder.add_table(&head).expect("head");
    builder.add_table(&hhea).expect("hhea");
    builder.add_table(&maxp).expect("maxp");
    builder.add_table(&hmtx).expect("hmtx");
    builder.add_table(&os2).expect("OS/2");
}

/// Builds a TrueType font with the given outlines.
pub fn truetype_font(outlines: &[Outline]) -> Vec<u8> {
    let mut glyf_builder = GlyfLocaBuilder::new();
    for outline in outlines {
        glyf_builder
            .add_glyph(&write_glyph(outline))
            .expect("glyph should serialize");
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let mut builder = FontBuilder::new();
    let index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    add_metric_tables(&mut builder, outlines.len() as u16, index_to_loc_format);
    builder.add_table(&glyf).expect("glyf");
    builder.add_table(&loca).expect("loca");
    builder.build()
}

/// Builds a font whose only outline table is an opaque `CFF ` blob.
pub fn cff_font(num_glyphs: u16) -> Vec<u8> {
    let mut builder = FontBuilder::new();
    add_metric_tables(&mut builder, num_glyphs, 0);
    builder.add_raw(Tag::new(b"CFF "), CFF_BYTES.to_vec());
    builder.build()
}

/// A small font: .notdef, a triangle, a space, a composite and a tall bar.
pub fn sample_outlines() -> Vec<Outline> {
    vec![
        Outline::Simple(vec![(50, 0), (50, 700), (450, 700), (450, 0)]),
        Outline::Simple(vec![(0, 0), (100, 200), (100, 0)]),
        Outline::Empty,
        Outline::Composite(vec![
            Part {
                glyph: 1,
                dx: 0,
                dy: 0,
                matrix: None,
                flags: ComponentFlags::default(),
            },
            Part {
                glyph: 1,
                dx: 301,
                dy: 199,
                matrix: Some([1.0, 0.0, 0.0, 0.5]),
                flags: ComponentFlags::default(),
            },
        ]),
        Outline::Simple(vec![(-51, -251), (-51, 951), (1049, 951), (1049, -251)]),
    ]
}
