//! Owned glyph outlines.
//!
//! Glyphs are read out of the `glyf` table into plain Rust values so they can be
//! mutated in place, then converted back into `write-fonts` glyphs when the
//! font is saved.

use read_fonts::tables::glyf::{
    Anchor as ReadAnchor, CompositeGlyph as ReadCompositeGlyph, CompositeGlyphFlags, CurvePoint,
    Glyph as ReadGlyph, SimpleGlyph as ReadSimpleGlyph,
};
use read_fonts::types::{F2Dot14, GlyphId16};
use write_fonts::tables::glyf::{
    Anchor, Bbox, Component as WriteComponent, ComponentFlags, CompositeGlyph, Contour,
    Glyph as WriteGlyph, SimpleGlyph, Transform,
};

/// How a component is positioned relative to its parent glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Flat offset in font units
    Offset { dx: i16, dy: i16 },
    /// Point matching: `component` point is aligned on the parent's `base` point
    Anchored { base: u16, component: u16 },
}

/// Linear part of a component transform.
///
/// A point `(x, y)` maps to `(xx·x + xy·y, yx·x + yy·y)`, so `xx` and `xy`
/// produce the output X coordinate and `yx` and `yy` the output Y coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub xx: f32,
    pub yx: f32,
    pub xy: f32,
    pub yy: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
    };

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.xx as f64 * x + self.xy as f64 * y,
            self.yx as f64 * x + self.yy as f64 * y,
        )
    }
}

/// A reference to another glyph inside a composite glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub glyph: GlyphId16,
    pub placement: Placement,
    /// Present only when the component carries a scale or a 2×2 matrix
    pub matrix: Option<Matrix>,
    /// Flags written back as read, apart from the ones derived from the data
    pub flags: ComponentFlags,
}

impl Component {
    /// Creates an unscaled component placed at `(dx, dy)`.
    pub fn offset(glyph: GlyphId16, dx: i16, dy: i16) -> Self {
        Component {
            glyph,
            placement: Placement::Offset { dx, dy },
            matrix: None,
            flags: ComponentFlags::default(),
        }
    }

    fn from_read(component: &read_fonts::tables::glyf::Component) -> Self {
        let flags = component.flags;
        let placement = match component.anchor {
            ReadAnchor::Offset { x, y } => Placement::Offset { dx: x, dy: y },
            ReadAnchor::Point { base, component } => Placement::Anchored { base, component },
        };
        let has_matrix = flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE)
            || flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE)
            || flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO);
        let t = component.transform;
        let matrix = has_matrix.then(|| Matrix {
            xx: t.xx.to_f32(),
            yx: t.yx.to_f32(),
            xy: t.xy.to_f32(),
            yy: t.yy.to_f32(),
        });

        Component {
            glyph: component.glyph,
            placement,
            matrix,
            flags: ComponentFlags::from(flags),
        }
    }

    fn to_write(&self) -> WriteComponent {
        let anchor = match self.placement {
            Placement::Offset { dx, dy } => Anchor::Offset { x: dx, y: dy },
            Placement::Anchored { base, component } => Anchor::Point { base, component },
        };
        let m = self.matrix.unwrap_or(Matrix::IDENTITY);
        let transform = Transform {
            xx: F2Dot14::from_f32(m.xx),
            yx: F2Dot14::from_f32(m.yx),
            xy: F2Dot14::from_f32(m.xy),
            yy: F2Dot14::from_f32(m.yy),
        };
        WriteComponent::new(self.glyph, anchor, transform, self.flags)
    }
}

/// A glyph made of contours of on- and off-curve points.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleOutline {
    pub contours: Vec<Vec<CurvePoint>>,
    pub instructions: Vec<u8>,
    pub bbox: Bbox,
}

impl SimpleOutline {
    /// Creates an outline and computes its bounding box.
    pub fn new(contours: Vec<Vec<CurvePoint>>) -> Self {
        let mut outline = SimpleOutline {
            contours,
            instructions: Vec::new(),
            bbox: Bbox::default(),
        };
        outline.bbox = outline.compute_bbox().unwrap_or_default();
        outline
    }

    fn from_read(glyph: &ReadSimpleGlyph) -> Self {
        let points: Vec<CurvePoint> = glyph.points().collect();
        let mut contours = Vec::with_capacity(glyph.end_pts_of_contours().len());
        let mut start = 0;
        for end in glyph.end_pts_of_contours() {
            let end = (end.get() as usize + 1).min(points.len());
            if end > start {
                contours.push(points[start..end].to_vec());
                start = end;
            }
        }

        SimpleOutline {
            contours,
            instructions: glyph.instructions().to_vec(),
            bbox: Bbox {
                x_min: glyph.x_min(),
                y_min: glyph.y_min(),
                x_max: glyph.x_max(),
                y_max: glyph.y_max(),
            },
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &CurvePoint> {
        self.contours.iter().flatten()
    }

    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut CurvePoint> {
        self.contours.iter_mut().flatten()
    }

    /// Bounding box of the current points, or `None` when there are none.
    pub fn compute_bbox(&self) -> Option<Bbox> {
        self.points().next()?;
        let mut glyph = self.to_write();
        glyph.recompute_bounding_box();
        Some(glyph.bbox)
    }

    fn to_write(&self) -> SimpleGlyph {
        SimpleGlyph {
            bbox: self.bbox,
            contours: self
                .contours
                .iter()
                .map(|c| Contour::from(c.clone()))
                .collect(),
            instructions: self.instructions.clone(),
        }
    }
}

/// A glyph assembled from other glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeOutline {
    pub components: Vec<Component>,
    /// Hinting program read from the source; not written back
    pub instructions: Vec<u8>,
    pub bbox: Bbox,
}

impl CompositeOutline {
    fn from_read(glyph: &ReadCompositeGlyph) -> Self {
        CompositeOutline {
            components: glyph.components().map(|c| Component::from_read(&c)).collect(),
            instructions: glyph.instructions().unwrap_or_default().to_vec(),
            bbox: Bbox {
                x_min: glyph.x_min(),
                y_min: glyph.y_min(),
                x_max: glyph.x_max(),
                y_max: glyph.y_max(),
            },
        }
    }

    /// Computes the bbox from already resolved component bboxes.
    ///
    /// Returns `None` while a referenced composite is still unresolved.
    fn compute_bbox(&self, resolved: &[Option<Option<Bbox>>]) -> Option<Option<Bbox>> {
        let mut acc: Option<Bbox> = None;
        for component in &self.components {
            let component_bbox = match resolved.get(component.glyph.to_u16() as usize) {
                Some(Some(Some(bbox))) => *bbox,
                // Empty glyph or a reference outside the font
                Some(Some(None)) | None => continue,
                Some(None) => return None,
            };
            let matrix = component.matrix.unwrap_or(Matrix::IDENTITY);
            let (dx, dy) = match component.placement {
                Placement::Offset { dx, dy } if component.flags.scaled_component_offset => {
                    matrix.apply(dx as f64, dy as f64)
                }
                Placement::Offset { dx, dy } => (dx as f64, dy as f64),
                Placement::Anchored { .. } => (0.0, 0.0),
            };
            let corners = [
                (component_bbox.x_min, component_bbox.y_min),
                (component_bbox.x_min, component_bbox.y_max),
                (component_bbox.x_max, component_bbox.y_min),
                (component_bbox.x_max, component_bbox.y_max),
            ];
            for (cx, cy) in corners {
                let (tx, ty) = matrix.apply(cx as f64, cy as f64);
                let x = (tx + dx).round() as i16;
                let y = (ty + dy).round() as i16;
                acc = Some(match acc {
                    None => Bbox {
                        x_min: x,
                        y_min: y,
                        x_max: x,
                        y_max: y,
                    },
                    Some(b) => Bbox {
                        x_min: b.x_min.min(x),
                        y_min: b.y_min.min(y),
                        x_max: b.x_max.max(x),
                        y_max: b.y_max.max(y),
                    },
                });
            }
        }
        Some(acc)
    }
}

/// One entry of the `glyf` table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Glyph {
    /// No outline data (space and similar glyphs)
    #[default]
    Empty,
    Simple(SimpleOutline),
    Composite(CompositeOutline),
}

impl Glyph {
    /// Converts a glyph parsed by read-fonts, `None` meaning no outline data.
    pub fn from_read(glyph: Option<ReadGlyph>) -> Self {
        match glyph {
            None => Glyph::Empty,
            Some(ReadGlyph::Simple(simple)) if simple.num_points() == 0 => Glyph::Empty,
            Some(ReadGlyph::Simple(simple)) => Glyph::Simple(SimpleOutline::from_read(&simple)),
            Some(ReadGlyph::Composite(composite)) => {
                let outline = CompositeOutline::from_read(&composite);
                if outline.components.is_empty() {
                    Glyph::Empty
                } else {
                    Glyph::Composite(outline)
                }
            }
        }
    }

    /// The stored bounding box, `None` for empty glyphs.
    pub fn bbox(&self) -> Option<Bbox> {
        match self {
            Glyph::Empty => None,
            Glyph::Simple(s) => Some(s.bbox),
            Glyph::Composite(c) => Some(c.bbox),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Glyph::Empty)
    }

    /// Converts back into a glyph that `GlyfLocaBuilder` can serialize.
    pub fn to_write(&self) -> WriteGlyph {
        match self {
            Glyph::Empty => WriteGlyph::Empty,
            Glyph::Simple(simple) => WriteGlyph::Simple(simple.to_write()),
            Glyph::Composite(composite) => {
                let mut components = composite.components.iter().map(Component::to_write);
                let Some(first) = components.next() else {
                    return WriteGlyph::Empty;
                };
                let mut glyph = CompositeGlyph::new(first, composite.bbox);
                for component in components {
                    glyph.add_component(component, composite.bbox);
                }
                glyph.bbox = composite.bbox;
                WriteGlyph::Composite(glyph)
            }
        }
    }
}

/// Number of composite glyphs whose hinting program is lost when saving.
pub fn hinted_composites(glyphs: &[Glyph]) -> usize {
    glyphs
        .iter()
        .filter(|g| matches!(g, Glyph::Composite(c) if !c.instructions.is_empty()))
        .count()
}

/// Recomputes every glyph's stored bbox from its current coordinates.
///
/// Simple glyphs are resolved first, then composites are resolved repeatedly so
/// nested composites pick up their components' new boxes. Composites that are
/// part of a reference cycle keep their previous bbox.
pub fn recompute_bboxes(glyphs: &mut [Glyph]) {
    // None: unresolved, Some(None): no outline, Some(Some(b)): resolved
    let mut resolved: Vec<Option<Option<Bbox>>> = glyphs
        .iter_mut()
        .map(|glyph| match glyph {
            Glyph::Empty => Some(None),
            Glyph::Simple(simple) => {
                let bbox = simple.compute_bbox();
                simple.bbox = bbox.unwrap_or_default();
                Some(bbox)
            }
            Glyph::Composite(_) => None,
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for gid in 0..glyphs.len() {
            if resolved[gid].is_some() {
                continue;
            }
            let Glyph::Composite(composite) = &mut glyphs[gid] else {
                continue;
            };
            if let Some(bbox) = composite.compute_bbox(&resolved) {
                if let Some(b) = bbox {
                    composite.bbox = b;
                }
                resolved[gid] = Some(bbox);
                changed = true;
            }
        }
    }
}
