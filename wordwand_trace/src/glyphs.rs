use serde_derive::{Deserialize, Serialize};

use super::config::TraceConfig;
use super::cubic_curve_2d::CubicCurve2D;
use super::error::TraceError;
use super::Point;

// Glyph coordinates: cap height spans 0..100, y grows downwards
const GLYPH_BOX: f32 = 100.0;
// Maximum length of one flattened curve segment, in canvas pixels
const FLATTEN_STEP: f32 = 4.0;

/// One drawing operation of a glyph's centreline, in glyph units.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    // Move to x, y
    M([f32; 2]),
    // Line to x, y
    L([f32; 2]),
    // Cubic to end point via two control points: c1x, c1y, c2x, c2y, x, y
    C([f32; 6]),
}

/// Stroke-font description of one letter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Glyph {
    pub letter: char,
    // Horizontal extent of the centrelines
    pub width: f32,
    pub strokes: Vec<Vec<PathOp>>,
}

thread_local!(static GLYPH_DATA: Vec<Glyph> = load_glyphs());

fn load_glyphs() -> Vec<Glyph> {
    let json = include_str!("../data/glyphs.json");
    let res: Vec<Glyph> = serde_json::from_str(json).expect("Failed to parse built-in glyphs.");
    log::debug!("Loaded {} glyphs", res.len());
    res
}

/// Looks up the built-in glyph for a letter. Lowercase input maps to the
/// uppercase glyph.
pub fn glyph_for(letter: char) -> Result<Glyph, TraceError> {
    let upper = letter.to_ascii_uppercase();
    GLYPH_DATA.with(|glyphs| {
        glyphs.iter()
            .find(|g| g.letter == upper)
            .cloned()
            .ok_or(TraceError::UnknownGlyph(letter))
    })
}

/// All letters that have a built-in glyph, in data order.
pub fn letters() -> Vec<char> {
    GLYPH_DATA.with(|glyphs| glyphs.iter().map(|g| g.letter).collect())
}

/// Maps glyph units onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub scale: f32,
}

impl GlyphLayout {
    /// Centres the glyph's box on the canvas at the configured font size.
    pub fn centered(glyph: &Glyph, config: &TraceConfig) -> GlyphLayout {
        let scale = config.cap_height_px() / GLYPH_BOX;
        let center_x = config.canvas_width as f32 / 2.0;
        let center_y = config.canvas_height as f32 / 2.0;
        GlyphLayout {
            origin_x: center_x - glyph.width * scale / 2.0,
            origin_y: center_y - GLYPH_BOX * scale / 2.0,
            scale: scale,
        }
    }

    pub fn place(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin_x + x * self.scale, self.origin_y + y * self.scale)
    }
}

impl Glyph {
    /// Flattens every stroke of the glyph into a canvas-space polyline.
    pub fn polylines(&self, layout: &GlyphLayout) -> Vec<Vec<Point>> {
        let mut res: Vec<Vec<Point>> = Vec::with_capacity(self.strokes.len());
        for stroke in &self.strokes {
            let mut line: Vec<Point> = Vec::new();
            for op in stroke {
                match *op {
                    PathOp::M([x, y]) => {
                        // A move inside a stroke starts a new polyline
                        if line.len() > 1 {
                            res.push(std::mem::take(&mut line));
                        }
                        line.clear();
                        line.push(layout.place(x, y));
                    }
                    PathOp::L([x, y]) => {
                        line.push(layout.place(x, y));
                    }
                    PathOp::C([c1x, c1y, c2x, c2y, x, y]) => {
                        let start = line.last().copied().unwrap_or_else(|| layout.place(c1x, c1y));
                        if line.is_empty() {
                            line.push(start);
                        }
                        let c1 = layout.place(c1x, c1y);
                        let c2 = layout.place(c2x, c2y);
                        let end = layout.place(x, y);
                        let curve = CubicCurve2D::new(start.x, start.y, c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                        line.extend(curve.flatten(FLATTEN_STEP));
                    }
                }
            }
            if line.len() > 1 {
                res.push(line);
            }
        }
        res
    }
}
