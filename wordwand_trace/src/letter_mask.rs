use super::accuracy::MaskSampler;
use super::config::TraceConfig;
use super::error::TraceError;
use super::glyphs::{glyph_for, GlyphLayout};
use super::Point;

/// Per-pixel opacity snapshot of a rendered letter. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterMask {
    letter: char,
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl LetterMask {
    /// Renders the built-in glyph for `letter` centred on the logical canvas.
    pub fn render(letter: char, config: &TraceConfig) -> Result<LetterMask, TraceError> {
        let glyph = glyph_for(letter)?;
        let layout = GlyphLayout::centered(&glyph, config);
        let lines = glyph.polylines(&layout);
        let mask = LetterMask::from_polylines(glyph.letter, &lines, config.stem_px() / 2.0,
                                              config.canvas_width, config.canvas_height);
        log::debug!("Rendered mask for {:?}: {} opaque pixels", mask.letter, mask.count_above(config.opacity_threshold));
        Ok(mask)
    }

    /// Sweeps a round pen of the given radius along each polyline. Edges get
    /// one pixel of linear falloff; overlapping segments keep the larger
    /// coverage.
    pub fn from_polylines(letter: char, lines: &[Vec<Point>], radius: f32, width: u32, height: u32) -> LetterMask {
        let mut mask = LetterMask {
            letter: letter,
            width: width,
            height: height,
            alpha: vec![0; (width as usize) * (height as usize)],
        };
        if width == 0 || height == 0 {
            return mask;
        }
        for line in lines {
            for i in 1..line.len() {
                mask.sweep_segment(line[i - 1], line[i], radius);
            }
        }
        mask
    }

    fn sweep_segment(&mut self, a: Point, b: Point, radius: f32) {
        let reach = radius + 1.0;
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let left = (a.x.min(b.x) - reach).floor().max(0.0) as u32;
        let right = (a.x.max(b.x) + reach).ceil().min(max_x) as u32;
        let top = (a.y.min(b.y) - reach).floor().max(0.0) as u32;
        let bottom = (a.y.max(b.y) + reach).ceil().min(max_y) as u32;
        for y in top..=bottom {
            for x in left..=right {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = center.distance_to_segment(a, b);
                let coverage = (radius + 0.5 - d).max(0.0).min(1.0);
                if coverage <= 0.0 { continue; }
                let value = (coverage * 255.0).round() as u8;
                let ix = (y * self.width + x) as usize;
                if value > self.alpha[ix] {
                    self.alpha[ix] = value;
                }
            }
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Number of pixels whose opacity is strictly above `threshold`.
    pub fn count_above(&self, threshold: u8) -> usize {
        self.alpha.iter().filter(|a| **a > threshold).count()
    }

    /// RGBA pixels in row order, the glyph painted in `rgb` with the mask as
    /// alpha. Suitable for a canvas `ImageData`.
    pub fn to_rgba(&self, rgb: [u8; 3]) -> Vec<u8> {
        let mut res: Vec<u8> = Vec::with_capacity(self.alpha.len() * 4);
        for a in &self.alpha {
            res.extend_from_slice(&[rgb[0], rgb[1], rgb[2], *a]);
        }
        res
    }
}

impl MaskSampler for LetterMask {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn opacity(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[(y * self.width + x) as usize]
    }
}
