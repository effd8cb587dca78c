use serde_derive::{Deserialize, Serialize};

use super::letter_mask::LetterMask;
use super::Point;

pub const MASK_RGB: [u8; 3] = [0x00, 0xAE, 0xEF];
pub const GUIDE_COLOR: &str = "rgba(0, 174, 239, 0.6)";
pub const PEN_COLOR: &str = "#ff4444";

/// Line style for guide outlines and user ink.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f32,
    pub round_cap: bool,
}

/// Something a trace session can paint on. Coordinates are logical canvas
/// pixels.
pub trait Surface {
    fn clear(&mut self);
    // Fill the glyph itself, as captured in the mask
    fn paint_mask(&mut self, mask: &LetterMask);
    fn paint_guide(&mut self, outline: &[Vec<Point>], style: &LineStyle);
    fn draw_segment(&mut self, from: Point, to: Point, style: &LineStyle);
}

/// A recorded surface call, in the shape a browser host replays it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    PaintMask { letter: char },
    PaintGuide { outline: Vec<Vec<Point>>, style: LineStyle },
    DrawSegment { from: Point, to: Point, style: LineStyle },
}

/// Surface that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> RecordingSurface {
        RecordingSurface { commands: Vec::new() }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hands over everything recorded so far and starts afresh.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn paint_mask(&mut self, mask: &LetterMask) {
        self.commands.push(DrawCommand::PaintMask { letter: mask.letter() });
    }

    fn paint_guide(&mut self, outline: &[Vec<Point>], style: &LineStyle) {
        self.commands.push(DrawCommand::PaintGuide {
            outline: outline.to_vec(),
            style: style.clone(),
        });
    }

    fn draw_segment(&mut self, from: Point, to: Point, style: &LineStyle) {
        self.commands.push(DrawCommand::DrawSegment {
            from: from,
            to: to,
            style: style.clone(),
        });
    }
}

/// Surface for headless scoring.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}
    fn paint_mask(&mut self, _mask: &LetterMask) {}
    fn paint_guide(&mut self, _outline: &[Vec<Point>], _style: &LineStyle) {}
    fn draw_segment(&mut self, _from: Point, _to: Point, _style: &LineStyle) {}
}
