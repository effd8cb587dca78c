extern crate serde_derive;
extern crate wasm_bindgen;

pub mod accuracy;
pub mod config;
mod cubic_curve_2d;
pub mod error;
pub mod glyphs;
pub mod letter_mask;
pub mod navigation;
pub mod reader;
pub mod session;
pub mod speech;
pub mod surface;
pub mod verdict;

use serde_derive::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use config::TraceConfig;
pub use error::TraceError;
pub use letter_mask::LetterMask;
pub use session::{InputEvent, PenState, TraceSession, Viewport};
pub use verdict::{Band, CheckOutcome, Feedback};

use reader::{HardWordReader, ReaderData};
use speech::SpeechLog;
use surface::{RecordingSurface, MASK_RGB};

/// A sampled position in logical canvas pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x: x, y: y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    // Distance to the closest point of segment a-b
    pub fn distance_to_segment(&self, a: Point, b: Point) -> f32 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_squared = dx * dx + dy * dy;
        if len_squared == 0.0 {
            return self.distance_to(a);
        }
        let t = ((self.x - a.x) * dx + (self.y - a.y) * dy) / len_squared;
        let t = t.max(0.0).min(1.0);
        self.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

/// One pointer-down to pointer-up path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
}

/// Parses strokes the way the page records them: a vector of strokes, each a
/// vector of `[x, y]` pairs.
pub fn parse_strokes(json: &str) -> Result<Vec<Stroke>, TraceError> {
    let input: Vec<Vec<[f32; 2]>> = serde_json::from_str(json).map_err(TraceError::InvalidStrokes)?;
    let mut strokes: Vec<Stroke> = Vec::with_capacity(input.len());
    for raw in &input {
        strokes.push(Stroke {
            points: raw.iter().map(|pt| Point::new(pt[0], pt[1])).collect(),
        });
    }
    Ok(strokes)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttemptResult {
    pub letter: char,
    pub outcome: CheckOutcome,
    pub feedback: Feedback,
}

/// Scores a recorded attempt against the built-in glyph for `letter`.
pub fn score_typed(letter: char, strokes: &[Stroke], config: &TraceConfig) -> Result<AttemptResult, TraceError> {
    let mut session = TraceSession::new(letter, config.clone(), surface::NullSurface)?;
    session.replay(strokes);
    let feedback = session.check();
    Ok(AttemptResult {
        letter: session.letter(),
        // check() always records an outcome
        outcome: session.outcome().unwrap_or(CheckOutcome::Empty),
        feedback: feedback,
    })
}

fn to_js_error(err: TraceError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    // Our result types only hold strings, numbers and enums
    serde_json::to_string(value).unwrap_or_else(|_| String::from("null"))
}

#[wasm_bindgen]
pub fn score_attempt(letter: &str, strokes_json: &str) -> Result<String, JsValue> {
    let letter = letter.chars().next()
        .ok_or_else(|| to_js_error(TraceError::InvalidLetter(letter.to_string())))?;
    let strokes = parse_strokes(strokes_json).map_err(to_js_error)?;
    let res = score_typed(letter, &strokes, &TraceConfig::default()).map_err(to_js_error)?;
    Ok(to_json(&res))
}

/// Browser-side handle on a trace session. Drawing is reported back as JSON
/// draw commands for the page to replay on its canvas.
#[wasm_bindgen]
pub struct Tracer {
    session: TraceSession<RecordingSurface>,
}

#[wasm_bindgen]
impl Tracer {
    /// Builds a session for the letter named in a page path.
    #[wasm_bindgen(constructor)]
    pub fn new(path: &str) -> Result<Tracer, JsValue> {
        let letter = navigation::letter_from_path(path).map_err(to_js_error)?;
        let session = TraceSession::new(letter, TraceConfig::default(), RecordingSurface::new())
            .map_err(to_js_error)?;
        Ok(Tracer { session: session })
    }

    pub fn letter(&self) -> String {
        self.session.letter().to_string()
    }

    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.session.set_viewport(Viewport::new(left, top, width, height));
    }

    pub fn mouse_down(&mut self, x: f32, y: f32) {
        self.session.handle(InputEvent::MouseDown { x: x, y: y });
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.session.handle(InputEvent::MouseMove { x: x, y: y });
    }

    pub fn mouse_up(&mut self) {
        self.session.handle(InputEvent::MouseUp);
    }

    pub fn mouse_leave(&mut self) {
        self.session.handle(InputEvent::MouseLeave);
    }

    /// Returns whether the page should call `preventDefault`.
    pub fn touch_start(&mut self, x: f32, y: f32) -> bool {
        self.session.handle(InputEvent::TouchStart { x: x, y: y })
    }

    pub fn touch_move(&mut self, x: f32, y: f32) -> bool {
        self.session.handle(InputEvent::TouchMove { x: x, y: y })
    }

    pub fn touch_end(&mut self) -> bool {
        self.session.handle(InputEvent::TouchEnd)
    }

    /// Feedback for the check button, as JSON.
    pub fn check(&mut self) -> String {
        to_json(&self.session.check())
    }

    pub fn retry(&mut self) {
        self.session.reset();
    }

    pub fn back_visible(&self) -> bool {
        self.session.back_visible()
    }

    pub fn take_commands(&mut self) -> String {
        to_json(&self.session.surface_mut().take_commands())
    }

    pub fn mask_rgba(&self) -> Vec<u8> {
        self.session.mask().to_rgba(MASK_RGB)
    }
}

/// Browser-side handle on the hard-word reader. Speech requests are queued
/// as JSON commands for the page to pass to its speech engine.
#[wasm_bindgen]
pub struct Reader {
    reader: HardWordReader<SpeechLog>,
}

#[wasm_bindgen]
impl Reader {
    #[wasm_bindgen(constructor)]
    pub fn new(data_json: &str) -> Result<Reader, JsValue> {
        let data = ReaderData::from_json(data_json).map_err(to_js_error)?;
        Ok(Reader { reader: HardWordReader::new(data, SpeechLog::default()) })
    }

    pub fn words(&self) -> String {
        to_json(&self.reader.words())
    }

    /// Popup as JSON, or `null` when the word has nothing to show.
    pub fn open_popup(&mut self, word: &str) -> String {
        to_json(&self.reader.open_popup(word))
    }

    pub fn hear_again(&mut self) -> String {
        to_json(&self.reader.hear_again())
    }

    pub fn speak_syllable(&mut self, index: usize) {
        self.reader.speak_syllable(index);
    }

    pub fn close_popup(&mut self) {
        self.reader.close_popup();
    }

    pub fn read_normal(&mut self) {
        self.reader.read_normal();
    }

    pub fn read_slow(&mut self) {
        self.reader.read_slow();
    }

    /// Word to highlight for a boundary event's `charIndex`.
    pub fn on_boundary(&mut self, char_index: usize) -> Option<u32> {
        self.reader.on_boundary(char_index).map(|ix| ix as u32)
    }

    pub fn on_end(&mut self, id: u32) {
        self.reader.on_end(id);
    }

    pub fn stop(&mut self) {
        self.reader.stop();
    }

    pub fn highlighted(&self) -> Option<u32> {
        self.reader.highlighted().map(|ix| ix as u32)
    }

    pub fn take_speech(&mut self) -> String {
        to_json(&self.reader.speech_mut().backend_mut().take_events())
    }
}

/// Letters on the alphabet grid, as a JSON array of strings.
#[wasm_bindgen]
pub fn grid_letters() -> String {
    let letters: Vec<String> = navigation::alphabet().iter().map(|c| c.to_string()).collect();
    to_json(&letters)
}

/// Where a tapped grid letter leads.
#[wasm_bindgen]
pub fn letter_url(letter: &str) -> Result<String, JsValue> {
    let letter = navigation::parse_letter(letter).map_err(to_js_error)?;
    Ok(navigation::letter_page_url(letter))
}

#[wasm_bindgen]
pub fn grid_url() -> String {
    navigation::ALPHABET_GRID_URL.to_string()
}

#[wasm_bindgen]
pub fn grid_navigate_delay_ms() -> u32 {
    navigation::GRID_NAVIGATE_DELAY_MS
}
