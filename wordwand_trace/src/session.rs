use super::accuracy;
use super::config::TraceConfig;
use super::error::TraceError;
use super::glyphs::{glyph_for, GlyphLayout};
use super::letter_mask::LetterMask;
use super::surface::{LineStyle, Surface, GUIDE_COLOR, PEN_COLOR};
use super::verdict::{classify, CheckOutcome, Feedback};
use super::{Point, Stroke};

/// On-screen rectangle of the drawing surface, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Viewport {
        Viewport {
            left: left,
            top: top,
            width: width,
            height: height,
        }
    }

    /// Maps a client coordinate into logical canvas space. A degenerate
    /// axis keeps the plain offset.
    pub fn to_logical(&self, client_x: f32, client_y: f32, config: &TraceConfig) -> Point {
        let scale_x = if self.width > 0.0 { config.canvas_width as f32 / self.width } else { 1.0 };
        let scale_y = if self.height > 0.0 { config.canvas_height as f32 / self.height } else { 1.0 };
        Point::new((client_x - self.left) * scale_x, (client_y - self.top) * scale_y)
    }
}

/// Raw pointer input, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseDown { x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseUp,
    MouseLeave,
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    Idle,
    Drawing,
}

/// One letter's tracing attempt: the mask, the strokes drawn over it and the
/// last check result. Changing letter goes through `navigate`, which rebuilds
/// everything.
pub struct TraceSession<S: Surface> {
    config: TraceConfig,
    surface: S,
    viewport: Viewport,
    mask: LetterMask,
    outline: Vec<Vec<Point>>,
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    outcome: Option<CheckOutcome>,
    back_visible: bool,
}

impl<S: Surface> TraceSession<S> {
    pub fn new(letter: char, config: TraceConfig, surface: S) -> Result<TraceSession<S>, TraceError> {
        let (mask, outline) = build_target(letter, &config)?;
        let viewport = Viewport::new(0.0, 0.0, config.canvas_width as f32, config.canvas_height as f32);
        let mut session = TraceSession {
            config: config,
            surface: surface,
            viewport: viewport,
            mask: mask,
            outline: outline,
            strokes: Vec::new(),
            active: None,
            outcome: None,
            back_visible: false,
        };
        session.reset();
        Ok(session)
    }

    /// Switches to another letter. On error the current letter stays.
    pub fn navigate(&mut self, letter: char) -> Result<(), TraceError> {
        let (mask, outline) = build_target(letter, &self.config)?;
        self.mask = mask;
        self.outline = outline;
        self.reset();
        Ok(())
    }

    /// Drops all strokes and any result, and repaints the guide letter.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.active = None;
        self.outcome = None;
        self.back_visible = false;
        self.surface.clear();
        self.surface.paint_mask(&self.mask);
        let guide = LineStyle {
            color: GUIDE_COLOR.to_string(),
            width: self.config.guide_width,
            round_cap: false,
        };
        self.surface.paint_guide(&self.outline, &guide);
        log::debug!("Trace session ready for {:?}", self.mask.letter());
    }

    /// Starts a stroke. Ignored while another stroke is in progress.
    pub fn begin_stroke(&mut self, pt: Point) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(Stroke { points: vec![pt] });
        true
    }

    /// Appends to the active stroke and inks the new segment.
    pub fn extend_stroke(&mut self, pt: Point) -> bool {
        let stroke = match self.active.as_mut() {
            Some(stroke) => stroke,
            None => return false,
        };
        if let Some(last) = stroke.points.last() {
            let pen = LineStyle {
                color: PEN_COLOR.to_string(),
                width: self.config.pen_width,
                round_cap: true,
            };
            self.surface.draw_segment(*last, pt, &pen);
        }
        stroke.points.push(pt);
        true
    }

    /// Commits the active stroke, if any. Returns whether a stroke was added.
    pub fn end_stroke(&mut self) -> bool {
        match self.active.take() {
            Some(stroke) if !stroke.points.is_empty() => {
                log::trace!("Stroke {} committed with {} points", self.strokes.len(), stroke.points.len());
                self.strokes.push(stroke);
                true
            }
            _ => false,
        }
    }

    pub fn score(&self) -> f32 {
        accuracy::score(&self.strokes, Some(&self.mask), &self.config)
    }

    /// The "check" button: scores the committed strokes, remembers the
    /// outcome, and unlocks the back button once something was scored.
    pub fn check(&mut self) -> Feedback {
        let outcome = if self.strokes.is_empty() {
            CheckOutcome::Empty
        } else {
            let score = self.score();
            self.back_visible = true;
            CheckOutcome::Scored {
                score: score,
                band: classify(score, &self.config),
            }
        };
        log::debug!("Checked {:?}: {:?}", self.mask.letter(), outcome);
        self.outcome = Some(outcome);
        outcome.feedback(&self.config)
    }

    /// Replays recorded strokes as if they were drawn.
    pub fn replay(&mut self, strokes: &[Stroke]) {
        for stroke in strokes {
            let mut points = stroke.points.iter();
            if let Some(first) = points.next() {
                self.begin_stroke(*first);
                for pt in points {
                    self.extend_stroke(*pt);
                }
                self.end_stroke();
            }
        }
    }

    /// Feeds one input event through the pen state machine. Returns true if
    /// the page must suppress the event's default action.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::MouseDown { x, y } => {
                let pt = self.viewport.to_logical(x, y, &self.config);
                self.begin_stroke(pt);
                false
            }
            InputEvent::MouseMove { x, y } => {
                let pt = self.viewport.to_logical(x, y, &self.config);
                self.extend_stroke(pt);
                false
            }
            InputEvent::MouseUp | InputEvent::MouseLeave => {
                self.end_stroke();
                false
            }
            InputEvent::TouchStart { x, y } => {
                let pt = self.viewport.to_logical(x, y, &self.config);
                self.begin_stroke(pt);
                true
            }
            InputEvent::TouchMove { x, y } => {
                let pt = self.viewport.to_logical(x, y, &self.config);
                self.extend_stroke(pt);
                true
            }
            InputEvent::TouchEnd => {
                self.end_stroke();
                true
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn letter(&self) -> char {
        self.mask.letter()
    }

    pub fn pen_state(&self) -> PenState {
        if self.active.is_some() { PenState::Drawing } else { PenState::Idle }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn mask(&self) -> &LetterMask {
        &self.mask
    }

    pub fn outline(&self) -> &[Vec<Point>] {
        &self.outline
    }

    pub fn outcome(&self) -> Option<CheckOutcome> {
        self.outcome
    }

    /// Feedback for the last check; None while the result area is blank.
    pub fn feedback(&self) -> Option<Feedback> {
        self.outcome.map(|o| o.feedback(&self.config))
    }

    pub fn back_visible(&self) -> bool {
        self.back_visible
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

fn build_target(letter: char, config: &TraceConfig) -> Result<(LetterMask, Vec<Vec<Point>>), TraceError> {
    let glyph = glyph_for(letter)?;
    let outline = glyph.polylines(&GlyphLayout::centered(&glyph, config));
    let mask = LetterMask::render(glyph.letter, config)?;
    Ok((mask, outline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::surface::{DrawCommand, NullSurface, RecordingSurface};
    use super::super::verdict::{Band, MSG_RETRY};

    // Points every `step` pixels along a polyline
    fn densify(line: &[Point], step: f32) -> Stroke {
        let mut points: Vec<Point> = vec![line[0]];
        for i in 1..line.len() {
            let (a, b) = (line[i - 1], line[i]);
            let n = (a.distance_to(b) / step).ceil().max(1.0) as usize;
            for k in 1..=n {
                let t = k as f32 / n as f32;
                points.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        Stroke { points: points }
    }

    fn session(letter: char) -> TraceSession<RecordingSurface> {
        TraceSession::new(letter, TraceConfig::default(), RecordingSurface::new()).unwrap()
    }

    #[test]
    fn test_initialize_paints_guide() {
        let s = session('A');
        let commands = s.surface().commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DrawCommand::Clear);
        assert_eq!(commands[1], DrawCommand::PaintMask { letter: 'A' });
        match &commands[2] {
            DrawCommand::PaintGuide { outline, style } => {
                assert_eq!(outline.len(), 2);
                assert_eq!(style.width, 10.0);
            }
            other => panic!("Unexpected command {:?}", other),
        }
        assert_eq!(s.pen_state(), PenState::Idle);
        assert!(s.strokes().is_empty());
        assert!(s.feedback().is_none());
        assert!(!s.back_visible());
    }

    #[test]
    fn test_unknown_letter() {
        match TraceSession::new('#', TraceConfig::default(), NullSurface) {
            Err(TraceError::UnknownGlyph('#')) => (),
            Err(other) => panic!("Unexpected error {:?}", other),
            Ok(_) => panic!("Expected an error"),
        }
    }

    #[test]
    fn test_empty_score() {
        let s = session('A');
        assert_eq!(s.score(), 0.0);
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut s = session('A');
        assert!(!s.extend_stroke(Point::new(5.0, 5.0)));
        assert!(!s.end_stroke());
        assert!(s.begin_stroke(Point::new(10.0, 10.0)));
        assert_eq!(s.pen_state(), PenState::Drawing);
        // Re-entrant begin is a no-op
        assert!(!s.begin_stroke(Point::new(90.0, 90.0)));
        assert!(s.extend_stroke(Point::new(20.0, 10.0)));
        assert!(s.end_stroke());
        assert_eq!(s.pen_state(), PenState::Idle);
        // Second end has no effect
        assert!(!s.end_stroke());
        assert_eq!(s.strokes().len(), 1);
        assert_eq!(s.strokes()[0].points, vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)]);
        match s.surface().commands().last() {
            Some(DrawCommand::DrawSegment { from, to, style }) => {
                assert_eq!(*from, Point::new(10.0, 10.0));
                assert_eq!(*to, Point::new(20.0, 10.0));
                assert_eq!(style.width, 18.0);
                assert!(style.round_cap);
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_dense_trace_excellent() {
        let mut s = session('A');
        let outline = s.outline().to_vec();
        let strokes = vec![
            densify(&outline[0][0..2], 2.0),
            densify(&outline[0][1..3], 2.0),
            densify(&outline[1], 2.0),
        ];
        s.replay(&strokes);
        assert_eq!(s.strokes().len(), 3);
        let score = s.score();
        assert!(score >= 70.0, "Dense trace scored only {}.", score);
        let fb = s.check();
        assert_eq!(s.outcome().map(|o| o.score()), Some(score));
        match s.outcome() {
            Some(CheckOutcome::Scored { band, .. }) => assert_eq!(band, Band::Excellent),
            other => panic!("Unexpected outcome {:?}", other),
        }
        assert!(fb.celebration.is_some());
        assert!(s.back_visible());
    }

    #[test]
    fn test_corner_scribble_retry() {
        let mut s = session('A');
        s.replay(&[Stroke { points: vec![Point::new(10.0, 10.0), Point::new(25.0, 15.0), Point::new(40.0, 20.0)] }]);
        assert!(s.score() < 40.0);
        let fb = s.check();
        assert_eq!(fb.message, MSG_RETRY);
        assert!(fb.celebration.is_none());
        assert!(s.back_visible());
    }

    #[test]
    fn test_check_without_strokes() {
        let mut s = session('B');
        let fb = s.check();
        assert_eq!(s.score(), 0.0);
        assert_eq!(s.outcome(), Some(CheckOutcome::Empty));
        assert!(fb.message.starts_with("Draw something first"));
        assert!(fb.celebration.is_none());
        assert!(!s.back_visible());
    }

    #[test]
    fn test_active_stroke_not_scored() {
        let mut s = session('B');
        s.begin_stroke(Point::new(300.0, 200.0));
        s.extend_stroke(Point::new(310.0, 200.0));
        assert_eq!(s.score(), 0.0);
        assert_eq!(s.check().message, CheckOutcome::Empty.feedback(s.config()).message);
    }

    #[test]
    fn test_reset_after_check() {
        let mut s = session('A');
        s.replay(&[Stroke { points: vec![Point::new(300.0, 200.0)] }]);
        s.check();
        assert!(s.feedback().is_some());
        assert!(s.back_visible());
        s.begin_stroke(Point::new(1.0, 1.0));
        s.surface_mut().take_commands();
        s.reset();
        assert!(s.feedback().is_none());
        assert!(!s.back_visible());
        assert!(s.strokes().is_empty());
        assert_eq!(s.pen_state(), PenState::Idle);
        assert_eq!(s.letter(), 'A');
        assert_eq!(s.surface().commands()[1], DrawCommand::PaintMask { letter: 'A' });
    }

    #[test]
    fn test_navigate() {
        let mut s = session('A');
        s.replay(&[Stroke { points: vec![Point::new(300.0, 200.0)] }]);
        let mask_a = s.mask().clone();
        s.navigate('o').unwrap();
        assert_eq!(s.letter(), 'O');
        assert!(s.strokes().is_empty());
        assert!(*s.mask() != mask_a);
        assert!(s.navigate('?').is_err());
        assert_eq!(s.letter(), 'O');
    }

    #[test]
    fn test_viewport_events() {
        let mut s = session('A');
        // Canvas displayed at half size, offset on the page
        s.set_viewport(Viewport::new(10.0, 20.0, 300.0, 200.0));
        assert!(!s.handle(InputEvent::MouseDown { x: 160.0, y: 120.0 }));
        assert!(!s.handle(InputEvent::MouseMove { x: 170.0, y: 120.0 }));
        assert!(!s.handle(InputEvent::MouseLeave));
        assert_eq!(s.strokes()[0].points, vec![Point::new(300.0, 200.0), Point::new(320.0, 200.0)]);
        // Moves without a pressed pointer are ignored
        assert!(!s.handle(InputEvent::MouseMove { x: 20.0, y: 20.0 }));
        assert_eq!(s.strokes().len(), 1);
    }

    #[test]
    fn test_touch_suppresses_default() {
        let mut s = session('A');
        assert!(s.handle(InputEvent::TouchStart { x: 100.0, y: 100.0 }));
        assert!(s.handle(InputEvent::TouchMove { x: 110.0, y: 100.0 }));
        assert!(s.handle(InputEvent::TouchEnd));
        assert_eq!(s.strokes().len(), 1);
        assert_eq!(s.strokes()[0].points.len(), 2);
    }

    #[test]
    fn test_degenerate_viewport() {
        let config = TraceConfig::default();
        let vp = Viewport::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(vp.to_logical(15.0, 25.0, &config), Point::new(10.0, 20.0));
    }
}
