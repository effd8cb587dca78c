use super::config::TraceConfig;
use super::{Point, Stroke};

/// Read access to a coverage target, one opacity value per logical pixel.
pub trait MaskSampler {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn opacity(&self, x: u32, y: u32) -> u8;
}

// Grid points (every `sample_step` pixels) that fall inside the glyph
pub fn sample_points(mask: &dyn MaskSampler, config: &TraceConfig) -> Vec<Point> {
    let mut res: Vec<Point> = Vec::new();
    let step = config.sample_step.max(1) as usize;
    for y in (0..mask.height()).step_by(step) {
        for x in (0..mask.width()).step_by(step) {
            if mask.opacity(x, y) > config.opacity_threshold {
                res.push(Point::new(x as f32, y as f32));
            }
        }
    }
    res
}

/// Distance from `sample` to the closest point of any stroke. Infinite when
/// there are no points at all.
pub fn nearest_distance(sample: Point, strokes: &[Stroke]) -> f32 {
    let mut min_dist = std::f32::INFINITY;
    for stroke in strokes {
        for pt in &stroke.points {
            let d = sample.distance_to(*pt);
            if d < min_dist { min_dist = d; }
        }
    }
    min_dist
}

/// Scores how well `strokes` cover the mask, from 0 to 100.
///
/// Every retained mask sample contributes its distance to the nearest drawn
/// point; the average distance is mapped linearly so that 0 gives 100 and
/// `tolerance` or more gives 0. Strokes outside the glyph cost nothing, and
/// stroke order and direction are ignored.
pub fn score(strokes: &[Stroke], mask: Option<&dyn MaskSampler>, config: &TraceConfig) -> f32 {
    let mask = match mask {
        Some(mask) => mask,
        None => return 0.0,
    };
    if strokes.iter().all(|s| s.points.is_empty()) {
        return 0.0;
    }
    let samples = sample_points(mask, config);
    if samples.is_empty() {
        return 0.0;
    }
    let mut total_error = 0f32;
    for sample in &samples {
        total_error += nearest_distance(*sample, strokes);
    }
    let avg_error = total_error / samples.len() as f32;
    log::trace!("{} samples, average error {:.2}", samples.len(), avg_error);
    f32::max(0.0, 1.0 - avg_error / config.tolerance) * 100.0
}
