use super::Point;

// Flattened curves never get fewer than this many segments
const MIN_SEGMENTS: usize = 4;
const MAX_SEGMENTS: usize = 64;

pub struct CubicCurve2D {
    pub x1: f32,
    pub y1: f32,
    pub ctrlx1: f32,
    pub ctrly1: f32,
    pub ctrlx2: f32,
    pub ctrly2: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicCurve2D {
    pub fn new(x1: f32, y1: f32, ctrlx1: f32, ctrly1: f32, ctrlx2: f32, ctrly2: f32, x2: f32, y2: f32) -> CubicCurve2D {
        CubicCurve2D {
            x1: x1,
            y1: y1,
            ctrlx1: ctrlx1,
            ctrly1: ctrly1,
            ctrlx2: ctrlx2,
            ctrly2: ctrly2,
            x2: x2,
            y2: y2,
        }
    }

    fn get_cubic_ax(&self) -> f32 {
        return self.x2 - self.x1 - self.get_cubic_bx() - self.get_cubic_cx();
    }
    fn get_cubic_ay(&self) -> f32 {
        return self.y2 - self.y1 - self.get_cubic_by() - self.get_cubic_cy();
    }
    fn get_cubic_bx(&self) -> f32 {
        return 3.0 * (self.ctrlx2 - self.ctrlx1) - self.get_cubic_cx();
    }
    fn get_cubic_by(&self) -> f32 {
        return 3.0 * (self.ctrly2 - self.ctrly1) - self.get_cubic_cy();
    }
    fn get_cubic_cx(&self) -> f32 {
        return 3.0 * (self.ctrlx1 - self.x1);
    }
    fn get_cubic_cy(&self) -> f32 {
        return 3.0 * (self.ctrly1 - self.y1);
    }

    pub fn get_x_on_curve(&self, t: f32) -> f32 {
        let t_squared = t * t;
        let t_cubed = t * t_squared;
        return (self.get_cubic_ax() * t_cubed) + (self.get_cubic_bx() * t_squared) + (self.get_cubic_cx() * t) + self.x1;
    }

    pub fn get_y_on_curve(&self, t: f32) -> f32 {
        let t_squared = t * t;
        let t_cubed = t * t_squared;
        return (self.get_cubic_ay() * t_cubed) + (self.get_cubic_by() * t_squared) + (self.get_cubic_cy() * t) + self.y1;
    }

    // Length of the control polygon; an upper bound on the arc length
    fn get_hull_length(&self) -> f32 {
        let a = Point::new(self.x1, self.y1);
        let b = Point::new(self.ctrlx1, self.ctrly1);
        let c = Point::new(self.ctrlx2, self.ctrly2);
        let d = Point::new(self.x2, self.y2);
        a.distance_to(b) + b.distance_to(c) + c.distance_to(d)
    }

    /// Approximates the curve with a polyline whose segments are at most
    /// roughly `max_step` long. The start point is not included; the last
    /// point is exactly the curve's end point.
    pub fn flatten(&self, max_step: f32) -> Vec<Point> {
        let mut segments = (self.get_hull_length() / max_step).ceil() as usize;
        if segments < MIN_SEGMENTS { segments = MIN_SEGMENTS; }
        if segments > MAX_SEGMENTS { segments = MAX_SEGMENTS; }
        let mut res: Vec<Point> = Vec::with_capacity(segments);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            res.push(Point::new(self.get_x_on_curve(t), self.get_y_on_curve(t)));
        }
        res.push(Point::new(self.x2, self.y2));
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_curve() {
        let curve = CubicCurve2D::new(0f32, 1.0, 0.5, 1.0, 0.25, -2.0, 1.0, 1.0);
        assert_eq!(curve.get_x_on_curve(0.0), 0.0);
        assert_eq!(curve.get_y_on_curve(0.0), 1.0);
        assert!((curve.get_x_on_curve(1.0) - 1.0).abs() < 1e-6);
        assert!((curve.get_y_on_curve(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flatten_straight() {
        // Control points on the chord: a straight line from (0,0) to (90,0)
        let curve = CubicCurve2D::new(0.0, 0.0, 30.0, 0.0, 60.0, 0.0, 90.0, 0.0);
        let points = curve.flatten(10.0);
        assert_eq!(points.len(), 9);
        assert_eq!(*points.last().unwrap(), Point::new(90.0, 0.0));
        for pt in &points {
            assert!(pt.y.abs() < 1e-4);
        }
        for i in 1..points.len() {
            assert!(points[i].x > points[i - 1].x);
        }
    }

    #[test]
    fn test_flatten_bounds() {
        let tiny = CubicCurve2D::new(0.0, 0.0, 0.1, 0.0, 0.2, 0.0, 0.3, 0.0);
        assert_eq!(tiny.flatten(10.0).len(), MIN_SEGMENTS);
        let huge = CubicCurve2D::new(0.0, 0.0, 1e4, 0.0, 2e4, 0.0, 3e4, 0.0);
        assert_eq!(huge.flatten(1.0).len(), MAX_SEGMENTS);
    }
}
