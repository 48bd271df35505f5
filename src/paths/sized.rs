use kurbo::{ParamCurve, ParamCurveArclen};

use crate::foundation::core::{CubicBez, Point};

/// Accuracy for arc-length queries on spline segments.
const ARCLEN_ACCURACY: f64 = 1e-4;

/// A normalized path scaled to pixel space and wrapped into a parametric
/// curve supporting point-at-fraction and total-length queries.
///
/// The curve is a uniform Catmull-Rom spline through the waypoints with
/// clamped endpoints, expressed as one cubic Bezier per waypoint pair.
/// Rebuilt on resize; flights hold on to the instance they started with.
#[derive(Clone, Debug)]
pub struct SizedPath {
    points: Vec<Point>,
    segments: Vec<CubicBez>,
    seg_lengths: Vec<f64>,
    length: f64,
}

impl SizedPath {
    pub(crate) fn from_waypoints(points: Vec<Point>) -> Self {
        let segments = catmull_rom_segments(&points);
        let seg_lengths: Vec<f64> = segments
            .iter()
            .map(|s| s.arclen(ARCLEN_ACCURACY))
            .collect();
        let length = seg_lengths.iter().sum();
        Self {
            points,
            segments,
            seg_lengths,
            length,
        }
    }

    /// Pixel-space waypoints the curve interpolates, in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Total arc length of the curve in pixels.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Position after travelling `fraction` of the curve's arc length.
    ///
    /// `fraction` is clamped to [0, 1]. Returns `None` for degenerate paths
    /// with fewer than two waypoints.
    pub fn point_at(&self, fraction: f64) -> Option<Point> {
        let first = self.segments.first()?;
        if self.length <= 0.0 {
            return Some(first.p0);
        }

        let target = fraction.clamp(0.0, 1.0) * self.length;
        let mut remaining = target;
        for (seg, &len) in self.segments.iter().zip(&self.seg_lengths) {
            if remaining <= len {
                if len <= 0.0 {
                    return Some(seg.p0);
                }
                let t = seg.inv_arclen(remaining, ARCLEN_ACCURACY);
                return Some(seg.eval(t));
            }
            remaining -= len;
        }

        // Float error can push the target just past the final segment.
        self.segments.last().map(|s| s.p3)
    }
}

fn catmull_rom_segments(points: &[Point]) -> Vec<CubicBez> {
    if points.len() < 2 {
        return Vec::new();
    }
    let last = points.len() - 1;
    (0..last)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];
            let c1 = p1 + (p2 - p0) / 6.0;
            let c2 = p2 - (p3 - p1) / 6.0;
            CubicBez::new(p1, c1, c2, p2)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> SizedPath {
        SizedPath::from_waypoints(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn collinear_waypoints_give_exact_length() {
        let path = line(&[(0.0, 0.0), (40.0, 0.0), (100.0, 0.0)]);
        assert!((path.length() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn point_at_hits_both_endpoints() {
        let path = line(&[(0.0, 0.0), (30.0, 40.0)]);
        let start = path.point_at(0.0).unwrap();
        let end = path.point_at(1.0).unwrap();
        assert!((start.x - 0.0).abs() < 1e-9 && (start.y - 0.0).abs() < 1e-9);
        assert!((end.x - 30.0).abs() < 1e-6 && (end.y - 40.0).abs() < 1e-6);
    }

    #[test]
    fn point_at_is_arc_length_parameterized() {
        // Unequal spans between waypoints must not bias the parameterization:
        // half the arc length lands at x=50, not at the middle waypoint.
        let path = line(&[(0.0, 0.0), (40.0, 0.0), (100.0, 0.0)]);
        let mid = path.point_at(0.5).unwrap();
        assert!((mid.x - 50.0).abs() < 0.5, "mid.x = {}", mid.x);
    }

    #[test]
    fn point_at_clamps_fraction() {
        let path = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let before = path.point_at(-1.0).unwrap();
        let after = path.point_at(2.0).unwrap();
        assert!((before.x - 0.0).abs() < 1e-9);
        assert!((after.x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_paths_have_no_position() {
        assert!(line(&[]).point_at(0.5).is_none());
        assert!(line(&[(3.0, 4.0)]).point_at(0.5).is_none());
        assert_eq!(line(&[(3.0, 4.0)]).length(), 0.0);
    }
}
