//! Bearing and range between two planar positions
//!
//! Bearing 0 points along -y (grid north) and increases clockwise.

use nalgebra::Vector2;

/// Straight-line distance from `from` to `to`
pub fn range(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    (to - from).norm()
}

/// Clockwise bearing in degrees, always in `[0, 360)`.
///
/// When the two points coincide there is no direction to report; the
/// bearing is defined as 0.
pub fn bearing(from: &Vector2<f64>, to: &Vector2<f64>) -> f64 {
    let d = to - from;
    if d.x == 0.0 && d.y == 0.0 {
        return 0.0;
    }

    let mut angle = d.x.atan2(-d.y).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    // a tiny negative angle can round up to a full turn
    if angle >= 360.0 {
        angle -= 360.0;
    }
    // fold -0.0 into 0.0
    angle + 0.0
}

/// Bearing and range together
pub fn bearing_range(from: &Vector2<f64>, to: &Vector2<f64>) -> (f64, f64) {
    (bearing(from, to), range(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vector2<f64> {
        Vector2::new(x, y)
    }

    #[test]
    fn test_cardinal_bearings() {
        let origin = v(0.0, 0.0);
        assert!((bearing(&origin, &v(0.0, -100.0)) - 0.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(100.0, 0.0)) - 90.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(0.0, 100.0)) - 180.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(-100.0, 0.0)) - 270.0).abs() < 1e-10);
    }

    #[test]
    fn test_diagonal_bearings() {
        let origin = v(0.0, 0.0);
        assert!((bearing(&origin, &v(50.0, -50.0)) - 45.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(50.0, 50.0)) - 135.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(-50.0, 50.0)) - 225.0).abs() < 1e-10);
        assert!((bearing(&origin, &v(-50.0, -50.0)) - 315.0).abs() < 1e-10);
    }

    #[test]
    fn test_bearing_is_translation_invariant() {
        let a = bearing(&v(0.0, 0.0), &v(30.0, -40.0));
        let b = bearing(&v(1000.0, 2000.0), &v(1030.0, 1960.0));
        assert!((a - b).abs() < 1e-10);
    }

    #[test]
    fn test_bearing_range_of_values() {
        let origin = v(0.0, 0.0);
        for i in 0..360 {
            let theta = (i as f64).to_radians();
            let target = v(theta.sin() * 500.0, -theta.cos() * 500.0);
            let b = bearing(&origin, &target);
            assert!((0.0..360.0).contains(&b), "bearing {b} out of range");
        }
    }

    #[test]
    fn test_bearing_just_west_of_north() {
        let b = bearing(&v(0.0, 0.0), &v(-1e-13, -1000.0));
        assert!((0.0..360.0).contains(&b));
        assert!(b > 359.0 || b == 0.0);
    }

    #[test]
    fn test_zero_range_bearing() {
        let p = v(450.0, 750.0);
        let b = bearing(&p, &p);
        assert_eq!(b, 0.0);
        assert!(b.is_sign_positive());
        assert_eq!(range(&p, &p), 0.0);
    }

    #[test]
    fn test_range() {
        assert_eq!(range(&v(0.0, 0.0), &v(300.0, 400.0)), 500.0);
        assert_eq!(range(&v(300.0, 400.0), &v(0.0, 0.0)), 500.0);
        assert_eq!(range(&v(-10.0, 5.0), &v(-10.0, 5.0)), 0.0);
    }

    #[test]
    fn test_bearing_range_pair() {
        let (b, r) = bearing_range(&v(0.0, 0.0), &v(100.0, 0.0));
        assert!((b - 90.0).abs() < 1e-10);
        assert!((r - 100.0).abs() < 1e-10);
    }
}
