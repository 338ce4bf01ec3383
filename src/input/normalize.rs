//! Coordinate normalization for the virtual stick.
//!
//! Maps a pointer position inside the stick's bounding box to an
//! [`AxisValue`] in `[-1.0, 1.0]` on each axis, plus the point the handle
//! should be drawn at once clamped to the box.
//!
//! # Axis conventions
//!
//! - X grows to the right on screen and in the output.
//! - Screen Y grows downward, output Y grows upward. `invert_y` flips that.
//!
//! # Clamping
//!
//! Each axis is clamped independently (square, not radial). A pointer past
//! an edge produces exactly `±1.0` on that axis and the clamped point is
//! moved onto the edge the pointer crossed: past the top gives `y = 1.0`
//! with `clamped.y = 0`, past the bottom gives `y = -1.0` with
//! `clamped.y = height`.

use super::geometry::{AxisValue, Point, Size};

/// Result of normalizing one pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    /// Stick output in `[-1.0, 1.0]` per axis
    pub value: AxisValue,
    /// Pointer position pulled back onto the bounding box
    pub clamped: Point,
}

/// Normalize a pointer position relative to the stick's top-left origin.
///
/// A box with no usable radius (zero, negative or non-finite) cannot move
/// the stick: the result is centered and clamped to the origin. A sample
/// with a non-finite coordinate is treated as resting at the box center.
///
/// # Example
/// ```
/// use floating_sticks::input::geometry::{Point, Size};
/// use floating_sticks::input::normalize::normalize;
///
/// let bounds = Size::square(100.0);
///
/// // Center of the box is the resting position
/// let n = normalize(Point::new(50.0, 50.0), bounds, false);
/// assert_eq!((n.value.x, n.value.y), (0.0, 0.0));
///
/// // Top-right corner is full right, full up
/// let n = normalize(Point::new(100.0, 0.0), bounds, false);
/// assert_eq!((n.value.x, n.value.y), (1.0, 1.0));
/// ```
pub fn normalize(point: Point, bounds: Size, invert_y: bool) -> Normalized {
    let radius = bounds.radius();
    if !(radius > 0.0) || !radius.is_finite() {
        return Normalized {
            value: AxisValue::CENTER,
            clamped: Point::ZERO,
        };
    }
    if !point.x.is_finite() || !point.y.is_finite() {
        return Normalized {
            value: AxisValue::CENTER,
            clamped: Point::new(radius, radius),
        };
    }

    let mut clamped = point;
    let mut x = point.x / radius - 1.0;
    let mut y = -(point.y / radius - 1.0);

    if x > 1.0 {
        x = 1.0;
        clamped.x = bounds.width;
    } else if x < -1.0 {
        x = -1.0;
        clamped.x = 0.0;
    }

    if y > 1.0 {
        y = 1.0;
        clamped.y = 0.0;
    } else if y < -1.0 {
        y = -1.0;
        clamped.y = bounds.height;
    }

    if invert_y {
        y = -y;
    }

    Normalized {
        value: AxisValue::new(x, y),
        clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BOX: Size = Size {
        width: 120.0,
        height: 120.0,
    };

    #[test]
    fn test_center_is_zero() {
        let n = normalize(Point::new(60.0, 60.0), BOX, false);
        assert_eq!(n.value, AxisValue::CENTER);
        assert_eq!(n.clamped, Point::new(60.0, 60.0));
    }

    #[test]
    fn test_quadrant_signs() {
        // Upper-left of the box on screen is left/up on the stick
        let n = normalize(Point::new(30.0, 30.0), BOX, false);
        assert!(n.value.x < 0.0 && n.value.y > 0.0);

        // Lower-right on screen is right/down
        let n = normalize(Point::new(90.0, 90.0), BOX, false);
        assert!(n.value.x > 0.0 && n.value.y < 0.0);
    }

    #[test]
    fn test_half_deflection() {
        let n = normalize(Point::new(90.0, 60.0), BOX, false);
        assert!((n.value.x - 0.5).abs() < 1e-6);
        assert_eq!(n.value.y, 0.0);
    }

    #[test]
    fn test_clamp_past_right_and_left() {
        let n = normalize(Point::new(500.0, 60.0), BOX, false);
        assert_eq!(n.value.x, 1.0);
        assert_eq!(n.clamped.x, 120.0);

        let n = normalize(Point::new(-500.0, 60.0), BOX, false);
        assert_eq!(n.value.x, -1.0);
        assert_eq!(n.clamped.x, 0.0);
    }

    #[test]
    fn test_y_clamp_lands_on_crossed_edge() {
        // Regression: dragging above the box must park the handle on the top
        // edge, and below the box on the bottom edge, for taps and drags alike.
        let above = normalize(Point::new(60.0, -300.0), BOX, false);
        assert_eq!(above.value.y, 1.0);
        assert_eq!(above.clamped.y, 0.0);

        let below = normalize(Point::new(60.0, 300.0), BOX, false);
        assert_eq!(below.value.y, -1.0);
        assert_eq!(below.clamped.y, 120.0);
    }

    #[test]
    fn test_y_clamp_edge_independent_of_inversion() {
        let above = normalize(Point::new(60.0, -300.0), BOX, true);
        assert_eq!(above.value.y, -1.0);
        assert_eq!(above.clamped.y, 0.0);
    }

    #[test]
    fn test_invert_y_negates() {
        let p = Point::new(40.0, 20.0);
        let plain = normalize(p, BOX, false);
        let inverted = normalize(p, BOX, true);
        assert_eq!(plain.value.x, inverted.value.x);
        assert_eq!(plain.value.y, -inverted.value.y);
    }

    #[test]
    fn test_zero_size_bounds() {
        let n = normalize(Point::new(10.0, 10.0), Size::new(0.0, 0.0), false);
        assert_eq!(n.value, AxisValue::CENTER);
        assert_eq!(n.clamped, Point::ZERO);
    }

    #[test]
    fn test_non_finite_sample_is_centered() {
        for p in [
            Point::new(f32::NAN, 60.0),
            Point::new(60.0, f32::NAN),
            Point::new(f32::INFINITY, 60.0),
            Point::new(60.0, f32::NEG_INFINITY),
        ] {
            let n = normalize(p, BOX, true);
            assert_eq!(n.value, AxisValue::CENTER);
            assert!(n.value.in_range());
            assert_eq!(n.clamped, Point::new(60.0, 60.0));
        }
    }

    #[test]
    fn test_negative_and_nan_bounds() {
        let n = normalize(Point::new(10.0, 10.0), Size::new(-4.0, -4.0), false);
        assert_eq!(n.value, AxisValue::CENTER);

        let n = normalize(Point::new(10.0, 10.0), Size::new(f32::NAN, 10.0), false);
        assert!(n.value.in_range());
    }

    #[test]
    fn test_rectangular_bounds_use_larger_side() {
        // radius = 100 / 2 = 50
        let n = normalize(Point::new(100.0, 50.0), Size::new(100.0, 40.0), false);
        assert_eq!(n.value.x, 1.0);
        assert_eq!(n.value.y, 0.0);
    }

    proptest! {
        #[test]
        fn prop_inside_box_is_open_interval(x in 0.001f32..119.999, y in 0.001f32..119.999) {
            let n = normalize(Point::new(x, y), BOX, false);
            prop_assert!(n.value.x > -1.0 && n.value.x < 1.0);
            prop_assert!(n.value.y > -1.0 && n.value.y < 1.0);
            prop_assume!((x - 60.0).abs() > 0.01 && (y - 60.0).abs() > 0.01);
            prop_assert_eq!(n.value.x > 0.0, x > 60.0);
            prop_assert_eq!(n.value.y > 0.0, y < 60.0);
        }

        #[test]
        fn prop_never_out_of_range(x in -1e6f32..1e6, y in -1e6f32..1e6, invert in any::<bool>()) {
            let n = normalize(Point::new(x, y), BOX, invert);
            prop_assert!(n.value.in_range());
        }

        #[test]
        fn prop_clamping_is_idempotent(x in -1e5f32..1e5, y in -1e5f32..1e5) {
            let n = normalize(Point::new(x, y), BOX, false);
            let again = normalize(n.clamped, BOX, false);
            prop_assert_eq!(n.value, again.value);
            prop_assert_eq!(n.clamped, again.clamped);
        }

        #[test]
        fn prop_outside_is_saturated(x in 120.5f32..1e6, y in 0.0f32..120.0) {
            let n = normalize(Point::new(x, y), BOX, false);
            prop_assert_eq!(n.value.x, 1.0);
            let n = normalize(Point::new(-x, y), BOX, false);
            prop_assert_eq!(n.value.x, -1.0);
        }

        #[test]
        fn prop_clamped_point_stays_in_box(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let n = normalize(Point::new(x, y), BOX, false);
            prop_assert!((n.clamped.x - x.clamp(0.0, 120.0)).abs() < 1e-3);
            prop_assert!((n.clamped.y - y.clamp(0.0, 120.0)).abs() < 1e-3);
        }
    }
}
