//! Geometry helpers.

use cgmath::prelude::*;
use cgmath::{Point2, Vector2};

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Projects a point onto a local coordinate system.
///
/// # Parameters
/// * `point` - The point to project
/// * `origin` - The origin of the coordinate system
/// * `x_axis` - The basis vector pointing in the positive x-axis.
/// * `y_axis` - The basis vector pointing in the positive y-axis.
pub fn project_local(
    point: Point2d,
    origin: Point2d,
    x_axis: Vector2d,
    y_axis: Vector2d,
) -> Point2d {
    let point = point - origin;
    Point2d::new(point.dot(x_axis), point.dot(y_axis))
}

/// Rotates a vector 90 degrees anticlockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Wraps an angle into the range `(-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - std::f64::consts::TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn local_projection() {
        let x_axis = Vector2d::new(0.0, 1.0);
        let y_axis = Vector2d::new(1.0, 0.0);
        let p = project_local(Point2d::new(5.0, -2.0), Point2d::new(1.0, 0.0), x_axis, y_axis);
        assert_approx_eq!(p.x, -2.0);
        assert_approx_eq!(p.y, 4.0);
    }

    #[test]
    fn angles_wrap() {
        use std::f64::consts::PI;
        assert_approx_eq!(wrap_angle(0.5), 0.5);
        assert_approx_eq!(wrap_angle(2.0 * PI + 0.5), 0.5);
        assert_approx_eq!(wrap_angle(-0.5), -0.5);
        assert_approx_eq!(wrap_angle(3.0 * PI / 2.0), -PI / 2.0);
    }
}
