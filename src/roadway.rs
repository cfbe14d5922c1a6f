use crate::math::{project_local, rot90, wrap_angle, Point2d, Vector2d};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single straight lane which wraps around on itself, like a ring road
/// laid flat along the world x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StraightRoadway {
    /// The length of the roadway in m.
    length: f64,
}

/// A pose expressed relative to the roadway.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frenet {
    /// The longitudinal position along the roadway in m, in `[0, length)`.
    pub s: f64,
    /// The lateral offset from the centre line in m, positive to the left.
    pub t: f64,
    /// The heading relative to the roadway in radians.
    pub phi: f64,
}

impl StraightRoadway {
    /// Creates a new roadway of the given length in m.
    pub fn new(length: f64) -> Self {
        if !(length > 0.0 && length.is_finite()) {
            panic!("Roadway length must be positive and finite, got {}", length);
        }
        Self { length }
    }

    /// The length of the roadway in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// A unit vector pointing along the roadway.
    pub fn tangent(&self) -> Vector2d {
        Vector2d::new(1.0, 0.0)
    }

    /// Reduces a longitudinal position to the range `[0, length)`.
    pub fn normalize(&self, s: f64) -> f64 {
        normalize_position(s, self.length)
    }

    /// Projects a world space pose onto the roadway.
    pub fn frenet(&self, pos: Point2d, heading: f64) -> Frenet {
        let tan = self.tangent();
        let local = project_local(pos, Point2d::new(0.0, 0.0), rot90(tan), tan);
        Frenet {
            s: self.normalize(local.y),
            t: local.x,
            phi: wrap_angle(heading - tan.y.atan2(tan.x)),
        }
    }
}

/// Reduces `s` to the range `[0, length)` of a wrap-around roadway.
pub fn normalize_position(s: f64, length: f64) -> f64 {
    let s = s % length;
    let s = if s < 0.0 { s + length } else { s };
    // A tiny negative remainder rounds up to exactly `length` when shifted.
    if s >= length {
        0.0
    } else {
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn normalize_wraps_both_ways() {
        let roadway = StraightRoadway::new(100.0);
        assert_eq!(roadway.normalize(150.0), 50.0);
        assert_eq!(roadway.normalize(-20.0), 80.0);
        assert_eq!(roadway.normalize(0.0), 0.0);
        assert_eq!(roadway.normalize(100.0), 0.0);
        assert_eq!(roadway.normalize(99.5), 99.5);
    }

    #[test]
    fn normalize_extreme_inputs() {
        let s = normalize_position(1e300, 100.0);
        assert!((0.0..100.0).contains(&s));
        let s = normalize_position(-1e300, 100.0);
        assert!((0.0..100.0).contains(&s));
        assert_eq!(normalize_position(-1e-20, 100.0), 0.0);
    }

    #[test]
    fn normalize_stays_in_range() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Ring roads go round and round...");
        for _i in 0..1000 {
            let length = rng.gen_range(0.5..500.0);
            let s = rng.gen_range(-1e6..1e6);
            let n = normalize_position(s, length);
            assert!(n >= 0.0 && n < length, "{} -> {} (length {})", s, n, length);
        }
    }

    #[test]
    fn normalize_is_periodic() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Ring roads go round and round...");
        for _i in 0..100 {
            let s = rng.gen_range(-50.0..50.0);
            let k = rng.gen_range(-20..20) as f64;
            assert_approx_eq!(
                normalize_position(s + k * 64.0, 64.0),
                normalize_position(s, 64.0),
                1e-9
            );
        }
    }

    #[test]
    fn frenet_projection() {
        let roadway = StraightRoadway::new(100.0);
        let f = roadway.frenet(Point2d::new(130.0, 1.5), 0.1);
        assert_approx_eq!(f.s, 30.0);
        assert_approx_eq!(f.t, 1.5);
        assert_approx_eq!(f.phi, 0.1);
    }

    #[test]
    #[should_panic]
    fn zero_length_roadway() {
        StraightRoadway::new(0.0);
    }
}
