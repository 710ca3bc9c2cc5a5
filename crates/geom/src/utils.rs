//! Small numeric helpers shared by the segment types.

use crate::{vector, Vector};

use core::f64::consts::TAU;

#[inline]
pub fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
#[inline]
pub fn sign(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// The vector rotated by a quarter turn counter-clockwise.
#[inline]
pub fn tangent(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Normalizes an angle into `[0, 2π)`.
#[inline]
pub fn normalized_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Angle of a vector relative to the x axis, in `(-π, π]`.
#[inline]
pub fn vector_angle(v: Vector) -> f64 {
    v.y.atan2(v.x)
}

#[test]
fn sign_of_zero() {
    assert_eq!(sign(0.0), 0);
    assert_eq!(sign(-0.0), 0);
    assert_eq!(sign(3.5), 1);
    assert_eq!(sign(-1e-300), -1);
}

#[test]
fn angle_normalization() {
    use core::f64::consts::PI;
    assert_eq!(normalized_angle(0.0), 0.0);
    assert!((normalized_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
    assert!((normalized_angle(5.0 * PI) - PI).abs() < 1e-12);
    assert!(normalized_angle(-1e-20) < TAU);
}
