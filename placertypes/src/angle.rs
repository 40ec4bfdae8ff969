//! Angle and rounding helpers shared by the projection engine and the point model.
//!
//! The legacy engine data was produced with round-half-to-even and truncating integer casts, so
//! everything here reproduces those exactly rather than using `f64::round`.

/// Offset between the polar angle (in degrees) and the angle the engine's definition files and
/// the placement UI use. Engine angle 0 points at the bow.
pub const ENGINE_ANGULAR_OFFSET: f64 = 90.0;

/// Round half to even, the way the legacy tooling rounds every exported number.
pub fn round_even(v: f64) -> f64 { v.round_ties_even() }

/// `round_even` as an integer.
pub fn round_even_i32(v: f64) -> i32 { round_even(v) as i32 }

/// Normalize degrees into `[0, 360)`.
pub fn d360(deg: f64) -> f64 {
  let a = deg.rem_euclid(360.0);
  // rem_euclid can land exactly on the modulus for tiny negative inputs
  if a >= 360.0 {
    0.0
  } else {
    a
  }
}

/// Normalize degrees into `(-180, 180]`.
pub fn d180(deg: f64) -> f64 {
  let a = d360(deg);
  if a > 180.0 {
    a - 360.0
  } else {
    a
  }
}

/// Integer degrees into `[0, 360)`.
pub fn wrap_deg(deg: i32) -> i32 { deg.rem_euclid(360) }

/// Sum of two integer angles in `[0, 360)`. Each side is wrapped first, so any `i32` is accepted.
pub fn add_deg(a: i32, b: i32) -> i32 { wrap_deg(wrap_deg(a) + wrap_deg(b)) }
