//! The fixed-camera projection between polar coordinates and the projected sprite offset.
//!
//! Derived from the engine's 3D-to-2D conversion: the ship's plane is tilted toward the camera by
//! a constant angle and viewed with a mild perspective from a fixed distance.

use tracing::debug;

use crate::types::*;

/// Camera tilt, in radians.
pub const VIEW_ANGLE: f64 = 0.4636448;
/// Camera distance, in units of the viewport size.
pub const CAMERA_DISTANCE: f64 = 2.0;
/// Depth floor; nothing is projected closer to the camera than this.
pub const MIN_ZG: f64 = 0.1;
/// Floor for the inverse projection's denominator.
pub const MIN_DEN: f64 = 0.1;
/// Below this the point is treated as lying on the horizontal axis.
pub const PY_EPSILON: f64 = 1e-10;

fn k1() -> f64 { VIEW_ANGLE.sin() }

fn k2() -> f64 { VIEW_ANGLE.cos() }

/// Project a polar coordinate into scene space. The returned z is the input z, untouched.
pub fn polar_to_projection(cfg: &SpriteConfig, polar: PolarCoord) -> SceneCoord {
  let (k1, k2) = (k1(), k2());
  let scale = cfg.viewport_size();

  let x = polar.angle.cos() * polar.radius / scale;
  let y = polar.angle.sin() * polar.radius / scale;
  let z = polar.z / scale;

  let yg = y * k2 - z * k1;
  let zg = (y * k1 + z * k2 + CAMERA_DISTANCE).max(MIN_ZG);

  let factor = scale * CAMERA_DISTANCE / zg;
  SceneCoord { x: x * factor, y: yg * factor, z: polar.z }
}

/// Recover the polar coordinate of a projected point seen while the sprite shows
/// `rotation_frame`. The result is relative to frame 0.
///
/// The radius is the on-screen distance from the cell center and z is carried through as-is;
/// only the angle is solved for.
pub fn projection_to_polar(cfg: &SpriteConfig, scene: SceneCoord, rotation_frame: u32) -> PolarCoord {
  let (k1, k2) = (k1(), k2());
  let scale = cfg.viewport_size();

  let px = scene.x / scale;
  let py = scene.y / scale;
  let z = match cfg.inverse_depth {
    InverseDepth::Clamped => (scene.z / scale).min(-2.0 * py),
    InverseDepth::Exact => scene.z / scale,
  };

  let raw_den = CAMERA_DISTANCE * scale * k2 - scene.y * k1;
  let den = raw_den.max(MIN_DEN);
  if den != raw_den {
    debug!(event = "inverse-denominator-clamped", raw_den, y = scene.y);
  }

  let y = scale * (CAMERA_DISTANCE * z * k1 + py * (z * k2 + CAMERA_DISTANCE)) / den;
  let yg = y * k2 - z * k1;
  let x = if py.abs() > PY_EPSILON {
    px * yg / py
  } else {
    let zg = (y * k1 + z * k2 + CAMERA_DISTANCE).max(MIN_ZG);
    px * zg / CAMERA_DISTANCE
  };

  let rotation_offset = cfg.rotation_offset_deg(rotation_frame);
  PolarCoord {
    angle: y.atan2(x) - rotation_offset.to_radians(),
    radius: scene.x.hypot(scene.y),
    z: scene.z,
  }
}

pub fn sprite_to_polar(cfg: &SpriteConfig, sprite: SpriteCoord, z: f64, rotation_frame: u32) -> PolarCoord {
  projection_to_polar(cfg, sprite.to_scene(z), rotation_frame)
}

pub fn polar_to_sprite(cfg: &SpriteConfig, polar: PolarCoord) -> SpriteCoord {
  polar_to_projection(cfg, polar).to_sprite()
}
