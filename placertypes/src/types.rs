use std::ops::BitAnd;

use derive_more::{Add, Display, Sub};
use serde::{Deserialize, Serialize};

use crate::angle::{d180, round_even, ENGINE_ANGULAR_OFFSET};

/// A position inside one sprite cell, in image space: origin at the top-left corner, +y down.
#[derive(
  Add, Sub, Display, Clone, Copy, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct PixelCoord {
  pub x: i32,
  pub y: i32,
}

impl PixelCoord {
  pub fn new(x: i32, y: i32) -> PixelCoord { PixelCoord { x, y } }
}

/// A position relative to the center of the sprite cell, +y up.
#[derive(
  Add, Sub, Display, Clone, Copy, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct SpriteCoord {
  pub x: i32,
  pub y: i32,
}

impl SpriteCoord {
  pub fn new(x: i32, y: i32) -> SpriteCoord { SpriteCoord { x, y } }

  /// Lift into scene space at the given height. Scene x/y are in screen orientation.
  pub fn to_scene(self, z: f64) -> SceneCoord {
    SceneCoord { x: f64::from(self.x), y: -f64::from(self.y), z }
  }
}

/// The projected offset of a point from the cell center (screen orientation, +y down), together
/// with the point's height above the ship's plane.
#[derive(Clone, Copy, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct SceneCoord {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

impl SceneCoord {
  pub fn new(x: f64, y: f64, z: f64) -> SceneCoord { SceneCoord { x, y, z } }

  /// Drop to integer sprite space. Truncates toward zero like the legacy `int()` casts.
  pub fn to_sprite(self) -> SpriteCoord {
    SpriteCoord { x: self.x.trunc() as i32, y: -(self.y.trunc() as i32) }
  }

  pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }
}

/// The serialized form of a position: angle in radians, radius, and height.
#[derive(Clone, Copy, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct PolarCoord {
  pub angle: f64,
  pub radius: f64,
  pub z: f64,
}

impl PolarCoord {
  pub fn new(angle: f64, radius: f64, z: f64) -> PolarCoord { PolarCoord { angle, radius, z } }

  pub fn angle_deg(&self) -> f64 { self.angle.to_degrees() }

  /// Angle as shown in the placement controls, in `(-180, 180]`.
  pub fn display_angle_deg(&self) -> i32 {
    round_even(d180(self.angle_deg() + ENGINE_ANGULAR_OFFSET)) as i32
  }

  /// Angle as written to definition files, in `[0, 360)`.
  pub fn engine_angle_deg(&self) -> i32 {
    (round_even(self.angle_deg() + ENGINE_ANGULAR_OFFSET) as i32).rem_euclid(360)
  }

  pub fn rounded_radius(&self) -> i32 { round_even(self.radius) as i32 }

  pub fn rounded_z(&self) -> i32 { round_even(self.z) as i32 }

  pub fn is_finite(&self) -> bool {
    self.angle.is_finite() && self.radius.is_finite() && self.z.is_finite()
  }
}

/// Which axes a point is reflected across when it is rendered or exported.
/// `x` mirrors left-right, `y` mirrors front-back, `z` mirrors above/below.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorOptions {
  pub x: bool,
  pub y: bool,
  pub z: bool,
}

impl MirrorOptions {
  pub const NONE: MirrorOptions = MirrorOptions { x: false, y: false, z: false };
  pub const ALL: MirrorOptions = MirrorOptions { x: true, y: true, z: true };

  pub fn new(x: bool, y: bool, z: bool) -> MirrorOptions { MirrorOptions { x, y, z } }

  /// x = 1, y = 2, z = 4
  pub fn bits(&self) -> u8 { u8::from(self.x) | u8::from(self.y) << 1 | u8::from(self.z) << 2 }

  pub fn from_bits(bits: u8) -> MirrorOptions {
    MirrorOptions { x: bits & 1 != 0, y: bits & 2 != 0, z: bits & 4 != 0 }
  }

  pub fn is_identity(&self) -> bool { self.bits() == 0 }

  /// Short tag naming the mirrored axes, e.g. `"xz"`. Empty for the identity.
  pub fn tag(&self) -> String {
    let mut tag = String::new();
    if self.x {
      tag.push('x');
    }
    if self.y {
      tag.push('y');
    }
    if self.z {
      tag.push('z');
    }
    tag
  }
}

impl BitAnd for MirrorOptions {
  type Output = MirrorOptions;
  fn bitand(self, rhs: MirrorOptions) -> MirrorOptions {
    MirrorOptions { x: self.x && rhs.x, y: self.y && rhs.y, z: self.z && rhs.z }
  }
}

#[derive(
  Clone,
  Copy,
  Default,
  Eq,
  PartialEq,
  Hash,
  Debug,
  Serialize,
  Deserialize,
  strum::EnumString,
  strum::Display,
  strum::EnumIter,
)]
pub enum PointType {
  #[default]
  Generic,
  Device,
  Thruster,
  Dock,
}

impl PointType {
  /// Axes this kind of point can meaningfully be mirrored across.
  pub fn mirror_support(self) -> MirrorOptions {
    match self {
      PointType::Generic => MirrorOptions::NONE,
      PointType::Device => MirrorOptions::ALL,
      // thrusters don't need front-back mirroring
      PointType::Thruster => MirrorOptions::new(true, false, true),
      // docking ports are flat
      PointType::Dock => MirrorOptions::new(true, true, false),
    }
  }

  /// Whether the position is edited through angle/radius rather than x/y.
  pub fn uses_polar_inputs(self) -> bool {
    matches!(self, PointType::Device | PointType::Thruster)
  }

  pub fn uses_z_input(self) -> bool { !matches!(self, PointType::Dock) }
}

/// Whether a thruster's effect is drawn behind or in front of the ship for one rotation frame.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Layering {
  #[default]
  Default,
  Behind,
  InFront,
}

impl Layering {
  /// The marker value the legacy tool stored: -1 behind, 0 default, 1 in front.
  pub fn marker(self) -> i8 {
    match self {
      Layering::Default => 0,
      Layering::Behind => -1,
      Layering::InFront => 1,
    }
  }
}

/// Ships are placed while viewing any rotation frame; stations only have the one orientation.
#[derive(
  Clone,
  Copy,
  Default,
  Eq,
  PartialEq,
  Debug,
  Serialize,
  Deserialize,
  strum::EnumString,
  strum::Display,
)]
pub enum SpriteMode {
  #[default]
  Ship,
  Station,
}
