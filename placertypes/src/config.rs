use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  angle::round_even,
  types::{PixelCoord, SpriteCoord},
};

/// The viewport size the legacy engine falls back on when an image carries no ratio.
pub const DEFAULT_VIEWPORT_SIZE: f64 = 256.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("A sprite needs at least one rotation frame")]
  NoRotationFrames,
  #[error("A sprite needs at least one rotation column")]
  NoRotationColumns,
  #[error("Viewport ratio must be positive, got {0}")]
  InvalidViewportRatio(f64),
  #[error("Viewport size must be positive, got {0}")]
  InvalidViewportSize(f64),
  #[error("Frame width must be positive to derive the viewport size from it")]
  ZeroFrameWidth,
  #[error("Rotation frame {frame} is out of range for {rot_frames} frames")]
  RotationFrameOutOfRange { frame: u32, rot_frames: u32 },
}

/// Where the projection scale comes from.
///
/// Older sprite definitions use a fixed viewport, later ones derive it from the frame width and
/// the image's viewport ratio. Both are in use, so both are selectable.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum ViewportMode {
  Fixed(f64),
  Ratio,
}

impl Default for ViewportMode {
  fn default() -> ViewportMode { ViewportMode::Fixed(DEFAULT_VIEWPORT_SIZE) }
}

/// How the inverse projection treats the height term while solving for the camera-space position.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum InverseDepth {
  /// Solve with `min(z, -2 * y)`, the shipped legacy behavior.
  #[default]
  Clamped,
  /// Solve with the stored height as-is.
  Exact,
}

/// A rectangle on the sprite sheet.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct SheetRect {
  pub x: i64,
  pub y: i64,
  pub w: u32,
  pub h: u32,
}

/// Value ranges for the point editing controls.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlLimits {
  pub x: RangeInclusive<f64>,
  pub y: RangeInclusive<f64>,
  pub z: RangeInclusive<f64>,
  pub angle: RangeInclusive<f64>,
  pub radius: RangeInclusive<f64>,
}

/// Geometry of one sprite sheet: where the frames are, how many there are, and how they project.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
  pub x: i32,
  pub y: i32,
  pub w: u32,
  pub h: u32,
  pub anim_frames: u32,
  pub rot_frames: u32,
  pub rot_cols: u32,
  pub viewport_ratio: f64,
  pub viewport: ViewportMode,
  pub inverse_depth: InverseDepth,
  /// Set once the geometry has been confirmed rather than guessed from the image size.
  pub real: bool,
}

impl Default for SpriteConfig {
  fn default() -> SpriteConfig {
    SpriteConfig {
      x: 0,
      y: 0,
      w: 0,
      h: 0,
      anim_frames: 0,
      rot_frames: 360,
      rot_cols: 20,
      viewport_ratio: 0.2,
      viewport: ViewportMode::default(),
      inverse_depth: InverseDepth::default(),
      real: false,
    }
  }
}

impl SpriteConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.rot_frames < 1 {
      return Err(ConfigError::NoRotationFrames);
    }
    if self.rot_cols < 1 {
      return Err(ConfigError::NoRotationColumns);
    }
    match self.viewport {
      ViewportMode::Fixed(size) => {
        if !(size.is_finite() && size > 0.0) {
          return Err(ConfigError::InvalidViewportSize(size));
        }
      }
      ViewportMode::Ratio => {
        if !(self.viewport_ratio.is_finite() && self.viewport_ratio > 0.0) {
          return Err(ConfigError::InvalidViewportRatio(self.viewport_ratio));
        }
        if self.w == 0 {
          return Err(ConfigError::ZeroFrameWidth);
        }
      }
    }
    Ok(())
  }

  pub fn check_rotation_frame(&self, frame: u32) -> Result<(), ConfigError> {
    if frame >= self.rot_frames {
      return Err(ConfigError::RotationFrameOutOfRange { frame, rot_frames: self.rot_frames });
    }
    Ok(())
  }

  /// The projection scale.
  pub fn viewport_size(&self) -> f64 {
    match self.viewport {
      ViewportMode::Fixed(size) => size,
      ViewportMode::Ratio => f64::from(self.w) / self.viewport_ratio,
    }
  }

  /// Angular step between rotation frames, in degrees, times the frame index.
  pub fn rotation_offset_deg(&self, frame: u32) -> f64 {
    f64::from(frame) * (360.0 / f64::from(self.rot_frames))
  }

  /// The ship direction a rotation frame is rendered at, in whole degrees.
  pub fn rotation_direction_deg(&self, frame: u32) -> i32 {
    round_even(self.rotation_offset_deg(frame)) as i32
  }

  /// Number of rotation frames stacked in one sheet column.
  pub fn rot_col_size(&self) -> u32 { (self.rot_frames.saturating_sub(1)) / self.rot_cols.max(1) + 1 }

  pub fn rot_x(&self, rotation: u32) -> u32 { rotation / self.rot_col_size() }

  pub fn rot_y(&self, rotation: u32) -> u32 { rotation % self.rot_col_size() }

  /// The sheet rectangle holding one animation frame at one rotation.
  /// Each rotation column holds every animation frame side by side.
  pub fn frame_rect(&self, rotation: u32, anim: u32) -> SheetRect {
    let w = i64::from(self.w);
    let h = i64::from(self.h);
    let anim_x = i64::from(anim) * w;
    let rot_x = i64::from(self.rot_x(rotation)) * w * (i64::from(self.anim_frames) + 1);
    let rot_y = i64::from(self.rot_y(rotation)) * h;
    SheetRect {
      x: i64::from(self.x) + anim_x + rot_x,
      y: i64::from(self.y) + rot_y,
      w: self.w,
      h: self.h,
    }
  }

  /// The pixel at the middle of a cell.
  pub fn cell_center(&self) -> PixelCoord {
    PixelCoord::new(
      round_even(f64::from(self.w) / 2.0) as i32,
      round_even(f64::from(self.h) / 2.0) as i32,
    )
  }

  pub fn pixel_to_sprite(&self, pixel: PixelCoord) -> SpriteCoord {
    let center = self.cell_center();
    SpriteCoord::new(pixel.x - center.x, center.y - pixel.y)
  }

  pub fn sprite_to_pixel(&self, sprite: SpriteCoord) -> PixelCoord {
    let center = self.cell_center();
    PixelCoord::new(center.x + sprite.x, center.y - sprite.y)
  }

  pub fn control_limits(&self) -> ControlLimits {
    let half_w = f64::from(self.w) * 0.5;
    let half_h = f64::from(self.h) * 0.5;
    ControlLimits {
      x: -half_w..=half_w,
      y: -half_h..=half_h,
      z: -half_h..=half_h,
      angle: -179.0..=180.0,
      radius: 0.0..=f64::from(self.w.max(self.h)),
    }
  }
}
