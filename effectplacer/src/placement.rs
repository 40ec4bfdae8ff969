//! A placement session: the ordered list of points placed on one sprite.

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
  point::{Marker, Point},
  types::*,
};

#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
  #[error("No point at index {0}")]
  PointNotFound(usize),
  #[error("Invalid sprite configuration: {0}")]
  Config(#[from] ConfigError),
}

#[derive(Clone, Debug)]
pub struct Placement {
  cfg: SpriteConfig,
  mode: SpriteMode,
  points: Vec<Point>,
}

impl Placement {
  pub fn new(cfg: SpriteConfig, mode: SpriteMode) -> Result<Placement, PlacementError> {
    cfg.validate()?;
    info!(event = "placement-started", %mode, w = cfg.w, h = cfg.h, rot_frames = cfg.rot_frames);
    Ok(Placement { cfg, mode, points: vec![] })
  }

  pub fn config(&self) -> &SpriteConfig { &self.cfg }

  pub fn mode(&self) -> SpriteMode { self.mode }

  /// Load new sprite geometry. Existing points keep their polar positions.
  #[instrument(level = "debug", skip(self))]
  pub fn set_config(&mut self, cfg: SpriteConfig) -> Result<(), PlacementError> {
    cfg.validate()?;
    self.cfg = cfg;
    for point in &mut self.points {
      point.set_config(&cfg);
    }
    Ok(())
  }

  /// Stations only have the one orientation.
  fn effective_frame(&self, rotation_frame: u32) -> Result<u32, PlacementError> {
    match self.mode {
      SpriteMode::Station => Ok(0),
      SpriteMode::Ship => {
        self.cfg.check_rotation_frame(rotation_frame)?;
        Ok(rotation_frame)
      }
    }
  }

  /// Place a generic point where the sprite was clicked. Returns its index.
  #[instrument(level = "debug", skip(self))]
  pub fn add_point(&mut self, pixel: PixelCoord, rotation_frame: u32) -> Result<usize, PlacementError> {
    let frame = self.effective_frame(rotation_frame)?;
    let point = Point::new(pixel, self.points.len().to_string(), &self.cfg, frame);
    self.check_limits(&point);
    self.points.push(point);
    Ok(self.points.len() - 1)
  }

  /// Add an already-built point, e.g. one loaded from a script.
  pub fn push_point(&mut self, point: Point) -> usize {
    self.check_limits(&point);
    self.points.push(point);
    self.points.len() - 1
  }

  fn check_limits(&self, point: &Point) {
    let limits = self.cfg.control_limits();
    let sprite = point.sprite_coord();
    let polar = point.polar_coord();
    let inside = limits.x.contains(&f64::from(sprite.x))
      && limits.y.contains(&f64::from(sprite.y))
      && limits.z.contains(&polar.z)
      && limits.radius.contains(&polar.radius);
    if !inside {
      warn!(event = "point-outside-limits", label = point.label(), %sprite, radius = polar.radius, z = polar.z);
    }
  }

  #[instrument(level = "debug", skip(self))]
  pub fn delete_point(&mut self, index: usize) -> Result<Point, PlacementError> {
    self.point(index)?;
    Ok(self.points.remove(index))
  }

  /// Duplicate a point, inserting the copy right after it. Returns the copy's index.
  #[instrument(level = "debug", skip(self))]
  pub fn clone_point(&mut self, index: usize) -> Result<usize, PlacementError> {
    let copy = self.point(index)?.clone();
    self.points.insert(index + 1, copy);
    Ok(index + 1)
  }

  #[instrument(level = "debug", skip(self))]
  pub fn change_point_type(&mut self, index: usize, point_type: PointType) -> Result<(), PlacementError> {
    let point = self.point_mut(index)?;
    *point = point.clone().with_type(point_type);
    Ok(())
  }

  pub fn point(&self, index: usize) -> Result<&Point, PlacementError> {
    self.points.get(index).ok_or(PlacementError::PointNotFound(index))
  }

  pub fn point_mut(&mut self, index: usize) -> Result<&mut Point, PlacementError> {
    self.points.get_mut(index).ok_or(PlacementError::PointNotFound(index))
  }

  pub fn points(&self) -> &[Point] { &self.points }

  pub fn len(&self) -> usize { self.points.len() }

  pub fn is_empty(&self) -> bool { self.points.is_empty() }

  /// Markers for every point over the given rotation frame, tagged with the point's index.
  pub fn markers(&self, rotation_frame: u32) -> Vec<(usize, Marker)> {
    // The exact frame offset, the same one a click on that frame is solved with.
    let direction = match self.mode {
      SpriteMode::Station => 0.0,
      SpriteMode::Ship => self.cfg.rotation_offset_deg(rotation_frame),
    };
    self
      .points
      .iter()
      .enumerate()
      .flat_map(|(i, p)| p.render_markers(direction).into_iter().map(move |m| (i, m)))
      .collect()
  }

  /// The definition-file blocks for all placed points, grouped by kind. Empty groups are left out.
  #[instrument(level = "debug", skip(self))]
  pub fn export(&self) -> String {
    let groups = [
      ("DockingPorts", PointType::Dock),
      ("DeviceSlots", PointType::Device),
      ("Effects", PointType::Thruster),
    ];
    let mut out = String::new();
    for (tag, point_type) in groups {
      let body: String = self
        .points
        .iter()
        .filter(|p| p.point_type() == point_type)
        .flat_map(|p| p.to_xml_fragment().lines().map(|l| format!("\n\t{l}")).collect::<Vec<_>>())
        .collect();
      if !body.is_empty() {
        out.push_str(&format!("<{tag}>{body}\n</{tag}>\n"));
      }
    }
    info!(event = "placement-exported", points = self.points.len(), bytes = out.len());
    out
  }
}
