//! Placed points: one position held in sprite, scene and polar form at once.
//!
//! Every mutation writes a single representation and then calls `recompute`, which derives the
//! others from it. Position edits (x/y) are canonical in sprite space; angle, radius and height
//! edits are canonical in polar space. Stored coordinates are always relative to rotation frame 0.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{
  projection::{polar_to_projection, polar_to_sprite, projection_to_polar},
  types::*,
};

#[cfg(test)]
pub mod test;

/// Offset between the polar angle and the ship-relative angle that mirroring reflects.
const SHIP_ANGLE_OFFSET: f64 = -90.0;

/// Reflect a polar angle (degrees) across the ship's axes.
///
/// The angle is moved into the ship-relative convention, negated for a left-right mirror and
/// reflected around 180° for a front-back mirror, then moved back.
pub fn mirror_angle_degrees(angle_deg: f64, mirror: MirrorOptions) -> f64 {
  let mut ship = angle_deg + SHIP_ANGLE_OFFSET;
  if mirror.x {
    ship = -ship;
  }
  if mirror.y {
    ship = 180.0 - ship;
  }
  ship - SHIP_ANGLE_OFFSET
}

/// A polar coordinate reflected across the ship's axes. z flips for a z-mirror.
pub fn mirror_polar(polar: PolarCoord, mirror: MirrorOptions) -> PolarCoord {
  PolarCoord {
    angle: mirror_angle_degrees(polar.angle_deg(), mirror).to_radians(),
    radius: polar.radius,
    z: if mirror.z { -polar.z } else { polar.z },
  }
}

/// Reflect an engine-convention direction (fire angle, thrust rotation) across the ship's axes.
/// The identity leaves the direction exactly as entered.
pub fn mirror_direction_deg(direction: i32, mirror: MirrorOptions) -> i32 {
  if !mirror.x && !mirror.y {
    return direction;
  }
  let mut d = wrap_deg(direction);
  if mirror.x {
    d = -d;
  }
  if mirror.y {
    d = 180 - d;
  }
  wrap_deg(d)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Thruster {
  /// Direction the exhaust points, in degrees.
  pub direction: i32,
  /// Draw order relative to the ship, one entry per rotation frame.
  pub under_over: Vec<Layering>,
}

impl Thruster {
  pub fn new(direction: i32, rot_frames: u32) -> Thruster {
    Thruster { direction, under_over: vec![Layering::Default; rot_frames as usize] }
  }

  fn set_layering(&mut self, frame: u32, layering: Layering) -> bool {
    match self.under_over.get_mut(frame as usize) {
      Some(slot) => {
        *slot = layering;
        true
      }
      None => false,
    }
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Device {
  /// Default fire direction, in degrees.
  pub direction: i32,
  /// Fire arc width centered on `direction`. Takes precedence over `arc_start`/`arc_end`.
  pub arc: Option<i32>,
  pub arc_start: Option<i32>,
  pub arc_end: Option<i32>,
}

/// A device's aim and fire arc bounds for one ship direction, all in `[0, 360)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct FireArc {
  pub direction: i32,
  pub bounds: Option<(i32, i32)>,
}

impl Device {
  pub fn get_arc_at_dir(&self, dir: i32) -> FireArc {
    let direction = add_deg(self.direction, dir);
    let bounds = match (self.arc, self.arc_start, self.arc_end) {
      (Some(arc), _, _) => {
        let half = f64::from(arc) / 2.0;
        Some((
          wrap_deg(round_even_i32(f64::from(direction) - half)),
          wrap_deg(round_even_i32(f64::from(direction) + half)),
        ))
      }
      (None, Some(start), Some(end)) => Some((add_deg(start, dir), add_deg(end, dir))),
      _ => None,
    };
    FireArc { direction, bounds }
  }

  /// The device as seen on the mirrored side of the ship. Explicit bounds swap so the arc still
  /// runs counter-clockwise from start to end.
  pub fn mirrored(&self, mirror: MirrorOptions) -> Device {
    let (mut start, mut end) = (self.arc_start, self.arc_end);
    if mirror.x {
      (start, end) = (end.map(|e| wrap_deg(-wrap_deg(e))), start.map(|s| wrap_deg(-wrap_deg(s))));
    }
    if mirror.y {
      (start, end) =
        (end.map(|e| wrap_deg(180 - wrap_deg(e))), start.map(|s| wrap_deg(180 - wrap_deg(s))));
    }
    Device {
      direction: mirror_direction_deg(self.direction, mirror),
      arc: self.arc,
      arc_start: start,
      arc_end: end,
    }
  }
}

impl FireArc {
  /// The arc as drawn on the mirrored copy. Bounds swap so the arc still runs start to end.
  pub fn mirrored(self, mirror: MirrorOptions) -> FireArc {
    let bounds = self.bounds.map(|(mut start, mut end)| {
      if mirror.x {
        (start, end) = (wrap_deg(-end), wrap_deg(-start));
      }
      if mirror.y {
        (start, end) = (wrap_deg(180 - end), wrap_deg(180 - start));
      }
      (start, end)
    });
    FireArc { direction: wrap_deg(mirror_direction_deg(self.direction, mirror)), bounds }
  }
}

/// The per-type payload of a point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "t")]
pub enum PointKind {
  Generic,
  Dock,
  Thruster(Thruster),
  Device(Device),
}

impl PointKind {
  pub fn point_type(&self) -> PointType {
    match self {
      PointKind::Generic => PointType::Generic,
      PointKind::Dock => PointType::Dock,
      PointKind::Thruster(_) => PointType::Thruster,
      PointKind::Device(_) => PointType::Device,
    }
  }

  /// A fresh payload for `point_type`, carrying over the direction when both sides have one.
  fn convert(&self, point_type: PointType, rot_frames: u32) -> PointKind {
    let direction = match self {
      PointKind::Thruster(t) => t.direction,
      PointKind::Device(d) => d.direction,
      PointKind::Generic | PointKind::Dock => 0,
    };
    match point_type {
      PointType::Generic => PointKind::Generic,
      PointType::Dock => PointKind::Dock,
      PointType::Thruster => PointKind::Thruster(Thruster::new(direction, rot_frames)),
      PointType::Device => PointKind::Device(Device { direction, ..Default::default() }),
    }
  }
}

/// Which representation a recompute starts from.
#[derive(Clone, Copy, Debug)]
enum Source {
  /// The sprite position as seen at a rotation frame; z is taken from the current polar value.
  Sprite { rotation_frame: u32 },
  Polar,
}

/// Where and how to draw one copy of a point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
  pub mirror: MirrorOptions,
  pub position: PixelCoord,
  /// Thruster exhaust or device aim, as an image-space arc angle (0 = +x, clockwise).
  pub heading: Option<i32>,
  /// Device fire arc as image-space arc angles.
  pub arc: Option<(i32, i32)>,
}

/// Image-space arc angles run clockwise from +x; engine directions start at the bow.
fn to_image_arc_angle(deg: i32) -> i32 { wrap_deg(90 + deg) }

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Point {
  label: String,
  #[serde(skip)]
  cfg: SpriteConfig,
  sprite: SpriteCoord,
  scene: SceneCoord,
  polar: PolarCoord,
  mirror: MirrorOptions,
  kind: PointKind,
}

impl Point {
  /// A generic point from a click on the sprite while it shows `rotation_frame`.
  pub fn new(pixel: PixelCoord, label: impl Into<String>, cfg: &SpriteConfig, rotation_frame: u32) -> Point {
    Point::from_sprite(cfg.pixel_to_sprite(pixel), label, cfg, rotation_frame)
  }

  pub fn from_sprite(
    sprite: SpriteCoord, label: impl Into<String>, cfg: &SpriteConfig, rotation_frame: u32,
  ) -> Point {
    let mut point = Point::blank(label.into(), cfg);
    point.sprite = sprite;
    point.recompute(Source::Sprite { rotation_frame });
    debug!(event = "point-created", label = %point.label, %sprite, rotation_frame, polar = ?point.polar);
    point
  }

  pub fn from_polar(polar: PolarCoord, label: impl Into<String>, cfg: &SpriteConfig) -> Point {
    let mut point = Point::blank(label.into(), cfg);
    point.polar = polar;
    point.recompute(Source::Polar);
    point
  }

  fn blank(label: String, cfg: &SpriteConfig) -> Point {
    Point {
      label,
      cfg: *cfg,
      sprite: SpriteCoord::default(),
      scene: SceneCoord::default(),
      polar: PolarCoord::default(),
      mirror: MirrorOptions::default(),
      kind: PointKind::Generic,
    }
  }

  /// The same point as a different type. Position, label and mirror flags carry over; the
  /// type-specific payload starts fresh.
  pub fn with_type(self, point_type: PointType) -> Point {
    if point_type == self.point_type() {
      return self;
    }
    let kind = self.kind.convert(point_type, self.cfg.rot_frames);
    debug!(event = "point-type-changed", label = %self.label, from = %self.point_type(), to = %point_type);
    Point { kind, ..self }
  }

  fn recompute(&mut self, source: Source) {
    match source {
      Source::Sprite { rotation_frame } => {
        self.scene = self.sprite.to_scene(self.polar.z);
        self.polar = projection_to_polar(&self.cfg, self.scene, rotation_frame);
        if rotation_frame != 0 {
          // Seen at another frame; store where it sits in frame 0.
          self.scene = polar_to_projection(&self.cfg, self.polar);
          self.sprite = self.scene.to_sprite();
        }
      }
      Source::Polar => {
        self.scene = polar_to_projection(&self.cfg, self.polar);
        self.sprite = self.scene.to_sprite();
      }
    }
  }

  /// Switch to new sprite geometry, keeping the engine-facing polar position.
  pub fn set_config(&mut self, cfg: &SpriteConfig) {
    self.cfg = *cfg;
    if let PointKind::Thruster(t) = &mut self.kind {
      t.under_over.resize(cfg.rot_frames as usize, Layering::Default);
    }
    self.recompute(Source::Polar);
  }

  // Position mutators

  pub fn set_x(&mut self, x: i32) {
    self.sprite.x = x;
    self.recompute(Source::Sprite { rotation_frame: 0 });
    debug!(event = "point-set-x", label = %self.label, x);
  }

  pub fn set_y(&mut self, y: i32) {
    self.sprite.y = y;
    self.recompute(Source::Sprite { rotation_frame: 0 });
    debug!(event = "point-set-y", label = %self.label, y);
  }

  pub fn set_z(&mut self, z: f64) {
    self.polar.z = z;
    self.recompute(Source::Polar);
    debug!(event = "point-set-z", label = %self.label, z);
  }

  pub fn set_radius(&mut self, radius: f64) {
    self.polar.radius = radius.max(0.0);
    self.recompute(Source::Polar);
    debug!(event = "point-set-radius", label = %self.label, radius);
  }

  pub fn set_pos_angle(&mut self, angle: f64) {
    self.polar.angle = angle;
    self.recompute(Source::Polar);
    debug!(event = "point-set-angle", label = %self.label, angle);
  }

  pub fn set_pos_angle_deg(&mut self, angle_deg: f64) { self.set_pos_angle(angle_deg.to_radians()) }

  /// Set the angle as shown in the placement controls (engine convention, 0 at the bow).
  pub fn set_display_angle_deg(&mut self, angle_deg: f64) {
    self.set_pos_angle_deg(angle_deg - ENGINE_ANGULAR_OFFSET)
  }

  pub fn update_from_polar(&mut self, polar: PolarCoord) {
    self.polar = polar;
    self.recompute(Source::Polar);
  }

  /// Move to a sprite position seen at `rotation_frame`, keeping the current height.
  pub fn update_from_sprite(&mut self, sprite: SpriteCoord, rotation_frame: u32) {
    self.sprite = sprite;
    self.recompute(Source::Sprite { rotation_frame });
  }

  // Mirroring

  pub fn set_mirror(&mut self, mirror: MirrorOptions) { self.mirror = mirror; }

  pub fn set_mirror_x(&mut self, mirror: bool) { self.mirror.x = mirror; }

  pub fn set_mirror_y(&mut self, mirror: bool) { self.mirror.y = mirror; }

  pub fn set_mirror_z(&mut self, mirror: bool) { self.mirror.z = mirror; }

  /// Every mirror combination this point is rendered and exported with: the identity first,
  /// then each non-empty subset of the requested axes the point type supports.
  pub fn mirror_options(&self) -> Vec<MirrorOptions> {
    let enabled = (self.mirror & self.mirror_support()).bits();
    (0..8u8).filter(|bits| (bits & !enabled) == 0).map(MirrorOptions::from_bits).collect()
  }

  /// The stored polar coordinate reflected across the ship's axes.
  pub fn mirrored_polar(&self, mirror: MirrorOptions) -> PolarCoord { mirror_polar(self.polar, mirror) }

  /// Where this point appears when the ship is drawn facing `direction` degrees, optionally
  /// mirrored. The ship's rotation is applied first and the rotated position is then reflected,
  /// so a mirrored copy is the exact reflection of what is drawn at that direction.
  pub fn get_projection_coord_at_direction(&self, direction: f64, mirror: MirrorOptions) -> PixelCoord {
    let rotated = PolarCoord { angle: self.polar.angle + direction.to_radians(), ..self.polar };
    let shown = mirror_polar(rotated, mirror);
    self.cfg.sprite_to_pixel(polar_to_sprite(&self.cfg, shown))
  }

  /// Everything needed to draw this point (and its mirrored copies) over the frame rendered at
  /// `direction`. Docking ports don't rotate with the ship. Headings and arcs are whole degrees.
  pub fn render_markers(&self, direction: f64) -> Vec<Marker> {
    let direction = if self.point_type() == PointType::Dock { 0.0 } else { direction };
    let whole = round_even_i32(direction);
    self
      .mirror_options()
      .into_iter()
      .map(|mirror| {
        let position = self.get_projection_coord_at_direction(direction, mirror);
        let (heading, arc) = match &self.kind {
          PointKind::Thruster(t) => {
            (Some(to_image_arc_angle(mirror_direction_deg(add_deg(t.direction, whole), mirror))), None)
          }
          PointKind::Device(d) => {
            let fire = d.get_arc_at_dir(whole).mirrored(mirror);
            (
              Some(to_image_arc_angle(fire.direction)),
              fire.bounds.map(|(s, e)| (to_image_arc_angle(s), to_image_arc_angle(e))),
            )
          }
          PointKind::Generic | PointKind::Dock => (None, None),
        };
        Marker { mirror, position, heading, arc }
      })
      .collect()
  }

  // Type-specific payload

  pub fn direction(&self) -> Option<i32> {
    match &self.kind {
      PointKind::Thruster(t) => Some(t.direction),
      PointKind::Device(d) => Some(d.direction),
      PointKind::Generic | PointKind::Dock => None,
    }
  }

  /// Stored in `[0, 360)`. Returns false if this type of point has no direction.
  pub fn set_direction(&mut self, direction: i32) -> bool {
    match &mut self.kind {
      PointKind::Thruster(t) => t.direction = wrap_deg(direction),
      PointKind::Device(d) => d.direction = wrap_deg(direction),
      PointKind::Generic | PointKind::Dock => return false,
    }
    true
  }

  fn device_mut(&mut self) -> Option<&mut Device> {
    match &mut self.kind {
      PointKind::Device(d) => Some(d),
      _ => None,
    }
  }

  fn thruster_mut(&mut self) -> Option<&mut Thruster> {
    match &mut self.kind {
      PointKind::Thruster(t) => Some(t),
      _ => None,
    }
  }

  /// Negative values clear the setting, like the legacy `-1`.
  pub fn set_arc(&mut self, arc: Option<i32>) -> bool {
    self.device_mut().map(|d| d.arc = arc.filter(|a| *a >= 0)).is_some()
  }

  pub fn set_arc_start(&mut self, start: Option<i32>) -> bool {
    self.device_mut().map(|d| d.arc_start = start.filter(|a| *a >= 0)).is_some()
  }

  pub fn set_arc_end(&mut self, end: Option<i32>) -> bool {
    self.device_mut().map(|d| d.arc_end = end.filter(|a| *a >= 0)).is_some()
  }

  pub fn get_arc_at_dir(&self, dir: i32) -> Option<FireArc> {
    match &self.kind {
      PointKind::Device(d) => Some(d.get_arc_at_dir(dir)),
      _ => None,
    }
  }

  /// Returns false if this isn't a thruster or the frame doesn't exist.
  pub fn send_to_back(&mut self, frame: u32) -> bool {
    self.thruster_mut().map_or(false, |t| t.set_layering(frame, Layering::Behind))
  }

  pub fn bring_to_front(&mut self, frame: u32) -> bool {
    self.thruster_mut().map_or(false, |t| t.set_layering(frame, Layering::InFront))
  }

  pub fn reset_layering(&mut self, frame: u32) -> bool {
    self.thruster_mut().map_or(false, |t| t.set_layering(frame, Layering::Default))
  }

  // Accessors

  pub fn label(&self) -> &str { &self.label }

  pub fn set_label(&mut self, label: impl Into<String>) { self.label = label.into(); }

  pub fn config(&self) -> &SpriteConfig { &self.cfg }

  pub fn kind(&self) -> &PointKind { &self.kind }

  pub fn point_type(&self) -> PointType { self.kind.point_type() }

  pub fn mirror(&self) -> MirrorOptions { self.mirror }

  pub fn mirror_support(&self) -> MirrorOptions { self.point_type().mirror_support() }

  pub fn sprite_coord(&self) -> SpriteCoord { self.sprite }

  pub fn pixel_coord(&self) -> PixelCoord { self.cfg.sprite_to_pixel(self.sprite) }

  pub fn scene_coord(&self) -> SceneCoord { self.scene }

  pub fn polar_coord(&self) -> PolarCoord { self.polar }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{} {}: {}", self.point_type(), self.label, self.sprite)
  }
}
