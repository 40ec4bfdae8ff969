//! Placement scripts: a YAML list of points to place, standing in for clicks on the sprite.

use anyhow::{anyhow, Context};
use serde::Deserialize;
use tracing::debug;

use effectplacer::{placement::Placement, point::Point, types::*};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Script {
  pub mode: SpriteMode,
  pub points: Vec<ScriptPoint>,
}

/// One point. Position is either a click (`pixel` at `frame`) or a polar position in engine
/// degrees (`angle` and `radius`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScriptPoint {
  #[serde(rename = "type")]
  pub point_type: PointType,
  pub label: Option<String>,
  pub pixel: Option<PixelCoord>,
  pub frame: u32,
  pub angle: Option<f64>,
  pub radius: Option<f64>,
  pub z: Option<f64>,
  pub mirror: MirrorOptions,
  pub direction: Option<i32>,
  pub arc: Option<i32>,
  pub arc_start: Option<i32>,
  pub arc_end: Option<i32>,
  pub send_to_back: Vec<u32>,
  pub bring_to_front: Vec<u32>,
}

impl Script {
  pub fn apply(&self, placement: &mut Placement) -> anyhow::Result<()> {
    for (i, entry) in self.points.iter().enumerate() {
      entry.apply(placement).with_context(|| format!("placing script point {i}"))?;
    }
    Ok(())
  }
}

impl ScriptPoint {
  fn apply(&self, placement: &mut Placement) -> anyhow::Result<()> {
    let index = match (self.pixel, self.angle, self.radius) {
      (Some(pixel), None, None) => placement.add_point(pixel, self.frame)?,
      (None, Some(angle), Some(radius)) => {
        let polar = PolarCoord::new(
          (angle - ENGINE_ANGULAR_OFFSET).to_radians(),
          radius,
          self.z.unwrap_or(0.0),
        );
        let label = placement.len().to_string();
        placement.push_point(Point::from_polar(polar, label, placement.config()))
      }
      _ => return Err(anyhow!("a point needs either `pixel` or both `angle` and `radius`")),
    };
    placement.change_point_type(index, self.point_type)?;

    let point = placement.point_mut(index)?;
    if let Some(label) = &self.label {
      point.set_label(label.as_str());
    }
    if self.pixel.is_some() {
      if let Some(z) = self.z {
        point.set_z(z);
      }
    }
    point.set_mirror(self.mirror);
    if let Some(direction) = self.direction {
      require(point.set_direction(direction), "direction", point)?;
    }
    if self.arc.is_some() {
      require(point.set_arc(self.arc), "arc", point)?;
    }
    if self.arc_start.is_some() {
      require(point.set_arc_start(self.arc_start), "arc_start", point)?;
    }
    if self.arc_end.is_some() {
      require(point.set_arc_end(self.arc_end), "arc_end", point)?;
    }
    for frame in &self.send_to_back {
      require(point.send_to_back(*frame), "send_to_back", point)?;
    }
    for frame in &self.bring_to_front {
      require(point.bring_to_front(*frame), "bring_to_front", point)?;
    }
    debug!(event = "script-point-applied", point = %point);
    Ok(())
  }
}

fn require(applied: bool, field: &str, point: &Point) -> anyhow::Result<()> {
  if applied {
    Ok(())
  } else {
    Err(anyhow!("`{field}` does not apply to {point}"))
  }
}
