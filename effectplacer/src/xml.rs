//! Engine definition fragments for placed points.

use crate::{
  point::{mirror_direction_deg, Device, Point, PointKind, Thruster},
  types::*,
};

/// Encode the frames whose layering equals `marker` as a compact frame list: a lone frame as
/// `i`, two adjacent frames as `i,j`, longer runs as `i-j`, all comma-separated.
pub fn accumulate_range_str(under_over: &[Layering], marker: Layering) -> String {
  let mut parts: Vec<String> = vec![];
  let mut run_start: Option<usize> = None;
  // A trailing sentinel closes a run that reaches the last frame.
  for (i, matches) in under_over.iter().map(|l| *l == marker).chain(Some(false)).enumerate() {
    match (run_start, matches) {
      (None, true) => run_start = Some(i),
      (Some(start), false) => {
        let end = i - 1;
        parts.push(match end - start {
          0 => format!("{start}"),
          1 => format!("{start},{end}"),
          _ => format!("{start}-{end}"),
        });
        run_start = None;
      }
      _ => {}
    }
  }
  parts.join(",")
}

fn layering_attr(name: &str, under_over: &[Layering], marker: Layering) -> String {
  if !under_over.is_empty() && under_over.iter().all(|l| *l == marker) {
    return format!("\t{name}=\"*\"");
  }
  let ranges = accumulate_range_str(under_over, marker);
  if ranges.is_empty() {
    String::new()
  } else {
    format!("\t{name}=\"{ranges}\"")
  }
}

impl Thruster {
  pub fn get_send_to_back(&self) -> String {
    layering_attr("sendToBack", &self.under_over, Layering::Behind)
  }

  pub fn get_bring_to_front(&self) -> String {
    layering_attr("bringToFront", &self.under_over, Layering::InFront)
  }
}

impl Device {
  /// The fire arc attributes: a centered width wins over explicit bounds.
  pub fn arc_xml(&self) -> String {
    match (self.arc, self.arc_start, self.arc_end) {
      (Some(arc), _, _) => format!("\tfireArc=\"{arc}\""),
      (None, Some(start), Some(end)) => format!("\tminFireArc=\"{start}\"\tmaxFireArc=\"{end}\""),
      _ => String::new(),
    }
  }
}

fn position_attrs(polar: PolarCoord) -> String {
  format!(
    "posAngle=\"{}\"\tposRadius=\"{}\"\tposZ=\"{}\"",
    polar.engine_angle_deg(),
    polar.rounded_radius(),
    polar.rounded_z()
  )
}

impl Point {
  /// The definition-file lines for this point, one per mirror option. Generic points have none.
  pub fn to_xml_fragment(&self) -> String {
    let lines: Vec<String> = self
      .mirror_options()
      .into_iter()
      .filter_map(|mirror| self.xml_line(mirror))
      .collect();
    lines.join("\n")
  }

  fn xml_line(&self, mirror: MirrorOptions) -> Option<String> {
    match self.kind() {
      PointKind::Generic => None,
      PointKind::Dock => {
        let s = self.sprite_coord();
        let x = if mirror.x { -s.x } else { s.x };
        let y = if mirror.y { -s.y } else { s.y };
        Some(format!("<Port x=\"{x}\"\ty=\"{y}\"/>"))
      }
      PointKind::Thruster(t) => Some(format!(
        "<Effect type=\"thrustMain\"\t\t{}\trotation=\"{}\"\teffect=\"&efMainThrusterLarge;\"{}{}/>",
        position_attrs(self.mirrored_polar(mirror)),
        mirror_direction_deg(t.direction, mirror),
        t.get_send_to_back(),
        t.get_bring_to_front(),
      )),
      PointKind::Device(d) => {
        let id = if mirror.is_identity() {
          self.label().to_string()
        } else {
          format!("{}-{}", self.label(), mirror.tag())
        };
        let device = d.mirrored(mirror);
        Some(format!(
          "<DeviceSlot id=\"{id}\"\t\t{}\tfireAngle=\"{}\"{}/>",
          position_attrs(self.mirrored_polar(mirror)),
          device.direction,
          device.arc_xml(),
        ))
      }
    }
  }
}
