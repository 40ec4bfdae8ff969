use approx::assert_abs_diff_eq;

use super::*;
use crate::projection::{polar_to_sprite, test::t_config};

fn t_cfg() -> SpriteConfig { t_config(InverseDepth::Clamped) }

fn t_polar_point(angle_deg: f64, radius: f64, z: f64, point_type: PointType) -> Point {
  Point::from_polar(PolarCoord::new(angle_deg.to_radians(), radius, z), "p", &t_cfg())
    .with_type(point_type)
}

#[test]
fn click_to_definition() {
  let cfg = SpriteConfig { viewport_ratio: 0.2, ..t_cfg() };
  let p = Point::new(PixelCoord::new(150, 50), "0", &cfg, 0);
  assert_eq!(p.sprite_coord(), SpriteCoord::new(100, 0));
  assert_abs_diff_eq!(p.polar_coord().radius, 100.0);
  assert_abs_diff_eq!(p.polar_coord().angle, 0.0, epsilon = 1e-12);
  assert_eq!(p.polar_coord().engine_angle_deg(), 90);

  let p = p.with_type(PointType::Device);
  let xml = p.to_xml_fragment();
  assert!(xml.contains("posAngle="), "{}", xml);
  assert!(xml.contains("posRadius=\"100\""), "{}", xml);
}

#[test]
fn frame_zero_keeps_clicked_position() {
  let p = Point::new(PixelCoord::new(63, 21), "0", &t_cfg(), 0);
  assert_eq!(p.pixel_coord(), PixelCoord::new(63, 21));
  assert_eq!(p.scene_coord(), SceneCoord::new(13.0, -29.0, 0.0));
}

#[test]
fn other_frames_store_frame_zero_position() {
  let cfg = t_config(InverseDepth::Exact);
  let original = Point::from_polar(PolarCoord::new(20f64.to_radians(), 80.0, 0.0), "p", &cfg);
  // The same spot as it appears on frame 3, a quarter turn on.
  let pixel = original.get_projection_coord_at_direction(90.0, MirrorOptions::NONE);
  let p = Point::new(pixel, "p", &cfg, 3);

  let deg = p.polar_coord().angle_deg();
  assert!(d180(deg - 20.0).abs() < 2.0, "expected ~20 degrees, got {}", deg);
  assert_eq!(p.sprite_coord(), polar_to_sprite(&cfg, p.polar_coord()));
}

#[test]
fn position_setters_are_idempotent() {
  let mut p = Point::new(PixelCoord::new(70, 30), "0", &t_cfg(), 0);
  p.set_x(25);
  let once = p.clone();
  p.set_x(25);
  assert_eq!(p, once);
  assert_eq!(p.sprite_coord().x, 25);

  p.set_y(-12);
  let once = p.clone();
  p.set_y(-12);
  assert_eq!(p, once);
  assert_eq!(p.sprite_coord().y, -12);
}

#[test]
fn polar_setters_are_idempotent() {
  let mut p = t_polar_point(45.0, 30.0, 0.0, PointType::Thruster);
  p.set_radius(40.0);
  let once = p.clone();
  p.set_radius(40.0);
  assert_eq!(p, once);

  p.set_z(12.0);
  let once = p.clone();
  p.set_z(12.0);
  assert_eq!(p, once);
  assert_eq!(p.polar_coord().z, 12.0);

  p.set_pos_angle_deg(135.0);
  let once = p.clone();
  p.set_pos_angle_deg(135.0);
  assert_eq!(p, once);
}

#[test]
fn setters_keep_representations_consistent() {
  let cfg = t_cfg();
  let mut p = t_polar_point(10.0, 30.0, 5.0, PointType::Device);
  p.set_radius(60.0);
  assert_eq!(p.sprite_coord(), polar_to_sprite(&cfg, p.polar_coord()));
  assert_eq!(p.scene_coord().z, 5.0);
  p.set_x(-20);
  assert_eq!(p.scene_coord(), SceneCoord::new(-20.0, -f64::from(p.sprite_coord().y), 5.0));
  assert_eq!(p.polar_coord().z, 5.0);
}

#[test]
fn negative_radius_clamps_to_zero() {
  let mut p = t_polar_point(10.0, 30.0, 0.0, PointType::Device);
  p.set_radius(-5.0);
  assert_eq!(p.polar_coord().radius, 0.0);
  assert_eq!(p.sprite_coord(), SpriteCoord::new(0, 0));
}

#[test]
fn display_angle_is_engine_convention() {
  let mut p = t_polar_point(0.0, 30.0, 0.0, PointType::Thruster);
  p.set_display_angle_deg(0.0);
  assert_abs_diff_eq!(p.polar_coord().angle_deg(), -90.0, epsilon = 1e-9);
  assert_eq!(p.polar_coord().engine_angle_deg(), 0);
  assert_eq!(p.polar_coord().display_angle_deg(), 0);
  p.set_display_angle_deg(-90.0);
  assert_eq!(p.polar_coord().engine_angle_deg(), 270);
  assert_eq!(p.polar_coord().display_angle_deg(), -90);
}

#[test]
fn update_from_sprite_keeps_height() {
  let mut p = t_polar_point(0.0, 30.0, 8.0, PointType::Device);
  p.update_from_sprite(SpriteCoord::new(5, 5), 0);
  assert_eq!(p.sprite_coord(), SpriteCoord::new(5, 5));
  assert_eq!(p.polar_coord().z, 8.0);
  p.update_from_polar(PolarCoord::new(0.0, 40.0, 0.0));
  assert_eq!(p.sprite_coord(), SpriteCoord::new(40, 0));
}

#[test]
fn mirror_angles() {
  assert_abs_diff_eq!(mirror_angle_degrees(30.0, MirrorOptions::NONE), 30.0);
  assert_abs_diff_eq!(mirror_angle_degrees(30.0, MirrorOptions::new(true, false, false)), 150.0);
  assert_abs_diff_eq!(d360(mirror_angle_degrees(30.0, MirrorOptions::new(false, true, false))), 330.0);
  assert_abs_diff_eq!(d360(mirror_angle_degrees(30.0, MirrorOptions::new(true, true, false))), 210.0);
}

#[test]
fn mirror_directions() {
  let x = MirrorOptions::new(true, false, false);
  let y = MirrorOptions::new(false, true, false);
  assert_eq!(mirror_direction_deg(-30, MirrorOptions::NONE), -30);
  assert_eq!(mirror_direction_deg(30, x), 330);
  assert_eq!(mirror_direction_deg(30, y), 150);
  assert_eq!(mirror_direction_deg(30, MirrorOptions::new(true, true, true)), 210);
}

#[test]
fn x_mirror_is_symmetric_about_center() {
  let cfg = t_cfg();
  let p = t_polar_point(30.0, 47.3, 5.0, PointType::Device);
  for direction in [0.0, 30.0, 45.0, 90.0, 135.0, 200.0, 275.0] {
    let plain = p.get_projection_coord_at_direction(direction, MirrorOptions::NONE);
    let mirrored = p.get_projection_coord_at_direction(direction, MirrorOptions::new(true, false, false));
    assert_eq!(
      plain.x + mirrored.x,
      2 * cfg.cell_center().x,
      "at {direction}: {plain} vs {mirrored}"
    );
    assert_eq!(plain.y, mirrored.y, "at {direction}: {plain} vs {mirrored}");
  }
}

#[test]
fn mirror_applies_after_rotation() {
  let p = t_polar_point(30.0, 47.3, 5.0, PointType::Device);
  let x = MirrorOptions::new(true, false, false);
  // Reflecting the ship drawn at 90 degrees puts the copy at 180 - (30 + 90) = 60 degrees.
  let expected = Point::from_polar(PolarCoord::new(60f64.to_radians(), 47.3, 5.0), "p", &t_cfg());
  assert_eq!(p.get_projection_coord_at_direction(90.0, x), expected.pixel_coord());
}

#[test]
fn z_mirror_flips_height() {
  let p = t_polar_point(30.0, 47.3, 5.0, PointType::Device);
  let flipped = p.mirrored_polar(MirrorOptions::new(false, false, true));
  assert_eq!(flipped.z, -5.0);
  assert_eq!(flipped.radius, 47.3);
  let raised = p.get_projection_coord_at_direction(0.0, MirrorOptions::NONE);
  let lowered = p.get_projection_coord_at_direction(0.0, MirrorOptions::new(false, false, true));
  assert!(raised.y < lowered.y, "{} should be above {}", raised, lowered);
}

#[test]
fn mirror_options_filter_by_support() {
  let mut p = t_polar_point(0.0, 30.0, 0.0, PointType::Generic);
  p.set_mirror(MirrorOptions::ALL);
  assert_eq!(p.mirror_options(), vec![MirrorOptions::NONE]);

  let p = p.with_type(PointType::Thruster);
  assert_eq!(
    p.mirror_options(),
    vec![
      MirrorOptions::NONE,
      MirrorOptions::new(true, false, false),
      MirrorOptions::new(false, false, true),
      MirrorOptions::new(true, false, true),
    ]
  );

  let p = p.with_type(PointType::Dock);
  assert_eq!(p.mirror_options().len(), 4);
  assert!(p.mirror_options().iter().all(|m| !m.z));

  let p = p.with_type(PointType::Device);
  assert_eq!(p.mirror_options().len(), 8);
  assert_eq!(p.mirror_options()[0], MirrorOptions::NONE);
}

#[test]
fn arc_width_takes_precedence() {
  let mut p = t_polar_point(0.0, 30.0, 0.0, PointType::Device);
  p.set_direction(10);
  p.set_arc(Some(60));
  p.set_arc_start(Some(100));
  p.set_arc_end(Some(200));
  assert_eq!(p.get_arc_at_dir(30), Some(FireArc { direction: 40, bounds: Some((10, 70)) }));

  // halves round to even
  p.set_arc(Some(45));
  assert_eq!(p.get_arc_at_dir(30), Some(FireArc { direction: 40, bounds: Some((18, 62)) }));

  p.set_arc(None);
  assert_eq!(p.get_arc_at_dir(30), Some(FireArc { direction: 40, bounds: Some((130, 230)) }));
  assert_eq!(p.get_arc_at_dir(300).and_then(|a| a.bounds), Some((40, 140)));

  p.set_arc_end(Some(-1));
  assert_eq!(p.get_arc_at_dir(30), Some(FireArc { direction: 40, bounds: None }));
}

#[test]
fn mirrored_device_arcs() {
  let d = Device { direction: 20, arc: None, arc_start: Some(350), arc_end: Some(50) };
  let x = d.mirrored(MirrorOptions::new(true, false, false));
  assert_eq!((x.direction, x.arc_start, x.arc_end), (340, Some(310), Some(10)));
  let y = d.mirrored(MirrorOptions::new(false, true, false));
  assert_eq!((y.direction, y.arc_start, y.arc_end), (160, Some(130), Some(190)));
  let z = d.mirrored(MirrorOptions::new(false, false, true));
  assert_eq!(z, d);
}

#[test]
fn mirrored_markers_reflect_rotated_headings() {
  let mut p = t_polar_point(30.0, 40.0, 0.0, PointType::Device);
  p.set_direction(10);
  p.set_arc(Some(60));
  p.set_mirror_x(true);
  let markers = p.render_markers(90.0);
  // Drawn at 100 with bounds (70, 130); the reflection aims at 260 with bounds (230, 290).
  assert_eq!(markers[0].heading, Some(190));
  assert_eq!(markers[0].arc, Some((160, 220)));
  assert_eq!(markers[1].heading, Some(350));
  assert_eq!(markers[1].arc, Some((320, 20)));
  assert_eq!(markers[1].position, p.get_projection_coord_at_direction(90.0, markers[1].mirror));
}

#[test]
fn directions_are_stored_wrapped() {
  let mut p = t_polar_point(0.0, 30.0, 0.0, PointType::Device);
  assert!(p.set_direction(-30));
  assert_eq!(p.direction(), Some(330));
  assert!(p.set_direction(i32::MIN));
  assert_eq!(p.direction(), Some(232));
  assert_eq!(p.get_arc_at_dir(i32::MAX).map(|a| a.direction), Some(359));
  assert_eq!(mirror_direction_deg(i32::MIN, MirrorOptions::new(true, false, false)), 128);
}

#[test]
fn extreme_device_fields_do_not_overflow() {
  let d = Device { direction: i32::MIN, arc: None, arc_start: Some(i32::MIN), arc_end: Some(i32::MAX) };
  assert_eq!(d.get_arc_at_dir(i32::MAX), FireArc { direction: 359, bounds: Some((359, 254)) });
  let x = d.mirrored(MirrorOptions::new(true, true, false));
  assert_eq!((x.direction, x.arc_start, x.arc_end), (52, Some(52), Some(307)));
}

#[test]
fn mirror_flags_from_yaml() {
  let point_type: PointType = serde_yaml::from_str("Thruster").unwrap();
  let mirror: MirrorOptions = serde_yaml::from_str("{x: true, y: true, z: true}").unwrap();
  let mut p = t_polar_point(30.0, 40.0, 0.0, point_type);
  p.set_mirror(mirror);
  // thrusters drop the front-back axis
  assert_eq!(p.mirror_options().len(), 4);
  let partial: MirrorOptions = serde_yaml::from_str("z: true").unwrap();
  assert_eq!(partial, MirrorOptions::new(false, false, true));
}

#[test]
fn type_changes_keep_the_base() {
  let mut p = Point::new(PixelCoord::new(70, 30), "engine", &t_cfg(), 0);
  p.set_mirror_x(true);
  let sprite = p.sprite_coord();
  assert!(!p.set_direction(45));
  assert_eq!(p.direction(), None);

  let mut p = p.with_type(PointType::Thruster);
  assert!(p.set_direction(45));
  assert_eq!(p.label(), "engine");
  assert_eq!(p.sprite_coord(), sprite);
  assert!(p.mirror().x);
  match p.kind() {
    PointKind::Thruster(t) => assert_eq!(t.under_over.len(), 12),
    x => panic!("Unexpected kind: {:?}", x),
  }

  let p = p.with_type(PointType::Device);
  assert_eq!(p.direction(), Some(45));
  assert_eq!(p.get_arc_at_dir(0), Some(FireArc { direction: 45, bounds: None }));

  let p = p.with_type(PointType::Dock);
  assert_eq!(p.direction(), None);
  assert_eq!(p.get_arc_at_dir(0), None);
}

#[test]
fn payload_setters_on_wrong_type() {
  let mut thruster = t_polar_point(0.0, 30.0, 0.0, PointType::Thruster);
  assert!(!thruster.set_arc(Some(30)));
  assert!(thruster.send_to_back(11));
  assert!(!thruster.send_to_back(12));
  assert!(thruster.bring_to_front(0));
  assert!(thruster.reset_layering(0));

  let mut device = thruster.with_type(PointType::Device);
  assert!(device.set_arc(Some(30)));
  assert!(!device.send_to_back(0));
  assert!(!device.bring_to_front(0));
}

#[test]
fn thruster_layering() {
  let mut p = t_polar_point(0.0, 30.0, 0.0, PointType::Thruster);
  p.send_to_back(1);
  p.bring_to_front(2);
  p.send_to_back(2);
  match p.kind() {
    PointKind::Thruster(t) => {
      assert_eq!(&t.under_over[..3], &[Layering::Default, Layering::Behind, Layering::Behind])
    }
    x => panic!("Unexpected kind: {:?}", x),
  }
}

#[test]
fn dock_markers_ignore_rotation() {
  let p = t_polar_point(30.0, 40.0, 0.0, PointType::Dock);
  let markers = p.render_markers(90.0);
  assert_eq!(markers.len(), 1);
  assert_eq!(markers[0].position, p.pixel_coord());
  assert_eq!(markers[0].heading, None);
}

#[test]
fn thruster_and_device_markers() {
  let mut p = t_polar_point(30.0, 40.0, 0.0, PointType::Thruster);
  p.set_direction(0);
  let markers = p.render_markers(90.0);
  assert_eq!(markers[0].heading, Some(180));
  assert_eq!(markers[0].position, p.get_projection_coord_at_direction(90.0, MirrorOptions::NONE));

  let mut p = p.with_type(PointType::Device);
  p.set_direction(10);
  p.set_arc(Some(60));
  p.set_mirror_x(true);
  let markers = p.render_markers(0.0);
  assert_eq!(markers.len(), 2);
  assert_eq!(markers[0].heading, Some(100));
  assert_eq!(markers[0].arc, Some((70, 130)));
  assert_eq!(markers[1].heading, Some(80));
  assert_eq!(markers[1].arc, Some((50, 110)));
}

#[test]
fn display_and_json() {
  let p = Point::new(PixelCoord::new(60, 40), "3", &t_cfg(), 0).with_type(PointType::Thruster);
  assert_eq!(p.to_string(), "Thruster 3: (10, 10)");
  let json = serde_json::to_value(&p).unwrap();
  assert_eq!(json["label"], "3");
  assert_eq!(json["sprite"]["x"], 10);
  assert_eq!(json["kind"]["t"], "Thruster");
}
