use super::*;
use crate::{foundation::core::Rgb, ops::op::Pen};
use std::f64::consts::{FRAC_PI_2, PI};

fn square() -> OpSequence {
    OpSequence::from_ops(vec![
        Op::MoveTo(Point::new(0.0, 0.0)),
        Op::LineTo(Point::new(10.0, 0.0)),
        Op::LineTo(Point::new(10.0, 10.0)),
        Op::LineTo(Point::new(0.0, 10.0)),
        Op::ClosePath,
    ])
}

fn circle(r: f64) -> OpSequence {
    OpSequence::from_ops(vec![Op::Ellipse {
        center: Point::ZERO,
        radii: Vec2::new(r, r),
        x_rotation: 0.0,
        start_angle: 0.0,
        sweep_angle: 2.0 * PI,
    }])
}

#[test]
fn validate_requires_position() {
    let bad = OpSequence::from_ops(vec![Op::LineTo(Point::new(1.0, 1.0))]);
    assert!(matches!(
        bad.validate(),
        Err(HandanimError::MalformedSequence(_))
    ));

    let after_pen = OpSequence::from_ops(vec![
        Op::MoveTo(Point::ZERO),
        Op::SetPen(Pen::default()),
        Op::ClosePath,
    ]);
    assert!(after_pen.validate().is_err());

    assert!(square().validate().is_ok());
    let from_arc = circle(1.0).concat(&OpSequence::from_ops(vec![Op::LineTo(Point::ZERO)]));
    assert!(from_arc.validate().is_ok());
}

#[test]
fn concat_preserves_order() {
    let a = OpSequence::from_ops(vec![Op::MoveTo(Point::ZERO)]);
    let b = OpSequence::from_ops(vec![Op::LineTo(Point::new(1.0, 0.0))]);
    let ab = a.clone().concat(&b);
    assert_eq!(ab.len(), 2);
    assert_eq!(ab.ops()[0], Op::MoveTo(Point::ZERO));
    assert_eq!(ab.ops()[1], Op::LineTo(Point::new(1.0, 0.0)));
}

#[test]
fn bounding_box_includes_control_points() {
    let seq = OpSequence::from_ops(vec![
        Op::MoveTo(Point::ZERO),
        Op::CurveTo {
            c1: Point::new(0.0, 10.0),
            c2: Point::new(10.0, 10.0),
            to: Point::new(10.0, 0.0),
        },
    ]);
    let bbox = seq.bounding_box().unwrap();
    assert_eq!(bbox, Rect::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(seq.center_of_gravity(), Some(Point::new(5.0, 5.0)));
}

#[test]
fn bounding_box_covers_markers_and_arcs() {
    assert!(OpSequence::new().bounding_box().is_none());

    let marker = OpSequence::from_ops(vec![Op::Marker {
        center: Point::new(5.0, 5.0),
        radius: 2.0,
        color: Rgb::gray(0.5),
    }]);
    assert_eq!(marker.bounding_box(), Some(Rect::new(3.0, 3.0, 7.0, 7.0)));

    let bbox = circle(3.0).bounding_box().unwrap();
    assert!((bbox.x0 + 3.0).abs() < 1e-3 && (bbox.x1 - 3.0).abs() < 1e-3);
    assert!((bbox.y0 + 3.0).abs() < 1e-3 && (bbox.y1 - 3.0).abs() < 1e-3);
    assert!(approx_point(bbox.center(), Point::ZERO, 1e-3));
}

#[test]
fn path_length_ignores_moves_and_markers() {
    let mut seq = square();
    seq.push(Op::Marker {
        center: Point::ZERO,
        radius: 4.0,
        color: Rgb::BLACK,
    });
    seq.push(Op::MoveTo(Point::new(100.0, 100.0)));
    assert!((seq.path_length() - 40.0).abs() < 1e-12);
    assert!((circle(1.0).path_length() - 2.0 * PI).abs() < 1e-3);
}

#[test]
fn partial_bounds() {
    let seq = square();
    assert!(seq.partial(0.0).is_empty());
    assert!(seq.partial(-1.0).is_empty());
    assert_eq!(seq.partial(1.0), seq);
    assert_eq!(seq.partial(2.0), seq);
}

#[test]
fn partial_splits_lines_exactly() {
    let half = square().partial(0.5);
    assert_eq!(half.len(), 3);
    assert!((half.path_length() - 20.0).abs() < 1e-12);

    let part = square().partial(0.375);
    assert_eq!(part.ops().last(), Some(&Op::LineTo(Point::new(10.0, 5.0))));

    // A cut inside the closing segment turns it into a line.
    let closing = square().partial(0.9);
    assert_eq!(closing.ops().last(), Some(&Op::LineTo(Point::new(0.0, 4.0))));
}

#[test]
fn partial_splits_curves_by_arclength() {
    let seq = OpSequence::from_ops(vec![
        Op::SetPen(Pen::default()),
        Op::MoveTo(Point::ZERO),
        Op::CurveTo {
            c1: Point::new(0.0, 30.0),
            c2: Point::new(40.0, 30.0),
            to: Point::new(40.0, 0.0),
        },
    ]);
    let total = seq.path_length();
    let mut prev = 0.0;
    for i in 1..10 {
        let f = f64::from(i) / 10.0;
        let part = seq.partial(f);
        assert!(matches!(part.ops()[0], Op::SetPen(_)));
        let len = part.path_length();
        assert!((len - total * f).abs() < 1e-3, "fraction {f}: {len}");
        assert!(len >= prev);
        prev = len;
    }
}

#[test]
fn partial_splits_ellipse_on_sweep() {
    let half = circle(2.0).partial(0.5);
    match half.ops() {
        [Op::Ellipse { sweep_angle, .. }] => assert!((sweep_angle - PI).abs() < 1e-3),
        other => panic!("unexpected ops {other:?}"),
    }
}

#[test]
fn current_point_tracks_close_and_arcs() {
    assert_eq!(square().current_point(), Some(Point::ZERO));
    let cp = circle(1.0).current_point().unwrap();
    assert!(approx_point(cp, Point::new(1.0, 0.0), 1e-9));
    let mut seq = square();
    seq.push(Op::SetPen(Pen::default()));
    assert_eq!(seq.current_point(), None);
}

#[test]
fn translate_roundtrip_is_identity() {
    let seq = square().concat(&circle(3.0));
    let back = seq
        .transform(Affine::translate((10.0, 5.0)))
        .transform(Affine::translate((-10.0, -5.0)));
    assert!(back.approx_eq(&seq, 1e-9));
}

#[test]
fn similarity_keeps_ellipse() {
    let affine = Affine::translate((1.0, 1.0)) * Affine::rotate(FRAC_PI_2) * Affine::scale(2.0);
    let seq = OpSequence::from_ops(vec![Op::Ellipse {
        center: Point::ZERO,
        radii: Vec2::new(2.0, 1.0),
        x_rotation: 0.0,
        start_angle: 0.0,
        sweep_angle: PI,
    }]);
    let out = seq.transform(affine);
    match out.ops() {
        [
            Op::Ellipse {
                center,
                radii,
                x_rotation,
                sweep_angle,
                ..
            },
        ] => {
            assert!(approx_point(*center, Point::new(1.0, 1.0), 1e-9));
            assert!((radii.x - 4.0).abs() < 1e-9 && (radii.y - 2.0).abs() < 1e-9);
            assert!((x_rotation - FRAC_PI_2).abs() < 1e-9);
            assert!((sweep_angle - PI).abs() < 1e-12);
        }
        other => panic!("unexpected ops {other:?}"),
    }
}

#[test]
fn shear_converts_ellipse_to_cubics() {
    let affine = Affine::new([1.0, 0.0, 0.5, 1.0, 0.0, 0.0]);
    let out = circle(1.0).transform(affine);
    assert!(matches!(out.ops()[0], Op::MoveTo(_)));
    assert!(out.ops()[1..].iter().all(|op| matches!(op, Op::CurveTo { .. })));
    assert!(out.validate().is_ok());

    let mirrored = circle(1.0).transform(Affine::FLIP_X);
    assert!(!mirrored.ops().iter().any(|op| matches!(op, Op::Ellipse { .. })));
}

#[test]
fn marker_radius_follows_area_scale() {
    let seq = OpSequence::from_ops(vec![Op::Marker {
        center: Point::new(1.0, 1.0),
        radius: 2.0,
        color: Rgb::BLACK,
    }]);
    let out = seq.transform(Affine::scale_non_uniform(4.0, 1.0));
    match out.ops() {
        [Op::Marker { center, radius, .. }] => {
            assert_eq!(*center, Point::new(4.0, 1.0));
            assert!((radius - 4.0).abs() < 1e-12);
        }
        other => panic!("unexpected ops {other:?}"),
    }
}

#[test]
fn scale_opacity_only_touches_pens() {
    let seq = OpSequence::from_ops(vec![
        Op::SetPen(Pen {
            opacity: 0.8,
            ..Pen::default()
        }),
        Op::MoveTo(Point::ZERO),
    ]);
    let out = seq.scale_opacity(0.5);
    match out.ops() {
        [Op::SetPen(pen), Op::MoveTo(_)] => assert!((pen.opacity - 0.4).abs() < 1e-12),
        other => panic!("unexpected ops {other:?}"),
    }
    assert_eq!(seq.without_pens().len(), 1);
}

#[test]
fn bez_path_skips_pens_and_markers() {
    let mut seq = OpSequence::from_ops(vec![Op::SetPen(Pen::default())]);
    seq.extend(&square());
    seq.push(Op::Marker {
        center: Point::ZERO,
        radius: 1.0,
        color: Rgb::BLACK,
    });
    assert!(seq.has_marker());
    assert_eq!(seq.to_bez_path().elements().len(), 5);
}

#[test]
fn serializes_as_tagged_ops() {
    let seq = OpSequence::from_ops(vec![Op::MoveTo(Point::new(1.0, 2.0)), Op::ClosePath]);
    let json = serde_json::to_value(&seq).unwrap();
    assert_eq!(json[0]["op"], "move_to");
    assert_eq!(json[1]["op"], "close_path");
    let back: OpSequence = serde_json::from_value(json).unwrap();
    assert_eq!(back, seq);
}
