use super::*;
use crate::{
    drawable::shapes::Polygon,
    foundation::error::HandanimError,
    foundation::math::approx_point,
    ops::op::Pen,
};
use std::f64::consts::FRAC_PI_2;

fn square() -> Drawable {
    Drawable::from(Polygon::square((0.0, 0.0), 10.0))
}

fn outline() -> OpSequence {
    OpSequence::from_ops(vec![
        Op::SetPen(Pen::default()),
        Op::MoveTo(Point::new(0.0, 0.0)),
        Op::LineTo(Point::new(10.0, 0.0)),
        Op::LineTo(Point::new(10.0, 10.0)),
        Op::LineTo(Point::new(0.0, 10.0)),
        Op::ClosePath,
    ])
}

#[test]
fn rejects_reversed_interval() {
    assert!(matches!(
        AnimationEvent::sketch(&square(), 3.0, 1.0),
        Err(HandanimError::InvalidInterval { .. })
    ));
}

#[test]
fn phases_and_progress() {
    let ev = AnimationEvent::fade_in(&square(), 1.0, 3.0).unwrap();
    assert_eq!(ev.phase(0.5), EventPhase::Pending);
    assert_eq!(ev.phase(1.0), EventPhase::Active);
    assert_eq!(ev.phase(3.0), EventPhase::Active);
    assert_eq!(ev.phase(3.1), EventPhase::Completed);
    assert_eq!(ev.progress(2.0), 0.5);
    assert_eq!(ev.contributes_at(0.5), None);
    assert_eq!(ev.contributes_at(2.0), Some(0.5));
    assert_eq!(ev.contributes_at(9.0), Some(1.0));

    let transient = ev.clone().with_keep_final_state(false);
    assert_eq!(transient.contributes_at(9.0), None);

    let eased = ev.with_ease(Ease::InQuad);
    assert_eq!(eased.progress(2.0), 0.25);
}

#[test]
fn instantaneous_event_jumps_at_start() {
    let ev = AnimationEvent::create(&square(), 2.0).unwrap();
    assert_eq!(ev.progress(1.99), 0.0);
    assert_eq!(ev.progress(2.0), 1.0);
    assert_eq!(ev.toggle_time(), Some(2.0));
}

#[test]
fn categories() {
    let d = square();
    assert_eq!(
        AnimationEvent::zoom_in(&d, 0.0, 1.0).unwrap().category(),
        EventCategory::Creation
    );
    let out = AnimationEvent::fade_out(&d, 1.0, 2.0).unwrap();
    assert_eq!(out.category(), EventCategory::Deletion);
    assert_eq!(out.toggle_time(), Some(2.0));
    let mv = AnimationEvent::transform(&d, TransformAnim::ScaleBy(2.0), 0.0, 1.0).unwrap();
    assert_eq!(mv.category(), EventCategory::Mutation);
    assert_eq!(mv.toggle_time(), None);
    assert!(!mv.kind().is_appearance());
}

#[test]
fn sketch_reveals_by_length_with_glow() {
    let ev = AnimationEvent::sketch_with_glow(&square(), 0.0, 4.0, GlowDot::default()).unwrap();
    let seq = outline();

    assert!(ev.apply(&seq, 0.0).is_empty());

    let half = ev.apply(&seq, 0.5);
    assert!((half.path_length() - 20.0).abs() < 1e-9);
    match half.ops().last() {
        Some(Op::Marker { center, radius, .. }) => {
            assert_eq!(*center, Point::new(10.0, 10.0));
            assert!((radius - GlowDot::default().radius_at(0.5)).abs() < 1e-12);
        }
        other => panic!("expected marker, got {other:?}"),
    }

    let full = ev.apply(&seq, 1.0);
    assert_eq!(full, seq);
    assert!(!full.has_marker());
}

#[test]
fn glow_breathes_around_radius() {
    let g = GlowDot::default();
    for i in 0..=20 {
        let r = g.radius_at(f64::from(i) / 20.0);
        assert!((4.75 - 1e-9..=5.25 + 1e-9).contains(&r));
    }
}

#[test]
fn fades_scale_pen_opacity() {
    let seq = outline();
    let fade_in = AnimationEvent::fade_in(&square(), 0.0, 1.0).unwrap();
    let fade_out = AnimationEvent::fade_out(&square(), 0.0, 1.0).unwrap();
    let opacity = |s: &OpSequence| match s.ops()[0] {
        Op::SetPen(pen) => pen.opacity,
        _ => panic!("expected pen"),
    };
    assert!((opacity(&fade_in.apply(&seq, 0.25)) - 0.25).abs() < 1e-12);
    assert!((opacity(&fade_out.apply(&seq, 0.25)) - 0.75).abs() < 1e-12);
}

#[test]
fn zoom_scales_about_center() {
    let seq = outline();
    let zoom = AnimationEvent::zoom_in(&square(), 0.0, 1.0).unwrap();
    let bbox = zoom.apply(&seq, 0.5).bounding_box().unwrap();
    assert!(approx_point(Point::new(bbox.x0, bbox.y0), Point::new(2.5, 2.5), 1e-12));
    assert!((bbox.width() - 5.0).abs() < 1e-12);
}

#[test]
fn transform_kinds_interpolate_from_identity() {
    let d = square();
    let seq = outline();
    let center = |s: &OpSequence| s.center_of_gravity().unwrap();

    let to_anim = TransformAnim::TranslateTo(Point::new(25.0, 5.0));
    let to = AnimationEvent::transform(&d, to_anim, 0.0, 1.0).unwrap();
    assert!(approx_point(center(&to.apply(&seq, 0.5)), Point::new(15.0, 5.0), 1e-12));
    assert!(approx_point(center(&to.apply(&seq, 1.0)), Point::new(25.0, 5.0), 1e-12));

    let from_anim = TransformAnim::TranslateFrom(Point::new(-15.0, 5.0));
    let from = AnimationEvent::transform(&d, from_anim, 0.0, 1.0).unwrap();
    assert!(approx_point(center(&from.apply(&seq, 0.0)), Point::new(-15.0, 5.0), 1e-12));
    assert!(approx_point(center(&from.apply(&seq, 1.0)), Point::new(5.0, 5.0), 1e-12));

    let by_anim = TransformAnim::TranslateBy(Vec2::new(4.0, 0.0));
    let by = AnimationEvent::transform(&d, by_anim, 0.0, 1.0).unwrap();
    assert!(approx_point(center(&by.apply(&seq, 0.5)), Point::new(7.0, 5.0), 1e-12));

    let rot = AnimationEvent::transform(&d, TransformAnim::RotateBy(FRAC_PI_2), 0.0, 1.0).unwrap();
    assert!(approx_point(center(&rot.apply(&seq, 0.5)), Point::new(5.0, 5.0), 1e-9));

    let scale = AnimationEvent::transform(&d, TransformAnim::ScaleBy(3.0), 0.0, 1.0).unwrap();
    let b = scale.apply(&seq, 0.5).bounding_box().unwrap();
    assert!((b.width() - 20.0).abs() < 1e-9);

    let aff = AnimationEvent::transform(
        &d,
        TransformAnim::AffineTo(Affine::translate((10.0, 0.0))),
        0.0,
        1.0,
    )
    .unwrap();
    assert_eq!(aff.affine_for(&seq, 0.0), Affine::IDENTITY);
    assert!(approx_point(center(&aff.apply(&seq, 0.5)), Point::new(10.0, 5.0), 1e-12));
}

#[test]
fn serializes_with_hex_target() {
    let ev = AnimationEvent::sketch(&square(), 0.0, 1.0).unwrap();
    let json = serde_json::to_value(&ev).unwrap();
    assert_eq!(json["target"], square().id().to_string());
    let back: AnimationEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, ev);
}
