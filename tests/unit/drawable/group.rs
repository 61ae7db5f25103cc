use super::*;
use crate::{
    drawable::shapes::Polygon,
    foundation::core::Vec2,
    foundation::math::approx_point,
    style::StyleContext,
};

fn squares() -> (Drawable, Drawable) {
    (
        Drawable::from(Polygon::square((0.0, 0.0), 10.0)),
        Drawable::from(Polygon::square((30.0, 0.0), 10.0)),
    )
}

fn drawn(g: &Group) -> Vec<OpSequence> {
    let ctx = StyleContext::clean();
    g.children().iter().map(|c| c.draw(&ctx).unwrap()).collect()
}

#[test]
fn framing_is_anchored_at_combined_center() {
    let (a, b) = squares();
    let g = Group::new([a, b]).framed(Transform::scale(0.5));
    let framed = g.frame_members(drawn(&g));
    // Combined box is (0,0)-(40,10), center (20,5).
    let all = combined_bounds(&framed).unwrap();
    assert!(approx_point(Point::new(all.x0, all.y0), Point::new(10.0, 2.5), 1e-9));
    assert!(approx_point(Point::new(all.x1, all.y1), Point::new(30.0, 7.5), 1e-9));
}

#[test]
fn edits_follow_framing_in_any_builder_order() {
    let (a, b) = squares();
    let shift = Transform::Translate(Vec2::new(0.0, 100.0));
    let one = Group::new([a.clone(), b.clone()])
        .framed(Transform::scale(0.5))
        .edit(1, shift)
        .unwrap();
    let two = Group::new([a, b])
        .edit(1, shift)
        .unwrap()
        .framed(Transform::scale(0.5));
    assert_eq!(one, two);

    let framed = one.frame_members(drawn(&one));
    let moved = framed[1].bounding_box().unwrap();
    assert!(approx_point(Point::new(moved.x0, moved.y0), Point::new(25.0, 102.5), 1e-9));
    let kept = framed[0].bounding_box().unwrap();
    assert!(approx_point(Point::new(kept.x0, kept.y0), Point::new(10.0, 2.5), 1e-9));
}

#[test]
fn edit_index_is_checked() {
    let (a, _) = squares();
    assert!(Group::new([a]).edit(3, Transform::scale(2.0)).is_err());
}

#[test]
fn empty_group_has_no_bounds() {
    assert!(combined_center(&[]).is_none());
    let g = Group::default().framed(Transform::rotate(1.0));
    assert!(g.frame_members(Vec::new()).is_empty());
}
