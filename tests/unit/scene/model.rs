use super::*;
use crate::drawable::shapes::{Ellipse, Line, Polygon};

fn line(y: f64) -> Drawable {
    Drawable::from(Line::new((0.0, y), (10.0, y)))
}

fn ids(ds: &[Drawable]) -> Vec<DrawableId> {
    ds.iter().map(Drawable::id).collect()
}

#[test]
fn created_drawable_appears_at_start() {
    let mut scene = Scene::new();
    let a = line(0.0);
    scene.add(AnimationEvent::sketch(&a, 1.0, 2.0).unwrap(), &a).unwrap();
    assert!(scene.active_drawables_at(0.5).is_empty());
    assert_eq!(ids(&scene.active_drawables_at(1.0)), vec![a.id()]);
    assert_eq!(ids(&scene.active_drawables_at(5.0)), vec![a.id()]);
    assert_eq!(scene.duration(), 2.0);
}

#[test]
fn deletion_takes_effect_at_its_end() {
    let mut scene = Scene::new();
    let a = line(0.0);
    scene.add_drawable(&a).unwrap();
    scene.add(AnimationEvent::fade_out(&a, 2.0, 3.0).unwrap(), &a).unwrap();
    assert!(scene.is_visible(a.id(), 2.5));
    assert!(!scene.is_visible(a.id(), 3.0));
}

#[test]
fn recreation_after_deletion() {
    let mut scene = Scene::new();
    let a = line(0.0);
    scene.add(AnimationEvent::create(&a, 0.0).unwrap(), &a).unwrap();
    scene.add_event(AnimationEvent::delete(&a, 1.0).unwrap()).unwrap();
    scene.add_event(AnimationEvent::fade_in(&a, 2.0, 3.0).unwrap()).unwrap();
    assert!(scene.is_visible(a.id(), 0.5));
    assert!(!scene.is_visible(a.id(), 1.5));
    assert!(scene.is_visible(a.id(), 2.0));
}

#[test]
fn simultaneous_toggles_follow_definition_order() {
    let a = line(0.0);

    let mut shown_last = Scene::new();
    shown_last.add(AnimationEvent::delete(&a, 1.0).unwrap(), &a).unwrap();
    shown_last.add_event(AnimationEvent::create(&a, 1.0).unwrap()).unwrap();
    assert!(shown_last.is_visible(a.id(), 1.0));

    let mut hidden_last = Scene::new();
    hidden_last.add(AnimationEvent::create(&a, 1.0).unwrap(), &a).unwrap();
    hidden_last.add_event(AnimationEvent::delete(&a, 1.0).unwrap()).unwrap();
    assert!(!hidden_last.is_visible(a.id(), 1.0));
}

#[test]
fn group_registration_is_recursive_and_ordered() {
    let (a, b, c) = (line(0.0), line(5.0), line(9.0));
    let inner = Drawable::group([b.clone(), c.clone()]);
    let outer = Drawable::group([a.clone(), inner.clone()]);
    let mut scene = Scene::new();
    scene.add_drawable(&outer).unwrap();

    assert_eq!(
        ids(scene.drawables()),
        vec![outer.id(), a.id(), inner.id(), b.id(), c.id()]
    );
    assert_eq!(scene.parent_of(b.id()), Some(inner.id()));
    assert_eq!(scene.parent_of(inner.id()), Some(outer.id()));
    assert_eq!(scene.root_of(c.id()), Some(outer.id()));
    assert_eq!(scene.events().len(), 3);
    assert_eq!(ids(&scene.active_drawables_at(0.0)), vec![a.id(), b.id(), c.id()]);
}

#[test]
fn first_registered_parent_wins() {
    let a = line(0.0);
    let g1 = Drawable::group([a.clone(), line(1.0)]);
    let g2 = Drawable::group([a.clone(), line(2.0)]);
    let mut scene = Scene::new();
    scene.add_drawable(&g1).unwrap();
    scene.add_drawable(&g2).unwrap();
    assert_eq!(scene.parent_of(a.id()), Some(g1.id()));
}

#[test]
fn add_drawable_skips_already_registered_leaves() {
    let (a, b) = (line(0.0), line(1.0));
    let mut scene = Scene::new();
    scene.add(AnimationEvent::sketch(&a, 2.0, 3.0).unwrap(), &a).unwrap();
    scene.add_drawable(&Drawable::group([a.clone(), b.clone()])).unwrap();
    assert_eq!(scene.events_for(a.id()).count(), 1);
    assert_eq!(scene.events_for(b.id()).count(), 1);
    assert!(!scene.is_visible(a.id(), 1.0));
}

#[test]
fn group_deletion_cascades() {
    let (a, b) = (line(0.0), line(1.0));
    let g = Drawable::group([a.clone(), b.clone()]);
    let mut scene = Scene::new();
    scene.add_drawable(&g).unwrap();
    scene.add(AnimationEvent::fade_out(&g, 2.0, 4.0).unwrap(), &g).unwrap();
    // A member created after the deletion stays hidden.
    scene.add_event(AnimationEvent::create(&a, 5.0).unwrap()).unwrap();

    assert!(scene.is_visible(g.id(), 3.0));
    assert_eq!(scene.active_drawables_at(3.0).len(), 2);
    for t in [4.0, 4.5, 6.0, 100.0] {
        assert!(scene.active_drawables_at(t).is_empty());
        assert!(!scene.is_visible(g.id(), t));
    }
}

#[test]
fn nested_group_deletion_hides_inner_members() {
    let (a, b) = (line(0.0), line(1.0));
    let inner = Drawable::group([b.clone()]);
    let outer = Drawable::group([a.clone(), inner.clone()]);
    let mut scene = Scene::new();
    scene.add_drawable(&outer).unwrap();
    scene.add(AnimationEvent::delete(&outer, 1.0).unwrap(), &outer).unwrap();
    assert!(scene.is_visible(b.id(), 0.5));
    assert!(!scene.is_visible(b.id(), 1.0));
    assert!(!scene.is_visible(inner.id(), 1.0));
}

#[test]
fn group_is_visible_when_any_member_is() {
    let (a, b) = (line(0.0), line(1.0));
    let g = Drawable::group([a.clone(), b.clone()]);
    let mut scene = Scene::new();
    scene.add(AnimationEvent::sketch(&b, 1.0, 2.0).unwrap(), &g).unwrap();
    assert!(!scene.is_visible(g.id(), 0.5));
    assert!(scene.is_visible(g.id(), 1.5));
}

#[test]
fn creation_events_on_groups_are_rejected() {
    let g = Drawable::group([line(0.0)]);
    let mut scene = Scene::new();
    let err = scene
        .add(AnimationEvent::fade_in(&g, 0.0, 1.0).unwrap(), &g)
        .unwrap_err();
    assert!(matches!(err, HandanimError::InvalidGroupDeletion(id) if id == g.id()));
    assert!(scene.drawables().is_empty());
    assert!(scene.events().is_empty());
}

#[test]
fn events_must_target_a_known_drawable() {
    let (a, b) = (line(0.0), line(1.0));
    let mut scene = Scene::new();
    let err = scene
        .add(AnimationEvent::sketch(&b, 0.0, 1.0).unwrap(), &a)
        .unwrap_err();
    assert!(matches!(err, HandanimError::DanglingReference(id) if id == b.id()));
    assert!(scene.drawables().is_empty());

    let err = scene
        .add_event(AnimationEvent::sketch(&a, 0.0, 1.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, HandanimError::DanglingReference(_)));

    scene.add_drawable(&a).unwrap();
    scene.add(AnimationEvent::zoom_out(&a, 1.0, 2.0).unwrap(), &b).unwrap();
    assert_eq!(ids(scene.drawables()), vec![a.id(), b.id()]);
}

#[test]
fn event_targeting_a_member_registers_the_group() {
    let a = Drawable::from(Polygon::square((0.0, 0.0), 4.0));
    let b = Drawable::from(Ellipse::circle((20.0, 0.0), 3.0));
    let g = Drawable::group([a.clone(), b.clone()]);
    let mut scene = Scene::new();
    scene.add(AnimationEvent::sketch(&a, 0.0, 1.0).unwrap(), &g).unwrap();
    assert!(scene.drawable(g.id()).is_some());
    assert!(scene.drawable(b.id()).is_some());
    assert!(!scene.is_visible(b.id(), 0.5));
}

#[test]
fn empty_scene_has_zero_duration() {
    let scene = Scene::new();
    assert_eq!(scene.duration(), 0.0);
    assert!(scene.active_drawables_at(0.0).is_empty());
    assert!(!scene.is_visible(line(0.0).id(), 0.0));
}
