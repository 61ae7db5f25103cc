use std::collections::{HashMap, HashSet};

use crate::{
    animation::event::{AnimationEvent, EventCategory},
    drawable::{Drawable, DrawableId},
    foundation::error::{HandanimError, HandanimResult},
    scene::canvas::{Canvas, Viewport},
    style::StyleContext,
};

/// Timeline of animation events over registered drawables.
///
/// Drawables are kept in insertion order, which is also the order of frame entries. A
/// drawable that appears in several groups belongs to the group that registered it first.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    canvas: Canvas,
    viewport: Option<Viewport>,
    style: StyleContext,
    events: Vec<AnimationEvent>,
    drawables: Vec<Drawable>,
    index: HashMap<DrawableId, usize>,
    parents: HashMap<DrawableId, DrawableId>,
    by_target: HashMap<DrawableId, Vec<usize>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Map world coordinates onto the canvas through `viewport` when producing frames.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_style(mut self, style: StyleContext) -> Self {
        self.style = style;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    /// Events in definition order.
    pub fn events(&self) -> &[AnimationEvent] {
        &self.events
    }

    /// Registered drawables in insertion order, groups included.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.index.get(&id).map(|&i| &self.drawables[i])
    }

    /// Group that registered `id` as a member, if any.
    pub fn parent_of(&self, id: DrawableId) -> Option<DrawableId> {
        self.parents.get(&id).copied()
    }

    /// Latest event end in seconds, zero for an empty timeline.
    pub fn duration(&self) -> f64 {
        self.events.iter().map(AnimationEvent::end).fold(0.0, f64::max)
    }

    /// Register `drawable` (and its members) and attach `event`.
    ///
    /// The event must target `drawable`, one of its members, or an already registered
    /// drawable. Nothing is registered when the event is rejected.
    pub fn add(&mut self, event: AnimationEvent, drawable: &Drawable) -> HandanimResult<()> {
        event.interval().validate()?;
        let target = event.target();
        let is_group = match drawable.find(target).or_else(|| self.drawable(target)) {
            Some(d) => d.is_group(),
            None => return Err(HandanimError::DanglingReference(target)),
        };
        if is_group && event.category() == EventCategory::Creation {
            return Err(HandanimError::InvalidGroupDeletion(target));
        }

        self.register(drawable, None);
        self.push_event(event);
        Ok(())
    }

    /// Attach `event` to an already registered drawable.
    pub fn add_event(&mut self, event: AnimationEvent) -> HandanimResult<()> {
        let target = event.target();
        let Some(drawable) = self.drawable(target).cloned() else {
            event.interval().validate()?;
            return Err(HandanimError::DanglingReference(target));
        };
        self.add(event, &drawable)
    }

    /// Register `drawable` so that it is visible from t = 0.
    ///
    /// Leaves get an instantaneous create at 0. For a group, each leaf that was not
    /// registered before gets one.
    pub fn add_drawable(&mut self, drawable: &Drawable) -> HandanimResult<()> {
        let mut seen = HashSet::new();
        let fresh: Vec<Drawable> = drawable
            .leaves()
            .into_iter()
            .filter(|l| !self.index.contains_key(&l.id()) && seen.insert(l.id()))
            .collect();
        self.register(drawable, None);
        for leaf in &fresh {
            self.push_event(AnimationEvent::create(leaf, 0.0)?);
        }
        Ok(())
    }

    fn register(&mut self, drawable: &Drawable, parent: Option<DrawableId>) {
        let id = drawable.id();
        if let Some(parent) = parent {
            self.parents.entry(id).or_insert(parent);
        }
        if self.index.contains_key(&id) {
            return;
        }
        tracing::debug!(
            %id,
            label = ?drawable.label(),
            group = drawable.is_group(),
            "register drawable"
        );
        self.index.insert(id, self.drawables.len());
        self.drawables.push(drawable.clone());
        for member in drawable.members() {
            self.register(member, Some(id));
        }
    }

    fn push_event(&mut self, event: AnimationEvent) {
        tracing::debug!(
            target_id = %event.target(),
            kind = ?event.kind(),
            start = event.start(),
            end = event.end(),
            "add event"
        );
        self.by_target
            .entry(event.target())
            .or_default()
            .push(self.events.len());
        self.events.push(event);
    }

    /// Events targeting `id`, in definition order.
    pub fn events_for(&self, id: DrawableId) -> impl Iterator<Item = &AnimationEvent> {
        self.by_target
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&i| &self.events[i])
    }

    /// Visible leaf drawables at `t`, in insertion order.
    pub fn active_drawables_at(&self, t: f64) -> Vec<Drawable> {
        self.drawables
            .iter()
            .filter(|d| !d.is_group() && self.is_visible(d.id(), t))
            .cloned()
            .collect()
    }

    /// Whether `id` is visible at `t`.
    ///
    /// A leaf follows its own creation and deletion events, unless a group containing it
    /// has been deleted. A group is visible while not deleted and at least one member is.
    pub fn is_visible(&self, id: DrawableId, t: f64) -> bool {
        match self.drawable(id) {
            Some(d) => !self.ancestor_deleted(id, t) && self.visible_within(d, t),
            None => false,
        }
    }

    fn visible_within(&self, drawable: &Drawable, t: f64) -> bool {
        if drawable.is_group() {
            !self.deletion_fired(drawable.id(), t)
                && drawable.members().iter().any(|m| self.visible_within(m, t))
        } else {
            self.own_visibility(drawable.id(), t)
        }
    }

    /// Last visibility toggle at or before `t`; ties keep definition order.
    fn own_visibility(&self, id: DrawableId, t: f64) -> bool {
        let mut toggles: Vec<(f64, usize, bool)> = self
            .by_target
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&i| {
                let ev = &self.events[i];
                let at = ev.toggle_time()?;
                (at <= t).then_some((at, i, ev.category() == EventCategory::Creation))
            })
            .collect();
        toggles.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        toggles.last().is_some_and(|&(_, _, visible)| visible)
    }

    pub(crate) fn deletion_fired(&self, id: DrawableId, t: f64) -> bool {
        self.events_for(id)
            .any(|ev| ev.category() == EventCategory::Deletion && ev.end() <= t)
    }

    fn ancestor_deleted(&self, id: DrawableId, t: f64) -> bool {
        let mut cur = self.parent_of(id);
        while let Some(parent) = cur {
            if self.deletion_fired(parent, t) {
                return true;
            }
            cur = self.parent_of(parent);
        }
        false
    }

    /// Outermost registered group containing `id`.
    pub(crate) fn root_of(&self, id: DrawableId) -> Option<DrawableId> {
        let mut root = None;
        let mut cur = self.parent_of(id);
        while let Some(parent) = cur {
            root = Some(parent);
            cur = self.parent_of(parent);
        }
        root
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
