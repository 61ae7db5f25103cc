use std::collections::{HashMap, HashSet};

use crate::{
    animation::event::{AnimationKind, EventCategory},
    drawable::{Drawable, DrawableId},
    drawable::group::parts_center,
    foundation::core::{Affine, Point},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::StableHasher,
    ops::sequence::OpSequence,
    scene::{cache::DrawCache, model::Scene},
    style::StyleContext,
};

/// Drawing instructions of one visible drawable.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameEntry {
    pub id: DrawableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub ops: OpSequence,
}

/// Everything to draw at one instant, in paint order.
///
/// A drawable placed several times by its group yields one entry per placement, in member
/// order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub time: f64,
    pub entries: Vec<FrameEntry>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry drawn for `id`.
    pub fn entry(&self, id: DrawableId) -> Option<&FrameEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn to_json(&self) -> HandanimResult<String> {
        serde_json::to_string(self).map_err(|e| HandanimError::serde(e.to_string()))
    }

    /// Stable 128-bit digest of the frame content.
    pub fn digest(&self) -> u128 {
        let mut h = StableHasher::new();
        h.write_f64(self.time);
        h.write_usize(self.entries.len());
        for e in &self.entries {
            h.write_u128(e.id.as_u128());
            h.write_str(e.label.as_deref().unwrap_or(""));
            // Serialization of plain data into memory does not fail.
            let ops = serde_json::to_vec(&e.ops).unwrap_or_default();
            h.write_bytes(&ops);
        }
        h.finish()
    }
}

/// Leaf sequences of one group member: a single entry for a leaf, one per leaf for groups.
type Parts = Vec<(DrawableId, OpSequence)>;

impl Scene {
    /// Drawing instructions at `t` under the scene style.
    pub fn frame_instructions_at(&self, t: f64, cache: &DrawCache) -> HandanimResult<Frame> {
        self.frame_instructions_with(t, self.style(), cache)
    }

    /// Drawing instructions at `t` under `style`.
    ///
    /// Each visible leaf starts from its cached base geometry, takes its own transform
    /// events, then the placement of every enclosing group from the innermost outward,
    /// and finally its own appearance events.
    #[tracing::instrument(skip(self, style, cache))]
    pub fn frame_instructions_with(
        &self,
        t: f64,
        style: &StyleContext,
        cache: &DrawCache,
    ) -> HandanimResult<Frame> {
        let to_canvas = self
            .viewport()
            .map(|vp| vp.to_canvas(self.canvas()))
            .unwrap_or(Affine::IDENTITY);

        let mut composed: HashSet<DrawableId> = HashSet::new();
        let mut placed: HashMap<DrawableId, Vec<OpSequence>> = HashMap::new();
        let mut entries = Vec::new();
        for leaf in self.active_drawables_at(t) {
            let id = leaf.id();
            let copies = match self.root_of(id) {
                None => vec![self.mutated(&leaf, t, style, cache)?],
                Some(root) => {
                    if composed.insert(root)
                        && let Some(group) = self.drawable(root)
                    {
                        for (leaf_id, seq) in self.compose(group, t, style, cache)? {
                            if self.root_of(leaf_id) == Some(root) {
                                placed.entry(leaf_id).or_default().push(seq);
                            }
                        }
                    }
                    match placed.remove(&id) {
                        Some(seqs) => seqs,
                        None => vec![self.mutated(&leaf, t, style, cache)?],
                    }
                }
            };
            for geometry in copies {
                let ops = self.appearance(id, geometry, t).transform(to_canvas);
                entries.push(FrameEntry {
                    id,
                    label: leaf.label().map(str::to_owned),
                    ops,
                });
            }
        }
        Ok(Frame { time: t, entries })
    }

    /// Base geometry with the drawable's own transform events applied.
    ///
    /// Events in progress apply at their current progress.
    fn mutated(
        &self,
        leaf: &Drawable,
        t: f64,
        style: &StyleContext,
        cache: &DrawCache,
    ) -> HandanimResult<OpSequence> {
        let base = cache.get_or_draw(leaf, style)?;
        let mut seq = (*base).clone();
        for ev in self.events_for(leaf.id()) {
            if ev.category() != EventCategory::Mutation {
                continue;
            }
            if let Some(p) = ev.contributes_at(t) {
                seq = ev.apply(&seq, p);
            }
        }
        Ok(seq)
    }

    /// Placed geometry of every leaf under `group`, in member order.
    fn compose(
        &self,
        group: &Drawable,
        t: f64,
        style: &StyleContext,
        cache: &DrawCache,
    ) -> HandanimResult<Parts> {
        let Some(g) = group.as_group() else {
            return Ok(vec![(group.id(), self.mutated(group, t, style, cache)?)]);
        };

        let mut ids: Vec<Vec<DrawableId>> = Vec::with_capacity(g.children().len());
        let mut parts: Vec<Vec<OpSequence>> = Vec::with_capacity(g.children().len());
        for child in g.children() {
            let (child_ids, child_parts): (Vec<_>, Vec<_>) =
                self.compose(child, t, style, cache)?.into_iter().unzip();
            ids.push(child_ids);
            parts.push(child_parts);
        }
        g.frame_parts(&mut parts);

        let events: Vec<_> = self
            .events_for(group.id())
            .filter_map(|ev| Some((ev, ev.contributes_at(t)?)))
            .collect();
        let of = |category: EventCategory| {
            events
                .iter()
                .filter(move |(ev, _)| ev.category() == category)
        };
        for (ev, p) in of(EventCategory::Mutation) {
            let center = parts_center(parts.iter().flatten()).unwrap_or(Point::ORIGIN);
            let affine = ev.affine_about(center, *p);
            for seq in parts.iter_mut().flatten() {
                *seq = seq.transform(affine);
            }
        }
        for (ev, p) in of(EventCategory::Deletion) {
            match ev.kind() {
                AnimationKind::FadeOut => {
                    let factor = ev.opacity_factor(*p).unwrap_or(1.0);
                    for seq in parts.iter_mut().flatten() {
                        *seq = seq.scale_opacity(factor);
                    }
                }
                AnimationKind::ZoomOut => {
                    let center = parts_center(parts.iter().flatten()).unwrap_or(Point::ORIGIN);
                    let affine = ev.affine_about(center, *p);
                    for seq in parts.iter_mut().flatten() {
                        *seq = seq.transform(affine);
                    }
                }
                _ => {}
            }
        }

        Ok(ids.into_iter().flatten().zip(parts.into_iter().flatten()).collect())
    }

    /// Apply the leaf's reveal, fade and zoom events in definition order.
    fn appearance(&self, id: DrawableId, mut seq: OpSequence, t: f64) -> OpSequence {
        for ev in self.events_for(id) {
            if !ev.kind().is_appearance() {
                continue;
            }
            if let Some(p) = ev.contributes_at(t) {
                seq = ev.apply(&seq, p);
            }
        }
        seq
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/frame.rs"]
mod tests;
