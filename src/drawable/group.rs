use crate::{
    drawable::{Drawable, transform::Transform},
    foundation::core::{Point, Rect},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::StableHasher,
    ops::sequence::OpSequence,
};

/// Transform applied to one member after the group framing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MemberEdit {
    pub index: usize,
    pub transform: Transform,
}

/// Ordered collection of drawables animated and framed as one unit.
///
/// The framing transforms apply to all members together, anchored at their combined center
/// of gravity; member edits apply afterwards, one member at a time. Both lists keep their
/// own order, so building `framed(..)` and `edit(..)` in either order yields the same group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    children: Vec<Drawable>,
    framing: Vec<Transform>,
    edits: Vec<MemberEdit>,
}

impl Group {
    pub fn new(children: impl IntoIterator<Item = Drawable>) -> Self {
        Self {
            children: children.into_iter().collect(),
            framing: Vec::new(),
            edits: Vec::new(),
        }
    }

    pub fn children(&self) -> &[Drawable] {
        &self.children
    }

    pub fn framing(&self) -> &[Transform] {
        &self.framing
    }

    pub fn edits(&self) -> &[MemberEdit] {
        &self.edits
    }

    /// Append a group-level transform.
    pub fn framed(mut self, transform: Transform) -> Self {
        self.framing.push(transform);
        self
    }

    /// Append a transform for the member at `index`.
    pub fn edit(mut self, index: usize, transform: Transform) -> HandanimResult<Self> {
        if index >= self.children.len() {
            return Err(HandanimError::validation(format!(
                "member index {index} out of range for group of {}",
                self.children.len()
            )));
        }
        self.edits.push(MemberEdit { index, transform });
        Ok(self)
    }

    /// Apply the framing and then the member edits to the members' geometry.
    ///
    /// `members[i]` is the current geometry of `children()[i]`.
    pub fn frame_members(&self, members: Vec<OpSequence>) -> Vec<OpSequence> {
        let mut parts: Vec<Vec<OpSequence>> = members.into_iter().map(|m| vec![m]).collect();
        self.frame_parts(&mut parts);
        parts
            .into_iter()
            .map(|p| p.iter().fold(OpSequence::new(), |acc, s| acc.concat(s)))
            .collect()
    }

    /// Same as [`Group::frame_members`] for members made of several sequences.
    ///
    /// `parts[i]` holds the sequences of `children()[i]`, one per leaf for nested groups.
    pub fn frame_parts(&self, parts: &mut [Vec<OpSequence>]) {
        for t in &self.framing {
            let center = parts_center(parts.iter().flatten()).unwrap_or(Point::ORIGIN);
            let affine = t.resolve_at(center);
            for seq in parts.iter_mut().flatten() {
                *seq = seq.transform(affine);
            }
        }
        for edit in &self.edits {
            if let Some(member) = parts.get_mut(edit.index) {
                let center = combined_center(member).unwrap_or(Point::ORIGIN);
                let affine = edit.transform.resolve_at(center);
                for seq in member.iter_mut() {
                    *seq = seq.transform(affine);
                }
            }
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_usize(self.children.len());
        for c in &self.children {
            h.write_u128(c.id().as_u128());
        }
        h.write_usize(self.framing.len());
        for t in &self.framing {
            t.hash_into(h);
        }
        h.write_usize(self.edits.len());
        for e in &self.edits {
            h.write_usize(e.index);
            e.transform.hash_into(h);
        }
    }
}

/// Union of the members' bounding boxes.
pub fn combined_bounds(members: &[OpSequence]) -> Option<Rect> {
    members
        .iter()
        .filter_map(OpSequence::bounding_box)
        .reduce(|a, b| a.union(b))
}

/// Center of gravity of several sequences taken together.
pub fn combined_center(members: &[OpSequence]) -> Option<Point> {
    parts_center(members)
}

pub(crate) fn parts_center<'a>(parts: impl IntoIterator<Item = &'a OpSequence>) -> Option<Point> {
    parts
        .into_iter()
        .filter_map(OpSequence::bounding_box)
        .reduce(|a, b| a.union(b))
        .map(|r| r.center())
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/group.rs"]
mod tests;
