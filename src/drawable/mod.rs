//! Drawable shapes, their identity and static transforms.

pub mod group;
pub mod shapes;
pub(crate) mod sketch;
pub mod text;
pub mod transform;

use std::sync::Arc;

use crate::{
    foundation::core::{Affine, Point, Rect, Vec2},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::StableHasher,
    ops::sequence::OpSequence,
    style::StyleContext,
};

use group::Group;
use shapes::{Arrow, Curve, Ellipse, Eraser, Line, LinearPath, Polygon, SvgPath};
use text::Text;
use transform::{Anchor, Transform};

/// Stable structural identity of a drawable.
///
/// Derived from the variant, its construction parameters, its styles and the ordered list
/// of transforms applied to it. Equal construction yields equal ids across runs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DrawableId(u128);

impl DrawableId {
    pub const fn from_u128(v: u128) -> Self {
        Self(v)
    }

    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl std::fmt::Display for DrawableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl std::fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DrawableId({self})")
    }
}

impl From<DrawableId> for String {
    fn from(id: DrawableId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for DrawableId {
    type Error = HandanimError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        u128::from_str_radix(&s, 16)
            .map(Self)
            .map_err(|e| HandanimError::serde(format!("drawable id '{s}': {e}")))
    }
}

/// The closed set of drawable variants.
#[derive(Clone, Debug)]
pub enum DrawableKind {
    Line(Line),
    LinearPath(LinearPath),
    Polygon(Polygon),
    Ellipse(Ellipse),
    Curve(Curve),
    Arrow(Arrow),
    Text(Text),
    Eraser(Eraser),
    SvgPath(SvgPath),
    Group(Group),
    /// A drawable seen through a static transform.
    Transformed { inner: Drawable, transform: Transform },
}

impl DrawableKind {
    fn tag(&self) -> u8 {
        match self {
            Self::Line(_) => 1,
            Self::LinearPath(_) => 2,
            Self::Polygon(_) => 3,
            Self::Ellipse(_) => 4,
            Self::Curve(_) => 5,
            Self::Arrow(_) => 6,
            Self::Text(_) => 7,
            Self::Eraser(_) => 8,
            Self::Group(_) => 9,
            Self::Transformed { .. } => 10,
            Self::SvgPath(_) => 11,
        }
    }

    fn identity(&self) -> DrawableId {
        let mut h = StableHasher::new();
        h.write_u8(self.tag());
        match self {
            Self::Line(s) => s.hash_into(&mut h),
            Self::LinearPath(s) => s.hash_into(&mut h),
            Self::Polygon(s) => s.hash_into(&mut h),
            Self::Ellipse(s) => s.hash_into(&mut h),
            Self::Curve(s) => s.hash_into(&mut h),
            Self::Arrow(s) => s.hash_into(&mut h),
            Self::Text(s) => s.hash_into(&mut h),
            Self::Eraser(s) => s.hash_into(&mut h),
            Self::SvgPath(s) => s.hash_into(&mut h),
            Self::Group(g) => g.hash_into(&mut h),
            Self::Transformed { inner, transform } => {
                h.write_u128(inner.id().as_u128());
                transform.hash_into(&mut h);
            }
        }
        DrawableId(h.finish())
    }
}

#[derive(Debug)]
struct Node {
    id: DrawableId,
    label: Option<String>,
    kind: DrawableKind,
}

/// Immutable, cheaply clonable handle to a shape.
///
/// Transform methods never mutate the receiver; they return a new drawable wrapping it.
/// Equality compares identities.
#[derive(Clone)]
pub struct Drawable {
    node: Arc<Node>,
}

impl std::fmt::Debug for Drawable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawable")
            .field("id", &self.node.id)
            .field("label", &self.node.label)
            .field("kind", &self.node.kind)
            .finish()
    }
}

impl PartialEq for Drawable {
    fn eq(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }
}

impl Eq for Drawable {}

impl Drawable {
    fn new(kind: DrawableKind) -> Self {
        Self {
            node: Arc::new(Node {
                id: kind.identity(),
                label: None,
                kind,
            }),
        }
    }

    /// Group drawable over `children`.
    pub fn group(children: impl IntoIterator<Item = Drawable>) -> Self {
        Self::from(Group::new(children))
    }

    pub fn id(&self) -> DrawableId {
        self.node.id
    }

    pub fn label(&self) -> Option<&str> {
        self.node.label.as_deref()
    }

    pub fn kind(&self) -> &DrawableKind {
        &self.node.kind
    }

    /// Attach a display label. The identity is unchanged.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            node: Arc::new(Node {
                id: self.node.id,
                label: Some(label.into()),
                kind: self.node.kind.clone(),
            }),
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.node.kind {
            DrawableKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.as_group().is_some()
    }

    /// Direct members of a group, empty for leaves.
    pub fn members(&self) -> &[Drawable] {
        match self.as_group() {
            Some(g) => g.children(),
            None => &[],
        }
    }

    /// Non-group drawables reachable from this one, depth first, in member order.
    pub fn leaves(&self) -> Vec<Drawable> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Drawable>) {
        match self.as_group() {
            Some(g) => g.children().iter().for_each(|c| c.collect_leaves(out)),
            None => out.push(self.clone()),
        }
    }

    /// This drawable or the group member at any depth whose id is `id`.
    pub fn find(&self, id: DrawableId) -> Option<&Drawable> {
        if self.id() == id {
            return Some(self);
        }
        self.members().iter().find_map(|m| m.find(id))
    }

    /// Whether `id` is this drawable or one of its group members at any depth.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.find(id).is_some()
    }

    /// Wrap in a static transform.
    ///
    /// On a group the transform is appended to the group framing instead, so the result
    /// is still a group.
    pub fn transform(&self, transform: Transform) -> Drawable {
        let out = match &self.node.kind {
            DrawableKind::Group(g) => Self::from(g.clone().framed(transform)),
            _ => Self::new(DrawableKind::Transformed {
                inner: self.clone(),
                transform,
            }),
        };
        match self.label() {
            Some(l) => out.with_label(l),
            None => out,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Drawable {
        self.transform(Transform::Translate(Vec2::new(dx, dy)))
    }

    /// Uniform scale about the center of gravity.
    pub fn scale(&self, factor: f64) -> Drawable {
        self.scale_xy(factor, factor)
    }

    pub fn scale_xy(&self, sx: f64, sy: f64) -> Drawable {
        self.transform(Transform::Scale {
            factor: Vec2::new(sx, sy),
            anchor: Anchor::Center,
        })
    }

    pub fn scale_about(&self, factor: f64, anchor: impl Into<Point>) -> Drawable {
        self.transform(Transform::Scale {
            factor: Vec2::new(factor, factor),
            anchor: Anchor::Point(anchor.into()),
        })
    }

    /// Rotation about the center of gravity, in radians.
    pub fn rotate(&self, radians: f64) -> Drawable {
        self.transform(Transform::Rotate {
            radians,
            anchor: Anchor::Center,
        })
    }

    pub fn rotate_about(&self, radians: f64, anchor: impl Into<Point>) -> Drawable {
        self.transform(Transform::Rotate {
            radians,
            anchor: Anchor::Point(anchor.into()),
        })
    }

    pub fn affine(&self, affine: Affine) -> Drawable {
        self.transform(Transform::Affine(affine))
    }

    /// Jitter seed for this drawable under `ctx`.
    fn seed(&self, ctx: &StyleContext) -> u64 {
        let id = self.node.id.0;
        ctx.seed ^ (id as u64) ^ ((id >> 64) as u64).rotate_left(29)
    }

    /// Produce the drawing instructions of this drawable.
    ///
    /// Pure: equal drawables under equal contexts produce identical sequences. Groups draw
    /// their framed members one after another.
    pub fn draw(&self, ctx: &StyleContext) -> HandanimResult<OpSequence> {
        let seed = self.seed(ctx);
        let out = match &self.node.kind {
            DrawableKind::Line(s) => s.draw(ctx, seed),
            DrawableKind::LinearPath(s) => s.draw(ctx, seed),
            DrawableKind::Polygon(s) => s.draw(ctx, seed),
            DrawableKind::Ellipse(s) => s.draw(ctx, seed),
            DrawableKind::Curve(s) => s.draw(ctx, seed),
            DrawableKind::Arrow(s) => s.draw(ctx, seed),
            DrawableKind::Text(s) => s.draw()?,
            DrawableKind::Eraser(s) => s.draw(ctx, seed)?,
            DrawableKind::SvgPath(s) => s.draw(ctx, seed),
            DrawableKind::Group(g) => {
                let members = g
                    .children()
                    .iter()
                    .map(|c| c.draw(ctx))
                    .collect::<HandanimResult<Vec<_>>>()?;
                return Ok(g
                    .frame_members(members)
                    .iter()
                    .fold(OpSequence::new(), |acc, m| acc.concat(m)));
            }
            DrawableKind::Transformed { inner, transform } => {
                return Ok(transform.apply(&inner.draw(ctx)?));
            }
        };
        out.validate()?;
        Ok(out)
    }

    /// Bounding box of the drawn geometry.
    pub fn bounding_box(&self, ctx: &StyleContext) -> HandanimResult<Option<Rect>> {
        Ok(self.draw(ctx)?.bounding_box())
    }
}

macro_rules! impl_from_shape {
    ($($ty:ident),* $(,)?) => {
        $(impl From<$ty> for Drawable {
            fn from(shape: $ty) -> Self {
                Self::new(DrawableKind::$ty(shape))
            }
        })*
    };
}

impl_from_shape!(
    Line, LinearPath, Polygon, Ellipse, Curve, Arrow, Text, Eraser, SvgPath, Group,
);

#[cfg(test)]
#[path = "../../tests/unit/drawable/drawable.rs"]
mod tests;
