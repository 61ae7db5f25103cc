use crate::{
    foundation::core::{Affine, Point, Vec2},
    foundation::math::{StableHasher, anchored},
    ops::sequence::OpSequence,
};

/// Fixed point of a scale or rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Center of gravity of the geometry being transformed.
    #[default]
    Center,
    /// A fixed canvas point.
    Point(Point),
}

/// Static transformation wrapped around a drawable.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Translate(Vec2),
    Scale { factor: Vec2, anchor: Anchor },
    Rotate { radians: f64, anchor: Anchor },
    Affine(Affine),
}

impl Transform {
    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::Translate(Vec2::new(dx, dy))
    }

    /// Uniform scale about the center of gravity.
    pub fn scale(factor: f64) -> Self {
        Self::Scale {
            factor: Vec2::new(factor, factor),
            anchor: Anchor::Center,
        }
    }

    /// Rotation about the center of gravity.
    pub fn rotate(radians: f64) -> Self {
        Self::Rotate {
            radians,
            anchor: Anchor::Center,
        }
    }

    /// Affine for this transform when `Anchor::Center` means `center`.
    pub fn resolve_at(&self, center: Point) -> Affine {
        let pick = |a: &Anchor| match a {
            Anchor::Center => center,
            Anchor::Point(p) => *p,
        };
        match self {
            Self::Translate(v) => Affine::translate(*v),
            Self::Scale { factor, anchor } => {
                anchored(Affine::scale_non_uniform(factor.x, factor.y), pick(anchor))
            }
            Self::Rotate { radians, anchor } => anchored(Affine::rotate(*radians), pick(anchor)),
            Self::Affine(a) => *a,
        }
    }

    /// Affine for this transform applied to `geometry`.
    pub fn resolve(&self, geometry: &OpSequence) -> Affine {
        self.resolve_at(geometry.center_of_gravity().unwrap_or(Point::ORIGIN))
    }

    pub fn apply(&self, geometry: &OpSequence) -> OpSequence {
        geometry.transform(self.resolve(geometry))
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        let write_anchor = |h: &mut StableHasher, a: &Anchor| match a {
            Anchor::Center => h.write_u8(0),
            Anchor::Point(p) => {
                h.write_u8(1);
                h.write_point(*p);
            }
        };
        match self {
            Self::Translate(v) => {
                h.write_u8(0);
                h.write_vec2(*v);
            }
            Self::Scale { factor, anchor } => {
                h.write_u8(1);
                h.write_vec2(*factor);
                write_anchor(h, anchor);
            }
            Self::Rotate { radians, anchor } => {
                h.write_u8(2);
                h.write_f64(*radians);
                write_anchor(h, anchor);
            }
            Self::Affine(a) => {
                h.write_u8(3);
                h.write_affine(*a);
            }
        }
    }
}
