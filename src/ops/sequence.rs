use kurbo::{CubicBez, ParamCurve, ParamCurveArclen, ParamCurveExtrema, PathEl};

use crate::{
    foundation::core::{Affine, BezPath, Point, Rect, Vec2},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::approx_point,
    ops::op::{Op, arc_end, arc_start},
};

const ARCLEN_ACCURACY: f64 = 1e-7;
const ARC_TOLERANCE: f64 = 1e-4;
const SIMILARITY_EPS: f64 = 1e-9;

/// Ordered list of [`Op`] describing one complete outline.
///
/// The sequence is self-contained: no op refers to geometry outside of it. Concatenation
/// preserves order and never merges ops.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct OpSequence {
    ops: Vec<Op>,
}

/// Geometry of a path-bearing op once the pen position is known.
#[derive(Clone, Copy, Debug)]
enum Segment {
    Line(Point, Point),
    Cubic(CubicBez),
    Arc(kurbo::Arc),
}

impl Segment {
    fn length(&self) -> f64 {
        match self {
            Self::Line(a, b) => a.distance(*b),
            Self::Cubic(c) => c.arclen(ARCLEN_ACCURACY),
            Self::Arc(arc) => arc_cubics(arc).iter().map(|c| c.arclen(ARCLEN_ACCURACY)).sum(),
        }
    }

    /// Op covering the first `len` units of this segment.
    fn truncated(&self, len: f64) -> Op {
        match *self {
            Self::Line(a, b) => {
                let full = a.distance(b);
                let t = if full > 0.0 { len / full } else { 1.0 };
                Op::LineTo(a.lerp(b, t.clamp(0.0, 1.0)))
            }
            Self::Cubic(c) => {
                let t = c.inv_arclen(len, ARCLEN_ACCURACY);
                let sub = c.subsegment(0.0..t);
                Op::CurveTo {
                    c1: sub.p1,
                    c2: sub.p2,
                    to: sub.p3,
                }
            }
            Self::Arc(arc) => {
                // Arc length is not linear in the angle for ellipses; bisect on the sweep.
                let (mut lo, mut hi) = (0.0, 1.0);
                for _ in 0..48 {
                    let mid = 0.5 * (lo + hi);
                    let probe = kurbo::Arc {
                        sweep_angle: arc.sweep_angle * mid,
                        ..arc
                    };
                    if Segment::Arc(probe).length() < len {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                Op::Ellipse {
                    center: arc.center,
                    radii: arc.radii,
                    x_rotation: arc.x_rotation,
                    start_angle: arc.start_angle,
                    sweep_angle: arc.sweep_angle * 0.5 * (lo + hi),
                }
            }
        }
    }
}

fn arc_cubics(arc: &kurbo::Arc) -> Vec<CubicBez> {
    let mut p0 = arc_start(arc);
    arc.append_iter(ARC_TOLERANCE)
        .filter_map(|el| match el {
            PathEl::CurveTo(c1, c2, p) => {
                let c = CubicBez::new(p0, c1, c2, p);
                p0 = p;
                Some(c)
            }
            _ => None,
        })
        .collect()
}

/// Pen position tracker shared by every walk over a sequence.
#[derive(Clone, Copy, Debug, Default)]
struct PenCursor {
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl PenCursor {
    /// Advance over `op`, returning the segment it draws (if any).
    fn step(&mut self, op: &Op) -> Option<Segment> {
        match op {
            Op::SetPen(_) => {
                self.current = None;
                self.subpath_start = None;
                None
            }
            Op::MoveTo(p) => {
                self.current = Some(*p);
                self.subpath_start = Some(*p);
                None
            }
            Op::LineTo(p) => {
                let seg = self.current.map(|a| Segment::Line(a, *p));
                self.current = Some(*p);
                seg
            }
            Op::CurveTo { c1, c2, to } => {
                let seg = self
                    .current
                    .map(|a| Segment::Cubic(CubicBez::new(a, *c1, *c2, *to)));
                self.current = Some(*to);
                seg
            }
            Op::ClosePath => {
                let seg = match (self.current, self.subpath_start) {
                    (Some(a), Some(b)) => Some(Segment::Line(a, b)),
                    _ => None,
                };
                self.current = self.subpath_start;
                seg
            }
            Op::Ellipse { .. } => {
                let arc = op.as_arc()?;
                self.subpath_start = Some(arc_start(&arc));
                self.current = Some(arc_end(&arc));
                Some(Segment::Arc(arc))
            }
            Op::Marker { .. } => None,
        }
    }
}

impl OpSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap ops without validating them. See [`OpSequence::validate`].
    pub fn from_ops(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Append all ops of `other`, in order.
    pub fn extend(&mut self, other: &OpSequence) {
        self.ops.extend(other.ops.iter().cloned());
    }

    /// Concatenate two sequences.
    pub fn concat(mut self, other: &OpSequence) -> Self {
        self.extend(other);
        self
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Op> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Check that every line, curve and close follows a position-establishing op.
    pub fn validate(&self) -> HandanimResult<()> {
        let mut cursor = PenCursor::default();
        for (i, op) in self.ops.iter().enumerate() {
            if op.needs_current_point() && cursor.current.is_none() {
                return Err(HandanimError::malformed(format!(
                    "op #{i} ({}) has no preceding move_to or ellipse",
                    op.tag()
                )));
            }
            cursor.step(op);
        }
        Ok(())
    }

    /// Bounding box over every coordinate, including curve control points.
    ///
    /// Ellipse arcs contribute the tight extremes of their cubic approximation; markers
    /// contribute their full disc. Returns `None` when the sequence has no coordinates.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut bbox: Option<Rect> = None;
        let mut add = |p: Point| {
            bbox = Some(match bbox {
                Some(r) => r.union_pt(p),
                None => Rect::from_points(p, p),
            });
        };
        for op in &self.ops {
            match op {
                Op::SetPen(_) | Op::ClosePath => {}
                Op::MoveTo(p) | Op::LineTo(p) => add(*p),
                Op::CurveTo { c1, c2, to } => {
                    add(*c1);
                    add(*c2);
                    add(*to);
                }
                Op::Ellipse { .. } => {
                    if let Some(arc) = op.as_arc() {
                        for c in arc_cubics(&arc) {
                            let r = c.bounding_box();
                            add(Point::new(r.x0, r.y0));
                            add(Point::new(r.x1, r.y1));
                        }
                    }
                }
                Op::Marker { center, radius, .. } => {
                    add(*center - Vec2::new(*radius, *radius));
                    add(*center + Vec2::new(*radius, *radius));
                }
            }
        }
        bbox
    }

    /// Center of the bounding box.
    pub fn center_of_gravity(&self) -> Option<Point> {
        self.bounding_box().map(|r| r.center())
    }

    /// Pen position after the last op.
    pub fn current_point(&self) -> Option<Point> {
        let mut cursor = PenCursor::default();
        for op in &self.ops {
            cursor.step(op);
        }
        cursor.current
    }

    /// Total length of every drawn segment. Markers and moves have no length.
    pub fn path_length(&self) -> f64 {
        let mut cursor = PenCursor::default();
        self.ops
            .iter()
            .filter_map(|op| cursor.step(op))
            .map(|seg| seg.length())
            .sum()
    }

    /// Prefix covering `fraction` of the total path length.
    ///
    /// The segment crossing the cut is split exactly. Pen changes met before the cut are
    /// kept; nothing after the cut is emitted.
    pub fn partial(&self, fraction: f64) -> OpSequence {
        if fraction <= 0.0 {
            return OpSequence::new();
        }
        if fraction >= 1.0 {
            return self.clone();
        }
        let budget = self.path_length() * fraction;
        let mut out = OpSequence::new();
        let mut used = 0.0;
        let mut cursor = PenCursor::default();
        for op in &self.ops {
            if used >= budget {
                break;
            }
            match cursor.step(op) {
                None => out.push(op.clone()),
                Some(seg) => {
                    let len = seg.length();
                    if used + len <= budget {
                        out.push(op.clone());
                        used += len;
                    } else {
                        out.push(seg.truncated(budget - used));
                        break;
                    }
                }
            }
        }
        out
    }

    /// Apply `affine` to every coordinate-bearing op.
    ///
    /// Ellipses stay ellipses under similarity transforms and are converted to cubic runs
    /// under any other affine.
    pub fn transform(&self, affine: Affine) -> OpSequence {
        if affine == Affine::IDENTITY {
            return self.clone();
        }
        let similarity = similarity_parts(affine);
        let area_scale = affine.determinant().abs().sqrt();
        let mut out = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            match op {
                Op::SetPen(_) | Op::ClosePath => out.push(op.clone()),
                Op::MoveTo(p) => out.push(Op::MoveTo(affine * *p)),
                Op::LineTo(p) => out.push(Op::LineTo(affine * *p)),
                Op::CurveTo { c1, c2, to } => out.push(Op::CurveTo {
                    c1: affine * *c1,
                    c2: affine * *c2,
                    to: affine * *to,
                }),
                Op::Marker {
                    center,
                    radius,
                    color,
                } => out.push(Op::Marker {
                    center: affine * *center,
                    radius: radius * area_scale,
                    color: *color,
                }),
                Op::Ellipse {
                    center,
                    radii,
                    x_rotation,
                    start_angle,
                    sweep_angle,
                } => match similarity {
                    Some((scale, rotation)) => out.push(Op::Ellipse {
                        center: affine * *center,
                        radii: *radii * scale,
                        x_rotation: x_rotation + rotation,
                        start_angle: *start_angle,
                        sweep_angle: *sweep_angle,
                    }),
                    None => {
                        let Some(arc) = op.as_arc() else { continue };
                        out.push(Op::MoveTo(affine * arc_start(&arc)));
                        for c in arc_cubics(&arc) {
                            out.push(Op::CurveTo {
                                c1: affine * c.p1,
                                c2: affine * c.p2,
                                to: affine * c.p3,
                            });
                        }
                    }
                },
            }
        }
        OpSequence { ops: out }
    }

    /// Multiply every pen opacity by `factor` (clamped to `[0, 1]`).
    pub fn scale_opacity(&self, factor: f64) -> OpSequence {
        let factor = factor.clamp(0.0, 1.0);
        let ops = self
            .ops
            .iter()
            .map(|op| match op {
                Op::SetPen(pen) => {
                    let mut pen = *pen;
                    pen.opacity = (pen.opacity * factor).clamp(0.0, 1.0);
                    Op::SetPen(pen)
                }
                other => other.clone(),
            })
            .collect();
        OpSequence { ops }
    }

    pub fn has_marker(&self) -> bool {
        self.ops.iter().any(Op::is_marker)
    }

    /// Copy of this sequence with pen changes removed (pure geometry).
    pub fn without_pens(&self) -> OpSequence {
        let ops = self
            .ops
            .iter()
            .filter(|op| !matches!(op, Op::SetPen(_)))
            .cloned()
            .collect();
        OpSequence { ops }
    }

    /// Geometry as a single `BezPath` for rasterizers. Pens and markers are skipped.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for op in &self.ops {
            match op {
                Op::SetPen(_) | Op::Marker { .. } => {}
                Op::MoveTo(p) => path.move_to(*p),
                Op::LineTo(p) => path.line_to(*p),
                Op::CurveTo { c1, c2, to } => path.curve_to(*c1, *c2, *to),
                Op::ClosePath => path.close_path(),
                Op::Ellipse { .. } => {
                    if let Some(arc) = op.as_arc() {
                        path.move_to(arc_start(&arc));
                        for c in arc_cubics(&arc) {
                            path.curve_to(c.p1, c.p2, c.p3);
                        }
                    }
                }
            }
        }
        path
    }

    /// Structural equality with coordinates compared within `eps`.
    pub fn approx_eq(&self, other: &OpSequence, eps: f64) -> bool {
        if self.ops.len() != other.ops.len() {
            return false;
        }
        let close = |a: f64, b: f64| (a - b).abs() <= eps;
        self.ops.iter().zip(&other.ops).all(|(a, b)| match (a, b) {
            (Op::SetPen(x), Op::SetPen(y)) => {
                x.mode == y.mode
                    && x.color == y.color
                    && close(x.width, y.width)
                    && close(x.opacity, y.opacity)
            }
            (Op::MoveTo(x), Op::MoveTo(y)) | (Op::LineTo(x), Op::LineTo(y)) => {
                approx_point(*x, *y, eps)
            }
            (
                Op::CurveTo { c1, c2, to },
                Op::CurveTo {
                    c1: d1,
                    c2: d2,
                    to: dt,
                },
            ) => {
                approx_point(*c1, *d1, eps)
                    && approx_point(*c2, *d2, eps)
                    && approx_point(*to, *dt, eps)
            }
            (Op::ClosePath, Op::ClosePath) => true,
            (
                Op::Ellipse {
                    center,
                    radii,
                    x_rotation,
                    start_angle,
                    sweep_angle,
                },
                Op::Ellipse {
                    center: c,
                    radii: r,
                    x_rotation: xr,
                    start_angle: sa,
                    sweep_angle: sw,
                },
            ) => {
                approx_point(*center, *c, eps)
                    && close(radii.x, r.x)
                    && close(radii.y, r.y)
                    && close(*x_rotation, *xr)
                    && close(*start_angle, *sa)
                    && close(*sweep_angle, *sw)
            }
            (
                Op::Marker {
                    center,
                    radius,
                    color,
                },
                Op::Marker {
                    center: c,
                    radius: r,
                    color: k,
                },
            ) => approx_point(*center, *c, eps) && close(*radius, *r) && color == k,
            _ => false,
        })
    }
}

impl<'a> IntoIterator for &'a OpSequence {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl FromIterator<Op> for OpSequence {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

/// `(uniform scale, rotation)` when `affine` is a similarity without reflection.
fn similarity_parts(affine: Affine) -> Option<(f64, f64)> {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    if (a - d).abs() > SIMILARITY_EPS || (b + c).abs() > SIMILARITY_EPS {
        return None;
    }
    if affine.determinant() <= 0.0 {
        return None;
    }
    Some((a.hypot(b), b.atan2(a)))
}

#[cfg(test)]
#[path = "../../tests/unit/ops/sequence.rs"]
mod tests;
