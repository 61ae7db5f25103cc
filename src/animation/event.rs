use std::f64::consts::TAU;

use crate::{
    animation::ease::Ease,
    drawable::{Drawable, DrawableId},
    foundation::core::{Affine, Interval, Point, Rgb, Vec2},
    foundation::error::HandanimResult,
    foundation::math::{anchored, lerp_affine},
    ops::op::Op,
    ops::sequence::OpSequence,
};

/// Pulsing dot following the pen during a sketch reveal.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlowDot {
    pub radius: f64,
    pub color: Rgb,
    /// Breathing cycles over the whole reveal.
    pub frequency: f64,
}

impl Default for GlowDot {
    fn default() -> Self {
        Self {
            radius: 5.0,
            color: Rgb::gray(0.5),
            frequency: 5.0,
        }
    }
}

impl GlowDot {
    /// Radius at `progress`, breathing by five percent around the base radius.
    pub fn radius_at(&self, progress: f64) -> f64 {
        self.radius * (1.0 + 0.05 * (TAU * progress * self.frequency).sin())
    }
}

/// Interpolated geometric change.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformAnim {
    TranslateBy(Vec2),
    /// Move the center of gravity onto a point.
    TranslateTo(Point),
    /// Arrive at the current position, coming from a point.
    TranslateFrom(Point),
    /// Uniform scale about the center of gravity.
    ScaleBy(f64),
    /// Rotation about the center of gravity, in radians.
    RotateBy(f64),
    /// Coefficient-wise blend from identity to the affine.
    AffineTo(Affine),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Instant appearance at the event start.
    Create,
    /// Progressive stroke reveal, optionally with a glow dot at the pen.
    Sketch { glow: Option<GlowDot> },
    FadeIn,
    ZoomIn,
    /// Instant removal at the event end.
    Delete,
    FadeOut,
    ZoomOut,
    Transform(TransformAnim),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventCategory {
    /// Makes its target visible from the event start.
    Creation,
    /// Hides its target from the event end.
    Deletion,
    /// Changes geometry without affecting visibility.
    Mutation,
}

impl AnimationKind {
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Create | Self::Sketch { .. } | Self::FadeIn | Self::ZoomIn => {
                EventCategory::Creation
            }
            Self::Delete | Self::FadeOut | Self::ZoomOut => EventCategory::Deletion,
            Self::Transform(_) => EventCategory::Mutation,
        }
    }

    /// Whether this kind only changes how its target appears (reveal, opacity, zoom).
    pub fn is_appearance(&self) -> bool {
        !matches!(self, Self::Transform(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    Pending,
    Active,
    Completed,
}

/// A timed animation bound to one drawable.
///
/// Immutable once built; the `with_*` builders return modified copies.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationEvent {
    target: DrawableId,
    kind: AnimationKind,
    interval: Interval,
    keep_final_state: bool,
    ease: Ease,
}

impl AnimationEvent {
    /// Event on `target` over `[start, end]` seconds.
    pub fn new(
        target: &Drawable,
        kind: AnimationKind,
        start: f64,
        end: f64,
    ) -> HandanimResult<Self> {
        Self::for_id(target.id(), kind, start, end)
    }

    pub fn for_id(
        target: DrawableId,
        kind: AnimationKind,
        start: f64,
        end: f64,
    ) -> HandanimResult<Self> {
        Ok(Self {
            target,
            kind,
            interval: Interval::new(start, end)?,
            keep_final_state: true,
            ease: Ease::Linear,
        })
    }

    pub fn create(target: &Drawable, at: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::Create, at, at)
    }

    pub fn delete(target: &Drawable, at: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::Delete, at, at)
    }

    pub fn sketch(target: &Drawable, start: f64, end: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::Sketch { glow: None }, start, end)
    }

    pub fn sketch_with_glow(
        target: &Drawable,
        start: f64,
        end: f64,
        glow: GlowDot,
    ) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::Sketch { glow: Some(glow) }, start, end)
    }

    pub fn fade_in(target: &Drawable, start: f64, end: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::FadeIn, start, end)
    }

    pub fn fade_out(target: &Drawable, start: f64, end: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::FadeOut, start, end)
    }

    pub fn zoom_in(target: &Drawable, start: f64, end: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::ZoomIn, start, end)
    }

    pub fn zoom_out(target: &Drawable, start: f64, end: f64) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::ZoomOut, start, end)
    }

    pub fn transform(
        target: &Drawable,
        anim: TransformAnim,
        start: f64,
        end: f64,
    ) -> HandanimResult<Self> {
        Self::new(target, AnimationKind::Transform(anim), start, end)
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Whether the final state persists after `end`. Defaults to true.
    pub fn with_keep_final_state(mut self, keep: bool) -> Self {
        self.keep_final_state = keep;
        self
    }

    pub fn target(&self) -> DrawableId {
        self.target
    }

    pub fn kind(&self) -> &AnimationKind {
        &self.kind
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn start(&self) -> f64 {
        self.interval.start
    }

    pub fn end(&self) -> f64 {
        self.interval.end
    }

    pub fn keep_final_state(&self) -> bool {
        self.keep_final_state
    }

    pub fn ease(&self) -> Ease {
        self.ease
    }

    pub fn category(&self) -> EventCategory {
        self.kind.category()
    }

    /// Time at which the event changes visibility: start for creations, end for deletions.
    pub fn toggle_time(&self) -> Option<f64> {
        match self.category() {
            EventCategory::Creation => Some(self.interval.start),
            EventCategory::Deletion => Some(self.interval.end),
            EventCategory::Mutation => None,
        }
    }

    pub fn phase(&self, t: f64) -> EventPhase {
        if t < self.interval.start {
            EventPhase::Pending
        } else if t <= self.interval.end {
            EventPhase::Active
        } else {
            EventPhase::Completed
        }
    }

    /// Eased progress at `t`, in `[0, 1]`.
    pub fn progress(&self, t: f64) -> f64 {
        self.ease.apply(self.interval.progress(t))
    }

    /// Eased progress to apply at `t`, or `None` when the event has no effect at `t`.
    pub fn contributes_at(&self, t: f64) -> Option<f64> {
        match self.phase(t) {
            EventPhase::Pending => None,
            EventPhase::Active => Some(self.progress(t)),
            EventPhase::Completed if self.keep_final_state => Some(1.0),
            EventPhase::Completed => None,
        }
    }

    /// Geometric part of this event at progress `p`, anchored at `center`.
    ///
    /// Identity for kinds that do not move geometry.
    pub fn affine_about(&self, center: Point, p: f64) -> Affine {
        match &self.kind {
            AnimationKind::ZoomIn => anchored(Affine::scale(p), center),
            AnimationKind::ZoomOut => anchored(Affine::scale(1.0 - p), center),
            AnimationKind::Transform(anim) => match *anim {
                TransformAnim::TranslateBy(v) => Affine::translate(v * p),
                TransformAnim::TranslateTo(to) => Affine::translate((to - center) * p),
                TransformAnim::TranslateFrom(from) => {
                    Affine::translate((from - center) * (1.0 - p))
                }
                TransformAnim::ScaleBy(s) => anchored(Affine::scale(1.0 + (s - 1.0) * p), center),
                TransformAnim::RotateBy(a) => anchored(Affine::rotate(a * p), center),
                TransformAnim::AffineTo(a) => lerp_affine(Affine::IDENTITY, a, p),
            },
            _ => Affine::IDENTITY,
        }
    }

    /// Geometric part of this event at progress `p`, anchored at the center of `geometry`.
    pub fn affine_for(&self, geometry: &OpSequence, p: f64) -> Affine {
        self.affine_about(geometry.center_of_gravity().unwrap_or(Point::ORIGIN), p)
    }

    /// Opacity multiplier at progress `p`, if this kind fades.
    pub fn opacity_factor(&self, p: f64) -> Option<f64> {
        match self.kind {
            AnimationKind::FadeIn => Some(p),
            AnimationKind::FadeOut => Some(1.0 - p),
            _ => None,
        }
    }

    /// Rewrite `seq` as this event shows it at progress `p`.
    pub fn apply(&self, seq: &OpSequence, p: f64) -> OpSequence {
        tracing::trace!(target_id = %self.target, kind = ?self.kind, p, "apply event");
        match &self.kind {
            AnimationKind::Create | AnimationKind::Delete => seq.clone(),
            AnimationKind::Sketch { glow } => {
                let mut out = seq.partial(p);
                if let Some(glow) = glow {
                    if p > 0.0 && p < 1.0 {
                        if let Some(center) = out.current_point() {
                            out.push(Op::Marker {
                                center,
                                radius: glow.radius_at(p),
                                color: glow.color,
                            });
                        }
                    }
                }
                out
            }
            AnimationKind::FadeIn | AnimationKind::FadeOut => {
                seq.scale_opacity(self.opacity_factor(p).unwrap_or(1.0))
            }
            AnimationKind::ZoomIn | AnimationKind::ZoomOut | AnimationKind::Transform(_) => {
                seq.transform(self.affine_for(seq, p))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/event.rs"]
mod tests;
