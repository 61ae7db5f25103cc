//! handanim is a hand-drawn whiteboard animation engine.
//!
//! Scenes are built from immutable [`Drawable`] shapes and timed [`AnimationEvent`]s. For any
//! instant the [`Scene`] produces a [`Frame`]: an ordered list of resolution-independent
//! drawing instructions that a rasterizing or encoding [`FrameSink`] turns into pixels.
//!
//! - Build drawables (lines, polygons, ellipses, curves, arrows, text, groups)
//! - Attach events (sketch reveal, fades, zooms, interpolated transforms)
//! - Ask the scene for frame instructions, one instant at a time or through [`render`]
#![forbid(unsafe_code)]

mod foundation;

/// Timed animation events and easing.
pub mod animation;
/// Shapes, groups, text and static transforms.
pub mod drawable;
/// Drawing instruction model.
pub mod ops;
/// Frame loop and sinks.
pub mod render;
/// Scene timeline and frame composition.
pub mod scene;
/// Stroke, fill and hand-drawn styles.
pub mod style;

pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, Interval, Point, Rect, Rgb, Vec2,
};
pub use crate::foundation::error::{HandanimError, HandanimResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::event::{
    AnimationEvent, AnimationKind, EventCategory, EventPhase, GlowDot, TransformAnim,
};
pub use crate::drawable::group::Group;
pub use crate::drawable::shapes::{
    Arrow, ArrowHead, Curve, Ellipse, Eraser, Line, LinearPath, Polygon, ShapeStyle, Styled,
    SvgPath,
};
pub use crate::drawable::text::{Glyph, GlyphOutliner, Text};
pub use crate::drawable::transform::{Anchor, Transform};
pub use crate::drawable::{Drawable, DrawableId, DrawableKind};
pub use crate::ops::op::{Op, Pen, PenMode};
pub use crate::ops::sequence::OpSequence;
pub use crate::render::pipeline::{
    RenderOpts, RenderStats, RenderThreading, render, render_frames, render_snapshot,
};
pub use crate::render::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::scene::cache::{CacheStats, DrawCache};
pub use crate::scene::canvas::{Canvas, Viewport};
pub use crate::scene::frame::{Frame, FrameEntry};
pub use crate::scene::model::Scene;
pub use crate::style::{FillPattern, FillStyle, SketchStyle, StrokeStyle, StyleContext};
