use crate::foundation::core::{Point, Rgb, Vec2};

/// Whether a pen strokes or fills the path that follows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PenMode {
    /// Stroke the outline.
    #[default]
    Stroke,
    /// Fill the enclosed area.
    Fill,
}

/// Pen state selected by [`Op::SetPen`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pen {
    /// Stroke or fill.
    pub mode: PenMode,
    /// Pen color.
    pub color: Rgb,
    /// Stroke width in canvas units. Ignored for fills.
    pub width: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            mode: PenMode::Stroke,
            color: Rgb::BLACK,
            width: 1.0,
            opacity: 1.0,
        }
    }
}

/// One primitive drawing instruction.
///
/// Ops are immutable values; every rewrite (transform, truncation, fading) produces new ops.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Select the pen for the following geometry. Ends the current subpath.
    SetPen(Pen),
    /// Start a new subpath at a point.
    MoveTo(Point),
    /// Straight segment from the current point.
    LineTo(Point),
    /// Cubic Bezier segment from the current point.
    CurveTo {
        /// First control point.
        c1: Point,
        /// Second control point.
        c2: Point,
        /// End point.
        to: Point,
    },
    /// Elliptical arc. Starts its own subpath at the arc start point.
    Ellipse {
        /// Ellipse center.
        center: Point,
        /// Radii along the (rotated) x and y axes.
        radii: Vec2,
        /// Rotation of the ellipse axes in radians.
        x_rotation: f64,
        /// Start angle in radians.
        start_angle: f64,
        /// Signed sweep in radians.
        sweep_angle: f64,
    },
    /// Close the current subpath with a straight segment.
    ClosePath,
    /// Transient filled dot drawn on top of the frame (sketch cursor).
    Marker {
        /// Dot center.
        center: Point,
        /// Dot radius.
        radius: f64,
        /// Dot color.
        color: Rgb,
    },
}

impl Op {
    /// Whether this op needs a current point to be drawn.
    pub fn needs_current_point(&self) -> bool {
        matches!(self, Self::LineTo(_) | Self::CurveTo { .. } | Self::ClosePath)
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }

    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Self::SetPen(_) => "set_pen",
            Self::MoveTo(_) => "move_to",
            Self::LineTo(_) => "line_to",
            Self::CurveTo { .. } => "curve_to",
            Self::Ellipse { .. } => "ellipse",
            Self::ClosePath => "close_path",
            Self::Marker { .. } => "marker",
        }
    }

    pub(crate) fn as_arc(&self) -> Option<kurbo::Arc> {
        match *self {
            Self::Ellipse {
                center,
                radii,
                x_rotation,
                start_angle,
                sweep_angle,
            } => Some(kurbo::Arc {
                center,
                radii,
                start_angle,
                sweep_angle,
                x_rotation,
            }),
            _ => None,
        }
    }
}

/// Point on an ellipse at parametric `angle`.
pub(crate) fn ellipse_point(center: Point, radii: Vec2, x_rotation: f64, angle: f64) -> Point {
    let (s, c) = angle.sin_cos();
    let (rs, rc) = x_rotation.sin_cos();
    let u = radii.x * c;
    let v = radii.y * s;
    center + Vec2::new(u * rc - v * rs, u * rs + v * rc)
}

pub(crate) fn arc_start(arc: &kurbo::Arc) -> Point {
    ellipse_point(arc.center, arc.radii, arc.x_rotation, arc.start_angle)
}

pub(crate) fn arc_end(arc: &kurbo::Arc) -> Point {
    ellipse_point(
        arc.center,
        arc.radii,
        arc.x_rotation,
        arc.start_angle + arc.sweep_angle,
    )
}
