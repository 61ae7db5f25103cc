use crate::{
    drawable::{Drawable, sketch::Sketcher},
    foundation::core::{Affine, BezPath, Point, Rect, Rgb, Vec2},
    foundation::error::{HandanimError, HandanimResult},
    foundation::math::StableHasher,
    ops::op::Op,
    ops::sequence::OpSequence,
    style::{FillStyle, SketchStyle, StrokeStyle, StyleContext},
};

/// Stroke, optional fill and sketch parameters of a leaf shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub stroke: StrokeStyle,
    pub fill: Option<FillStyle>,
    pub sketch: SketchStyle,
}

impl ShapeStyle {
    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        self.stroke.hash_into(h);
        match &self.fill {
            Some(f) => {
                h.write_u8(1);
                f.hash_into(h);
            }
            None => h.write_u8(0),
        }
        self.sketch.hash_into(h);
    }

    fn sketcher(&self, ctx: &StyleContext, seed: u64) -> Sketcher {
        Sketcher::new(seed, self.sketch, ctx.sketchy)
    }
}

/// Builder methods shared by every styled shape.
pub trait Styled: Sized {
    fn style_mut(&mut self) -> &mut ShapeStyle;

    fn with_style(mut self, style: ShapeStyle) -> Self {
        *self.style_mut() = style;
        self
    }

    fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.style_mut().stroke = stroke;
        self
    }

    fn with_fill(mut self, fill: FillStyle) -> Self {
        self.style_mut().fill = Some(fill);
        self
    }

    fn with_sketch(mut self, sketch: SketchStyle) -> Self {
        self.style_mut().sketch = sketch;
        self
    }
}

macro_rules! impl_styled {
    ($($ty:ty),* $(,)?) => {
        $(impl Styled for $ty {
            fn style_mut(&mut self) -> &mut ShapeStyle {
                &mut self.style
            }
        })*
    };
}

impl_styled!(Line, LinearPath, Polygon, Ellipse, Curve, Arrow, Eraser, SvgPath);

fn write_points(h: &mut StableHasher, points: &[Point]) {
    h.write_usize(points.len());
    for p in points {
        h.write_point(*p);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            style: ShapeStyle::default(),
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_point(self.start);
        h.write_point(self.end);
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        self.style
            .sketcher(ctx, seed)
            .line(self.start, self.end, &mut out);
        out
    }
}

/// Connected straight segments, optionally closed.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearPath {
    pub points: Vec<Point>,
    pub close: bool,
    pub style: ShapeStyle,
}

impl LinearPath {
    pub fn new(points: impl IntoIterator<Item = Point>) -> HandanimResult<Self> {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 2 {
            return Err(HandanimError::validation(
                "linear path needs at least two points",
            ));
        }
        Ok(Self {
            points,
            close: false,
            style: ShapeStyle::default(),
        })
    }

    pub fn closed(mut self) -> Self {
        self.close = true;
        self
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        write_points(h, &self.points);
        h.write_bool(self.close);
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        self.style
            .sketcher(ctx, seed)
            .polyline(&self.points, self.close, &mut out);
        out
    }
}

/// Closed polygon with at least three vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Polygon {
    pub fn new(points: impl IntoIterator<Item = Point>) -> HandanimResult<Self> {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 3 {
            return Err(HandanimError::validation(format!(
                "polygon needs at least three points, got {}",
                points.len()
            )));
        }
        Ok(Self {
            points,
            style: ShapeStyle::default(),
        })
    }

    /// Axis-aligned rectangle from its top-left corner.
    pub fn rectangle(top_left: impl Into<Point>, width: f64, height: f64) -> Self {
        let p = top_left.into();
        Self {
            points: vec![
                p,
                Point::new(p.x + width, p.y),
                Point::new(p.x + width, p.y + height),
                Point::new(p.x, p.y + height),
            ],
            style: ShapeStyle::default(),
        }
    }

    pub fn square(top_left: impl Into<Point>, side: f64) -> Self {
        Self::rectangle(top_left, side, side)
    }

    /// Regular polygon with `n` vertices on a circle, the first one at angle zero.
    pub fn ngon(center: impl Into<Point>, radius: f64, n: usize) -> HandanimResult<Self> {
        let c = center.into();
        Self::new((0..n).map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            c + Vec2::from_angle(angle) * radius
        }))
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        write_points(h, &self.points);
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let mut sk = self.style.sketcher(ctx, seed);
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        sk.polyline(&self.points, true, &mut out);
        if let Some(fill) = &self.style.fill {
            sk.fill(std::slice::from_ref(&self.points), fill, &mut out);
        }
        out
    }
}

/// Axis-aligned ellipse given by center and full width and height.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
}

impl Ellipse {
    pub fn new(center: impl Into<Point>, width: f64, height: f64) -> Self {
        Self {
            center: center.into(),
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    pub fn circle(center: impl Into<Point>, radius: f64) -> Self {
        Self::new(center, 2.0 * radius, 2.0 * radius)
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_point(self.center);
        h.write_f64(self.width);
        h.write_f64(self.height);
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let mut sk = self.style.sketcher(ctx, seed);
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        let outline = sk.ellipse(self.center, self.width / 2.0, self.height / 2.0, &mut out);
        if let Some(fill) = &self.style.fill {
            sk.fill(&[outline], fill, &mut out);
        }
        out
    }
}

/// Smooth curve passing through its control points.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Curve {
    pub fn new(points: impl IntoIterator<Item = Point>) -> HandanimResult<Self> {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 2 {
            return Err(HandanimError::validation("curve needs at least two points"));
        }
        Ok(Self {
            points,
            style: ShapeStyle::default(),
        })
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        write_points(h, &self.points);
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        self.style.sketcher(ctx, seed).curve(&self.points, &mut out);
        out
    }
}

/// Arrow head shapes: `->`, `->>` and `-|>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowHead {
    /// `->`
    #[default]
    Open,
    /// `->>`
    Double,
    /// `-|>`
    Barbed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    pub start: Point,
    pub end: Point,
    pub head: ArrowHead,
    pub head_size: f64,
    /// Half-angle of the head in degrees.
    pub head_angle: f64,
    pub style: ShapeStyle,
}

impl Arrow {
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            head: ArrowHead::Open,
            head_size: 10.0,
            head_angle: 45.0,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_head(mut self, head: ArrowHead, size: f64, angle_deg: f64) -> Self {
        self.head = head;
        self.head_size = size;
        self.head_angle = angle_deg;
        self
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_point(self.start);
        h.write_point(self.end);
        h.write_u8(self.head as u8);
        h.write_f64(self.head_size);
        h.write_f64(self.head_angle);
        self.style.hash_into(h);
    }

    /// Drawn along the positive x axis, then rotated and moved onto `start`.
    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let d = self.end - self.start;
        let len = d.hypot();
        let (sin, cos) = self.head_angle.to_radians().sin_cos();
        let s = self.head_size;
        let back = len - cos * s;

        let mut sk = self.style.sketcher(ctx, seed);
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        sk.line(Point::ORIGIN, Point::new(len, 0.0), &mut out);
        let head = [
            Point::new(back, -sin * s),
            Point::new(len, 0.0),
            Point::new(back, sin * s),
        ];
        sk.polyline(&head, false, &mut out);
        match self.head {
            ArrowHead::Open => {}
            ArrowHead::Double => {
                let shift = s / 2.0;
                let second = head.map(|p| p - Vec2::new(shift, 0.0));
                sk.polyline(&second, false, &mut out);
            }
            ArrowHead::Barbed => {
                let barb = [
                    Point::new(back, -sin * s),
                    Point::new(len - s / 2.0, 0.0),
                    Point::new(back, sin * s),
                ];
                sk.polyline(&barb, false, &mut out);
            }
        }
        let place = Affine::translate(self.start.to_vec2()) * Affine::rotate(d.atan2());
        out.transform(place)
    }
}

/// Outline given by SVG path data (`d` attributes), drawn at `position`.
///
/// Several paths draw one after another under the same style.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgPath {
    data: Vec<String>,
    paths: Vec<BezPath>,
    pub position: Point,
    pub style: ShapeStyle,
}

impl SvgPath {
    pub fn new(d: &str) -> HandanimResult<Self> {
        Self::from_paths([d])
    }

    pub fn from_paths<'a>(data: impl IntoIterator<Item = &'a str>) -> HandanimResult<Self> {
        let data: Vec<String> = data.into_iter().map(|d| d.trim().to_owned()).collect();
        if data.is_empty() {
            return Err(HandanimError::validation("svg drawable needs at least one path"));
        }
        let paths = data
            .iter()
            .map(|d| parse_svg_path(d))
            .collect::<HandanimResult<Vec<_>>>()?;
        Ok(Self {
            data,
            paths,
            position: Point::ORIGIN,
            style: ShapeStyle::default(),
        })
    }

    pub fn at(mut self, position: impl Into<Point>) -> Self {
        self.position = position.into();
        self
    }

    /// Path data as given, trimmed.
    pub fn data(&self) -> &[String] {
        &self.data
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_usize(self.data.len());
        for d in &self.data {
            h.write_str(d);
        }
        h.write_point(self.position);
        self.style.hash_into(h);
    }

    fn placed(&self) -> Vec<BezPath> {
        let shift = Affine::translate(self.position.to_vec2());
        self.paths
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.apply_affine(shift);
                p
            })
            .collect()
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> OpSequence {
        let placed = self.placed();
        let mut sk = self.style.sketcher(ctx, seed);
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        for path in &placed {
            sk.path(path, &mut out);
        }
        if let Some(fill) = &self.style.fill {
            let outlines: Vec<Vec<Point>> = placed.iter().flat_map(flattened).collect();
            sk.fill(&outlines, fill, &mut out);
        }
        out
    }
}

fn parse_svg_path(d: &str) -> HandanimResult<BezPath> {
    if d.is_empty() {
        return Err(HandanimError::validation("svg path data must be non-empty"));
    }
    BezPath::from_svg(d).map_err(|e| HandanimError::validation(format!("invalid svg path: {e}")))
}

/// Subpaths of `path` as polylines, for fills.
fn flattened(path: &BezPath) -> Vec<Vec<Point>> {
    let mut out: Vec<Vec<Point>> = Vec::new();
    kurbo::flatten(path, 0.25, |el| match el {
        kurbo::PathEl::MoveTo(p) => out.push(vec![p]),
        kurbo::PathEl::LineTo(p) => {
            if let Some(last) = out.last_mut() {
                last.push(p);
            }
        }
        _ => {}
    });
    out
}

/// Zigzag stroke sweeping over the drawables it erases.
#[derive(Clone, Debug, PartialEq)]
pub struct Eraser {
    pub targets: Vec<Drawable>,
    pub style: ShapeStyle,
}

impl Eraser {
    pub fn new(targets: impl IntoIterator<Item = Drawable>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            style: ShapeStyle {
                stroke: StrokeStyle {
                    color: Rgb::WHITE,
                    width: 8.0,
                    opacity: 1.0,
                },
                fill: None,
                sketch: SketchStyle::clean(),
            },
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_usize(self.targets.len());
        for t in &self.targets {
            h.write_u128(t.id().as_u128());
        }
        self.style.hash_into(h);
    }

    pub(crate) fn draw(&self, ctx: &StyleContext, seed: u64) -> HandanimResult<OpSequence> {
        let mut bbox: Option<Rect> = None;
        for t in &self.targets {
            if let Some(r) = t.bounding_box(ctx)? {
                bbox = Some(bbox.map_or(r, |b| b.union(r)));
            }
        }
        let mut out = OpSequence::from_ops(vec![Op::SetPen(self.style.stroke.pen())]);
        let Some(r) = bbox else {
            return Ok(out);
        };
        let spacing = (self.style.stroke.width * 10.0).max(1.0);
        let mut zigzag = vec![Point::new(r.x0, r.y0)];
        let mut y = r.y0;
        while y <= r.y1 {
            zigzag.push(Point::new(r.x1, y));
            y += spacing;
            if y <= r.y1 {
                zigzag.push(Point::new(r.x0, y));
            }
        }
        self.style
            .sketcher(ctx, seed)
            .polyline(&zigzag, false, &mut out);
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/shapes.rs"]
mod tests;
