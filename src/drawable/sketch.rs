use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::{CubicBez, PathEl, QuadBez};

use crate::{
    foundation::core::{Affine, BezPath, Point, Vec2},
    foundation::math::Rng64,
    ops::op::Op,
    ops::sequence::OpSequence,
    style::{FillPattern, FillStyle, SketchStyle},
};

/// Stroke generator for one drawable.
///
/// With a rough style every stroke is a bowed, jittered cubic drawn twice; otherwise the
/// exact geometry is emitted.
pub(crate) struct Sketcher {
    rng: Rng64,
    style: SketchStyle,
    rough: bool,
}

impl Sketcher {
    pub(crate) fn new(seed: u64, style: SketchStyle, sketchy: bool) -> Self {
        Self {
            rng: Rng64::new(seed),
            style,
            rough: sketchy && style.is_rough(),
        }
    }

    fn multi_stroke(&self) -> bool {
        self.rough && !self.style.disable_multi_stroke
    }

    /// Straight stroke from `a` to `b`.
    pub(crate) fn line(&mut self, a: Point, b: Point, out: &mut OpSequence) {
        if !self.rough {
            out.push(Op::MoveTo(a));
            out.push(Op::LineTo(b));
            return;
        }
        self.rough_stroke(a, b, false, out);
        if self.multi_stroke() {
            self.rough_stroke(a, b, true, out);
        }
    }

    fn rough_stroke(&mut self, a: Point, b: Point, overlay: bool, out: &mut OpSequence) {
        let d = b - a;
        let len = d.hypot();
        let gain = (-0.0016668 * len + 1.233334).clamp(0.4, 1.0);
        let offset = (len / 10.0).min(self.style.max_random_offset);
        let diverge = self.rng.uniform(0.2, 0.4);
        let bow = d * (self.style.bowing * offset / 200.0);
        let normal = Vec2::new(bow.y, bow.x);
        let amp = offset * gain * self.style.roughness * if overlay { 0.5 } else { 1.0 };

        out.push(Op::MoveTo(a + self.rng.jitter(amp)));
        let c1 = a + normal + d * diverge + self.rng.jitter(amp);
        let c2 = a + normal + d * (2.0 * diverge) + self.rng.jitter(amp);
        let to = b + self.rng.jitter(amp);
        out.push(Op::CurveTo { c1, c2, to });
    }

    /// Open or closed polyline, one stroke per edge.
    pub(crate) fn polyline(&mut self, points: &[Point], close: bool, out: &mut OpSequence) {
        if !self.rough {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            out.push(Op::MoveTo(*first));
            for p in rest {
                out.push(Op::LineTo(*p));
            }
            if close && points.len() > 2 {
                out.push(Op::ClosePath);
            }
            return;
        }
        for w in points.windows(2) {
            self.line(w[0], w[1], out);
        }
        if close && points.len() > 2 {
            if let (Some(last), Some(first)) = (points.last(), points.first()) {
                self.line(*last, *first, out);
            }
        }
    }

    /// Smooth curve through `points`.
    pub(crate) fn curve(&mut self, points: &[Point], out: &mut OpSequence) {
        match points {
            [] | [_] => {}
            [a, b] => self.line(*a, *b, out),
            _ if !self.rough => catmull_rom(&padded(points), self.style.curve_tightness, out),
            _ => {
                let first = 1.0 + self.style.roughness * 0.2;
                let pts = self.jittered_padded(points, first);
                catmull_rom(&pts, self.style.curve_tightness, out);
                if self.multi_stroke() {
                    let second = 1.5 * (1.0 + self.style.roughness * 0.22);
                    let pts = self.jittered_padded(points, second);
                    catmull_rom(&pts, self.style.curve_tightness, out);
                }
            }
        }
    }

    fn jittered_padded(&mut self, points: &[Point], offset: f64) -> Vec<Point> {
        let amp = offset * self.style.roughness;
        padded(points)
            .into_iter()
            .map(|p| p + self.rng.jitter(amp))
            .collect()
    }

    /// Full ellipse with radii `rx`, `ry`.
    ///
    /// Returns the sampled outline, used as the fill polygon.
    pub(crate) fn ellipse(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        out: &mut OpSequence,
    ) -> Vec<Point> {
        let perimeter = (TAU * rx.hypot(ry)).sqrt();
        let steps = (f64::from(self.style.curve_step_count) * (perimeter / 200f64.sqrt()).max(1.0))
            .ceil()
            .max(4.0);
        let increment = TAU / steps;
        if !self.rough {
            out.push(Op::Ellipse {
                center,
                radii: Vec2::new(rx, ry),
                x_rotation: 0.0,
                start_angle: 0.0,
                sweep_angle: TAU,
            });
            let n = (steps as usize) * 4;
            return (0..n)
                .map(|i| ellipse_at(center, Vec2::new(rx, ry), TAU * i as f64 / n as f64))
                .collect();
        }

        let fit = (1.0 - self.style.curve_fitting) * self.style.roughness;
        let rad = Vec2::new(
            rx + self.rng.uniform(-1.0, 1.0) * rx * fit,
            ry + self.rng.uniform(-1.0, 1.0) * ry * fit,
        );
        let spread = self.rng.uniform(0.4, 1.0);
        let overlap = increment + self.rng.uniform(0.1, spread) * self.style.roughness;
        let (core, pass1) = self.ellipse_points(center, rad, increment, 1.0, overlap);
        catmull_rom(&pass1, self.style.curve_tightness, out);
        if self.multi_stroke() {
            let (_, pass2) = self.ellipse_points(center, rad, increment, 1.5, 0.0);
            catmull_rom(&pass2, self.style.curve_tightness, out);
        }
        core
    }

    /// Samples around a rough ellipse, with one leading and three overlapping trailing points.
    fn ellipse_points(
        &mut self,
        center: Point,
        rad: Vec2,
        increment: f64,
        offset: f64,
        overlap: f64,
    ) -> (Vec<Point>, Vec<Point>) {
        let amp = offset * self.style.roughness;
        let start = self.rng.uniform(-1.0, 1.0) * self.style.roughness - FRAC_PI_2;
        let mut all = vec![ellipse_at(center, rad * 0.9, start - increment) + self.rng.jitter(amp)];
        let mut core = Vec::new();
        let end = TAU + start - 0.01;
        let mut a = start;
        while a < end + increment {
            let p = ellipse_at(center, rad, a) + self.rng.jitter(amp);
            core.push(p);
            all.push(p);
            a += increment;
        }
        all.push(ellipse_at(center, rad, start + TAU + overlap * 0.5) + self.rng.jitter(amp));
        all.push(ellipse_at(center, rad * 0.98, start + overlap) + self.rng.jitter(amp));
        all.push(ellipse_at(center, rad * 0.9, start + overlap * 0.5) + self.rng.jitter(amp));
        (core, all)
    }

    /// Stroke every subpath of `path`; quadratic segments are raised to cubics.
    pub(crate) fn path(&mut self, path: &BezPath, out: &mut OpSequence) {
        let mut start = Point::ORIGIN;
        let mut cur = Point::ORIGIN;
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if !self.rough {
                        out.push(Op::MoveTo(p));
                    }
                    start = p;
                    cur = p;
                }
                PathEl::LineTo(p) => {
                    if self.rough {
                        self.line(cur, p, out);
                    } else {
                        out.push(Op::LineTo(p));
                    }
                    cur = p;
                }
                PathEl::QuadTo(c, p) => {
                    self.bezier(QuadBez::new(cur, c, p).raise(), out);
                    cur = p;
                }
                PathEl::CurveTo(c1, c2, p) => {
                    self.bezier(CubicBez::new(cur, c1, c2, p), out);
                    cur = p;
                }
                PathEl::ClosePath => {
                    if !self.rough {
                        out.push(Op::ClosePath);
                    } else if cur != start {
                        self.line(cur, start, out);
                    }
                    cur = start;
                }
            }
        }
    }

    fn bezier(&mut self, c: CubicBez, out: &mut OpSequence) {
        if !self.rough {
            out.push(Op::CurveTo {
                c1: c.p1,
                c2: c.p2,
                to: c.p3,
            });
            return;
        }
        self.rough_bezier(c, false, out);
        if self.multi_stroke() {
            self.rough_bezier(c, true, out);
        }
    }

    fn rough_bezier(&mut self, c: CubicBez, overlay: bool, out: &mut OpSequence) {
        let offset = (c.p0.distance(c.p3) / 10.0).min(self.style.max_random_offset);
        let amp = offset * self.style.roughness * if overlay { 0.5 } else { 1.0 };
        out.push(Op::MoveTo(c.p0 + self.rng.jitter(amp)));
        let c1 = c.p1 + self.rng.jitter(amp);
        let c2 = c.p2 + self.rng.jitter(amp);
        let to = c.p3 + self.rng.jitter(amp);
        out.push(Op::CurveTo { c1, c2, to });
    }

    /// Interior fill of the given closed polygons.
    pub(crate) fn fill(
        &mut self,
        polygons: &[Vec<Point>],
        fill: &FillStyle,
        out: &mut OpSequence,
    ) {
        out.push(Op::SetPen(fill.pen()));
        match fill.pattern {
            FillPattern::Solid => {
                for poly in polygons.iter().filter(|p| p.len() > 2) {
                    out.push(Op::MoveTo(poly[0]));
                    for p in &poly[1..] {
                        out.push(Op::LineTo(*p));
                    }
                    out.push(Op::ClosePath);
                }
            }
            FillPattern::Hachure => self.hachure(polygons, fill.hachure_angle, fill, out),
            FillPattern::Hatch => {
                self.hachure(polygons, fill.hachure_angle, fill, out);
                self.hachure(polygons, fill.hachure_angle + 90.0, fill, out);
            }
        }
    }

    fn hachure(
        &mut self,
        polygons: &[Vec<Point>],
        angle_deg: f64,
        fill: &FillStyle,
        out: &mut OpSequence,
    ) {
        for (a, b) in hachure_lines(polygons, angle_deg, fill.hachure_gap.max(0.1)) {
            self.line(a, b, out);
        }
    }
}

fn ellipse_at(center: Point, rad: Vec2, angle: f64) -> Point {
    let (s, c) = angle.sin_cos();
    center + Vec2::new(rad.x * c, rad.y * s)
}

/// Endpoints duplicated so every input point is passed through.
fn padded(points: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() + 2);
    if let Some(first) = points.first() {
        out.push(*first);
    }
    out.extend_from_slice(points);
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

/// Cubic Catmull-Rom run through `points[1..len-1]`; the first and last points only steer.
fn catmull_rom(points: &[Point], tightness: f64, out: &mut OpSequence) {
    if points.len() < 4 {
        if let [a, .., b] = points {
            out.push(Op::MoveTo(*a));
            out.push(Op::LineTo(*b));
        }
        return;
    }
    let s = 1.0 - tightness;
    out.push(Op::MoveTo(points[1]));
    for i in 1..points.len() - 2 {
        let c1 = points[i] + (points[i + 1] - points[i - 1]) * (s / 6.0);
        let c2 = points[i + 1] + (points[i] - points[i + 2]) * (s / 6.0);
        out.push(Op::CurveTo {
            c1,
            c2,
            to: points[i + 1],
        });
    }
}

/// Scanline segments covering the polygons, at `angle_deg`, `gap` apart (even-odd rule).
pub(crate) fn hachure_lines(
    polygons: &[Vec<Point>],
    angle_deg: f64,
    gap: f64,
) -> Vec<(Point, Point)> {
    let to_scan = Affine::rotate(-angle_deg.to_radians());
    let back = to_scan.inverse();
    let mut edges = Vec::new();
    let (mut ymin, mut ymax) = (f64::INFINITY, f64::NEG_INFINITY);
    for poly in polygons.iter().filter(|p| p.len() > 2) {
        let pts: Vec<Point> = poly.iter().map(|p| to_scan * *p).collect();
        for (i, a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            ymin = ymin.min(a.y);
            ymax = ymax.max(a.y);
            if a.y != b.y {
                edges.push((*a, b));
            }
        }
    }
    let mut lines = Vec::new();
    if edges.is_empty() {
        return lines;
    }
    let mut y = ymin + gap * 0.5;
    let mut xs = Vec::new();
    while y < ymax {
        xs.clear();
        for (a, b) in &edges {
            let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
            if lo.y <= y && y < hi.y {
                xs.push(lo.x + (y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y));
            }
        }
        xs.sort_by(f64::total_cmp);
        for pair in xs.chunks_exact(2) {
            lines.push((back * Point::new(pair[0], y), back * Point::new(pair[1], y)));
        }
        y += gap;
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/sketch.rs"]
mod tests;
