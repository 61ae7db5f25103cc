use crate::{
    foundation::core::Rgb,
    foundation::math::StableHasher,
    ops::op::{Pen, PenMode},
};

/// Outline pen of a drawable.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub width: f64,
    pub opacity: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            width: 1.0,
            opacity: 1.0,
        }
    }
}

impl StrokeStyle {
    pub fn pen(&self) -> Pen {
        Pen {
            mode: PenMode::Stroke,
            color: self.color,
            width: self.width,
            opacity: self.opacity,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        write_rgb(h, self.color);
        h.write_f64(self.width);
        h.write_f64(self.opacity);
    }
}

/// How a closed shape is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPattern {
    /// One filled area.
    Solid,
    /// Parallel hand-drawn strokes.
    #[default]
    Hachure,
    /// Two perpendicular hachure passes.
    Hatch,
}

/// Interior fill of a closed drawable.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FillStyle {
    pub color: Rgb,
    pub opacity: f64,
    pub pattern: FillPattern,
    /// Hachure direction in degrees.
    pub hachure_angle: f64,
    /// Distance between hachure strokes.
    pub hachure_gap: f64,
    pub hachure_line_width: f64,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            opacity: 1.0,
            pattern: FillPattern::Hachure,
            hachure_angle: 45.0,
            hachure_gap: 4.0,
            hachure_line_width: 1.0,
        }
    }
}

impl FillStyle {
    pub fn solid(color: Rgb) -> Self {
        Self {
            color,
            pattern: FillPattern::Solid,
            ..Self::default()
        }
    }

    pub fn pen(&self) -> Pen {
        match self.pattern {
            FillPattern::Solid => Pen {
                mode: PenMode::Fill,
                color: self.color,
                width: 0.0,
                opacity: self.opacity,
            },
            FillPattern::Hachure | FillPattern::Hatch => Pen {
                mode: PenMode::Stroke,
                color: self.color,
                width: self.hachure_line_width,
                opacity: self.opacity,
            },
        }
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        write_rgb(h, self.color);
        h.write_f64(self.opacity);
        h.write_u8(match self.pattern {
            FillPattern::Solid => 0,
            FillPattern::Hachure => 1,
            FillPattern::Hatch => 2,
        });
        h.write_f64(self.hachure_angle);
        h.write_f64(self.hachure_gap);
        h.write_f64(self.hachure_line_width);
    }
}

/// Parameters of the hand-drawn look.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SketchStyle {
    /// How far straight strokes bend away from the chord.
    pub bowing: f64,
    /// Upper bound of the endpoint jitter.
    pub max_random_offset: f64,
    /// Jitter multiplier. Zero draws exact geometry.
    pub roughness: f64,
    /// Catmull-Rom tightness for curves, `0` is the plain spline.
    pub curve_tightness: f64,
    /// How closely sketched ellipses follow their nominal radii, in `[0, 1]`.
    pub curve_fitting: f64,
    /// Base number of samples per sketched ellipse.
    pub curve_step_count: u32,
    /// Draw every stroke only once.
    pub disable_multi_stroke: bool,
}

impl Default for SketchStyle {
    fn default() -> Self {
        Self {
            bowing: 1.0,
            max_random_offset: 2.0,
            roughness: 1.0,
            curve_tightness: 0.0,
            curve_fitting: 0.95,
            curve_step_count: 9,
            disable_multi_stroke: false,
        }
    }
}

impl SketchStyle {
    /// Style producing exact, jitter-free geometry.
    pub fn clean() -> Self {
        Self {
            bowing: 0.0,
            roughness: 0.0,
            disable_multi_stroke: true,
            ..Self::default()
        }
    }

    pub fn is_rough(&self) -> bool {
        self.roughness > 0.0
    }

    pub(crate) fn hash_into(&self, h: &mut StableHasher) {
        h.write_f64(self.bowing);
        h.write_f64(self.max_random_offset);
        h.write_f64(self.roughness);
        h.write_f64(self.curve_tightness);
        h.write_f64(self.curve_fitting);
        h.write_u64(u64::from(self.curve_step_count));
        h.write_bool(self.disable_multi_stroke);
    }
}

/// Per-draw context shared by every drawable in a scene.
///
/// Two draws of the same drawable under equal contexts yield identical sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleContext {
    /// Base seed of the hand-drawn jitter.
    pub seed: u64,
    /// When false every drawable is drawn with clean geometry.
    pub sketchy: bool,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            sketchy: true,
        }
    }
}

impl StyleContext {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Context drawing exact geometry.
    pub fn clean() -> Self {
        Self {
            sketchy: false,
            ..Self::default()
        }
    }

    /// Cache key component for this context.
    pub fn fingerprint(&self) -> u64 {
        let mut h = StableHasher::new();
        h.write_u64(self.seed);
        h.write_bool(self.sketchy);
        h.finish() as u64
    }
}

fn write_rgb(h: &mut StableHasher, c: Rgb) {
    h.write_f64(c.r);
    h.write_f64(c.g);
    h.write_f64(c.b);
}
