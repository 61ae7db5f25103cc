use crate::{
    foundation::core::{Affine, Rgb},
    foundation::error::{HandanimError, HandanimResult},
};

/// Output surface description handed to frame sinks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 608,
            background: Rgb::WHITE,
        }
    }
}

/// Maps a world coordinate window onto a canvas, keeping aspect ratio and a margin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub world_x: (f64, f64),
    pub world_y: (f64, f64),
    pub margin: f64,
}

impl Viewport {
    pub fn new(world_x: (f64, f64), world_y: (f64, f64), margin: f64) -> HandanimResult<Self> {
        let w = world_x.1 - world_x.0;
        let h = world_y.1 - world_y.0;
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(HandanimError::validation(
                "viewport world ranges must be finite and non-empty",
            ));
        }
        Ok(Self {
            world_x,
            world_y,
            margin,
        })
    }

    /// World-to-canvas transform for `canvas`.
    ///
    /// The smaller of the two axis scales is used for both axes.
    pub fn to_canvas(&self, canvas: &Canvas) -> Affine {
        let w = self.world_x.1 - self.world_x.0;
        let h = self.world_y.1 - self.world_y.0;
        let sx = (f64::from(canvas.width) - 2.0 * self.margin) / w;
        let sy = (f64::from(canvas.height) - 2.0 * self.margin) / h;
        let s = sx.min(sy);
        Affine::translate((self.margin, self.margin))
            * Affine::scale(s)
            * Affine::translate((-self.world_x.0, -self.world_y.0))
    }
}
