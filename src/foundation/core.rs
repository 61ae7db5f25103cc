use crate::foundation::error::{HandanimError, HandanimResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> HandanimResult<Self> {
        if den == 0 {
            return Err(HandanimError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(HandanimError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Closed time interval `[start, end]` in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> HandanimResult<Self> {
        let out = Self { start, end };
        out.validate()?;
        Ok(out)
    }

    /// Instantaneous interval at `at`.
    pub fn instant(at: f64) -> HandanimResult<Self> {
        Self::new(at, at)
    }

    pub fn validate(&self) -> HandanimResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() || self.end < self.start {
            return Err(HandanimError::InvalidInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_instant(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Normalized position of `t` inside the interval, clamped to `[0, 1]`.
    ///
    /// Instantaneous intervals jump from 0 to 1 at `start`.
    pub fn progress(&self, t: f64) -> f64 {
        if self.is_instant() {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        ((t - self.start) / self.duration()).clamp(0.0, 1.0)
    }
}

/// Straight RGB color with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}
