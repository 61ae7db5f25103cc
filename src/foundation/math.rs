use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Affine, Point, Vec2};

const XXH3_SEED: u64 = 0x68a4_d1c3_5b2e_9f07;

/// Deterministic SplitMix64 generator used for hand-drawn jitter.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    pub(crate) fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }

    /// Uniform offset in `[-amp, amp]` on both axes.
    pub(crate) fn jitter(&mut self, amp: f64) -> Vec2 {
        Vec2::new(self.uniform(-amp, amp), self.uniform(-amp, amp))
    }
}

/// Stable 128-bit hasher for identity keys and cache fingerprints.
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` are distinct keys.
pub(crate) struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    pub(crate) fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    pub(crate) fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_u128(&mut self, v: u128) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_usize(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.write_usize(s.len());
        self.write_bytes(s.as_bytes());
    }

    pub(crate) fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    pub(crate) fn write_vec2(&mut self, v: Vec2) {
        self.write_f64(v.x);
        self.write_f64(v.y);
    }

    pub(crate) fn write_affine(&mut self, a: Affine) {
        for c in a.as_coeffs() {
            self.write_f64(c);
        }
    }

    pub(crate) fn finish(self) -> u128 {
        self.inner.digest128()
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Coefficient-wise interpolation between two affines.
pub(crate) fn lerp_affine(a: Affine, b: Affine, t: f64) -> Affine {
    let ca = a.as_coeffs();
    let cb = b.as_coeffs();
    let mut out = [0.0; 6];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = lerp(ca[i], cb[i], t);
    }
    Affine::new(out)
}

/// `affine` applied about `anchor` instead of the origin.
pub(crate) fn anchored(affine: Affine, anchor: Point) -> Affine {
    let v = anchor.to_vec2();
    Affine::translate(v) * affine * Affine::translate(-v)
}

pub(crate) fn approx_point(a: Point, b: Point, eps: f64) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}
