#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Derive an independent stream seed from a base seed and a list of salts.
pub(crate) fn mix_seed(base: u64, salts: &[u64]) -> u64 {
    let mut h = Fnv1a64::new(base ^ Fnv1a64::OFFSET_BASIS);
    for &s in salts {
        h.write_u64(s);
    }
    h.finish()
}

/// SplitMix64 generator. Small, seedable and stable across platforms.
#[derive(Clone, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
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

    pub(crate) fn next_f32_01(&mut self) -> f32 {
        // 24 bits of precision.
        let v = self.next_u64() >> 40;
        (v as f32) * (1.0 / ((1u32 << 24) as f32))
    }

    /// Uniform index in `0..n`; `n` must be non-zero.
    pub(crate) fn next_index(&mut self, n: usize) -> usize {
        ((self.next_f64_01() * n as f64) as usize).min(n - 1)
    }
}

/// Hash a lattice point to `[0, 1)`.
pub(crate) fn hash01(seed: u64, x: i64, y: i64) -> f64 {
    let mut rng = Rng64::new(
        seed ^ (x as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93)
            ^ (y as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
    );
    rng.next_f64_01()
}

/// Smooth 2-D value noise in `[-1, 1]`, bilinear with smoothstep fade.
pub(crate) fn value_noise_2d(seed: u64, x: f64, y: f64) -> f64 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as i64, y0 as i64);
    let fade = |t: f64| t * t * (3.0 - 2.0 * t);
    let (u, v) = (fade(fx), fade(fy));
    let a = hash01(seed, ix, iy);
    let b = hash01(seed, ix + 1, iy);
    let c = hash01(seed, ix, iy + 1);
    let d = hash01(seed, ix + 1, iy + 1);
    let top = a + (b - a) * u;
    let bottom = c + (d - c) * u;
    (top + (bottom - top) * v) * 2.0 - 1.0
}

/// Rec. 601 luma of an sRGB triple, in `[0, 255]`.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Round and clamp a channel value, mapping NaN to 0.
pub(crate) fn clamp_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Replace a zero or non-finite denominator with 1.
pub(crate) fn safe_denom(d: f32) -> f32 {
    if d == 0.0 || !d.is_finite() { 1.0 } else { d }
}

/// Clamp a float parameter into `[min, max]`, replacing NaN with `fallback`.
pub(crate) fn clamp_param(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_nan() {
        return fallback;
    }
    v.clamp(min, max)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
