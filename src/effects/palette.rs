use crate::foundation::core::Rgb;

/// Color distance used by nearest-color search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared Euclidean distance in RGB.
    #[default]
    Euclidean,
    /// Sum of absolute channel differences.
    Manhattan,
    /// Redmean-weighted Euclidean distance, closer to perceived difference.
    Redmean,
}

impl DistanceMetric {
    /// Map the numeric slider value `0..=2` to a metric, clamping out-of-range input.
    pub fn from_index(i: f32) -> Self {
        match i.round() as i64 {
            i64::MIN..=0 => Self::Euclidean,
            1 => Self::Manhattan,
            _ => Self::Redmean,
        }
    }

    /// Inverse of [`DistanceMetric::from_index`].
    pub fn index(self) -> f32 {
        match self {
            Self::Euclidean => 0.0,
            Self::Manhattan => 1.0,
            Self::Redmean => 2.0,
        }
    }

    /// Distance between a (possibly out-of-gamut) color and a palette entry. Only ordering
    /// matters, so the Euclidean forms skip the square root.
    pub fn distance(self, c: [f32; 3], p: Rgb) -> f32 {
        let dr = c[0] - f32::from(p.r);
        let dg = c[1] - f32::from(p.g);
        let db = c[2] - f32::from(p.b);
        match self {
            Self::Euclidean => dr * dr + dg * dg + db * db,
            Self::Manhattan => dr.abs() + dg.abs() + db.abs(),
            Self::Redmean => {
                let r_mean = (c[0] + f32::from(p.r)) / 2.0;
                (2.0 + r_mean / 256.0) * dr * dr
                    + 4.0 * dg * dg
                    + (2.0 + (255.0 - r_mean) / 256.0) * db * db
            }
        }
    }
}

/// Ordered set of at least two colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Largest palette the generator produces.
    pub const MAX_COLORS: u32 = 256;

    /// Deterministic palette of `count` colors.
    ///
    /// `count <= 2` gives exactly `[bg, fg]`. Larger counts subdivide the RGB cube into
    /// `ceil(cbrt(count))` levels per channel and keep the first `count` entries in r, g, b
    /// nested order.
    pub fn generate(count: u32, bg: Rgb, fg: Rgb) -> Self {
        let count = count.clamp(2, Self::MAX_COLORS);
        if count == 2 {
            return Self {
                colors: vec![bg, fg],
            };
        }
        let steps = cube_steps(count);
        let level = |i: u32| -> u8 { ((i * 255) as f32 / (steps - 1) as f32).round() as u8 };
        let mut colors = Vec::with_capacity(count as usize);
        'outer: for r in 0..steps {
            for g in 0..steps {
                for b in 0..steps {
                    if colors.len() == count as usize {
                        break 'outer;
                    }
                    colors.push(Rgb::new(level(r), level(g), level(b)));
                }
            }
        }
        Self { colors }
    }

    /// Build from explicit colors; `None` when fewer than two are given.
    pub fn from_colors(colors: Vec<Rgb>) -> Option<Self> {
        (colors.len() >= 2).then_some(Self { colors })
    }

    /// Entries in order.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette holds at least two colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Return `true` if `c` is one of the entries.
    pub fn contains(&self, c: Rgb) -> bool {
        self.colors.contains(&c)
    }

    /// Linear scan for the closest entry; ties resolve to the earliest.
    pub fn nearest(&self, c: [f32; 3], metric: DistanceMetric) -> Rgb {
        let mut best = self.colors[0];
        let mut best_d = f32::INFINITY;
        for &p in &self.colors {
            let d = metric.distance(c, p);
            if d < best_d {
                best_d = d;
                best = p;
            }
        }
        best
    }
}

/// Levels per channel for a cube palette of `count` colors.
pub(crate) fn cube_steps(count: u32) -> u32 {
    let mut steps = (count as f64).cbrt().ceil() as u32;
    // Guard against cbrt rounding just below an exact cube.
    while steps.pow(3) < count {
        steps += 1;
    }
    while steps > 1 && (steps - 1).pow(3) >= count {
        steps -= 1;
    }
    steps.max(2)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/palette.rs"]
mod tests;
