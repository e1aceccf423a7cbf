/// Generate a random `f64` in the range `[low, high]`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    lerp(low, high, rng.f64())
}

/// The point a fraction `t` of the way from `low` to `high`.
///
/// Never forms `high - low`, which overflows for bounds near `f64::MAX`.
/// The result is kept inside `[low, high]` despite rounding.
#[inline]
#[allow(clippy::manual_clamp)]
pub(crate) fn lerp(low: f64, high: f64, t: f64) -> f64 {
    low.mul_add(1.0 - t, high * t).max(low).min(high)
}

/// Draw from the standard normal distribution (Box-Muller).
#[inline]
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // 1 - u keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos()
}

/// Pick an index in `0..weights.len()` with probability proportional to its weight.
///
/// Falls back to the last index if rounding leaves the cumulative sum short.
pub(crate) fn weighted_index(rng: &mut fastrand::Rng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let threshold = rng.f64() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}
