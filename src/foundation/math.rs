/// Move `start` toward `end` by `factor` of the remaining distance.
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor
}

/// Position of `v` inside `[start, end]` as a fraction, clamped to `[0, 1]`.
///
/// A degenerate range (`end <= start`) maps everything at or past `end` to 1.
pub fn unlerp_clamped(start: f64, end: f64, v: f64) -> f64 {
    if end <= start {
        return if v >= end { 1.0 } else { 0.0 };
    }
    ((v - start) / (end - start)).clamp(0.0, 1.0)
}

pub(crate) fn mix_u8(a: u8, b: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn mix_rgba8(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    [
        mix_u8(a[0], b[0], t),
        mix_u8(a[1], b[1], t),
        mix_u8(a[2], b[2], t),
        mix_u8(a[3], b[3], t),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
