/// Lower bound (inclusive) of each area band and its green-space rate, in ascending order.
const GREEN_RATE_BANDS: [(f64, f64); 6] = [
    (0.0, 0.0),
    (800.0, 5.0),
    (1_500.0, 10.0),
    (2_500.0, 15.0),
    (10_000.0, 17.0),
    (50_000.0, 18.0),
];

/// Public green-space deduction percentage for an area in m².
///
/// Bands are half-open on the upper bound, so `800.0` already yields 5%.
/// Anything below the first breakpoint (including negative input) maps to 0%.
pub fn green_area_rate(area: f64) -> f64 {
    GREEN_RATE_BANDS
        .iter()
        .rev()
        .find(|(lower, _)| area >= *lower)
        .map(|(_, rate)| *rate)
        .unwrap_or(0.0)
}
