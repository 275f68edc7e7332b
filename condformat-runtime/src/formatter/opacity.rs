/// Lower opacity bound for comparators with two finite cutoffs.
pub const MIN_OPACITY_BOUNDED: f64 = 0.3;
/// Lower opacity bound for the open-ended comparators (`None`, `≠`).
pub const MIN_OPACITY_UNBOUNDED: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

/// Round `value` to `precision` decimal digits, half-up, operating on the
/// decimal representation rather than the binary float. `0.125` rounds to
/// `0.13`, where a multiply-round-divide on the float representation would
/// produce `0.12`.
pub fn round_half_up(value: f64, precision: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let rounded = (shift_decimal(value, precision) + 0.5).floor();
    shift_decimal(rounded, -precision)
}

// Decimal point shift through the scientific-notation string, so the shift
// itself introduces no binary rounding error.
fn shift_decimal(value: f64, by: i32) -> f64 {
    let notation = format!("{value:e}");
    let (mantissa, exponent) = notation.split_once('e').unwrap_or((notation.as_str(), "0"));
    let exponent = exponent.parse::<i32>().unwrap_or(0) + by;
    format!("{mantissa}e{exponent}").parse().unwrap_or(value)
}

/// Position of `value` within `[min_value, max_value]` as a [0, 1] opacity,
/// rounded to two decimals. A zero-width range yields full opacity. Total
/// over all inputs, including `min_value > max_value`.
pub fn compute_opacity(min_value: f64, max_value: f64, value: f64) -> f64 {
    if max_value - min_value == 0.0 {
        return MAX_OPACITY;
    }
    round_half_up(
        ((value - min_value) / (max_value - min_value)).clamp(0.0, 1.0),
        2,
    )
}
