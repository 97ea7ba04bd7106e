//! Scale factor limits shared by every path that applies a scale.

/// Smallest accepted adjust/font scale, in percent.
pub const SCALE_MIN: f64 = 40.0;
/// Largest accepted adjust/font scale, in percent.
pub const SCALE_MAX: f64 = 400.0;
/// Scale used when none is given or the given one is not a number.
pub const SCALE_DEFAULT: f64 = 100.0;

/// Clamp a percentage scale to `[SCALE_MIN, SCALE_MAX]`. NaN becomes the default.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return SCALE_DEFAULT;
    }
    scale.clamp(SCALE_MIN, SCALE_MAX)
}
