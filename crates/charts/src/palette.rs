//! Ordered colour ramps for intensity-coded charts.

use campaign_core::config::ColorScheme;

const BLUE: [&str; 6] = ["#E0F2FE", "#BAE6FD", "#7DD3FC", "#38BDF8", "#0EA5E9", "#0284C7"];
const GREEN: [&str; 6] = ["#DCFCE7", "#BBF7D0", "#86EFAC", "#4ADE80", "#22C55E", "#16A34A"];
const RED: [&str; 6] = ["#FEE2E2", "#FECACA", "#FCA5A5", "#F87171", "#EF4444", "#DC2626"];
const PURPLE: [&str; 6] = ["#F3E8FF", "#E9D5FF", "#C4B5FD", "#A78BFA", "#8B5CF6", "#7C3AED"];

/// Lightest to darkest.
pub fn ramp(scheme: ColorScheme) -> &'static [&'static str] {
    match scheme {
        ColorScheme::Blue => &BLUE,
        ColorScheme::Green => &GREEN,
        ColorScheme::Red => &RED,
        ColorScheme::Purple => &PURPLE,
    }
}

/// Maps a 0..=1 intensity to `floor(intensity * (len - 1))`, clamped to the ramp.
pub fn ramp_index(intensity: f64, ramp_len: usize) -> usize {
    if ramp_len == 0 {
        return 0;
    }
    let last = ramp_len - 1;
    let scaled = (intensity * last as f64).floor();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(last)
    }
}
