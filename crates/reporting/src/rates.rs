//! Safe-division helpers for percentage and ratio metrics.

use serde::{Deserialize, Serialize};

/// `(numerator / denominator) * 100`, or 0.0 when the denominator is not positive.
pub fn safe_divide_as_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator) * 100.0
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0.0 when the denominator is not positive.
pub fn safe_divide_as_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Derived rates attached to a bucket once its fold has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    /// clicks / impressions, as a percentage.
    pub ctr: f64,
    /// conversions / clicks, as a percentage.
    pub conversion_rate: f64,
    /// revenue / spend.
    pub roas: f64,
}

impl RateMetrics {
    pub fn compute(impressions: u64, clicks: u64, conversions: u64, spend: f64, revenue: f64) -> Self {
        Self {
            ctr: safe_divide_as_percent(clicks as f64, impressions as f64),
            conversion_rate: safe_divide_as_percent(conversions as f64, clicks as f64),
            roas: safe_divide_as_ratio(revenue, spend),
        }
    }
}
