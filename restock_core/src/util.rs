//! Rounding and time helpers shared across restock_core.

use std::time::Duration;

/// Round to two decimal places (centigram resolution), half away from zero.
/// Non-finite input is returned unchanged.
#[inline]
pub fn round2(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    (x * 100.0).round() / 100.0
}

/// Milliseconds from config into a `Duration`.
#[inline]
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
