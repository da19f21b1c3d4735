//! Maps `Box<dyn Error>` from the `LineSource` boundary to a typed `SampleError`.
//!
//! The trait in `restock_traits` uses `Box<dyn Error + Send + Sync>` so any
//! transport can plug in; this module converts those to our typed enum, with an
//! optional feature-gated path for `restock_hardware::HwError` downcasting.

use crate::error::SampleError;

/// Map a trait-boundary error to a typed `SampleError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> SampleError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<restock_hardware::error::HwError>() {
            return match hw {
                restock_hardware::error::HwError::Timeout => SampleError::Timeout,
                restock_hardware::error::HwError::Encoding => {
                    SampleError::Parse("<invalid utf-8>".to_string())
                }
                other => SampleError::Hardware(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        SampleError::Timeout
    } else {
        SampleError::Hardware(s)
    }
}
