//! Noise rejection for raw scale lines.
//!
//! Pure functions only; the sampling loops in `sampler` feed them.

use crate::error::SampleError;
use crate::util::round2;

/// Open interval `(min_g, max_g)` of physically plausible readings.
///
/// Values at or below `min_g` are electrical noise or an empty plate; values
/// at or above `max_g` are a saturated or faulty load cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBand {
    pub min_g: f64,
    pub max_g: f64,
}

impl Default for NoiseBand {
    fn default() -> Self {
        Self {
            min_g: 10.0,
            max_g: 3000.0,
        }
    }
}

impl NoiseBand {
    pub fn new(min_g: f64, max_g: f64) -> Self {
        Self { min_g, max_g }
    }

    #[inline]
    pub fn contains(&self, grams: f64) -> bool {
        self.min_g < grams && grams < self.max_g
    }

    pub fn check(&self, grams: f64) -> Result<f64, SampleError> {
        if self.contains(grams) {
            Ok(grams)
        } else {
            Err(SampleError::NoiseRejected(grams))
        }
    }
}

/// Parse one line of scale output as grams.
pub fn parse_reading(line: &str) -> Result<f64, SampleError> {
    let t = line.trim();
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SampleError::Parse(t.to_string())),
    }
}

/// Accept only strictly positive readings (registration path).
pub fn require_positive(grams: f64) -> Result<f64, SampleError> {
    if grams > 0.0 {
        Ok(grams)
    } else {
        Err(SampleError::NonPositive(grams))
    }
}

/// Mean of the accepted attempts rounded to 0.01 g, or `None` if nothing was accepted.
pub fn settle<I>(attempts: I) -> Option<f64>
where
    I: IntoIterator<Item = Result<f64, SampleError>>,
{
    let (sum, n) = attempts
        .into_iter()
        .filter_map(Result::ok)
        .fold((0.0f64, 0u32), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(round2(sum / f64::from(n)))
    }
}
