//! Weight acquisition from a line-oriented scale.
//!
//! Two strategies share one per-attempt primitive (flush, read a line, parse):
//! - `quick_weight`: first positive line within a time budget (registration).
//! - `stable_weight`: fixed number of paced attempts, band-filtered and averaged
//!   (monitoring).
//!
//! Neither ever fails: an absent channel or a run without usable lines comes back
//! as a `Reading` variant instead of an error.
use restock_traits::LineSource;
use restock_traits::clock::Clock;
use tracing::{debug, trace};

use crate::config::{QuickCfg, StableCfg};
use crate::error::SampleError;
use crate::filter::{parse_reading, require_positive, settle};
use crate::hw_error::map_hw_error;
use crate::types::Reading;
use crate::util::round2;

/// One attempt: drop stale buffered input, read a fresh line, parse it.
pub fn read_attempt<S>(
    source: &mut S,
    read_timeout: std::time::Duration,
) -> Result<f64, SampleError>
where
    S: LineSource + ?Sized,
{
    source
        .flush_input()
        .map_err(|e| map_hw_error(e.as_ref()))?;
    let line = source
        .read_line(read_timeout)
        .map_err(|e| map_hw_error(e.as_ref()))?;
    parse_reading(&line)
}

/// Best-effort single reading, bounded by `cfg.timeout`.
pub fn quick_weight<S, C>(source: Option<&mut S>, clock: &C, cfg: &QuickCfg) -> Reading
where
    S: LineSource + ?Sized,
    C: Clock + ?Sized,
{
    let Some(source) = source else {
        debug!("quick sample skipped: no sensor");
        return Reading::NoDevice;
    };

    let start = clock.now();
    let mut attempts: u32 = 0;
    while clock.now().saturating_duration_since(start) < cfg.timeout {
        attempts = attempts.saturating_add(1);
        match read_attempt(&mut *source, cfg.read_timeout).and_then(require_positive) {
            Ok(g) => {
                let g = round2(g);
                debug!(grams = g, attempts, "quick sample");
                return Reading::Value(g);
            }
            Err(e) => trace!(error = %e, "quick attempt dropped"),
        }
    }
    debug!(
        attempts,
        timeout_ms = cfg.timeout.as_millis() as u64,
        "quick sample found no positive reading"
    );
    Reading::NoValidReading
}

/// Averaged reading over exactly `cfg.samples` attempts, sleeping `cfg.delay`
/// after each one whether or not it produced a value.
pub fn stable_weight<S, C>(source: Option<&mut S>, clock: &C, cfg: &StableCfg) -> Reading
where
    S: LineSource + ?Sized,
    C: Clock + ?Sized,
{
    let Some(source) = source else {
        debug!("stable sample skipped: no sensor");
        return Reading::NoDevice;
    };

    let attempts: Vec<Result<f64, SampleError>> = (0..cfg.samples)
        .map(|i| {
            let attempt =
                read_attempt(&mut *source, cfg.read_timeout).and_then(|g| cfg.band.check(g));
            if let Err(e) = &attempt {
                trace!(attempt = i, error = %e, "stable attempt dropped");
            }
            clock.sleep(cfg.delay);
            attempt
        })
        .collect();

    let accepted = attempts.iter().filter(|a| a.is_ok()).count();
    match settle(attempts) {
        Some(g) => {
            debug!(grams = g, accepted, samples = cfg.samples, "stable sample");
            Reading::Value(g)
        }
        None => {
            debug!(samples = cfg.samples, "stable sample rejected every attempt");
            Reading::NoValidReading
        }
    }
}
