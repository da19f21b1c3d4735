//! Runtime configuration for the samplers and the cache.
//!
//! These are the structs the core works with. They are separate from the
//! TOML-deserialized config in `restock_config`; see `conversions`.

use std::time::Duration;

use crate::filter::NoiseBand;

/// Registration-time single reading.
#[derive(Debug, Clone)]
pub struct QuickCfg {
    /// Overall budget; the first positive line within it wins.
    pub timeout: Duration,
    /// Max wait for each individual line.
    pub read_timeout: Duration,
}

impl Default for QuickCfg {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// Averaged reading used for monitoring.
#[derive(Debug, Clone)]
pub struct StableCfg {
    /// Number of read attempts, successful or not.
    pub samples: u32,
    /// Pause after every attempt.
    pub delay: Duration,
    /// Accepted open interval in grams.
    pub band: NoiseBand,
    /// Max wait for each individual line.
    pub read_timeout: Duration,
}

impl Default for StableCfg {
    fn default() -> Self {
        Self {
            samples: 5,
            delay: Duration::from_millis(200),
            band: NoiseBand::default(),
            read_timeout: Duration::from_secs(1),
        }
    }
}

/// Rate limit for stable sampling.
#[derive(Debug, Clone)]
pub struct CacheCfg {
    /// A cached reading is reused while it is at most this old.
    pub stale_after: Duration,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(5),
        }
    }
}

/// Everything the `Monitor` needs besides its collaborators.
#[derive(Debug, Clone, Default)]
pub struct MonitorCfg {
    pub quick: QuickCfg,
    pub stable: StableCfg,
    pub cache: CacheCfg,
}
