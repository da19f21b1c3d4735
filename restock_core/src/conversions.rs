//! `From` implementations bridging `restock_config` types to `restock_core` types.

use crate::config::{CacheCfg, MonitorCfg, QuickCfg, StableCfg};
use crate::filter::NoiseBand;
use crate::util::ms;

impl From<&restock_config::Config> for QuickCfg {
    fn from(c: &restock_config::Config) -> Self {
        Self {
            timeout: ms(c.sampling.quick_timeout_ms),
            read_timeout: ms(c.serial.read_timeout_ms),
        }
    }
}

impl From<&restock_config::Config> for StableCfg {
    fn from(c: &restock_config::Config) -> Self {
        Self {
            samples: c.sampling.stable_samples,
            delay: ms(c.sampling.stable_delay_ms),
            band: NoiseBand::new(c.sampling.noise_min_g, c.sampling.noise_max_g),
            read_timeout: ms(c.serial.read_timeout_ms),
        }
    }
}

impl From<&restock_config::SamplingCfg> for CacheCfg {
    fn from(c: &restock_config::SamplingCfg) -> Self {
        Self {
            stale_after: ms(c.stale_after_ms),
        }
    }
}

impl From<&restock_config::Config> for MonitorCfg {
    fn from(c: &restock_config::Config) -> Self {
        Self {
            quick: c.into(),
            stable: c.into(),
            cache: (&c.sampling).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_round_trip_through_config() {
        let cfg = restock_config::Config::default();
        let m = MonitorCfg::from(&cfg);
        let d = MonitorCfg::default();
        assert_eq!(m.quick.timeout, d.quick.timeout);
        assert_eq!(m.quick.read_timeout, d.quick.read_timeout);
        assert_eq!(m.stable.samples, d.stable.samples);
        assert_eq!(m.stable.delay, d.stable.delay);
        assert_eq!(m.stable.band, d.stable.band);
        assert_eq!(m.cache.stale_after, Duration::from_secs(5));
    }
}
