#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the restock monitor.
//!
//! Every section is optional in the TOML; missing fields fall back to the
//! defaults the scale firmware and prototype deployment were tuned for.
//! Call [`Config::validate`] after loading.
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SerialCfg {
    /// Device path of the scale (e.g. "/dev/ttyACM0" or "COM4").
    pub port: String,
    pub baud: u32,
    /// Max wait for one line from the scale.
    pub read_timeout_ms: u64,
}

impl Default for SerialCfg {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud: 9600,
            read_timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SamplingCfg {
    /// Budget for the single best-effort reading taken at registration.
    pub quick_timeout_ms: u64,
    /// Attempts averaged per stable reading.
    pub stable_samples: u32,
    /// Pause after each stable attempt so the load cell can settle.
    pub stable_delay_ms: u64,
    /// Readings at or below this are treated as noise.
    pub noise_min_g: f64,
    /// Readings at or above this are treated as a sensor fault.
    pub noise_max_g: f64,
    /// A cached stable reading is reused until it is older than this.
    /// 5 s suits a demo; a real shelf should use several minutes.
    #[serde(alias = "stale_ms")]
    pub stale_after_ms: u64,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            quick_timeout_ms: 2000,
            stable_samples: 5,
            stable_delay_ms: 200,
            noise_min_g: 10.0,
            noise_max_g: 3000.0,
            stale_after_ms: 5000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageCfg {
    /// JSON file holding the registered product.
    pub record_path: PathBuf,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            record_path: PathBuf::from("data/product.json"),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub serial: SerialCfg,
    pub sampling: SamplingCfg,
    pub storage: StorageCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text)
        .map_err(|e| eyre::eyre!("invalid configuration {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Serial
        if self.serial.port.trim().is_empty() {
            eyre::bail!("serial.port must not be empty");
        }
        if self.serial.baud == 0 {
            eyre::bail!("serial.baud must be > 0");
        }
        if self.serial.read_timeout_ms == 0 {
            eyre::bail!("serial.read_timeout_ms must be >= 1");
        }

        // Sampling
        let s = &self.sampling;
        if s.quick_timeout_ms == 0 {
            eyre::bail!("sampling.quick_timeout_ms must be >= 1");
        }
        if s.stable_samples == 0 {
            eyre::bail!("sampling.stable_samples must be >= 1");
        }
        if s.stable_samples > 1000 {
            eyre::bail!("sampling.stable_samples is unreasonably large (>1000)");
        }
        if s.stable_delay_ms > 60 * 1000 {
            eyre::bail!("sampling.stable_delay_ms is unreasonably large (>1min)");
        }
        if !s.noise_min_g.is_finite() || !s.noise_max_g.is_finite() {
            eyre::bail!("sampling noise band must be finite");
        }
        if s.noise_min_g >= s.noise_max_g {
            eyre::bail!("sampling.noise_min_g must be < sampling.noise_max_g");
        }
        if s.stale_after_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("sampling.stale_after_ms is unreasonably large (>24h)");
        }

        // Storage
        if self.storage.record_path.as_os_str().is_empty() {
            eyre::bail!("storage.record_path must not be empty");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {r}");
        }

        Ok(())
    }
}
