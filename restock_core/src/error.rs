use thiserror::Error;

/// Failures surfaced to callers of the monitor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MonitorError {
    #[error("no product registered")]
    NotRegistered,
    #[error("product name must not be empty")]
    InvalidName,
    #[error("threshold percent {0} is outside 0..=100")]
    InvalidThreshold(u8),
    #[error("scale returned no usable weight")]
    NoWeight,
    #[error("storage error: {0}")]
    Storage(String),
}

/// Why a single sampling attempt produced no value.
///
/// These never reach callers; samplers log and drop them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleError {
    #[error("no sensor connected")]
    NoDevice,
    #[error("timeout waiting for sensor")]
    Timeout,
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("unparseable line {0:?}")]
    Parse(String),
    #[error("non-positive reading {0}")]
    NonPositive(f64),
    #[error("reading {0} outside noise band")]
    NoiseRejected(f64),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing record store")]
    MissingStore,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
