pub mod error;
pub mod util;

#[cfg(feature = "hardware")]
pub mod serial;

#[cfg(feature = "hardware")]
pub use serial::SerialLineSource;

use restock_traits::{BoxError, LineSource};
use std::time::Duration;

/// Environment variable read by [`SimulatedSource::from_env`].
pub const SIM_ENV: &str = "RESTOCK_SIM_GRAMS";

/// Token in a simulated script that makes the read time out instead of yielding a line.
pub const SIM_TIMEOUT: &str = "timeout";

/// Simulated scale: replays a fixed script of lines, cycling forever.
///
/// A script entry equal to [`SIM_TIMEOUT`] blocks for the read timeout and then
/// fails the read, like a scale that stopped printing.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    lines: Vec<String>,
    idx: usize,
}

impl SimulatedSource {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            idx: 0,
        }
    }

    /// A scale holding a constant weight.
    pub fn fixed(grams: f64) -> Self {
        Self::new([format!("{grams:.2}")])
    }

    /// Build from `RESTOCK_SIM_GRAMS` (comma-separated lines); `None` when unset,
    /// which the rest of the stack treats as "no device connected".
    pub fn from_env() -> Option<Self> {
        let raw = std::env::var(SIM_ENV).ok()?;
        Some(Self::parse_script(&raw))
    }

    pub fn parse_script(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim))
    }
}

impl LineSource for SimulatedSource {
    fn read_line(&mut self, timeout: Duration) -> Result<String, BoxError> {
        if self.lines.is_empty() {
            std::thread::sleep(timeout);
            return Err(Box::new(error::HwError::Timeout));
        }
        let line = self.lines[self.idx % self.lines.len()].clone();
        self.idx = self.idx.wrapping_add(1);
        if line == SIM_TIMEOUT {
            std::thread::sleep(timeout);
            return Err(Box::new(error::HwError::Timeout));
        }
        tracing::trace!(%line, "simulated line");
        Ok(line)
    }

    fn flush_input(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
