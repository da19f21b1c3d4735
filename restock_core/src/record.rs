//! The registered product and where it is kept.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atomic::{remove_if_exists, write_atomic};
use crate::error::MonitorError;

/// The product currently standing on the scale.
///
/// Constructed only through [`ProductRecord::new`] (or deserialization, which runs
/// the same checks), so a stored record always has a name, a positive initial
/// weight and a threshold within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct ProductRecord {
    name: String,
    initial_weight: f64,
    threshold_percent: u8,
}

#[derive(Deserialize)]
struct RawRecord {
    name: String,
    initial_weight: f64,
    threshold_percent: u8,
}

impl TryFrom<RawRecord> for ProductRecord {
    type Error = MonitorError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.initial_weight, raw.threshold_percent)
    }
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        initial_weight: f64,
        threshold_percent: u8,
    ) -> Result<Self, MonitorError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MonitorError::InvalidName);
        }
        check_threshold(threshold_percent)?;
        if !(initial_weight.is_finite() && initial_weight > 0.0) {
            return Err(MonitorError::NoWeight);
        }
        Ok(Self {
            name,
            initial_weight,
            threshold_percent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_weight(&self) -> f64 {
        self.initial_weight
    }

    pub fn threshold_percent(&self) -> u8 {
        self.threshold_percent
    }

    /// Weight below which the product counts as running low.
    pub fn threshold_weight(&self) -> f64 {
        self.initial_weight * f64::from(self.threshold_percent) / 100.0
    }

    /// Same product with a new threshold; the initial weight never changes.
    pub fn with_threshold(self, threshold_percent: u8) -> Result<Self, MonitorError> {
        check_threshold(threshold_percent)?;
        Ok(Self {
            threshold_percent,
            ..self
        })
    }
}

pub(crate) fn check_threshold(threshold_percent: u8) -> Result<(), MonitorError> {
    if threshold_percent > 100 {
        return Err(MonitorError::InvalidThreshold(threshold_percent));
    }
    Ok(())
}

/// Single-record persistence.
///
/// `load` never fails: an unreadable or invalid record is reported as absent and
/// the store logs why.
pub trait RecordStore {
    fn load(&self) -> Option<ProductRecord>;
    fn save(&mut self, record: &ProductRecord) -> Result<(), MonitorError>;
    /// Remove the record; removing an absent record succeeds.
    fn clear(&mut self) -> Result<(), MonitorError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn load(&self) -> Option<ProductRecord> {
        (**self).load()
    }

    fn save(&mut self, record: &ProductRecord) -> Result<(), MonitorError> {
        (**self).save(record)
    }

    fn clear(&mut self) -> Result<(), MonitorError> {
        (**self).clear()
    }
}

/// Pretty-printed JSON file, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_err(&self, what: &str, e: impl std::fmt::Display) -> MonitorError {
        MonitorError::Storage(format!("{what} {}: {e}", self.path.display()))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Option<ProductRecord> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "cannot read product record; treating as absent"
                );
                return None;
            }
        };
        match serde_json::from_str::<ProductRecord>(&text) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "product record is corrupt; treating as absent"
                );
                None
            }
        }
    }

    fn save(&mut self, record: &ProductRecord) -> Result<(), MonitorError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| self.storage_err("create dir for", e))?;
        }
        let bytes =
            serde_json::to_vec_pretty(record).map_err(|e| self.storage_err("serialize", e))?;
        write_atomic(&self.path, &bytes).map_err(|e| self.storage_err("write", e))?;
        debug!(path = %self.path.display(), "product record saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), MonitorError> {
        if remove_if_exists(&self.path).map_err(|e| self.storage_err("remove", e))? {
            debug!(path = %self.path.display(), "product record removed");
        }
        Ok(())
    }
}
