//! Outcome of a sampling pass.

use serde::Serialize;

/// What a sampler produced.
///
/// `grams()` collapses the two failure cases to `0.0` for callers that only
/// understand a single number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// The sensor channel could not be opened.
    NoDevice,
    /// The sensor is connected but nothing survived parsing and the noise band.
    NoValidReading,
    /// Accepted weight in grams, rounded to 0.01 g.
    Value(f64),
}

impl Reading {
    #[inline]
    pub fn grams(self) -> f64 {
        match self {
            Reading::Value(g) => g,
            Reading::NoDevice | Reading::NoValidReading => 0.0,
        }
    }

    #[inline]
    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Value(g) => Some(g),
            _ => None,
        }
    }

    pub fn kind(self) -> ReadingKind {
        match self {
            Reading::NoDevice => ReadingKind::NoDevice,
            Reading::NoValidReading => ReadingKind::NoValidReading,
            Reading::Value(_) => ReadingKind::Ok,
        }
    }
}

/// Serializable tag for [`Reading`], used in status payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    Ok,
    NoDevice,
    NoValidReading,
}
