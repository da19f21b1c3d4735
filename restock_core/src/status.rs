//! Snapshot returned by a status query.

use serde::Serialize;

use crate::types::ReadingKind;

/// What a status request reports.
///
/// JSON shape: `{"name", "weight", "threshold", "alert", "reading"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    /// Registered product, if any.
    pub name: Option<String>,
    /// Current weight in grams; `0.0` when there is no reading (see `reading`).
    pub weight: f64,
    /// Weight under which the product is low; `0.0` without a product.
    #[serde(rename = "threshold")]
    pub threshold_weight: f64,
    pub alert: bool,
    pub reading: ReadingKind,
}
