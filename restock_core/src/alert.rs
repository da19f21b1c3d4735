//! Low-stock decision.

use crate::record::ProductRecord;

/// Result of comparing a weight against the registered product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub alert: bool,
    pub threshold_weight: f64,
}

/// Alert when `current_weight` is strictly below the product's threshold weight.
/// Without a product there is nothing to run low: `(false, 0.0)`.
pub fn evaluate(record: Option<&ProductRecord>, current_weight: f64) -> Evaluation {
    match record {
        None => Evaluation {
            alert: false,
            threshold_weight: 0.0,
        },
        Some(r) => {
            let threshold_weight = r.threshold_weight();
            Evaluation {
                alert: current_weight < threshold_weight,
                threshold_weight,
            }
        }
    }
}
