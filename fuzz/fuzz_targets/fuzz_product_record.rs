#![no_main]
use libfuzzer_sys::fuzz_target;
use restock_core::ProductRecord;

fuzz_target!(|data: &[u8]| {
    // Whatever deserializes must satisfy the record invariants.
    if let Ok(rec) = serde_json::from_slice::<ProductRecord>(data) {
        assert!(!rec.name().trim().is_empty());
        assert!(rec.initial_weight().is_finite() && rec.initial_weight() > 0.0);
        assert!(rec.threshold_percent() <= 100);
        assert!(rec.threshold_weight() >= 0.0);
    }
});
