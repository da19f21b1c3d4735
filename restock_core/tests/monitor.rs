use std::time::Duration;

use restock_core::mocks::{MemoryStore, ScriptedSource};
use restock_core::{Monitor, MonitorCfg, MonitorError, ProductRecord, Reading, ReadingKind};
use restock_traits::clock::Clock;
use restock_traits::clock::test_clock::TestClock;

fn monitor_with(src: Option<ScriptedSource>, store: MemoryStore, clock: &TestClock) -> Monitor {
    Monitor::builder()
        .with_source_opt(src)
        .with_store(store)
        .with_clock(clock.clone())
        .with_config(MonitorCfg::default())
        .build()
        .expect("build monitor")
}

#[test]
fn register_uses_quick_reading() {
    let clock = TestClock::new();
    let store = MemoryStore::default();
    let src = ScriptedSource::lines(["85.3"]).with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), store.clone(), &clock);

    let rec = m.register_product("Cream", 50).expect("register");
    assert_eq!(rec, ProductRecord::new("Cream", 85.3, 50).unwrap());
    assert_eq!(store.get(), Some(rec));
}

#[test]
fn register_replaces_previous_record() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Old", 300.0, 10).unwrap());
    let src = ScriptedSource::lines(["120.5"]).with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), store.clone(), &clock);

    m.register_product("Lotion", 25).expect("register");
    let rec = store.get().expect("record");
    assert_eq!(rec.name(), "Lotion");
    assert_eq!(rec.initial_weight(), 120.5);
    assert_eq!(rec.threshold_percent(), 25);
}

#[test]
fn register_without_weight_fails_and_keeps_old_record() {
    let clock = TestClock::new();
    let old = ProductRecord::new("Old", 300.0, 10).unwrap();
    let store = MemoryStore::with_record(old.clone());
    let m = monitor_with(None, store.clone(), &clock);

    let err = m.register_product("Cream", 50).expect_err("no device");
    assert_eq!(
        err.downcast_ref::<MonitorError>(),
        Some(&MonitorError::NoWeight)
    );
    assert_eq!(store.get(), Some(old));
}

#[test]
fn register_validates_before_touching_the_scale() {
    let clock = TestClock::new();
    let src = ScriptedSource::lines(["85.3"]);
    let tally = src.tally();
    let m = monitor_with(Some(src), MemoryStore::default(), &clock);

    let err = m.register_product("   ", 50).expect_err("empty name");
    assert_eq!(
        err.downcast_ref::<MonitorError>(),
        Some(&MonitorError::InvalidName)
    );
    let err = m.register_product("Cream", 101).expect_err("bad threshold");
    assert_eq!(
        err.downcast_ref::<MonitorError>(),
        Some(&MonitorError::InvalidThreshold(101))
    );
    assert_eq!(tally.reads(), 0);
}

#[test]
fn update_threshold_without_record_is_not_registered() {
    let clock = TestClock::new();
    let store = MemoryStore::default();
    let m = monitor_with(None, store.clone(), &clock);

    let err = m.update_threshold(40).expect_err("nothing registered");
    assert_eq!(
        err.downcast_ref::<MonitorError>(),
        Some(&MonitorError::NotRegistered)
    );
    assert_eq!(store.get(), None);
}

#[test]
fn update_threshold_after_delete_is_not_registered() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 85.3, 50).unwrap());
    let m = monitor_with(None, store, &clock);

    m.delete_product().expect("delete");
    let err = m.update_threshold(40).expect_err("deleted");
    assert_eq!(
        err.downcast_ref::<MonitorError>(),
        Some(&MonitorError::NotRegistered)
    );
}

#[test]
fn update_threshold_rewrites_only_threshold() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 85.3, 50).unwrap());
    let m = monitor_with(None, store.clone(), &clock);

    let rec = m.update_threshold(20).expect("update");
    assert_eq!(rec, ProductRecord::new("Cream", 85.3, 20).unwrap());
    assert_eq!(store.get(), Some(rec));
}

#[test]
fn delete_is_idempotent() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 85.3, 50).unwrap());
    let m = monitor_with(None, store.clone(), &clock);
    m.delete_product().expect("first delete");
    m.delete_product().expect("second delete");
    assert_eq!(m.product(), None);
}

#[test]
fn status_without_product_never_alerts() {
    let clock = TestClock::new();
    let src = ScriptedSource::repeating("50").with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), MemoryStore::default(), &clock);

    let s = m.status();
    assert_eq!(s.name, None);
    assert_eq!(s.weight, 50.0);
    assert_eq!(s.threshold_weight, 0.0);
    assert!(!s.alert);
    assert_eq!(s.reading, ReadingKind::Ok);
}

#[test]
fn status_alerts_below_threshold() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 100.0, 30).unwrap());
    let src = ScriptedSource::repeating("29.9").with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), store, &clock);

    let s = m.status();
    assert_eq!(s.name.as_deref(), Some("Cream"));
    assert_eq!(s.weight, 29.9);
    assert_eq!(s.threshold_weight, 30.0);
    assert!(s.alert);
}

#[test]
fn status_at_threshold_does_not_alert() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 100.0, 30).unwrap());
    let src = ScriptedSource::repeating("30.0").with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), store, &clock);
    assert!(!m.status().alert);
}

#[test]
fn status_without_device_reports_sentinel() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 100.0, 30).unwrap());
    let m = monitor_with(None, store, &clock);
    let s = m.status();
    assert_eq!(s.weight, 0.0);
    assert_eq!(s.reading, ReadingKind::NoDevice);
    // the 0.0 sentinel is compared like any weight
    assert!(s.alert);
    assert!(!m.has_device());
}

#[test]
fn status_within_window_reuses_cached_sample() {
    let clock = TestClock::new();
    let src = ScriptedSource::lines([
        "100", "100", "100", "100", "100", "20", "20", "20", "20", "20",
    ])
    .with_clock(clock.clone(), Duration::ZERO);
    let tally = src.tally();
    let m = monitor_with(Some(src), MemoryStore::default(), &clock);

    let t0 = clock.now();
    assert_eq!(m.current_weight_at(t0), Reading::Value(100.0));
    assert_eq!(
        m.current_weight_at(t0 + Duration::from_secs(4)),
        Reading::Value(100.0)
    );
    assert_eq!(m.sample_count(), 1);
    assert_eq!(tally.reads(), 5);

    assert_eq!(
        m.current_weight_at(t0 + Duration::from_millis(5001)),
        Reading::Value(20.0)
    );
    assert_eq!(m.sample_count(), 2);
    assert_eq!(tally.reads(), 10);
}

#[test]
fn record_changes_apply_to_cached_weight() {
    let clock = TestClock::new();
    let store = MemoryStore::with_record(ProductRecord::new("Cream", 100.0, 30).unwrap());
    let src = ScriptedSource::repeating("40").with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), store, &clock);

    let t0 = clock.now();
    assert!(!m.status_at(t0).alert);
    m.update_threshold(50).expect("update");
    // same cached weight, new threshold
    let s = m.status_at(t0 + Duration::from_secs(1));
    assert_eq!(s.threshold_weight, 50.0);
    assert!(s.alert);
    assert_eq!(m.sample_count(), 1);
}

#[test]
fn invalidate_cache_forces_new_sample() {
    let clock = TestClock::new();
    let src = ScriptedSource::repeating("40").with_clock(clock.clone(), Duration::ZERO);
    let m = monitor_with(Some(src), MemoryStore::default(), &clock);
    let t0 = clock.now();
    m.current_weight_at(t0);
    m.invalidate_cache();
    assert!(m.cached_sample().is_none());
    m.current_weight_at(t0);
    assert_eq!(m.sample_count(), 2);
}

#[test]
fn builder_requires_store() {
    let err = Monitor::builder().build().expect_err("no store");
    assert!(format!("{err}").contains("missing record store"));
}
