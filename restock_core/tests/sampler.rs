use std::time::Duration;

use restock_core::mocks::ScriptedSource;
use restock_core::{NoiseBand, QuickCfg, Reading, StableCfg, quick_weight, stable_weight};
use restock_traits::clock::Clock;
use restock_traits::clock::test_clock::TestClock;
use rstest::rstest;

fn stable_cfg(samples: u32) -> StableCfg {
    StableCfg {
        samples,
        delay: Duration::from_millis(200),
        band: NoiseBand::default(),
        read_timeout: Duration::from_millis(50),
    }
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(5)]
#[case(12)]
fn stable_issues_exactly_n_paced_reads(#[case] n: u32) {
    let clock = TestClock::new();
    // A mix of good, garbage and timeouts: attempt count must not depend on outcome.
    let mut src = ScriptedSource::new([Some("100"), Some("junk"), None, Some("5"), Some("101")])
        .with_clock(clock.clone(), Duration::ZERO);
    let tally = src.tally();

    let _ = stable_weight(Some(&mut src), &clock, &stable_cfg(n));

    assert_eq!(tally.reads(), n as usize);
    assert_eq!(tally.flushes(), n as usize);
    let times = tally.read_times();
    for pair in times.windows(2) {
        let gap = pair[1].saturating_duration_since(pair[0]);
        // delay, plus the read timeout when the previous attempt timed out
        assert!(
            gap == Duration::from_millis(200) || gap == Duration::from_millis(250),
            "unexpected gap {gap:?}"
        );
    }
}

#[test]
fn stable_sleeps_after_every_attempt() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::repeating("100").with_clock(clock.clone(), Duration::ZERO);
    let start = clock.now();
    let r = stable_weight(Some(&mut src), &clock, &stable_cfg(5));
    assert_eq!(r, Reading::Value(100.0));
    assert_eq!(clock.now() - start, Duration::from_millis(1000));
}

#[test]
fn stable_band_edges() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::lines(["10", "3000", "10.01", "2999.99"]);
    let r = stable_weight(Some(&mut src), &clock, &stable_cfg(4));
    // only 10.01 and 2999.99 survive
    assert_eq!(r, Reading::Value(1505.0));
}

#[test]
fn stable_averages_and_rounds() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::lines(["100.004", "100.006", "bad", "100.001"]);
    let r = stable_weight(Some(&mut src), &clock, &stable_cfg(4));
    assert_eq!(r, Reading::Value(100.0));
}

#[test]
fn stable_all_rejected_is_no_valid_reading() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::new([Some("abc"), Some("0"), None, Some("5000"), Some("")]);
    let r = stable_weight(Some(&mut src), &clock, &stable_cfg(5));
    assert_eq!(r, Reading::NoValidReading);
    assert_eq!(r.grams(), 0.0);
}

#[test]
fn stable_without_device() {
    let clock = TestClock::new();
    let r = stable_weight(None::<&mut ScriptedSource>, &clock, &stable_cfg(5));
    assert_eq!(r, Reading::NoDevice);
    assert_eq!(r.grams(), 0.0);
    // no pacing when there is nothing to read
    assert_eq!(clock.elapsed(), Duration::ZERO);
}

fn quick_cfg() -> QuickCfg {
    QuickCfg {
        timeout: Duration::from_secs(2),
        read_timeout: Duration::from_millis(100),
    }
}

#[test]
fn quick_returns_first_positive_line() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::lines(["", "garbage", "0", "-3.2", "85.304", "90"])
        .with_clock(clock.clone(), Duration::from_millis(10));
    let tally = src.tally();
    let r = quick_weight(Some(&mut src), &clock, &quick_cfg());
    assert_eq!(r, Reading::Value(85.3));
    assert_eq!(tally.reads(), 5);
}

#[test]
fn quick_accepts_values_outside_noise_band() {
    let clock = TestClock::new();
    let mut src = ScriptedSource::lines(["4.5"]).with_clock(clock.clone(), Duration::ZERO);
    assert_eq!(quick_weight(Some(&mut src), &clock, &quick_cfg()), Reading::Value(4.5));
}

#[test]
fn quick_gives_up_after_timeout() {
    let clock = TestClock::new();
    // Only timeouts: each costs 100 ms of clock time.
    let mut src = ScriptedSource::lines(Vec::<String>::new())
        .with_clock(clock.clone(), Duration::from_millis(10));
    let tally = src.tally();
    let start = clock.now();
    let r = quick_weight(Some(&mut src), &clock, &quick_cfg());
    assert_eq!(r, Reading::NoValidReading);
    assert_eq!(tally.reads(), 20);
    assert_eq!(clock.now() - start, Duration::from_secs(2));
}

#[test]
fn quick_without_device_returns_immediately() {
    let clock = TestClock::new();
    let r = quick_weight(None::<&mut ScriptedSource>, &clock, &quick_cfg());
    assert_eq!(r, Reading::NoDevice);
    assert_eq!(clock.elapsed(), Duration::ZERO);
}
