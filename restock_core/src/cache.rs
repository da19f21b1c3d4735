//! Rate limit on stable sampling.
//!
//! A stable sample holds the scale for about a second, and a product lifted off
//! the plate for a moment would otherwise read as empty. The cache hands back the
//! previous reading until it is older than `stale_after`.

use std::time::{Duration, Instant};

use crate::config::CacheCfg;
use crate::types::Reading;

/// Last accepted stable reading and when it was requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedSample {
    pub reading: Reading,
    pub observed_at: Instant,
}

#[derive(Debug)]
pub struct SampleCache {
    stale_after: Duration,
    last: Option<CachedSample>,
    refreshes: u64,
}

impl SampleCache {
    pub fn new(cfg: &CacheCfg) -> Self {
        Self {
            stale_after: cfg.stale_after,
            last: None,
            refreshes: 0,
        }
    }

    /// True when nothing is cached or the cached sample is strictly older than the window.
    pub fn is_stale(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(c) => now.saturating_duration_since(c.observed_at) > self.stale_after,
        }
    }

    /// Cached reading, refreshed through `refresh` first when stale.
    pub fn current<F>(&mut self, now: Instant, refresh: F) -> Reading
    where
        F: FnOnce() -> Reading,
    {
        if let Some(c) = self.last
            && !self.is_stale(now)
        {
            return c.reading;
        }
        let reading = refresh();
        self.last = Some(CachedSample {
            reading,
            observed_at: now,
        });
        self.refreshes = self.refreshes.saturating_add(1);
        reading
    }

    pub fn peek(&self) -> Option<CachedSample> {
        self.last
    }

    /// Forget the cached sample so the next request samples again.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Number of times `refresh` has run.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> SampleCache {
        SampleCache::new(&CacheCfg::default())
    }

    #[test]
    fn first_call_always_samples() {
        let mut c = cache();
        let now = Instant::now();
        assert!(c.is_stale(now));
        assert_eq!(c.current(now, || Reading::Value(50.0)), Reading::Value(50.0));
        assert_eq!(c.refreshes(), 1);
        assert_eq!(c.peek().map(|s| s.observed_at), Some(now));
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let mut c = cache();
        let t0 = Instant::now();
        c.current(t0, || Reading::Value(50.0));
        // exactly 5 s old: still fresh
        let at_edge = c.current(t0 + Duration::from_secs(5), || Reading::Value(1.0));
        assert_eq!(at_edge, Reading::Value(50.0));
        let past = c.current(
            t0 + Duration::from_secs(5) + Duration::from_millis(1),
            || Reading::Value(1.0),
        );
        assert_eq!(past, Reading::Value(1.0));
        assert_eq!(c.refreshes(), 2);
    }

    #[test]
    fn failed_readings_are_cached_too() {
        let mut c = cache();
        let t0 = Instant::now();
        c.current(t0, || Reading::NoValidReading);
        let again = c.current(t0 + Duration::from_secs(1), || Reading::Value(99.0));
        assert_eq!(again, Reading::NoValidReading);
    }

    #[test]
    fn invalidate_forces_refresh() {
        let mut c = cache();
        let t0 = Instant::now();
        c.current(t0, || Reading::Value(50.0));
        c.invalidate();
        assert!(c.peek().is_none());
        assert_eq!(c.current(t0, || Reading::Value(42.0)), Reading::Value(42.0));
    }
}
