//! Service context tying the scale, the cache and the product record together.
//!
//! One `Monitor` per process. It is `Send + Sync`; request handlers share it by
//! reference or `Arc`.
//!
//! Locking: the scale channel and the sample cache sit behind a single mutex, so
//! "check staleness, sample, store" is one critical section and two requests in
//! the same stale window cause one hardware read. The record store has its own
//! mutex. No path holds both at once.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use restock_traits::LineSource;
use restock_traits::clock::{Clock, MonotonicClock};
use tracing::{info, warn};

use crate::alert::evaluate;
use crate::cache::{CachedSample, SampleCache};
use crate::config::MonitorCfg;
use crate::error::{BuildError, MonitorError, Result};
use crate::record::{ProductRecord, RecordStore, check_threshold};
use crate::sampler::{quick_weight, stable_weight};
use crate::status::Status;
use crate::types::Reading;

pub type DynSource = Box<dyn LineSource + Send>;
pub type DynStore = Box<dyn RecordStore + Send>;
pub type DynClock = Box<dyn Clock + Send + Sync>;

struct Channel {
    source: Option<DynSource>,
    cache: SampleCache,
}

pub struct Monitor {
    channel: Mutex<Channel>,
    store: Mutex<DynStore>,
    clock: DynClock,
    cfg: MonitorCfg,
}

impl core::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field(
                "has_device",
                &self.channel.try_lock().map(|c| c.source.is_some()).ok(),
            )
            .field("cfg", &self.cfg)
            .finish()
    }
}

fn lock_or_recover<'a, T>(m: &'a Mutex<T>, what: &'static str) -> MutexGuard<'a, T> {
    m.lock().unwrap_or_else(|poisoned| {
        warn!(lock = what, "lock poisoned by a panicked holder; continuing");
        poisoned.into_inner()
    })
}

impl Monitor {
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    pub fn config(&self) -> &MonitorCfg {
        &self.cfg
    }

    pub fn has_device(&self) -> bool {
        lock_or_recover(&self.channel, "channel").source.is_some()
    }

    /// Register a new product, weighing it once with the quick sampler.
    ///
    /// Any previous product is replaced. Fails with `NoWeight` (and keeps the
    /// previous product) when the scale gives no positive reading in time.
    pub fn register_product(&self, name: &str, threshold_percent: u8) -> Result<ProductRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MonitorError::InvalidName.into());
        }
        check_threshold(threshold_percent)?;

        let reading = self.quick_reading();
        let Some(initial_weight) = reading.value() else {
            warn!(?reading, name, "registration aborted: no weight");
            return Err(MonitorError::NoWeight.into());
        };

        let record = ProductRecord::new(name, initial_weight, threshold_percent)?;
        lock_or_recover(&self.store, "store").save(&record)?;
        info!(name, initial_weight, threshold_percent, "product registered");
        Ok(record)
    }

    /// Change the alert threshold of the registered product.
    pub fn update_threshold(&self, threshold_percent: u8) -> Result<ProductRecord> {
        check_threshold(threshold_percent)?;
        let mut store = lock_or_recover(&self.store, "store");
        let current = store.load().ok_or(MonitorError::NotRegistered)?;
        let updated = current.with_threshold(threshold_percent)?;
        store.save(&updated)?;
        info!(name = updated.name(), threshold_percent, "threshold updated");
        Ok(updated)
    }

    /// Forget the registered product. Succeeds when there is none.
    pub fn delete_product(&self) -> Result<()> {
        lock_or_recover(&self.store, "store").clear()?;
        info!("product deleted");
        Ok(())
    }

    pub fn product(&self) -> Option<ProductRecord> {
        lock_or_recover(&self.store, "store").load()
    }

    /// One quick reading, bypassing the cache.
    pub fn quick_reading(&self) -> Reading {
        let mut ch = lock_or_recover(&self.channel, "channel");
        quick_weight(ch.source.as_deref_mut(), &*self.clock, &self.cfg.quick)
    }

    /// Weight as of `now`, sampling only when the cached one is stale.
    pub fn current_weight_at(&self, now: Instant) -> Reading {
        let mut guard = lock_or_recover(&self.channel, "channel");
        let Channel { source, cache } = &mut *guard;
        cache.current(now, || {
            stable_weight(source.as_deref_mut(), &*self.clock, &self.cfg.stable)
        })
    }

    pub fn status_at(&self, now: Instant) -> Status {
        let reading = self.current_weight_at(now);
        let record = self.product();
        let weight = reading.grams();
        let eval = evaluate(record.as_ref(), weight);
        Status {
            name: record.map(|r| r.name().to_string()),
            weight,
            threshold_weight: eval.threshold_weight,
            alert: eval.alert,
            reading: reading.kind(),
        }
    }

    pub fn status(&self) -> Status {
        self.status_at(self.clock.now())
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn cached_sample(&self) -> Option<CachedSample> {
        lock_or_recover(&self.channel, "channel").cache.peek()
    }

    pub fn invalidate_cache(&self) {
        lock_or_recover(&self.channel, "channel").cache.invalidate();
    }

    /// How many stable samples have actually hit the scale.
    pub fn sample_count(&self) -> u64 {
        lock_or_recover(&self.channel, "channel").cache.refreshes()
    }
}

/// Builder for `Monitor`. The store is required; no source means no device.
#[derive(Default)]
pub struct MonitorBuilder {
    source: Option<DynSource>,
    store: Option<DynStore>,
    clock: Option<DynClock>,
    cfg: Option<MonitorCfg>,
}

impl MonitorBuilder {
    pub fn with_source<S: LineSource + Send + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convenience for the result of a `try_open`.
    pub fn with_source_opt<S: LineSource + Send + 'static>(mut self, source: Option<S>) -> Self {
        self.source = source.map(|s| Box::new(s) as DynSource);
        self
    }

    pub fn with_store<R: RecordStore + Send + 'static>(mut self, store: R) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_clock<C: Clock + Send + Sync + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_config(mut self, cfg: MonitorCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn build(self) -> Result<Monitor> {
        let store = self
            .store
            .ok_or_else(|| eyre::Report::new(BuildError::MissingStore))?;
        let cfg = self.cfg.unwrap_or_default();
        if cfg.stable.samples == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stable samples must be >= 1",
            )));
        }
        if cfg.stable.band.min_g >= cfg.stable.band.max_g {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "noise band is empty",
            )));
        }
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));
        Ok(Monitor {
            channel: Mutex::new(Channel {
                source: self.source,
                cache: SampleCache::new(&cfg.cache),
            }),
            store: Mutex::new(store),
            clock,
            cfg,
        })
    }
}
