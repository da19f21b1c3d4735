//! Test and helper doubles for restock_core.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use restock_traits::clock::Clock;
use restock_traits::{BoxError, LineSource};

use crate::error::MonitorError;
use crate::record::{ProductRecord, RecordStore};

/// Shared counters of a [`ScriptedSource`], readable after the source is moved away.
#[derive(Debug, Clone, Default)]
pub struct SourceTally {
    reads: Arc<AtomicUsize>,
    flushes: Arc<AtomicUsize>,
    read_times: Arc<Mutex<Vec<Instant>>>,
}

impl SourceTally {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Clock time at the start of every read, in order.
    pub fn read_times(&self) -> Vec<Instant> {
        self.read_times.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

/// A line source that replays a script, then times out forever.
///
/// `None` entries in the script are read timeouts. When a clock is attached,
/// each successful read advances it by `read_cost` and each timeout by the
/// requested timeout, so time-bounded loops terminate under a test clock.
pub struct ScriptedSource {
    script: VecDeque<Option<String>>,
    repeat: Option<String>,
    clock: Option<(Box<dyn Clock + Send + Sync>, Duration)>,
    tally: SourceTally,
}

impl ScriptedSource {
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = Option<L>>,
        L: Into<String>,
    {
        Self {
            script: lines.into_iter().map(|l| l.map(Into::into)).collect(),
            repeat: None,
            clock: None,
            tally: SourceTally::default(),
        }
    }

    /// Every line in `lines` is delivered, then timeouts.
    pub fn lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(lines.into_iter().map(Some))
    }

    /// The same line forever.
    pub fn repeating(line: impl Into<String>) -> Self {
        let mut s = Self::new(std::iter::empty::<Option<String>>());
        s.repeat = Some(line.into());
        s
    }

    pub fn with_clock<C>(mut self, clock: C, read_cost: Duration) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Some((Box::new(clock), read_cost));
        self
    }

    pub fn tally(&self) -> SourceTally {
        self.tally.clone()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, timeout: Duration) -> Result<String, BoxError> {
        self.tally.reads.fetch_add(1, Ordering::SeqCst);
        if let Some((clock, _)) = &self.clock
            && let Ok(mut times) = self.tally.read_times.lock()
        {
            times.push(clock.now());
        }
        let next = match self.script.pop_front() {
            Some(step) => step,
            None => self.repeat.clone(),
        };
        match next {
            Some(line) => {
                if let Some((clock, cost)) = &self.clock {
                    clock.sleep(*cost);
                }
                Ok(line)
            }
            None => {
                if let Some((clock, _)) = &self.clock {
                    clock.sleep(timeout);
                }
                Err("scripted read timeout".into())
            }
        }
    }

    fn flush_input(&mut self) -> Result<(), BoxError> {
        self.tally.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory record store; clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cell: Arc<Mutex<Option<ProductRecord>>>,
}

impl MemoryStore {
    pub fn with_record(record: ProductRecord) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Some(record))),
        }
    }

    pub fn get(&self) -> Option<ProductRecord> {
        self.cell.lock().ok().and_then(|g| g.clone())
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Option<ProductRecord> {
        self.get()
    }

    fn save(&mut self, record: &ProductRecord) -> Result<(), MonitorError> {
        let mut g = self
            .cell
            .lock()
            .map_err(|_| MonitorError::Storage("memory store poisoned".into()))?;
        *g = Some(record.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), MonitorError> {
        let mut g = self
            .cell
            .lock()
            .map_err(|_| MonitorError::Storage("memory store poisoned".into()))?;
        *g = None;
        Ok(())
    }
}
