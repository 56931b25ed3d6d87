//! Windowed VWAP aggregation.
//!
//! Ticks arrive in time order. The first tick opens a window `[ts, ts + size)`;
//! the first tick at or past the window end closes it and opens the next
//! window at its own instant. Only the open window's accumulators are held.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};
use vwap_core::time::window_label;
use vwap_core::{
    normalize_pair, AggregateRecord, Config, Error, RawTick, Result, Tick, TimestampMs,
    TimestampNormalizer,
};

/// Running totals for one pair inside the open window.
#[derive(Debug, Clone)]
struct Accumulator {
    currency_pair: String,
    price_volume: f64,
    volume: u64,
}

impl Accumulator {
    fn new(tick: &Tick) -> Self {
        Self {
            currency_pair: tick.currency_pair.clone(),
            price_volume: tick.price_volume(),
            volume: tick.volume,
        }
    }

    fn add_tick(&mut self, tick: &Tick) -> Result<()> {
        self.volume = self.volume.checked_add(tick.volume).ok_or_else(|| {
            Error::invalid_record(format!("cumulative volume overflow for {}", self.currency_pair))
        })?;
        self.price_volume += tick.price_volume();
        Ok(())
    }

    fn freeze(self, label: &str) -> AggregateRecord {
        AggregateRecord::new(label, self.currency_pair, self.price_volume, self.volume)
    }
}

/// The window currently accepting ticks.
#[derive(Debug)]
struct OpenWindow {
    start: TimestampMs,
    end: TimestampMs,
    /// Accumulators in first-seen order.
    accumulators: Vec<Accumulator>,
    /// Normalized pair -> index into `accumulators`.
    slots: HashMap<String, usize>,
}

impl OpenWindow {
    fn open(tick: &Tick, size_ms: i64) -> Result<Self> {
        let end = tick.ts_ms.checked_add(size_ms).ok_or_else(|| {
            Error::invalid_configuration(format!(
                "window of {} ms starting at {} overflows",
                size_ms, tick.ts_ms
            ))
        })?;
        let mut window = Self {
            start: tick.ts_ms,
            end,
            accumulators: Vec::new(),
            slots: HashMap::new(),
        };
        window.add_tick(tick)?;
        Ok(window)
    }

    #[inline]
    fn contains(&self, ts_ms: TimestampMs) -> bool {
        ts_ms < self.end
    }

    fn add_tick(&mut self, tick: &Tick) -> Result<()> {
        let key = normalize_pair(&tick.currency_pair);
        match self.slots.get(&key) {
            Some(&slot) => self.accumulators[slot].add_tick(tick),
            None => {
                self.slots.insert(key, self.accumulators.len());
                self.accumulators.push(Accumulator::new(tick));
                Ok(())
            }
        }
    }

    fn close(self) -> Result<Vec<AggregateRecord>> {
        let label = window_label(self.start, self.end)?;
        Ok(self
            .accumulators
            .into_iter()
            .map(|acc| acc.freeze(&label))
            .collect())
    }
}

#[derive(Debug)]
enum WindowState {
    /// No tick seen yet.
    Empty,
    /// A window is accepting ticks.
    Open(OpenWindow),
    /// `finalize` has run.
    Flushed,
}

/// Consumes time-ordered ticks and emits one aggregate per (window, pair).
#[derive(Debug)]
pub struct WindowAggregator {
    window_size_ms: i64,
    normalizer: TimestampNormalizer,
    state: WindowState,
    /// Aggregates of closed windows not yet taken.
    completed: Vec<AggregateRecord>,
    ticks_ingested: u64,
    windows_closed: u64,
}

impl WindowAggregator {
    /// Create an aggregator with the given window length and anchor date.
    pub fn new(window_size_ms: u64, anchor_date: NaiveDate) -> Result<Self> {
        if window_size_ms == 0 {
            return Err(Error::invalid_configuration("time window is missing"));
        }
        let window_size_ms = i64::try_from(window_size_ms).map_err(|_| {
            Error::invalid_configuration(format!("time window of {} ms is too large", window_size_ms))
        })?;

        Ok(Self {
            window_size_ms,
            normalizer: TimestampNormalizer::new(anchor_date),
            state: WindowState::Empty,
            completed: Vec::new(),
            ticks_ingested: 0,
            windows_closed: 0,
        })
    }

    /// Create an aggregator from configuration, resolving the anchor date now.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.window.window_size_ms()?,
            config.run.resolve_anchor_date(),
        )
    }

    /// Add a tick.
    pub fn ingest(&mut self, tick: &Tick) -> Result<()> {
        match &mut self.state {
            WindowState::Flushed => {
                return Err(Error::invalid_state("cannot ingest after finalize"));
            }
            WindowState::Open(window) if window.contains(tick.ts_ms) => {
                if tick.ts_ms < window.start {
                    warn!(
                        ts_ms = tick.ts_ms,
                        window_start = window.start,
                        pair = %tick.currency_pair,
                        "tick precedes open window start"
                    );
                }
                window.add_tick(tick)?;
            }
            WindowState::Open(_) => {
                self.close_open_window()?;
                self.start_window(tick)?;
            }
            WindowState::Empty => self.start_window(tick)?,
        }
        self.ticks_ingested += 1;
        Ok(())
    }

    /// Validate a raw row against this run's anchor date, then add it.
    pub fn ingest_raw(&mut self, raw: &RawTick) -> Result<()> {
        if self.is_finalized() {
            return Err(Error::invalid_state("cannot ingest after finalize"));
        }
        let tick = raw.resolve(&self.normalizer)?;
        self.ingest(&tick)
    }

    /// Add multiple ticks.
    pub fn ingest_all<'a>(&mut self, ticks: impl IntoIterator<Item = &'a Tick>) -> Result<()> {
        for tick in ticks {
            self.ingest(tick)?;
        }
        Ok(())
    }

    /// Take aggregates of windows closed so far.
    pub fn take_completed(&mut self) -> Vec<AggregateRecord> {
        std::mem::take(&mut self.completed)
    }

    /// Close the open window and return every aggregate not yet taken.
    pub fn finalize(&mut self) -> Result<Vec<AggregateRecord>> {
        if self.is_finalized() {
            return Err(Error::invalid_state("aggregator already finalized"));
        }
        self.close_open_window()?;
        self.state = WindowState::Flushed;
        Ok(self.take_completed())
    }

    fn start_window(&mut self, tick: &Tick) -> Result<()> {
        let window = OpenWindow::open(tick, self.window_size_ms)?;
        debug!(start = window.start, end = window.end, "opened window");
        self.state = WindowState::Open(window);
        Ok(())
    }

    fn close_open_window(&mut self) -> Result<()> {
        if let WindowState::Open(window) = std::mem::replace(&mut self.state, WindowState::Empty) {
            debug!(
                start = window.start,
                end = window.end,
                pairs = window.accumulators.len(),
                "closing window"
            );
            self.completed.extend(window.close()?);
            self.windows_closed += 1;
        }
        Ok(())
    }

    /// Window length in milliseconds.
    pub fn window_size_ms(&self) -> u64 {
        self.window_size_ms as u64
    }

    /// Date every clock time is pinned to.
    pub fn anchor_date(&self) -> NaiveDate {
        self.normalizer.anchor_date()
    }

    /// Bounds `[start, end)` of the open window, if any.
    pub fn open_window(&self) -> Option<(TimestampMs, TimestampMs)> {
        match &self.state {
            WindowState::Open(window) => Some((window.start, window.end)),
            _ => None,
        }
    }

    /// Number of distinct pairs in the open window.
    pub fn open_pair_count(&self) -> usize {
        match &self.state {
            WindowState::Open(window) => window.accumulators.len(),
            _ => 0,
        }
    }

    /// Whether `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, WindowState::Flushed)
    }

    /// Ticks accepted so far.
    pub fn ticks_ingested(&self) -> u64 {
        self.ticks_ingested
    }

    /// Windows closed so far.
    pub fn windows_closed(&self) -> u64 {
        self.windows_closed
    }
}
