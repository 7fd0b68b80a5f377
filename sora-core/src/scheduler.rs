//! Virtual-time timer queue
//!
//! Provides the timer primitives the effect engine is built on:
//! - One-shot timers (`schedule_once`)
//! - Repeating timers (`schedule_repeating`), first firing after one interval
//! - Cancellation by handle; cancelling a fired or unknown timer is a no-op
//!
//! The scheduler never reads the wall clock. Its owner moves time forward,
//! which keeps spawn counts and grace delays deterministic under test.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use sora_core::Scheduler;
//!
//! let mut timers = Scheduler::new();
//! let tick = timers.schedule_repeating(Duration::from_millis(100), "tick");
//! timers.schedule_once(Duration::from_millis(250), "done");
//!
//! let until = Duration::from_millis(300);
//! let mut fired = vec![];
//! while let Some((_, payload)) = timers.next_due(until) {
//!     fired.push(payload);
//! }
//! timers.settle(until);
//!
//! assert_eq!(fired, vec!["tick", "tick", "done", "tick"]);
//! assert!(timers.cancel(tick));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

/// Identifies a scheduled timer for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Timer<T> {
    due: Duration,
    every: Option<Duration>,
    payload: T,
}

/// Timer queue keyed by handle, ordered by due time then scheduling order.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerHandle, Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `payload` once after `delay`.
    pub fn schedule_once(&mut self, delay: Duration, payload: T) -> TimerHandle {
        self.insert(self.now + delay, None, payload)
    }

    /// Fire `payload` every `interval`, starting one interval from now.
    ///
    /// A zero interval is clamped to one millisecond so a repeating timer
    /// can never fire forever within a single `advance`.
    pub fn schedule_repeating(&mut self, interval: Duration, payload: T) -> TimerHandle {
        let interval = interval.max(Duration::from_millis(1));
        self.insert(self.now + interval, Some(interval), payload)
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(&handle).is_some()
    }

    /// Check if a timer is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Move the clock forward without firing anything.
    ///
    /// Call after draining `next_due(until)`. Never moves time backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, due: Duration, every: Option<Duration>, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            handle,
            Timer {
                due,
                every,
                payload,
            },
        );
        handle
    }

    fn earliest(&self) -> Option<(TimerHandle, Duration)> {
        self.timers
            .iter()
            .min_by_key(|(handle, timer)| (timer.due, **handle))
            .map(|(handle, timer)| (*handle, timer.due))
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pop the earliest timer due at or before `until`.
    ///
    /// Advances the clock to that timer's due time. Repeating timers are
    /// re-armed one interval later and keep their handle.
    pub fn next_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let (handle, due) = self.earliest()?;
        if due > until {
            return None;
        }
        self.now = self.now.max(due);

        let timer = self.timers.get_mut(&handle)?;
        match timer.every {
            Some(every) => {
                timer.due += every;
                Some((handle, timer.payload.clone()))
            }
            None => self
                .timers
                .remove(&handle)
                .map(|timer| (handle, timer.payload)),
        }
    }
}
