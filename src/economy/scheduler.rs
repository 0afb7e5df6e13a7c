//! Passive production on a virtual clock.
//!
//! Every schedule entry owns a timer. `advance` walks the clock forward to
//! each due instant in turn, so a long catch-up replays every elapsed
//! interval in the same order a live session would have seen them.

use super::catalog::{ScheduleEntry, SCHEDULE};
use super::logic;
use super::state::{Counter, EconomyState, ProducerKind};

/// One producer clock firing that granted something.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    /// Virtual tick the clock fired at.
    pub at_tick: u64,
    pub producer: ProducerKind,
    pub counter: Counter,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduler {
    /// Ticks elapsed since the session started.
    now: u64,
    /// Absolute tick each clock next fires at, parallel to `SCHEDULE`.
    next_due: [u64; SCHEDULE.len()],
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_due: SCHEDULE.map(|entry| entry.interval_ticks),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Ticks until `entry_index` next fires.
    pub fn ticks_until(&self, entry_index: usize) -> Option<u64> {
        self.next_due
            .get(entry_index)
            .map(|due| due.saturating_sub(self.now))
    }

    /// Advance the clock by `delta_ticks`, firing every clock that falls due.
    pub fn advance(&mut self, state: &mut EconomyState, delta_ticks: u64) -> Vec<Firing> {
        let target = self.now.saturating_add(delta_ticks);
        let mut firings = Vec::new();

        loop {
            let due = match self.next_due.iter().copied().min() {
                Some(due) if due <= target => due,
                _ => break,
            };
            self.now = due;
            for (i, entry) in SCHEDULE.iter().enumerate() {
                if self.next_due[i] != due {
                    continue;
                }
                if let Some(firing) = fire(state, entry, due) {
                    firings.push(firing);
                }
                self.next_due[i] = due.saturating_add(entry.interval_ticks);
            }
        }

        self.now = target;
        firings
    }
}

fn fire(state: &mut EconomyState, entry: &ScheduleEntry, at_tick: u64) -> Option<Firing> {
    let (counter, amount) = logic::apply_production(state, entry)?;
    Some(Firing {
        at_tick,
        producer: entry.producer,
        counter,
        amount,
    })
}
