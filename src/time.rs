//! Fixed-timestep game clock using an accumulator pattern.
//!
//! The shell reports wall-clock timestamps at whatever rate frames arrive.
//! `GameTime` turns them into a whole number of discrete ticks, carrying the
//! remainder forward, so producer schedules stay deterministic and testable.
//!
//! A backgrounded tab or a suspended process shows up as one large delta.
//! That delta is replayed in full up to `max_catch_up_ms`; anything longer is
//! dropped.

use tracing::info;

/// Game ticks per real-time second. Producer intervals are counted in ticks,
/// so this rate fixes their real-time cadence.
pub const TICKS_PER_SEC: u32 = 10;

const MS_PER_TICK: f64 = 1000.0 / TICKS_PER_SEC as f64;

pub struct GameTime {
    /// Longest single gap that is replayed
    max_catch_up_ms: f64,
    /// Accumulated milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(max_catch_up_ms: u64) -> Self {
        Self {
            max_catch_up_ms: max_catch_up_ms as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp and get the number of ticks to process.
    ///
    /// Timestamps that go backwards yield zero ticks. Non-finite timestamps
    /// are ignored and leave the clock where it was.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if !now_ms.is_finite() {
            return 0;
        }
        let delta = match self.last_timestamp {
            Some(prev) => {
                let d = (now_ms - prev).max(0.0);
                if d > self.max_catch_up_ms {
                    info!(
                        gap_ms = d,
                        replayed_ms = self.max_catch_up_ms,
                        "catch_up_clamped"
                    );
                    self.max_catch_up_ms
                } else {
                    d
                }
            }
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / MS_PER_TICK).floor();
        let ticks = ticks.min(u32::MAX as f64) as u32;
        self.accumulator -= ticks as f64 * MS_PER_TICK;
        ticks
    }
}
