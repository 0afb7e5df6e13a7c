//! Idle Sourdough economy engine.

pub mod catalog;
pub mod logic;
pub mod scheduler;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod simulator;

use std::collections::VecDeque;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::persistence::{IdentityStore, RankMetric, SnapshotStore};
use crate::time::GameTime;

pub use catalog::PurchaseKind;
use scheduler::Scheduler;
use snapshot::Snapshot;
use state::{Counter, EconomyState, Identity, PlayerId, ProducerKind};

/// Where a gain came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainSource {
    Feed,
    Producer(ProducerKind),
}

/// Event for the presentation layer (floating "+N", log lines, toasts).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Gain {
        source: GainSource,
        counter: Counter,
        amount: u64,
    },
    Purchased {
        kind: PurchaseKind,
    },
    Declined {
        kind: PurchaseKind,
    },
    Saved {
        player_id: PlayerId,
    },
    SaveFailed {
        message: String,
    },
    Restored {
        player_id: Option<PlayerId>,
    },
}

/// Totals produced by one `tick` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ticks: u64,
    pub firings: usize,
    /// Summed grants per producer and counter, in first-firing order.
    pub gains: Vec<(ProducerKind, Counter, u64)>,
}

impl TickReport {
    pub fn total(&self, counter: Counter) -> u64 {
        self.gains
            .iter()
            .filter(|(_, c, _)| *c == counter)
            .map(|(_, _, amount)| *amount)
            .sum()
    }

    fn add(&mut self, producer: ProducerKind, counter: Counter, amount: u64) {
        match self
            .gains
            .iter_mut()
            .find(|(p, c, _)| *p == producer && *c == counter)
        {
            Some(entry) => entry.2 = entry.2.saturating_add(amount),
            None => self.gains.push((producer, counter, amount)),
        }
    }
}

/// A save whose snapshot has been captured but whose store call has not
/// finished. The engine keeps running while it is outstanding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSave {
    snapshot: Snapshot,
}

impl PendingSave {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

/// Owner of the single live `EconomyState` of a session.
pub struct Engine {
    state: EconomyState,
    scheduler: Scheduler,
    clock: GameTime,
    config: EngineConfig,
    notifications: VecDeque<Notification>,
    ticks_since_save: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_state(config, EconomyState::new())
    }

    pub fn with_state(config: EngineConfig, state: EconomyState) -> Self {
        let config = config.normalized();
        Self {
            state,
            scheduler: Scheduler::new(),
            clock: GameTime::new(config.max_catch_up_ms),
            config,
            notifications: VecDeque::new(),
            ticks_since_save: 0,
        }
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ── Actions ─────────────────────────────────────────────────

    /// Feed the starter. Returns the points awarded.
    pub fn feed(&mut self) -> u64 {
        let gain = logic::feed(&mut self.state);
        debug!(gain, points = self.state.points, "feed");
        self.notify(Notification::Gain {
            source: GainSource::Feed,
            counter: Counter::Points,
            amount: gain,
        });
        gain
    }

    /// Current price of `kind`, one entry per input.
    pub fn quote(&self, kind: PurchaseKind) -> Vec<(Counter, u64)> {
        logic::quote(&self.state, kind)
    }

    pub fn can_afford(&self, kind: PurchaseKind) -> bool {
        logic::can_afford(&self.state, kind)
    }

    /// Try to buy `kind`. Returns false, with state untouched, when any
    /// input is short.
    pub fn purchase(&mut self, kind: PurchaseKind) -> bool {
        if logic::purchase(&mut self.state, kind) {
            debug!(kind = ?kind, "purchase_applied");
            self.notify(Notification::Purchased { kind });
            true
        } else {
            debug!(kind = ?kind, points = self.state.points, "purchase_declined");
            self.notify(Notification::Declined { kind });
            false
        }
    }

    /// Change the display name. The player id is unaffected.
    pub fn set_username(&mut self, username: &str) {
        self.config.username = username.to_string();
        if let Some(identity) = self.state.identity.as_mut() {
            identity.username = username.to_string();
        }
    }

    // ── Time ────────────────────────────────────────────────────

    /// Advance passive production by `delta_ticks` discrete ticks.
    pub fn tick(&mut self, delta_ticks: u32) -> TickReport {
        let mut report = TickReport {
            ticks: delta_ticks as u64,
            ..TickReport::default()
        };
        if delta_ticks == 0 {
            return report;
        }
        let firings = self.scheduler.advance(&mut self.state, delta_ticks as u64);
        report.firings = firings.len();
        for firing in &firings {
            report.add(firing.producer, firing.counter, firing.amount);
        }
        for (producer, counter, amount) in report.gains.clone() {
            self.notify(Notification::Gain {
                source: GainSource::Producer(producer),
                counter,
                amount,
            });
        }
        self.ticks_since_save = self.ticks_since_save.saturating_add(delta_ticks as u64);
        report
    }

    /// Advance to wall-clock time `now_ms`, replaying any suspended gap.
    pub fn advance_to(&mut self, now_ms: f64) -> TickReport {
        let ticks = self.clock.update(now_ms);
        self.tick(ticks)
    }

    /// Whether enough ticks have passed since the last save attempt.
    pub fn autosave_due(&self) -> bool {
        let interval = self.config.autosave_interval_ticks as u64;
        interval > 0 && self.ticks_since_save >= interval
    }

    // ── Snapshots ───────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Replace the live state with `snapshot` in one step.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        snapshot::apply(&mut self.state, snapshot);
        info!(
            player_id = ?snapshot.player_id,
            all_time_points = snapshot.all_time_points,
            "snapshot_restored"
        );
        self.notify(Notification::Restored {
            player_id: self.state.identity.as_ref().map(|i| i.player_id),
        });
    }

    /// Restore from an untrusted record; bad fields fall back to defaults.
    pub fn restore_record(&mut self, record: &Value) {
        self.restore(&Snapshot::from_record(record));
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Capture the snapshot to send. Feeds and ticks may continue while the
    /// store call is in flight.
    pub fn begin_save(&mut self) -> PendingSave {
        self.ticks_since_save = 0;
        let mut snapshot = self.snapshot();
        if snapshot.username.is_none() {
            snapshot.username = Some(self.config.username.clone());
        }
        PendingSave { snapshot }
    }

    /// Apply the store's answer to a pending save. Assigns identity on the
    /// first success; leaves state untouched on failure.
    pub fn finish_save<E>(
        &mut self,
        pending: PendingSave,
        result: Result<PlayerId, E>,
    ) -> Result<PlayerId, EngineError>
    where
        E: Into<EngineError>,
    {
        let assigned = match result {
            Ok(id) => id,
            Err(error) => {
                let error: EngineError = error.into();
                let message = error.to_string();
                warn!(error = %message, "save_failed");
                self.notify(Notification::SaveFailed { message });
                return Err(error);
            }
        };

        let player_id = match self.state.identity.as_ref().map(|i| i.player_id) {
            Some(live) => {
                if live != assigned {
                    warn!(live, assigned, "save_returned_foreign_id");
                }
                live
            }
            None => {
                let username = pending
                    .snapshot
                    .username
                    .unwrap_or_else(|| self.config.username.clone());
                self.state.identity = Some(Identity {
                    player_id: assigned,
                    username,
                });
                assigned
            }
        };
        info!(player_id, "saved");
        self.notify(Notification::Saved { player_id });
        Ok(player_id)
    }

    /// Save through `store` and remember the id in `ids`.
    pub fn save_to(
        &mut self,
        store: &mut dyn SnapshotStore,
        ids: &mut dyn IdentityStore,
    ) -> Result<PlayerId, EngineError> {
        let pending = self.begin_save();
        let result = store.save(pending.snapshot());
        let player_id = self.finish_save(pending, result)?;
        ids.set_stored_id(player_id);
        Ok(player_id)
    }

    /// Load `id` from `store` and restore it. State is untouched on failure.
    pub fn restore_from(
        &mut self,
        store: &dyn SnapshotStore,
        id: PlayerId,
    ) -> Result<(), EngineError> {
        match store.load(id) {
            Ok(record) => {
                self.restore_record(&record);
                Ok(())
            }
            Err(error) => {
                let error = EngineError::from(error);
                warn!(player_id = id, error = %error, "restore_failed");
                Err(error)
            }
        }
    }

    /// Restore the game remembered by `ids`, if any. Returns whether a game
    /// was restored.
    pub fn resume(
        &mut self,
        store: &dyn SnapshotStore,
        ids: &dyn IdentityStore,
    ) -> Result<bool, EngineError> {
        match ids.stored_id() {
            Some(id) => self.restore_from(store, id).map(|_| true),
            None => Ok(false),
        }
    }

    /// Top `limit` players by all-time points.
    pub fn leaderboard(
        &self,
        store: &dyn SnapshotStore,
        limit: usize,
    ) -> Result<Vec<Snapshot>, EngineError> {
        Ok(store.ranked(RankMetric::AllTimePoints, limit)?)
    }

    // ── Notifications ───────────────────────────────────────────

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Take every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > self.config.log_capacity {
            self.notifications.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::persistence::{MemoryIdentity, MemoryStore};
    use state::ResourceKind;

    #[test]
    fn feed_emits_gain() {
        let mut engine = Engine::default();
        assert_eq!(engine.feed(), 1);
        assert_eq!(
            engine.drain_notifications(),
            vec![Notification::Gain {
                source: GainSource::Feed,
                counter: Counter::Points,
                amount: 1
            }]
        );
    }

    #[test]
    fn declined_purchase_is_reported_not_raised() {
        let mut engine = Engine::default();
        for _ in 0..49 {
            engine.feed();
        }
        engine.drain_notifications();
        assert!(!engine.purchase(PurchaseKind::Chef));
        assert_eq!(engine.state().points, 49);
        assert_eq!(
            engine.drain_notifications(),
            vec![Notification::Declined {
                kind: PurchaseKind::Chef
            }]
        );
    }

    #[test]
    fn tick_reports_summed_gains() {
        let mut state = EconomyState::new();
        state.producers[ProducerKind::Chef.index()] = 2;
        state.producers[ProducerKind::Baker.index()] = 3;
        let mut engine = Engine::with_state(EngineConfig::default(), state);
        let report = engine.tick(200);
        assert_eq!(report.firings, 5);
        assert_eq!(report.total(Counter::Points), 8);
        assert_eq!(report.total(Counter::Resource(ResourceKind::Loaf)), 3);
        assert_eq!(engine.drain_notifications().len(), 2);
    }

    #[test]
    fn advance_to_replays_wall_clock() {
        let mut state = EconomyState::new();
        state.producers[ProducerKind::Chef.index()] = 1;
        let mut engine = Engine::with_state(EngineConfig::default(), state);
        engine.advance_to(1_000.0);
        engine.advance_to(61_000.0);
        // 60 seconds = 600 ticks = 12 chef firings
        assert_eq!(engine.state().points, 12);
    }

    #[test]
    fn notification_log_is_bounded() {
        let config = EngineConfig {
            log_capacity: 3,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config);
        for _ in 0..10 {
            engine.feed();
        }
        assert_eq!(engine.notifications().count(), 3);
    }

    #[test]
    fn autosave_due_after_interval() {
        let mut engine = Engine::default();
        engine.tick(299);
        assert!(!engine.autosave_due());
        engine.tick(1);
        assert!(engine.autosave_due());
        engine.begin_save();
        assert!(!engine.autosave_due());
    }

    #[test]
    fn first_save_assigns_identity() {
        let mut engine = Engine::default();
        engine.set_username("levain");
        let mut store = MemoryStore::new();
        let mut ids = MemoryIdentity::default();
        let id = engine.save_to(&mut store, &mut ids).unwrap();
        assert_eq!(ids.stored_id(), Some(id));
        assert_eq!(
            engine.state().identity,
            Some(Identity {
                player_id: id,
                username: "levain".into()
            })
        );
    }

    #[test]
    fn failed_save_leaves_state_unchanged() {
        let mut engine = Engine::default();
        engine.feed();
        let before = engine.state().clone();
        let pending = engine.begin_save();
        let err = engine
            .finish_save(pending, Err(StoreError::Unavailable("timeout".into())))
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::PersistenceUnavailable {
                message: "timeout".into()
            }
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn player_id_is_fixed_once_assigned() {
        let mut engine = Engine::default();
        let pending = engine.begin_save();
        engine.finish_save(pending, Ok::<_, StoreError>(7)).unwrap();
        let pending = engine.begin_save();
        assert_eq!(engine.finish_save(pending, Ok::<_, StoreError>(8)).unwrap(), 7);
        assert_eq!(engine.state().identity.as_ref().map(|i| i.player_id), Some(7));
    }

    #[test]
    fn set_username_keeps_player_id() {
        let mut engine = Engine::default();
        let pending = engine.begin_save();
        engine.finish_save(pending, Ok::<_, StoreError>(3)).unwrap();
        engine.set_username("crumb");
        assert_eq!(
            engine.state().identity,
            Some(Identity {
                player_id: 3,
                username: "crumb".into()
            })
        );
    }

    #[test]
    fn restore_from_missing_id_reports_not_found() {
        let mut engine = Engine::default();
        engine.feed();
        let before = engine.state().clone();
        let store = MemoryStore::new();
        assert_eq!(engine.restore_from(&store, 5), Err(EngineError::NotFound(5)));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn resume_without_stored_id_is_fresh_start() {
        let mut engine = Engine::default();
        let store = MemoryStore::new();
        let ids = MemoryIdentity::default();
        assert_eq!(engine.resume(&store, &ids), Ok(false));
    }

    #[test]
    fn config_is_normalized_on_construction() {
        let config = EngineConfig {
            log_capacity: 0,
            ..EngineConfig::default()
        };
        let engine = Engine::new(config);
        assert_eq!(engine.config().log_capacity, 1);
    }

    #[test]
    fn restore_keeps_scheduler_phase() {
        let mut engine = Engine::default();
        engine.tick(30);
        let snap = engine.snapshot();
        engine.restore(&snap);
        assert_eq!(engine.scheduler().now(), 30);
    }
}
