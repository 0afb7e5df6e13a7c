//! Persistence and identity collaborators.
//!
//! The engine never performs I/O itself. It hands snapshots to a
//! `SnapshotStore` and remembers the assigned id through an `IdentityStore`.

use serde_json::Value;
use tracing::warn;

use crate::economy::snapshot::Snapshot;
use crate::economy::state::PlayerId;
use crate::error::StoreError;

/// Counter a leaderboard is ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RankMetric {
    #[default]
    AllTimePoints,
    Points,
    StarterLevel,
}

impl RankMetric {
    pub fn value_of(self, snapshot: &Snapshot) -> u64 {
        match self {
            RankMetric::AllTimePoints => snapshot.all_time_points,
            RankMetric::Points => snapshot.points,
            RankMetric::StarterLevel => snapshot.starter_level,
        }
    }
}

/// Remote store of snapshots keyed by player id.
pub trait SnapshotStore {
    /// Store a snapshot. A snapshot carrying a `player_id` overwrites that
    /// player's record; one without gets a fresh id.
    fn save(&mut self, snapshot: &Snapshot) -> Result<PlayerId, StoreError>;

    /// Fetch the raw record for `id`. Records are not trusted to be
    /// well-formed; callers restore them through `Snapshot::from_record`.
    fn load(&self, id: PlayerId) -> Result<Value, StoreError>;

    /// Up to `limit` snapshots, highest `metric` first. Ties keep store order.
    fn ranked(&self, metric: RankMetric, limit: usize) -> Result<Vec<Snapshot>, StoreError>;
}

/// Device-local storage of the player id.
pub trait IdentityStore {
    fn stored_id(&self) -> Option<PlayerId>;
    fn set_stored_id(&mut self, id: PlayerId);
}

/// In-process `SnapshotStore`. Records are kept as JSON values so loads go
/// through the same defensive path as a real remote store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<(PlayerId, Value)>,
    next_id: PlayerId,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            offline: false,
        }
    }

    /// Simulate an outage: every call fails until switched back on.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Put an arbitrary record in place, e.g. one written by another client.
    pub fn insert_record(&mut self, id: PlayerId, record: Value) {
        match self.records.iter_mut().find(|(rid, _)| *rid == id) {
            Some(slot) => slot.1 = record,
            None => self.records.push((id, record)),
        }
        self.next_id = self.next_id.max(id.saturating_add(1));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record as one JSON array, for writing to a save slot.
    pub fn to_json(&self) -> Value {
        Value::Array(self.records.iter().map(|(_, record)| record.clone()).collect())
    }

    /// Rebuild a store from `to_json` output. Entries without a usable
    /// `playerId` are dropped.
    pub fn from_json(value: &Value) -> Self {
        let mut store = Self::new();
        for record in value.as_array().into_iter().flatten() {
            match Snapshot::from_record(record).player_id {
                Some(id) if id > 0 => store.insert_record(id, record.clone()),
                _ => warn!("stored_record_without_id"),
            }
        }
        store
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("store is offline".into()));
        }
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<PlayerId, StoreError> {
        self.check_online()?;
        let id = match snapshot.player_id {
            Some(id) => id,
            None => self.next_id.max(1),
        };
        let mut stored = snapshot.clone();
        stored.player_id = Some(id);
        self.insert_record(id, stored.to_record());
        Ok(id)
    }

    fn load(&self, id: PlayerId) -> Result<Value, StoreError> {
        self.check_online()?;
        self.records
            .iter()
            .find(|(rid, _)| *rid == id)
            .map(|(_, record)| record.clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn ranked(&self, metric: RankMetric, limit: usize) -> Result<Vec<Snapshot>, StoreError> {
        self.check_online()?;
        let mut snapshots: Vec<Snapshot> = self
            .records
            .iter()
            .map(|(_, record)| Snapshot::from_record(record))
            .collect();
        // sort_by is stable, so equal scores keep insertion order
        snapshots.sort_by(|a, b| metric.value_of(b).cmp(&metric.value_of(a)));
        snapshots.truncate(limit);
        Ok(snapshots)
    }
}

/// In-process `IdentityStore`.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    id: Option<PlayerId>,
}

impl MemoryIdentity {
    pub fn new(id: Option<PlayerId>) -> Self {
        Self { id }
    }
}

impl IdentityStore for MemoryIdentity {
    fn stored_id(&self) -> Option<PlayerId> {
        self.id
    }

    fn set_stored_id(&mut self, id: PlayerId) {
        self.id = Some(id);
    }
}

/// localStorage key holding the player id.
#[cfg(target_arch = "wasm32")]
const PLAYER_ID_KEY: &str = "idle_sourdough_player_id";

/// localStorage key holding every saved record.
#[cfg(target_arch = "wasm32")]
const RECORDS_KEY: &str = "idle_sourdough_records";

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Browser `SnapshotStore`. Stands in for a remote backend by keeping all
/// records in one localStorage slot.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore {
    inner: MemoryStore,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// Load whatever the slot holds. A corrupt slot is discarded.
    pub fn open() -> Self {
        let raw = get_storage().and_then(|s| s.get_item(RECORDS_KEY).ok().flatten());
        let inner = match raw.map(|json| serde_json::from_str::<Value>(&json)) {
            Some(Ok(value)) => MemoryStore::from_json(&value),
            Some(Err(e)) => {
                warn!(error = %e, "stored_records_unreadable");
                if let Some(storage) = get_storage() {
                    let _ = storage.remove_item(RECORDS_KEY);
                }
                MemoryStore::new()
            }
            None => MemoryStore::new(),
        };
        Self { inner }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let storage =
            get_storage().ok_or_else(|| StoreError::Unavailable("no localStorage".into()))?;
        storage
            .set_item(RECORDS_KEY, &self.inner.to_json().to_string())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for LocalStorageStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<PlayerId, StoreError> {
        let id = self.inner.save(snapshot)?;
        self.flush()?;
        Ok(id)
    }

    fn load(&self, id: PlayerId) -> Result<Value, StoreError> {
        self.inner.load(id)
    }

    fn ranked(&self, metric: RankMetric, limit: usize) -> Result<Vec<Snapshot>, StoreError> {
        self.inner.ranked(metric, limit)
    }
}

/// Browser `IdentityStore` backed by localStorage.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageIdentity;

#[cfg(target_arch = "wasm32")]
impl IdentityStore for LocalStorageIdentity {
    fn stored_id(&self) -> Option<PlayerId> {
        let raw = get_storage()?.get_item(PLAYER_ID_KEY).ok()??;
        match raw.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(raw = %raw, "stored_player_id_unparsable");
                None
            }
        }
    }

    fn set_stored_id(&mut self, id: PlayerId) {
        let Some(storage) = get_storage() else {
            return;
        };
        if let Err(e) = storage.set_item(PLAYER_ID_KEY, &id.to_string()) {
            warn!(error = ?e, "player_id_not_stored");
        }
    }
}
