//! Snapshot capture and restore.
//!
//! ## Versioning
//!
//! - `SNAPSHOT_VERSION`: current record format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format whose fields still mean the same
//!   thing. Bump only on breaking changes (renamed or repurposed fields).
//!
//! Records from remote stores are untrusted in shape. `from_record` reads
//! every field on its own and falls back to the zero value for anything
//! missing, negative or non-numeric, so one bad field never discards the rest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::state::{EconomyState, Identity, PlayerId, ProducerKind, ResourceKind};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Oldest format version whose fields can be read as-is.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Complete, self-describing record of an `EconomyState`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: u32,
    pub points: u64,
    pub all_time_points: u64,
    pub starter_level: u64,
    /// Producer counts keyed by `ProducerKind::key()`.
    pub producers: BTreeMap<String, u64>,
    /// Tier resources keyed by `ResourceKind::key()`.
    pub tier_resources: BTreeMap<String, u64>,
    pub total_feeds: u64,
    pub player_id: Option<PlayerId>,
    pub username: Option<String>,
}

impl Snapshot {
    /// Record every field of `state`.
    pub fn capture(state: &EconomyState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            points: state.points,
            all_time_points: state.all_time_points,
            starter_level: state.starter_level,
            producers: ProducerKind::all()
                .iter()
                .map(|k| (k.key().to_string(), state.producer(*k)))
                .collect(),
            tier_resources: ResourceKind::all()
                .iter()
                .map(|k| (k.key().to_string(), state.resource(*k)))
                .collect(),
            total_feeds: state.total_feeds,
            player_id: state.identity.as_ref().map(|i| i.player_id),
            username: state.identity.as_ref().map(|i| i.username.clone()),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.player_id.map(|player_id| Identity {
            player_id,
            username: self.username.clone().unwrap_or_default(),
        })
    }

    pub fn producer(&self, kind: ProducerKind) -> u64 {
        self.producers.get(kind.key()).copied().unwrap_or(0)
    }

    pub fn resource(&self, kind: ResourceKind) -> u64 {
        self.tier_resources.get(kind.key()).copied().unwrap_or(0)
    }

    /// JSON form handed to persistence collaborators.
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rebuild a snapshot from an arbitrary, possibly partial record.
    pub fn from_record(record: &Value) -> Self {
        let empty = Map::new();
        let obj = match record.as_object() {
            Some(obj) => obj,
            None => {
                warn!(kind = json_kind(record), "snapshot_record_not_object");
                &empty
            }
        };

        let version = read_u64(obj, "version").min(u32::MAX as u64) as u32;
        if version < MIN_COMPATIBLE_VERSION {
            warn!(
                version,
                min_compatible = MIN_COMPATIBLE_VERSION,
                "snapshot_version_too_old"
            );
        }

        let producers = read_table(obj.get("producers"), |key| {
            ProducerKind::from_key(key).map(|k| k.key())
        });
        let tier_resources = read_table(obj.get("tierResources"), |key| {
            ResourceKind::from_key(key).map(|k| k.key())
        });

        let player_id = obj.get("playerId").and_then(as_count);
        let username = obj
            .get("username")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            version,
            points: read_u64(obj, "points"),
            all_time_points: read_u64(obj, "allTimePoints"),
            starter_level: read_u64(obj, "starterLevel").max(1),
            producers,
            tier_resources,
            total_feeds: read_u64(obj, "totalFeeds"),
            player_id,
            username,
        }
    }
}

/// Replace every economy field of `state` with the snapshot's values.
///
/// The live player id never changes once assigned; a snapshot's identity is
/// adopted only while the state has none.
pub fn apply(state: &mut EconomyState, snapshot: &Snapshot) {
    state.points = snapshot.points;
    state.all_time_points = snapshot.all_time_points;
    state.starter_level = snapshot.starter_level.max(1);
    for kind in ProducerKind::all() {
        state.producers[kind.index()] = snapshot.producer(*kind);
    }
    for kind in ResourceKind::all() {
        state.tier_resources[kind.index()] = snapshot.resource(*kind);
    }
    state.total_feeds = snapshot.total_feeds;
    if state.identity.is_none() {
        state.identity = snapshot.identity();
    }
}

/// Non-negative integer view of a JSON value. Fractions are floored.
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if !f.is_finite() {
        return None;
    }
    if f <= 0.0 {
        return Some(0);
    }
    // float-to-int casts saturate at u64::MAX
    Some(f.floor() as u64)
}

fn read_u64(obj: &Map<String, Value>, key: &str) -> u64 {
    obj.get(key).and_then(as_count).unwrap_or(0)
}

fn read_table(
    value: Option<&Value>,
    known: impl Fn(&str) -> Option<&'static str>,
) -> BTreeMap<String, u64> {
    let mut table = BTreeMap::new();
    if let Some(obj) = value.and_then(Value::as_object) {
        for (key, v) in obj {
            if let Some(canonical) = known(key) {
                table.insert(canonical.to_string(), as_count(v).unwrap_or(0));
            }
        }
    }
    table
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
