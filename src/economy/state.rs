//! Idle Sourdough economy state definitions.

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the remote snapshot store.
pub type PlayerId = u64;

/// Kinds of producers (units that work without player input).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProducerKind {
    Chef,
    Baker,
    Manager,
    Stand,
}

impl ProducerKind {
    pub const COUNT: usize = 4;

    /// All producer kinds in display order.
    pub fn all() -> &'static [ProducerKind] {
        &[
            ProducerKind::Chef,
            ProducerKind::Baker,
            ProducerKind::Manager,
            ProducerKind::Stand,
        ]
    }

    pub fn index(self) -> usize {
        match self {
            ProducerKind::Chef => 0,
            ProducerKind::Baker => 1,
            ProducerKind::Manager => 2,
            ProducerKind::Stand => 3,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ProducerKind::Chef => "Chef",
            ProducerKind::Baker => "Baker",
            ProducerKind::Manager => "Manager",
            ProducerKind::Stand => "Market Stand",
        }
    }

    /// Stable key used in snapshots.
    pub fn key(self) -> &'static str {
        match self {
            ProducerKind::Chef => "chef",
            ProducerKind::Baker => "baker",
            ProducerKind::Manager => "manager",
            ProducerKind::Stand => "stand",
        }
    }

    pub fn from_key(key: &str) -> Option<ProducerKind> {
        Self::all().iter().copied().find(|k| k.key() == key)
    }
}

/// Intermediate crafted goods, spent on upgrades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Loaf,
    Twist,
    /// Leveling counter raised by market stands.
    Renown,
}

impl ResourceKind {
    pub const COUNT: usize = 3;

    pub fn all() -> &'static [ResourceKind] {
        &[ResourceKind::Loaf, ResourceKind::Twist, ResourceKind::Renown]
    }

    pub fn index(self) -> usize {
        match self {
            ResourceKind::Loaf => 0,
            ResourceKind::Twist => 1,
            ResourceKind::Renown => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Loaf => "Loaves",
            ResourceKind::Twist => "Twists",
            ResourceKind::Renown => "Renown",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ResourceKind::Loaf => "loaf",
            ResourceKind::Twist => "twist",
            ResourceKind::Renown => "renown",
        }
    }

    pub fn from_key(key: &str) -> Option<ResourceKind> {
        Self::all().iter().copied().find(|k| k.key() == key)
    }
}

/// Any single counter of the economy. Recipes and production effects
/// address state through this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Counter {
    Points,
    StarterLevel,
    Producer(ProducerKind),
    Resource(ResourceKind),
}

impl Counter {
    pub fn name(self) -> &'static str {
        match self {
            Counter::Points => "Points",
            Counter::StarterLevel => "Starter level",
            Counter::Producer(kind) => kind.name(),
            Counter::Resource(kind) => kind.name(),
        }
    }
}

/// Player identity, assigned on the first successful save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub player_id: PlayerId,
    pub username: String,
}

/// Full economy state of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EconomyState {
    /// Spendable currency.
    pub points: u64,
    /// Points earned over the whole game; never decreases.
    pub all_time_points: u64,
    /// Points per manual feed. Always at least 1.
    pub starter_level: u64,
    /// Owned producers, indexed by `ProducerKind::index()`.
    pub producers: [u64; ProducerKind::COUNT],
    /// Tier resources, indexed by `ResourceKind::index()`.
    pub tier_resources: [u64; ResourceKind::COUNT],
    /// Manual feeds performed.
    pub total_feeds: u64,
    pub identity: Option<Identity>,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::new()
    }
}

impl EconomyState {
    pub fn new() -> Self {
        Self {
            points: 0,
            all_time_points: 0,
            starter_level: 1,
            producers: [0; ProducerKind::COUNT],
            tier_resources: [0; ResourceKind::COUNT],
            total_feeds: 0,
            identity: None,
        }
    }

    pub fn producer(&self, kind: ProducerKind) -> u64 {
        self.producers[kind.index()]
    }

    pub fn resource(&self, kind: ResourceKind) -> u64 {
        self.tier_resources[kind.index()]
    }

    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Points => self.points,
            Counter::StarterLevel => self.starter_level,
            Counter::Producer(kind) => self.producer(kind),
            Counter::Resource(kind) => self.resource(kind),
        }
    }

    /// Add to a counter. Points also count toward `all_time_points`.
    pub fn credit(&mut self, counter: Counter, amount: u64) {
        match counter {
            Counter::Points => {
                self.points = self.points.saturating_add(amount);
                self.all_time_points = self.all_time_points.saturating_add(amount);
            }
            Counter::StarterLevel => {
                self.starter_level = self.starter_level.saturating_add(amount);
            }
            Counter::Producer(kind) => {
                let slot = &mut self.producers[kind.index()];
                *slot = slot.saturating_add(amount);
            }
            Counter::Resource(kind) => {
                let slot = &mut self.tier_resources[kind.index()];
                *slot = slot.saturating_add(amount);
            }
        }
    }

    /// Remove from a counter. Callers check holdings first; the starter
    /// level never drops below 1.
    pub(crate) fn debit(&mut self, counter: Counter, amount: u64) {
        match counter {
            Counter::Points => self.points = self.points.saturating_sub(amount),
            Counter::StarterLevel => {
                self.starter_level = self.starter_level.saturating_sub(amount).max(1);
            }
            Counter::Producer(kind) => {
                let slot = &mut self.producers[kind.index()];
                *slot = slot.saturating_sub(amount);
            }
            Counter::Resource(kind) => {
                let slot = &mut self.tier_resources[kind.index()];
                *slot = slot.saturating_sub(amount);
            }
        }
    }
}
