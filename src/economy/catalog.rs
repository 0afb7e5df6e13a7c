//! Static balance tables: purchase recipes, cost curves and producer clocks.

use super::state::{Counter, ProducerKind, ResourceKind};

/// Exponential cost curve with a hard ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostCurve {
    pub base: u64,
    /// Per-unit growth factor. At least 1.0 for every catalog entry.
    pub growth: f64,
    pub cap: u64,
}

impl CostCurve {
    pub const fn new(base: u64, growth: f64, cap: u64) -> Self {
        Self { base, growth, cap }
    }

    /// `min(floor(base * growth^n), cap)`.
    pub fn cost(&self, n: u64) -> u64 {
        let raw = (self.base as f64 * self.growth.powf(n as f64)).floor();
        if !raw.is_finite() || raw >= self.cap as f64 {
            return self.cap;
        }
        // raw is finite, non-negative and below cap here
        (raw as u64).min(self.cap)
    }
}

/// One resource a recipe consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ingredient {
    pub counter: Counter,
    pub curve: CostCurve,
}

/// Everything the player can buy or craft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PurchaseKind {
    Chef,
    Baker,
    Manager,
    Stand,
    Loaf,
    Twist,
    StarterUpgrade,
}

impl PurchaseKind {
    /// All purchases in display order.
    pub fn all() -> &'static [PurchaseKind] {
        &[
            PurchaseKind::Chef,
            PurchaseKind::Baker,
            PurchaseKind::Manager,
            PurchaseKind::Stand,
            PurchaseKind::Loaf,
            PurchaseKind::Twist,
            PurchaseKind::StarterUpgrade,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            PurchaseKind::Chef => "Hire a Chef",
            PurchaseKind::Baker => "Hire a Baker",
            PurchaseKind::Manager => "Hire a Manager",
            PurchaseKind::Stand => "Open a Market Stand",
            PurchaseKind::Loaf => "Bake a Loaf",
            PurchaseKind::Twist => "Braid Twists",
            PurchaseKind::StarterUpgrade => "Upgrade Starter",
        }
    }

    /// Key to buy (1-7 mapped to display order).
    pub fn key(self) -> char {
        match self {
            PurchaseKind::Chef => '1',
            PurchaseKind::Baker => '2',
            PurchaseKind::Manager => '3',
            PurchaseKind::Stand => '4',
            PurchaseKind::Loaf => '5',
            PurchaseKind::Twist => '6',
            PurchaseKind::StarterUpgrade => '7',
        }
    }

    pub fn from_key(key: char) -> Option<PurchaseKind> {
        Self::all().iter().copied().find(|k| k.key() == key)
    }

    pub fn recipe(self) -> &'static Recipe {
        match self {
            PurchaseKind::Chef => &CHEF,
            PurchaseKind::Baker => &BAKER,
            PurchaseKind::Manager => &MANAGER,
            PurchaseKind::Stand => &STAND,
            PurchaseKind::Loaf => &LOAF,
            PurchaseKind::Twist => &TWIST,
            PurchaseKind::StarterUpgrade => &STARTER_UPGRADE,
        }
    }
}

/// Static descriptor of a purchase.
#[derive(Debug, PartialEq)]
pub struct Recipe {
    pub inputs: &'static [Ingredient],
    /// Counter whose current value is the cost exponent `n`.
    pub scale_by: Counter,
    pub output: Counter,
    /// Units credited per purchase.
    pub batch: u64,
}

static CHEF: Recipe = Recipe {
    inputs: &[Ingredient {
        counter: Counter::Points,
        curve: CostCurve::new(50, 1.02, 10_000),
    }],
    scale_by: Counter::Producer(ProducerKind::Chef),
    output: Counter::Producer(ProducerKind::Chef),
    batch: 1,
};

static BAKER: Recipe = Recipe {
    inputs: &[Ingredient {
        counter: Counter::Points,
        curve: CostCurve::new(400, 1.05, 60_000),
    }],
    scale_by: Counter::Producer(ProducerKind::Baker),
    output: Counter::Producer(ProducerKind::Baker),
    batch: 1,
};

static MANAGER: Recipe = Recipe {
    inputs: &[Ingredient {
        counter: Counter::Points,
        curve: CostCurve::new(2_500, 1.08, 250_000),
    }],
    scale_by: Counter::Producer(ProducerKind::Manager),
    output: Counter::Producer(ProducerKind::Manager),
    batch: 1,
};

static STAND: Recipe = Recipe {
    inputs: &[Ingredient {
        counter: Counter::Resource(ResourceKind::Loaf),
        curve: CostCurve::new(5, 1.10, 120),
    }],
    scale_by: Counter::Producer(ProducerKind::Stand),
    output: Counter::Producer(ProducerKind::Stand),
    batch: 1,
};

static LOAF: Recipe = Recipe {
    inputs: &[Ingredient {
        counter: Counter::Points,
        curve: CostCurve::new(200, 1.0, 200),
    }],
    scale_by: Counter::Resource(ResourceKind::Loaf),
    output: Counter::Resource(ResourceKind::Loaf),
    batch: 1,
};

static TWIST: Recipe = Recipe {
    inputs: &[
        Ingredient {
            counter: Counter::Resource(ResourceKind::Loaf),
            curve: CostCurve::new(2, 1.0, 2),
        },
        Ingredient {
            counter: Counter::Points,
            curve: CostCurve::new(100, 1.0, 100),
        },
    ],
    scale_by: Counter::Resource(ResourceKind::Twist),
    output: Counter::Resource(ResourceKind::Twist),
    batch: 3,
};

static STARTER_UPGRADE: Recipe = Recipe {
    inputs: &[
        Ingredient {
            counter: Counter::Resource(ResourceKind::Loaf),
            curve: CostCurve::new(10, 1.0, 10),
        },
        Ingredient {
            counter: Counter::Resource(ResourceKind::Twist),
            curve: CostCurve::new(5, 1.0, 5),
        },
    ],
    scale_by: Counter::StarterLevel,
    output: Counter::StarterLevel,
    batch: 1,
};

/// What a producer clock does when it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProductionEffect {
    /// Add `count` units of a resource (points count toward all-time).
    Yield(Counter),
    /// Add `count` units of a lower-tier producer, free of charge.
    Hire(ProducerKind),
    /// Add `count` renown.
    Renown,
    /// Add `count * (1 + renown / RENOWN_PER_BONUS_STEP)` points.
    StandBonus,
}

/// Renown needed for each extra point of stand bonus.
pub const RENOWN_PER_BONUS_STEP: u64 = 10;

/// One recurring producer clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduleEntry {
    pub producer: ProducerKind,
    pub interval_ticks: u64,
    pub effect: ProductionEffect,
}

/// Producer clocks in firing order. Clocks that fall due on the same tick
/// fire in this order.
pub const SCHEDULE: [ScheduleEntry; 5] = [
    ScheduleEntry {
        producer: ProducerKind::Chef,
        interval_ticks: 50,
        effect: ProductionEffect::Yield(Counter::Points),
    },
    ScheduleEntry {
        producer: ProducerKind::Baker,
        interval_ticks: 200,
        effect: ProductionEffect::Yield(Counter::Resource(ResourceKind::Loaf)),
    },
    ScheduleEntry {
        producer: ProducerKind::Manager,
        interval_ticks: 300,
        effect: ProductionEffect::Hire(ProducerKind::Chef),
    },
    ScheduleEntry {
        producer: ProducerKind::Stand,
        interval_ticks: 600,
        effect: ProductionEffect::Renown,
    },
    ScheduleEntry {
        producer: ProducerKind::Stand,
        interval_ticks: 100,
        effect: ProductionEffect::StandBonus,
    },
];
