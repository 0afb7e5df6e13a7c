//! Idle Sourdough economy rules: pure functions over `EconomyState`.

use super::catalog::{ProductionEffect, PurchaseKind, ScheduleEntry, RENOWN_PER_BONUS_STEP};
use super::state::{Counter, EconomyState, ResourceKind};

/// Manual feed: add `starter_level` points. Returns the points awarded.
pub fn feed(state: &mut EconomyState) -> u64 {
    let gain = state.starter_level;
    state.credit(Counter::Points, gain);
    state.total_feeds = state.total_feeds.saturating_add(1);
    gain
}

/// Current price of `kind`, one entry per input.
pub fn quote(state: &EconomyState, kind: PurchaseKind) -> Vec<(Counter, u64)> {
    let recipe = kind.recipe();
    let n = state.get(recipe.scale_by);
    recipe
        .inputs
        .iter()
        .map(|ingredient| (ingredient.counter, ingredient.curve.cost(n)))
        .collect()
}

/// Whether every input of `kind` is covered right now.
pub fn can_afford(state: &EconomyState, kind: PurchaseKind) -> bool {
    quote(state, kind)
        .iter()
        .all(|(counter, cost)| state.get(*counter) >= *cost)
}

/// Try to buy or craft `kind`. Returns true if applied.
///
/// All costs are priced before anything is debited, and nothing is debited
/// unless every input is covered.
pub fn purchase(state: &mut EconomyState, kind: PurchaseKind) -> bool {
    let costs = quote(state, kind);
    if !costs.iter().all(|(counter, cost)| state.get(*counter) >= *cost) {
        return false;
    }
    for (counter, cost) in &costs {
        state.debit(*counter, *cost);
    }
    let recipe = kind.recipe();
    state.credit(recipe.output, recipe.batch);
    true
}

/// Apply one firing of a producer clock. Returns what was granted, if
/// anything.
pub fn apply_production(state: &mut EconomyState, entry: &ScheduleEntry) -> Option<(Counter, u64)> {
    let count = state.producer(entry.producer);
    if count == 0 {
        return None;
    }
    let (counter, amount) = match entry.effect {
        ProductionEffect::Yield(counter) => (counter, count),
        ProductionEffect::Hire(target) => (Counter::Producer(target), count),
        ProductionEffect::Renown => (Counter::Resource(ResourceKind::Renown), count),
        ProductionEffect::StandBonus => (Counter::Points, count.saturating_mul(stand_multiplier(state))),
    };
    state.credit(counter, amount);
    Some((counter, amount))
}

/// Points each stand grants per bonus firing.
pub fn stand_multiplier(state: &EconomyState) -> u64 {
    1 + state.resource(ResourceKind::Renown) / RENOWN_PER_BONUS_STEP
}

/// Format a counter value with thousands separators.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
