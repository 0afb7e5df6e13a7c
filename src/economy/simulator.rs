//! Balance simulator for Idle Sourdough.
//! Run with: cargo test simulate_greedy -- --nocapture
//!
//! A scripted player feeds a few times per second and spends greedily,
//! saving loaves for starter upgrades first.

use super::logic;
use super::scheduler::Scheduler;
use super::state::{EconomyState, ProducerKind, ResourceKind};
use super::PurchaseKind;
use crate::time::TICKS_PER_SEC;

/// Loaves held back for the next starter upgrade and its twists.
const LOAF_RESERVE: u64 = 14;

/// Next purchase for the scripted player: upgrade the starter whenever
/// possible, keep a loaf reserve for it, then grow the kitchen.
fn choose(state: &EconomyState) -> Option<PurchaseKind> {
    let loaves = state.resource(ResourceKind::Loaf);
    let twists = state.resource(ResourceKind::Twist);
    let stand_cost = logic::quote(state, PurchaseKind::Stand)
        .first()
        .map(|(_, cost)| *cost)
        .unwrap_or(u64::MAX);
    let wants = [
        (PurchaseKind::StarterUpgrade, true),
        (PurchaseKind::Twist, twists < 5),
        (PurchaseKind::Loaf, loaves < LOAF_RESERVE),
        (
            PurchaseKind::Stand,
            loaves >= LOAF_RESERVE.saturating_add(stand_cost),
        ),
        (PurchaseKind::Manager, true),
        (PurchaseKind::Baker, true),
        (PurchaseKind::Chef, true),
    ];
    wants
        .iter()
        .find(|(kind, want)| *want && logic::can_afford(state, *kind))
        .map(|(kind, _)| *kind)
}

struct Run {
    state: EconomyState,
    purchases: u32,
    max_idle_gap: u64,
}

fn report(state: &EconomyState, seconds: u64, purchases: u32) {
    eprintln!("┌─── {}m{}s ─────────────────────────", seconds / 60, seconds % 60);
    eprintln!(
        "│ Points: {}  All-time: {}  Starter: {}  Purchases: {}",
        logic::format_number(state.points),
        logic::format_number(state.all_time_points),
        state.starter_level,
        purchases
    );
    let producers: Vec<String> = ProducerKind::all()
        .iter()
        .map(|k| format!("{}:{}", k.name(), state.producer(*k)))
        .collect();
    eprintln!("│ Producers: {}", producers.join("  "));
    let resources: Vec<String> = ResourceKind::all()
        .iter()
        .map(|k| format!("{}:{}", k.name(), state.resource(*k)))
        .collect();
    eprintln!("│ Resources: {}", resources.join("  "));
    eprintln!("└────────────────────────────────────");
}

fn simulate(total_seconds: u64, feeds_per_second: u32) -> Run {
    let mut state = EconomyState::new();
    let mut sched = Scheduler::new();
    let mut purchases = 0;
    let mut last_purchase = 0;
    let mut max_idle_gap = 0;
    let report_times = [60, 300, 900, 1800, 3600];

    for second in 1..=total_seconds {
        for _ in 0..feeds_per_second {
            logic::feed(&mut state);
        }
        let all_time_before = state.all_time_points;
        sched.advance(&mut state, u64::from(TICKS_PER_SEC));
        assert!(state.all_time_points >= all_time_before);

        let mut bought = false;
        // Safety limit on purchases per second
        for _ in 0..50 {
            match choose(&state) {
                Some(kind) => {
                    assert!(logic::purchase(&mut state, kind));
                    purchases += 1;
                    bought = true;
                }
                None => break,
            }
        }
        if bought {
            max_idle_gap = max_idle_gap.max(second - last_purchase);
            last_purchase = second;
        }

        if report_times.contains(&second) {
            report(&state, second, purchases);
        }
    }

    Run {
        state,
        purchases,
        max_idle_gap,
    }
}

#[test]
fn simulate_greedy_30min() {
    let run = simulate(1800, 5);
    eprintln!("max idle gap: {}s", run.max_idle_gap);
    assert!(run.purchases > 0);
    assert!(run.state.producer(ProducerKind::Chef) > 0);
    assert!(run.state.all_time_points >= run.state.points);
}

#[test]
fn simulate_greedy_1hour_reaches_upgrades() {
    let run = simulate(3600, 5);
    assert!(
        run.state.starter_level > 1,
        "starter never upgraded: {:?}",
        run.state
    );
}

#[test]
fn simulation_is_deterministic() {
    let a = simulate(600, 3);
    let b = simulate(600, 3);
    assert_eq!(a.state, b.state);
    assert_eq!(a.purchases, b.purchases);
}
