//! Recommended production rate search
//!
//! Looks for the smallest rate at which every tier of a chain runs a
//! (nearly) whole number of buildings. Candidates are multiples of
//! `60 / lcm(cycle times)`; this is a bounded heuristic and falls back to one
//! unit per minute when nothing fits.

use log::debug;

use crate::calculator::{SECONDS_PER_MINUTE, collect_all_buildings, collect_cycle_times};
use crate::models::{Configuration, RecipeNode};

const MAX_MULTIPLIER: u32 = 100;

/// Allowed distance of a building count from the nearest integer
const WHOLE_TOLERANCE: f64 = 0.05;

const FALLBACK_RATE: f64 = 1.0;

/// Smallest candidate rate (units per minute) giving whole building counts
pub fn find_recommended_rate(tree: &RecipeNode, config: Configuration) -> f64 {
    let cycle_times = collect_cycle_times(tree);
    if cycle_times.is_empty() {
        return FALLBACK_RATE;
    }

    let lcm_time = cycle_times
        .iter()
        .fold(1u64, |acc, time| lcm(acc, whole_seconds(*time)));
    let base_increment = SECONDS_PER_MINUTE / lcm_time as f64;

    for multiplier in 1..=MAX_MULTIPLIER {
        let candidate = base_increment * f64::from(multiplier);
        if all_buildings_whole(tree, candidate, config) {
            debug!(
                "Recommended rate {:.4}/min (lcm {}s, multiplier {})",
                candidate, lcm_time, multiplier
            );
            return candidate;
        }
    }

    debug!("No whole-number rate within {} multiples of {:.4}/min", MAX_MULTIPLIER, base_increment);
    FALLBACK_RATE
}

fn all_buildings_whole(tree: &RecipeNode, rate: f64, config: Configuration) -> bool {
    collect_all_buildings(tree, rate, config)
        .counts
        .values()
        .all(|count| is_near_whole(*count))
}

fn is_near_whole(value: f64) -> bool {
    let fraction = (value - value.round()).abs();
    !(fraction > WHOLE_TOLERANCE && fraction < 1.0 - WHOLE_TOLERANCE)
}

fn whole_seconds(time: f64) -> u64 {
    (time.round() as u64).max(1)
}

pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// Least common multiple, saturating at `u64::MAX`
pub fn lcm(a: u64, b: u64) -> u64 {
    let divisor = gcd(a, b);
    if divisor == 0 {
        return 0;
    }
    (a / divisor).saturating_mul(b)
}
