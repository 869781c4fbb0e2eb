use chrono::NaiveDate;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::customer::{Customer, CustomerId, MembershipTier};

/// Signup dates go back at most this far before the reference date.
const MAX_TENURE_DAYS: i64 = 3 * 365;

/// Synthesize `count` customers with sequential ids starting at 1. Tier and
/// loyalty points correlate with tenure measured against `reference_date`.
pub fn synthesize_customers(
    count: u32,
    reference_date: NaiveDate,
    rng: &mut StdRng,
) -> Vec<Customer> {
    (1..=count).map(|id| synthesize_customer(CustomerId(id), reference_date, rng)).collect()
}

fn synthesize_customer(
    id: CustomerId,
    reference_date: NaiveDate,
    rng: &mut StdRng,
) -> Customer {
    let tenure_days = rng.gen_range(0..=MAX_TENURE_DAYS);
    let signup_date = reference_date - chrono::Duration::days(tenure_days);

    let membership_tier = draw_tier(tenure_days, rng);
    let loyalty_points = draw_loyalty_points(membership_tier, tenure_days, rng);

    Customer { id, membership_tier, loyalty_points, signup_date }
}

/// Longer tenure shifts the tier distribution upward; customers younger than
/// thirty days are never Platinum.
fn draw_tier(tenure_days: i64, rng: &mut StdRng) -> MembershipTier {
    let tiers = [
        MembershipTier::Bronze,
        MembershipTier::Silver,
        MembershipTier::Gold,
        MembershipTier::Platinum,
    ];
    let weights: [f64; 4] = if tenure_days < 30 {
        [0.80, 0.15, 0.05, 0.00]
    } else if tenure_days < 180 {
        [0.60, 0.25, 0.12, 0.03]
    } else if tenure_days < 365 {
        [0.40, 0.35, 0.20, 0.05]
    } else {
        [0.20, 0.30, 0.35, 0.15]
    };

    match WeightedIndex::new(weights) {
        Ok(index) => tiers[index.sample(rng)],
        Err(_) => MembershipTier::Bronze,
    }
}

/// Tier base points plus a tenure bonus capped at 5000.
fn draw_loyalty_points(tier: MembershipTier, tenure_days: i64, rng: &mut StdRng) -> u32 {
    let base = match tier {
        MembershipTier::Bronze => rng.gen_range(0..=2_000),
        MembershipTier::Silver => rng.gen_range(1_000..=8_000),
        MembershipTier::Gold => rng.gen_range(5_000..=15_000),
        MembershipTier::Platinum => rng.gen_range(10_000..=25_000),
    };
    let tenure_bonus = (tenure_days * 2).min(5_000) as u32;
    base + tenure_bonus
}
