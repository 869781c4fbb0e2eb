use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::customer::MembershipTier;
use crate::domain::product::{Category, Product};

/// Flat sales tax applied to the post-discount subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Stacked discounts never exceed this.
fn discount_cap() -> Decimal {
    Decimal::new(50, 2)
}

/// Priced output for one (product, quantity) pair. `total_price` includes
/// tax and shipping; the discount is already inside `unit_price`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinePricing {
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub total_price: Decimal,
}

/// Price one line. Pure apart from the draws taken from `rng`: the bundle
/// discount is a 30% coin flip, and cross-sell lines replace the stacked
/// scheme with one flat 0.10-0.20 uniform discount.
pub fn price_line(
    product: &Product,
    tier: MembershipTier,
    quantity: u32,
    is_cross_sell: bool,
    rng: &mut StdRng,
) -> LinePricing {
    let discount_rate = if is_cross_sell {
        decimal_from_f64(rng.gen_range(0.10..0.20)).round_dp(3)
    } else {
        stacked_discount(tier, quantity, rng)
    };

    let unit_price = (product.price * (Decimal::ONE - discount_rate)).round_dp(2);
    let subtotal = unit_price * Decimal::from(quantity);
    let tax_amount = (subtotal * tax_rate()).round_dp(2);
    let shipping_cost = shipping_cost(product, quantity);
    let total_price = (subtotal + tax_amount + shipping_cost).round_dp(2);

    LinePricing { unit_price, discount_rate, tax_amount, shipping_cost, total_price }
}

/// Membership + bulk + occasional bundle discount, capped at 0.50.
fn stacked_discount(tier: MembershipTier, quantity: u32, rng: &mut StdRng) -> Decimal {
    let mut discount = tier_discount(tier) + bulk_discount(quantity);
    if rng.gen_bool(0.30) {
        discount += Decimal::new(15, 2);
    }
    discount.min(discount_cap())
}

pub fn tier_discount(tier: MembershipTier) -> Decimal {
    match tier {
        MembershipTier::Platinum => Decimal::new(15, 2),
        MembershipTier::Gold => Decimal::new(10, 2),
        MembershipTier::Silver => Decimal::new(5, 2),
        MembershipTier::Bronze => Decimal::ZERO,
    }
}

pub fn bulk_discount(quantity: u32) -> Decimal {
    match quantity {
        q if q >= 10 => Decimal::new(20, 2),
        q if q >= 5 => Decimal::new(10, 2),
        q if q >= 3 => Decimal::new(5, 2),
        _ => Decimal::ZERO,
    }
}

/// Weight-banded shipping with category and quantity multipliers. Digital
/// products ship for free.
pub fn shipping_cost(product: &Product, quantity: u32) -> Decimal {
    if product.is_digital {
        return Decimal::ZERO;
    }

    let mut cost = if product.weight_kg <= 0.5 {
        Decimal::new(599, 2)
    } else if product.weight_kg <= 2.0 {
        Decimal::new(799, 2)
    } else if product.weight_kg <= 10.0 {
        Decimal::new(1299, 2)
    } else {
        Decimal::new(1999, 2)
    };

    if is_bulky(product) {
        cost *= Decimal::new(15, 1);
    } else if product.category == Category::Electronics {
        cost *= Decimal::new(12, 1);
    }

    if quantity >= 10 {
        cost *= Decimal::new(13, 1);
    } else if quantity >= 5 {
        cost *= Decimal::new(11, 1);
    }

    cost.round_dp(2)
}

fn is_bulky(product: &Product) -> bool {
    product.category == Category::Sports || product.subcategory == "Furniture"
}

fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}
