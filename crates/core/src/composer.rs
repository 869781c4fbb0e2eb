use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use rust_decimal::Decimal;

use crate::catalog::CatalogIndex;
use crate::crosssell::CrossSellGraph;
use crate::domain::customer::{Customer, MembershipTier};
use crate::domain::order::{
    ComposedOrder, Order, OrderId, OrderLineItem, OrderSource, OrderStatus, PaymentMethod,
    ShippingMethod,
};
use crate::domain::product::{Category, Product};
use crate::pricing::{price_line, LinePricing};

/// At most this many cross-sell items ride along in one order.
const MAX_CROSS_SELL_PER_ORDER: usize = 3;

/// Probability that a non-main slot tries the cross-sell graph first.
const CROSS_SELL_PROBABILITY: f64 = 0.6;

/// Bulk-quantity overrides: (probability, min quantity, max quantity). Only
/// categories with plausible bulk buying participate.
const BULK_PATTERNS: [(f64, u32, u32); 4] =
    [(0.05, 10, 50), (0.03, 15, 100), (0.08, 5, 20), (0.02, 8, 30)];

/// Composes one order at a time from a frozen catalog and cross-sell graph.
/// Composition only reads shared state; all per-order randomness comes from
/// the caller-provided rng, so orders can be composed independently.
pub struct OrderComposer<'a> {
    catalog: &'a CatalogIndex,
    graph: &'a CrossSellGraph,
    reference_date: NaiveDate,
    history_start: NaiveDate,
}

impl<'a> OrderComposer<'a> {
    pub fn new(
        catalog: &'a CatalogIndex,
        graph: &'a CrossSellGraph,
        reference_date: NaiveDate,
        history_start: NaiveDate,
    ) -> Self {
        Self { catalog, graph, reference_date, history_start }
    }

    /// Compose the order header and its line items. An empty catalog yields
    /// an abandoned (zero-item) order rather than an error; the caller
    /// decides how loudly to report it.
    pub fn compose(&self, id: OrderId, customer: &Customer, rng: &mut StdRng) -> ComposedOrder {
        let order_date = self.draw_order_date(rng);
        let provisional = provisional_amount(rng);

        let order = Order {
            id,
            customer_id: customer.id,
            order_date,
            status: draw_status(order_date, self.reference_date, rng),
            total_amount: provisional,
            source: draw_source(rng),
            payment_method: draw_payment_method(provisional, rng),
            shipping_method: draw_shipping_method(provisional, rng),
        };

        let items = self.compose_items(&order, customer, rng);
        if items.is_empty() {
            tracing::debug!(order_id = order.id.0, "order abandoned: no eligible products");
        }

        ComposedOrder { order, items }
    }

    fn compose_items(
        &self,
        order: &Order,
        customer: &Customer,
        rng: &mut StdRng,
    ) -> Vec<OrderLineItem> {
        let target = draw_order_size(customer.membership_tier, customer.loyalty_points, rng);
        let tier = customer.membership_tier;

        let mut items = Vec::with_capacity(target);
        let mut used = BTreeSet::new();

        let main = match self.catalog.select_weighted(rng, &used, None, tier, order.order_date) {
            Ok(product) => product,
            Err(_) => return items,
        };
        used.insert(main.id);
        let quantity = draw_quantity(main, rng);
        items.push(self.line_item(order.id, main, tier, quantity, false, rng));

        let mut remaining = target.saturating_sub(1);
        let max_cross_sell = remaining.min(MAX_CROSS_SELL_PER_ORDER);
        let mut cross_sold = 0;

        while remaining > 0 {
            if cross_sold < max_cross_sell && rng.gen_bool(CROSS_SELL_PROBABILITY) {
                if let Some(item) = self.try_cross_sell(order.id, main, tier, &mut used, rng) {
                    items.push(item);
                    cross_sold += 1;
                    remaining -= 1;
                    continue;
                }
            }

            match self.catalog.select_weighted(rng, &used, None, tier, order.order_date) {
                Ok(product) => {
                    used.insert(product.id);
                    let quantity = draw_quantity(product, rng);
                    items.push(self.line_item(order.id, product, tier, quantity, false, rng));
                    remaining -= 1;
                }
                Err(_) => {
                    // Catalog exhausted: a short order is fine.
                    tracing::debug!(
                        order_id = order.id.0,
                        composed = items.len(),
                        requested = target,
                        "catalog exhausted before requested item count"
                    );
                    break;
                }
            }
        }

        items
    }

    fn try_cross_sell(
        &self,
        order_id: OrderId,
        main: &Product,
        tier: MembershipTier,
        used: &mut BTreeSet<crate::domain::product::ProductId>,
        rng: &mut StdRng,
    ) -> Option<OrderLineItem> {
        let related = self.graph.related_subcategories(main.category, &main.subcategory);
        if related.is_empty() {
            return None;
        }

        let target_subcategory = related[rng.gen_range(0..related.len())];
        let product = self
            .catalog
            .select_uniform(rng, used, Some((main.category, target_subcategory)))
            .ok()?;
        used.insert(product.id);

        let quantity = rng.gen_range(1..=3);
        Some(self.line_item(order_id, product, tier, quantity, true, rng))
    }

    fn line_item(
        &self,
        order_id: OrderId,
        product: &Product,
        tier: MembershipTier,
        quantity: u32,
        is_cross_sell: bool,
        rng: &mut StdRng,
    ) -> OrderLineItem {
        let LinePricing { unit_price, discount_rate, tax_amount, shipping_cost, total_price } =
            price_line(product, tier, quantity, is_cross_sell, rng);

        OrderLineItem {
            order_id,
            product_id: product.id,
            quantity,
            unit_price,
            discount_rate,
            tax_amount,
            shipping_cost,
            total_price,
            is_cross_sell,
        }
    }

    fn draw_order_date(&self, rng: &mut StdRng) -> NaiveDate {
        let span = (self.reference_date - self.history_start).num_days().max(0);
        self.history_start + chrono::Duration::days(rng.gen_range(0..=span))
    }
}

/// Item-count draw: higher tiers (or enough loyalty points) get a heavier
/// right tail, Bronze is capped at 3.
pub fn draw_order_size(tier: MembershipTier, loyalty_points: u32, rng: &mut StdRng) -> usize {
    let (counts, weights): (&[usize], &[f64]) =
        if tier == MembershipTier::Platinum || loyalty_points > 15_000 {
            (&[1, 2, 3, 4, 5, 6], &[0.15, 0.25, 0.25, 0.20, 0.10, 0.05])
        } else if tier == MembershipTier::Gold || loyalty_points > 8_000 {
            (&[1, 2, 3, 4, 5], &[0.25, 0.30, 0.25, 0.15, 0.05])
        } else if tier == MembershipTier::Silver || loyalty_points > 3_000 {
            (&[1, 2, 3, 4], &[0.40, 0.30, 0.20, 0.10])
        } else {
            (&[1, 2, 3], &[0.60, 0.25, 0.15])
        };

    match WeightedIndex::new(weights) {
        Ok(index) => counts[index.sample(rng)],
        Err(_) => 1,
    }
}

/// Quantity for a non-cross-sell line: bulk-pattern overrides first, then the
/// category's single-vs-multiple split with its max.
pub fn draw_quantity(product: &Product, rng: &mut StdRng) -> u32 {
    if matches!(
        product.category,
        Category::Beauty | Category::Home | Category::Sports | Category::Toys
    ) {
        for (probability, min_quantity, max_quantity) in BULK_PATTERNS {
            if rng.gen_bool(probability) {
                return rng.gen_range(min_quantity..=max_quantity);
            }
        }
    }

    let (single, max_quantity) = quantity_pattern(product.category);
    if rng.gen_bool(single) {
        1
    } else {
        rng.gen_range(2..=max_quantity)
    }
}

fn quantity_pattern(category: Category) -> (f64, u32) {
    match category {
        Category::Electronics => (0.8, 3),
        Category::Clothing => (0.7, 5),
        Category::Beauty => (0.4, 8),
        Category::Home => (0.6, 4),
        Category::Sports => (0.7, 6),
        Category::Toys => (0.5, 10),
    }
}

/// Log-normal provisional order value, clamped to [10, 2000]. Kept only for
/// orders that end up with zero line items; reconciliation replaces it
/// everywhere else.
fn provisional_amount(rng: &mut StdRng) -> Decimal {
    let z: f64 = rng.sample(StandardNormal);
    let value = (4.5 + 0.8 * z).exp().clamp(10.0, 2000.0);
    Decimal::from_f64_retain(value).unwrap_or(Decimal::TEN).round_dp(2)
}

fn draw_status(order_date: NaiveDate, reference_date: NaiveDate, rng: &mut StdRng) -> OrderStatus {
    let age_days = (reference_date - order_date).num_days().max(0);

    if age_days == 0 {
        if rng.gen_bool(0.3) {
            OrderStatus::Pending
        } else {
            OrderStatus::Processing
        }
    } else if age_days <= 2 {
        if rng.gen_bool(0.4) {
            OrderStatus::Processing
        } else {
            OrderStatus::Shipped
        }
    } else if age_days <= 7 {
        if rng.gen_bool(0.7) {
            OrderStatus::Shipped
        } else {
            OrderStatus::Delivered
        }
    } else if rng.gen_bool(0.05) {
        OrderStatus::Returned
    } else if rng.gen_bool(0.02) {
        OrderStatus::Shipped
    } else {
        OrderStatus::Delivered
    }
}

fn draw_source(rng: &mut StdRng) -> OrderSource {
    let sources = [
        OrderSource::Web,
        OrderSource::MobileApp,
        OrderSource::MobileWeb,
        OrderSource::Api,
    ];
    weighted_pick(&sources, &[0.45, 0.30, 0.20, 0.05], rng)
}

fn draw_payment_method(order_value: Decimal, rng: &mut StdRng) -> PaymentMethod {
    if order_value > Decimal::from(200u32) {
        let methods = [
            PaymentMethod::CreditCard,
            PaymentMethod::Paypal,
            PaymentMethod::ApplePay,
            PaymentMethod::GooglePay,
        ];
        weighted_pick(&methods, &[0.60, 0.25, 0.10, 0.05], rng)
    } else {
        let methods = [
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Paypal,
            PaymentMethod::ApplePay,
        ];
        weighted_pick(&methods, &[0.50, 0.25, 0.15, 0.10], rng)
    }
}

fn draw_shipping_method(order_value: Decimal, rng: &mut StdRng) -> ShippingMethod {
    if order_value > Decimal::from(200u32) {
        let methods =
            [ShippingMethod::Express, ShippingMethod::Standard, ShippingMethod::Overnight];
        weighted_pick(&methods, &[0.4, 0.5, 0.1], rng)
    } else if order_value > Decimal::from(100u32) {
        let methods = [ShippingMethod::Standard, ShippingMethod::Express, ShippingMethod::Economy];
        weighted_pick(&methods, &[0.6, 0.3, 0.1], rng)
    } else {
        let methods = [ShippingMethod::Economy, ShippingMethod::Standard];
        weighted_pick(&methods, &[0.7, 0.3], rng)
    }
}

fn weighted_pick<T: Copy>(values: &[T], weights: &[f64], rng: &mut StdRng) -> T {
    match WeightedIndex::new(weights) {
        Ok(index) => values[index.sample(rng)],
        Err(_) => values[0],
    }
}
