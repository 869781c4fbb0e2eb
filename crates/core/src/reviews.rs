use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use crate::catalog::CatalogIndex;
use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::ComposedOrder;
use crate::domain::product::Product;
use crate::domain::review::{Review, ReviewId};

/// Counters for one review-generation sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewReport {
    pub verified: usize,
    pub unverified: usize,
}

/// Produces up to `target` reviews in two phases. Phase one walks the
/// customers in id order and reviews a sampled share of each customer's
/// orders; those reviews are verified purchases and carry the order id.
/// Phase two tops up to the target with standalone reviews drawn from
/// uniform (customer, product) pairs, with no backing order.
pub struct ReviewLinker<'a> {
    catalog: &'a CatalogIndex,
    customers: &'a [Customer],
    reference_date: NaiveDate,
    history_start: NaiveDate,
}

impl<'a> ReviewLinker<'a> {
    pub fn new(
        catalog: &'a CatalogIndex,
        customers: &'a [Customer],
        reference_date: NaiveDate,
        history_start: NaiveDate,
    ) -> Self {
        Self { catalog, customers, reference_date, history_start }
    }

    pub fn generate(
        &self,
        target: u32,
        orders: &[ComposedOrder],
        rng: &mut StdRng,
    ) -> (Vec<Review>, ReviewReport) {
        let mut reviews = Vec::with_capacity(target as usize);
        let mut report = ReviewReport::default();

        self.link_purchase_reviews(target, orders, rng, &mut reviews);
        report.verified = reviews.len();

        self.fill_standalone_reviews(target, rng, &mut reviews, &mut report);

        (reviews, report)
    }

    /// Phase one: every customer with at least one non-empty order reviews a
    /// uniform 20-60% share of their orders, never fewer than one.
    fn link_purchase_reviews(
        &self,
        target: u32,
        orders: &[ComposedOrder],
        rng: &mut StdRng,
        reviews: &mut Vec<Review>,
    ) {
        let mut by_customer: BTreeMap<CustomerId, Vec<&ComposedOrder>> = BTreeMap::new();
        for composed in orders {
            if !composed.items.is_empty() {
                by_customer.entry(composed.order.customer_id).or_default().push(composed);
            }
        }

        for (_, customer_orders) in by_customer {
            if reviews.len() >= target as usize {
                break;
            }

            let fraction = rng.gen_range(0.2..0.6);
            let count = (((customer_orders.len() as f64) * fraction) as usize)
                .max(1)
                .min(customer_orders.len());

            let mut sampled = customer_orders;
            sampled.shuffle(rng);

            for composed in sampled.into_iter().take(count) {
                self.review_order_items(target, composed, rng, reviews);
            }
        }
    }

    fn review_order_items(
        &self,
        target: u32,
        composed: &ComposedOrder,
        rng: &mut StdRng,
        reviews: &mut Vec<Review>,
    ) {
        let count = rng.gen_range(1..=3usize).min(composed.items.len());
        let mut picked: Vec<_> = composed.items.iter().collect();
        picked.shuffle(rng);

        for item in picked.into_iter().take(count) {
            if reviews.len() >= target as usize {
                break;
            }
            let Some(product) = self.catalog.get(item.product_id) else {
                continue;
            };

            let lag = chrono::Duration::days(rng.gen_range(1..=30));
            let review_date = (composed.order.order_date + lag).min(self.reference_date);

            reviews.push(Review {
                id: ReviewId(reviews.len() as u32 + 1),
                customer_id: composed.order.customer_id,
                product_id: product.id,
                rating: purchase_rating(product, rng),
                review_date,
                verified_purchase: true,
                order_id: Some(composed.order.id),
            });
        }
    }

    /// Phase two: standalone reviews from uniform (customer, product) pairs.
    /// Verification here is probabilistic and never carries an order id.
    fn fill_standalone_reviews(
        &self,
        target: u32,
        rng: &mut StdRng,
        reviews: &mut Vec<Review>,
        report: &mut ReviewReport,
    ) {
        let products = self.catalog.products();
        if products.is_empty() || self.customers.is_empty() {
            return;
        }

        while reviews.len() < target as usize {
            let product = &products[rng.gen_range(0..products.len())];
            let customer = &self.customers[rng.gen_range(0..self.customers.len())];

            let span = (self.reference_date - self.history_start).num_days().max(0);
            let review_date =
                self.history_start + chrono::Duration::days(rng.gen_range(0..=span));

            let recent = (self.reference_date - review_date).num_days() <= 30;
            let verified_probability = if recent {
                0.85
            } else if customer.membership_tier.is_premium() {
                0.70
            } else {
                0.60
            };
            let verified_purchase = rng.gen_bool(verified_probability);

            if verified_purchase {
                report.verified += 1;
            } else {
                report.unverified += 1;
            }

            reviews.push(Review {
                id: ReviewId(reviews.len() as u32 + 1),
                customer_id: customer.id,
                product_id: product.id,
                rating: standalone_rating(product, rng),
                review_date,
                verified_purchase,
                order_id: None,
            });
        }
    }
}

/// Rating for a reviewed purchase: jitter around the product's own rating,
/// or a price-banded draw when the product has no rating yet.
fn purchase_rating(product: &Product, rng: &mut StdRng) -> f64 {
    let rating = if product.is_rated() {
        product.rating + rng.gen_range(-0.5..=0.5)
    } else {
        let (low, high) = price_band(product.price);
        rng.gen_range(low..=high)
    };
    round_rating(rating)
}

/// Standalone ratings swing wider than purchase-linked ones.
fn standalone_rating(product: &Product, rng: &mut StdRng) -> f64 {
    let rating = if product.is_rated() {
        product.rating + rng.gen_range(-0.8..=0.8)
    } else {
        rng.gen_range(2.0..=4.5)
    };
    round_rating(rating)
}

fn price_band(price: Decimal) -> (f64, f64) {
    if price > Decimal::from(200u32) {
        (3.5, 4.8)
    } else if price > Decimal::from(100u32) {
        (3.2, 4.6)
    } else {
        (3.0, 4.4)
    }
}

fn round_rating(rating: f64) -> f64 {
    (rating.clamp(1.0, 5.0) * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use super::{purchase_rating, ReviewLinker};
    use crate::catalog::CatalogIndex;
    use crate::domain::customer::{Customer, CustomerId, MembershipTier};
    use crate::domain::order::{
        ComposedOrder, Order, OrderId, OrderLineItem, OrderSource, OrderStatus, PaymentMethod,
        ShippingMethod,
    };
    use crate::domain::product::{Category, Product, ProductId};

    fn product(id: u32, rating: f64) -> Product {
        product_priced(id, rating, 4_500)
    }

    fn product_priced(id: u32, rating: f64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Gadget {id}"),
            brand: "Acme".to_string(),
            category: Category::Electronics,
            subcategory: "Accessories".to_string(),
            price: Decimal::new(price_cents, 2),
            weight_kg: 0.2,
            stock_quantity: 10,
            rating,
            is_featured: false,
            is_digital: false,
        }
    }

    fn customers(count: u32, tier: MembershipTier) -> Vec<Customer> {
        (1..=count)
            .map(|id| Customer {
                id: CustomerId(id),
                membership_tier: tier,
                loyalty_points: 500,
                signup_date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            })
            .collect()
    }

    fn composed(order_id: u32, customer_id: u32, product_ids: &[u32]) -> ComposedOrder {
        let order_date = NaiveDate::from_ymd_opt(2025, 7, 10).expect("valid date");
        ComposedOrder {
            order: Order {
                id: OrderId(order_id),
                customer_id: CustomerId(customer_id),
                order_date,
                status: OrderStatus::Delivered,
                total_amount: Decimal::new(9_900, 2),
                source: OrderSource::Web,
                payment_method: PaymentMethod::CreditCard,
                shipping_method: ShippingMethod::Standard,
            },
            items: product_ids
                .iter()
                .map(|id| OrderLineItem {
                    order_id: OrderId(order_id),
                    product_id: ProductId(*id),
                    quantity: 1,
                    unit_price: Decimal::new(4_500, 2),
                    discount_rate: Decimal::ZERO,
                    tax_amount: Decimal::ZERO,
                    shipping_cost: Decimal::ZERO,
                    total_price: Decimal::new(4_500, 2),
                    is_cross_sell: false,
                })
                .collect(),
        }
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        let reference = NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date");
        (reference, reference - chrono::Duration::days(365))
    }

    #[test]
    fn verified_reviews_cite_a_product_the_customer_bought() {
        let catalog = CatalogIndex::new((1..=10).map(|id| product(id, 4.0)).collect());
        let pool = customers(50, MembershipTier::Silver);
        let orders: Vec<_> =
            (1..=50).map(|id| composed(id, id, &[(id % 10) + 1])).collect();
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(3);
        let (reviews, _) = linker.generate(100, &orders, &mut rng);

        for review in reviews.iter().filter(|review| review.order_id.is_some()) {
            assert!(review.verified_purchase);
            let order_id = review.order_id.expect("checked");
            let order = orders
                .iter()
                .find(|composed| composed.order.id == order_id)
                .expect("review cites a generated order");
            assert_eq!(order.order.customer_id, review.customer_id);
            assert!(order.items.iter().any(|item| item.product_id == review.product_id));
            assert!(review.review_date >= order.order.order_date);
            assert!(review.review_date <= reference);
        }
    }

    #[test]
    fn every_customer_with_orders_gets_a_linked_review() {
        let catalog = CatalogIndex::new((1..=10).map(|id| product(id, 4.0)).collect());
        let pool = customers(10, MembershipTier::Bronze);
        // Two orders per customer; a generous target never cuts phase one off.
        let orders: Vec<_> = (1..=20)
            .map(|id| composed(id, ((id - 1) % 10) + 1, &[(id % 10) + 1]))
            .collect();
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(11);
        let (reviews, _) = linker.generate(200, &orders, &mut rng);

        for customer in &pool {
            assert!(
                reviews.iter().any(|review| review.order_id.is_some()
                    && review.customer_id == customer.id),
                "customer {} placed orders but reviewed none",
                customer.id
            );
        }
    }

    #[test]
    fn generates_exactly_the_requested_count() {
        let catalog = CatalogIndex::new(vec![product(1, 4.0)]);
        let pool = customers(5, MembershipTier::Silver);
        let orders = vec![composed(1, 1, &[1])];
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(4);
        let (reviews, report) = linker.generate(40, &orders, &mut rng);
        assert_eq!(reviews.len(), 40);
        assert_eq!(report.verified + report.unverified, 40);
    }

    #[test]
    fn standalone_reviews_never_carry_an_order_id() {
        let catalog = CatalogIndex::new(vec![product(1, 4.0)]);
        let pool = customers(5, MembershipTier::Silver);
        // Zero-item orders force everything through phase two.
        let orders = vec![composed(1, 1, &[])];
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(5);
        let (reviews, _) = linker.generate(25, &orders, &mut rng);
        assert_eq!(reviews.len(), 25);
        assert!(reviews.iter().all(|review| review.order_id.is_none()));
    }

    #[test]
    fn reviews_fill_without_any_orders() {
        let catalog = CatalogIndex::new((1..=20).map(|id| product(id, 4.0)).collect());
        let pool = customers(20, MembershipTier::Bronze);
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(8);
        let (reviews, report) = linker.generate(15, &[], &mut rng);
        assert_eq!(reviews.len(), 15);
        assert_eq!(report.verified + report.unverified, 15);
        assert!(reviews.iter().all(|review| review.order_id.is_none()));
    }

    #[test]
    fn standalone_pool_covers_customers_without_orders() {
        let catalog = CatalogIndex::new((1..=20).map(|id| product(id, 4.0)).collect());
        let pool = customers(200, MembershipTier::Bronze);
        // Only customers 1-3 ever ordered.
        let orders: Vec<_> = (1..=3).map(|id| composed(id, id, &[id])).collect();
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(9);
        let (reviews, _) = linker.generate(150, &orders, &mut rng);
        assert!(
            reviews.iter().any(|review| review.customer_id.0 > 3),
            "standalone reviews never reached the customers without orders"
        );
    }

    #[test]
    fn premium_tiers_verify_more_standalone_reviews() {
        let catalog = CatalogIndex::new((1..=20).map(|id| product(id, 4.0)).collect());
        let (reference, start) = dates();

        // Same seed, same draw sequence; only the tier differs, so the
        // 0.70-vs-0.60 branch is the only source of divergence.
        let bronze = customers(50, MembershipTier::Bronze);
        let linker = ReviewLinker::new(&catalog, &bronze, reference, start);
        let mut rng = StdRng::seed_from_u64(10);
        let (_, bronze_report) = linker.generate(400, &[], &mut rng);

        let platinum = customers(50, MembershipTier::Platinum);
        let linker = ReviewLinker::new(&catalog, &platinum, reference, start);
        let mut rng = StdRng::seed_from_u64(10);
        let (_, platinum_report) = linker.generate(400, &[], &mut rng);

        assert!(
            platinum_report.verified > bronze_report.verified,
            "platinum {} vs bronze {}",
            platinum_report.verified,
            bronze_report.verified
        );
    }

    #[test]
    fn ratings_stay_within_one_to_five() {
        let mut rng = StdRng::seed_from_u64(6);
        let high = product(1, 4.9);
        let unrated = product(2, 0.0);
        for _ in 0..200 {
            let jittered = purchase_rating(&high, &mut rng);
            assert!((1.0..=5.0).contains(&jittered));
            let banded = purchase_rating(&unrated, &mut rng);
            assert!((3.0..=4.8).contains(&banded));
        }
    }

    #[test]
    fn unrated_price_bands_split_at_two_hundred_and_one_hundred() {
        let mut rng = StdRng::seed_from_u64(12);
        let premium = product_priced(1, 0.0, 25_000);
        let mid = product_priced(2, 0.0, 15_000);
        let budget = product_priced(3, 0.0, 5_000);
        for _ in 0..200 {
            assert!((3.5..=4.8).contains(&purchase_rating(&premium, &mut rng)));
            assert!((3.2..=4.6).contains(&purchase_rating(&mid, &mut rng)));
            assert!((3.0..=4.4).contains(&purchase_rating(&budget, &mut rng)));
        }
    }

    #[test]
    fn review_ids_are_sequential_from_one() {
        let catalog = CatalogIndex::new(vec![product(1, 4.0)]);
        let pool = customers(5, MembershipTier::Silver);
        let orders = vec![composed(1, 1, &[1])];
        let (reference, start) = dates();
        let linker = ReviewLinker::new(&catalog, &pool, reference, start);

        let mut rng = StdRng::seed_from_u64(7);
        let (reviews, _) = linker.generate(10, &orders, &mut rng);
        for (index, review) in reviews.iter().enumerate() {
            assert_eq!(review.id.0 as usize, index + 1);
        }
    }
}
