use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use synthmart_core::{
    Dataset, DatasetGenerator, GenerationConfig, GenerationReport, ProductId,
};

fn generate(seed: u64) -> (Dataset, GenerationReport) {
    let config = GenerationConfig {
        users: 150,
        products: 120,
        orders: 400,
        reviews: 250,
        seed,
        batch_size: 64,
        ..GenerationConfig::default()
    };
    DatasetGenerator::new(config)
        .expect("valid config")
        .generate()
        .expect("generation succeeds")
}

#[test]
fn order_totals_match_their_line_items() {
    let (dataset, _) = generate(42);

    let mut sums: BTreeMap<_, Decimal> = BTreeMap::new();
    for item in &dataset.order_items {
        *sums.entry(item.order_id).or_default() += item.total_price;
    }

    for order in &dataset.orders {
        if let Some(sum) = sums.get(&order.id) {
            assert_eq!(
                order.total_amount,
                sum.round_dp(2),
                "order {} total disagrees with its items",
                order.id
            );
        }
    }
}

#[test]
fn discount_rates_stay_within_bounds() {
    let (dataset, _) = generate(42);
    let cap = Decimal::new(50, 2);
    for item in &dataset.order_items {
        assert!(item.discount_rate >= Decimal::ZERO);
        assert!(item.discount_rate <= cap, "discount {} exceeds cap", item.discount_rate);
    }
}

#[test]
fn bulk_quantities_carry_the_full_bulk_discount() {
    let (dataset, _) = generate(42);
    for item in &dataset.order_items {
        if !item.is_cross_sell && item.quantity >= 10 {
            assert!(
                item.discount_rate >= Decimal::new(20, 2),
                "quantity {} discount {}",
                item.quantity,
                item.discount_rate
            );
        }
    }
}

#[test]
fn no_order_repeats_a_product() {
    let (dataset, _) = generate(42);
    let mut seen: BTreeMap<_, BTreeSet<ProductId>> = BTreeMap::new();
    for item in &dataset.order_items {
        assert!(
            seen.entry(item.order_id).or_default().insert(item.product_id),
            "order {} lists product {} twice",
            item.order_id,
            item.product_id
        );
    }
}

#[test]
fn out_of_stock_products_never_sell() {
    let (dataset, _) = generate(42);
    let out_of_stock: BTreeSet<_> = dataset
        .products
        .iter()
        .filter(|product| !product.in_stock())
        .map(|product| product.id)
        .collect();
    assert!(!out_of_stock.is_empty(), "sample should include out-of-stock products");

    for item in &dataset.order_items {
        assert!(!out_of_stock.contains(&item.product_id));
    }
}

#[test]
fn composition_never_depletes_stock() {
    // Stock gates eligibility but is never written back, so the product
    // table is independent of how many orders were composed.
    let few = GenerationConfig {
        users: 50,
        products: 80,
        orders: 10,
        reviews: 0,
        seed: 7,
        ..GenerationConfig::default()
    };
    let many = GenerationConfig { orders: 500, ..few.clone() };

    let (small, _) = DatasetGenerator::new(few).expect("valid").generate().expect("runs");
    let (large, _) = DatasetGenerator::new(many).expect("valid").generate().expect("runs");
    assert_eq!(small.products, large.products);
}

#[test]
fn order_linked_reviews_cite_real_purchases() {
    let (dataset, _) = generate(42);

    let mut purchases: BTreeMap<_, BTreeSet<ProductId>> = BTreeMap::new();
    for item in &dataset.order_items {
        purchases.entry(item.order_id).or_default().insert(item.product_id);
    }
    let owners: BTreeMap<_, _> =
        dataset.orders.iter().map(|order| (order.id, order.customer_id)).collect();

    let mut linked = 0;
    for review in &dataset.reviews {
        let Some(order_id) = review.order_id else { continue };
        linked += 1;
        assert!(review.verified_purchase, "order-linked review must be verified");
        assert_eq!(owners.get(&order_id), Some(&review.customer_id));
        assert!(
            purchases.get(&order_id).is_some_and(|items| items.contains(&review.product_id)),
            "review {} cites a product not in order {}",
            review.id,
            order_id
        );
    }
    assert!(linked > 0, "expected some purchase-linked reviews");
}

#[test]
fn review_dates_never_precede_their_order() {
    let (dataset, _) = generate(42);
    let order_dates: BTreeMap<_, _> =
        dataset.orders.iter().map(|order| (order.id, order.order_date)).collect();

    for review in &dataset.reviews {
        if let Some(order_id) = review.order_id {
            let order_date = order_dates[&order_id];
            assert!(review.review_date >= order_date);
        }
        assert!((1.0..=5.0).contains(&review.rating));
    }
}

#[test]
fn every_order_item_references_existing_rows() {
    let (dataset, _) = generate(42);
    let product_ids: BTreeSet<_> = dataset.products.iter().map(|product| product.id).collect();
    let order_ids: BTreeSet<_> = dataset.orders.iter().map(|order| order.id).collect();
    let customer_ids: BTreeSet<_> =
        dataset.customers.iter().map(|customer| customer.id).collect();

    for item in &dataset.order_items {
        assert!(product_ids.contains(&item.product_id));
        assert!(order_ids.contains(&item.order_id));
    }
    for order in &dataset.orders {
        assert!(customer_ids.contains(&order.customer_id));
    }
    for review in &dataset.reviews {
        assert!(product_ids.contains(&review.product_id));
        assert!(customer_ids.contains(&review.customer_id));
    }
}

#[test]
fn report_accounts_for_every_order_and_review() {
    let (dataset, report) = generate(42);
    assert_eq!(
        report.orders_reconciled + report.abandoned_orders,
        dataset.orders.len()
    );
    assert_eq!(
        report.verified_reviews + report.unverified_reviews,
        dataset.reviews.len()
    );
    let cross_sell = dataset.order_items.iter().filter(|item| item.is_cross_sell).count();
    assert_eq!(report.cross_sell_items, cross_sell);
}

#[test]
fn runs_with_the_same_seed_are_identical() {
    let (first, _) = generate(1234);
    let (second, _) = generate(1234);
    assert_eq!(first.orders, second.orders);
    assert_eq!(first.order_items, second.order_items);
    assert_eq!(first.reviews, second.reviews);
}
