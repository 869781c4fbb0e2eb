use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::catalog::CatalogIndex;
use crate::composer::OrderComposer;
use crate::config::GenerationConfig;
use crate::crosssell::CrossSellGraph;
use crate::domain::customer::Customer;
use crate::domain::order::{ComposedOrder, Order, OrderId, OrderLineItem};
use crate::domain::product::Product;
use crate::domain::review::Review;
use crate::errors::GenerationError;
use crate::reconcile::reconcile_totals;
use crate::reviews::ReviewLinker;
use crate::synth::{synthesize_customers, synthesize_products};

// Stream tags keep the per-phase rngs independent of one another, so adding
// draws to one phase never shifts another phase's output.
const PRODUCT_STREAM: u64 = 1;
const CUSTOMER_STREAM: u64 = 2;
const ASSIGNMENT_STREAM: u64 = 3;
const ORDER_STREAM: u64 = 4;
const REVIEW_STREAM: u64 = 5;

/// Rng for one (stream, index) pair, derived from the master seed. Orders use
/// their id as the index, so each order's draws are independent of how the
/// batch boundaries fall.
fn derive_rng(seed: u64, stream: u64, index: u64) -> StdRng {
    let mixed = seed
        ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ index.wrapping_mul(0xD1B5_4A32_D192_ED03);
    StdRng::seed_from_u64(mixed)
}

/// The complete generated dataset, as flat relational tables.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderLineItem>,
    pub reviews: Vec<Review>,
}

/// What happened during a run, beyond the tables themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub orders_reconciled: usize,
    /// Orders that ended with zero line items and kept a provisional total.
    pub abandoned_orders: usize,
    pub verified_reviews: usize,
    pub unverified_reviews: usize,
    pub cross_sell_items: usize,
}

/// Runs the full pipeline: synthesize tables, compose orders in batches,
/// reconcile totals, then link reviews. Identical config yields an identical
/// dataset.
pub struct DatasetGenerator {
    config: GenerationConfig,
}

impl DatasetGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate().map_err(|error| GenerationError::InvalidConfig(error.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<(Dataset, GenerationReport), GenerationError> {
        let config = &self.config;
        let seed = config.seed;

        tracing::info!(
            users = config.users,
            products = config.products,
            orders = config.orders,
            reviews = config.reviews,
            seed,
            "starting dataset generation"
        );

        let mut product_rng = derive_rng(seed, PRODUCT_STREAM, 0);
        let products = synthesize_products(config.products, &mut product_rng);

        let mut customer_rng = derive_rng(seed, CUSTOMER_STREAM, 0);
        let customers =
            synthesize_customers(config.users, config.reference_date, &mut customer_rng);

        if config.orders > 0 && products.is_empty() {
            return Err(GenerationError::EmptyProductTable);
        }
        if config.orders > 0 && customers.is_empty() {
            return Err(GenerationError::EmptyCustomerTable);
        }

        let catalog = CatalogIndex::new(products);
        let graph = CrossSellGraph::new();
        let composer = OrderComposer::new(
            &catalog,
            &graph,
            config.reference_date,
            config.history_start(),
        );

        let mut report = GenerationReport::default();
        let mut composed = self.compose_orders(&composer, &customers, seed);

        let reconciliation = reconcile_totals(&mut composed);
        report.orders_reconciled = reconciliation.orders_reconciled;
        report.abandoned_orders = reconciliation.provisional_kept;

        let linker = ReviewLinker::new(
            &catalog,
            &customers,
            config.reference_date,
            config.history_start(),
        );
        let mut review_rng = derive_rng(seed, REVIEW_STREAM, 0);
        let (reviews, review_report) = if config.reviews > 0 {
            linker.generate(config.reviews, &composed, &mut review_rng)
        } else {
            Default::default()
        };
        report.verified_reviews = review_report.verified;
        report.unverified_reviews = review_report.unverified;

        let mut orders = Vec::with_capacity(composed.len());
        let mut order_items = Vec::new();
        for mut entry in composed {
            report.cross_sell_items +=
                entry.items.iter().filter(|item| item.is_cross_sell).count();
            orders.push(entry.order);
            order_items.append(&mut entry.items);
        }

        tracing::info!(
            orders = orders.len(),
            order_items = order_items.len(),
            reviews = reviews.len(),
            abandoned = report.abandoned_orders,
            "dataset generation complete"
        );

        let dataset = Dataset {
            products: catalog.into_products(),
            customers,
            orders,
            order_items,
            reviews,
        };
        Ok((dataset, report))
    }

    /// Compose orders in `batch_size` chunks. A batch boundary never splits
    /// one order's line items, and per-order rngs make the output identical
    /// for any batch size.
    fn compose_orders(
        &self,
        composer: &OrderComposer<'_>,
        customers: &[Customer],
        seed: u64,
    ) -> Vec<ComposedOrder> {
        let total = self.config.orders as usize;
        let assignment = self.assign_customers(customers, total, seed);

        let mut composed = Vec::with_capacity(total);
        let order_ids: Vec<u32> = (1..=self.config.orders).collect();

        for batch in order_ids.chunks(self.config.batch_size) {
            for &order_id in batch {
                let customer = &customers[assignment[(order_id - 1) as usize]];
                let mut rng = derive_rng(seed, ORDER_STREAM, u64::from(order_id));
                composed.push(composer.compose(OrderId(order_id), customer, &mut rng));
            }
            tracing::debug!(
                batch_len = batch.len(),
                composed = composed.len(),
                total,
                "order batch composed"
            );
        }

        composed
    }

    /// Map order index to customer index: each customer gets at most one
    /// order until the pool runs dry, then assignment wraps around.
    fn assign_customers(&self, customers: &[Customer], total: usize, seed: u64) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..customers.len()).collect();
        let mut rng = derive_rng(seed, ASSIGNMENT_STREAM, 0);
        pool.shuffle(&mut rng);

        if total > customers.len() {
            tracing::warn!(
                orders = total,
                customers = customers.len(),
                "more orders than customers; customers will repeat"
            );
        }

        (0..total).map(|index| pool[index % pool.len()]).collect()
    }
}
