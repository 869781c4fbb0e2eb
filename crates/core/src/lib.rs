pub mod catalog;
pub mod composer;
pub mod config;
pub mod crosssell;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod pricing;
pub mod reconcile;
pub mod reviews;
pub mod synth;

pub use catalog::CatalogIndex;
pub use composer::OrderComposer;
pub use config::GenerationConfig;
pub use crosssell::CrossSellGraph;
pub use domain::customer::{Customer, CustomerId, MembershipTier};
pub use domain::order::{
    ComposedOrder, Order, OrderId, OrderLineItem, OrderSource, OrderStatus, PaymentMethod,
    ShippingMethod,
};
pub use domain::product::{Category, Product, ProductId};
pub use domain::review::{Review, ReviewId};
pub use engine::{Dataset, DatasetGenerator, GenerationReport};
pub use errors::{ConfigError, EmptyCatalog, GenerationError};
pub use pricing::LinePricing;
pub use reconcile::{reconcile_totals, ReconciliationReport};
pub use reviews::{ReviewLinker, ReviewReport};
