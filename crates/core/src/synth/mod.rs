//! Catalog and customer synthesis. These tables are generated first and then
//! frozen; order composition and review linkage only read them.

pub mod customers;
pub mod products;

pub use customers::synthesize_customers;
pub use products::synthesize_products;
