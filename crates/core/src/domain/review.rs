use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::order::OrderId;
use crate::domain::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub u32);

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product review. `order_id` is a non-owning back-reference and is only
/// populated for purchase-linked (Phase 1) reviews, where it must name an
/// order that belongs to `customer_id` and contains `product_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub rating: f64,
    pub review_date: NaiveDate,
    pub verified_purchase: bool,
    pub order_id: Option<OrderId>,
}
