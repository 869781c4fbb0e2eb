use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level catalog categories. The cross-sell graph and the seasonal
/// selection weights are keyed by these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Beauty,
    Home,
    Sports,
    Toys,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Beauty,
        Category::Home,
        Category::Sports,
        Category::Toys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Beauty => "Beauty",
            Category::Home => "Home",
            Category::Sports => "Sports",
            Category::Toys => "Toys",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable catalog record. Generated once, then only read during order
/// composition; `stock_quantity` is a selection-weight signal and is never
/// decremented by orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub subcategory: String,
    pub price: Decimal,
    pub weight_kg: f64,
    pub stock_quantity: u32,
    pub rating: f64,
    pub is_featured: bool,
    pub is_digital: bool,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Products with no reviews yet carry a 0.0 rating.
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}
