use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;

use crate::domain::customer::MembershipTier;
use crate::domain::product::{Category, Product, ProductId};
use crate::errors::EmptyCatalog;

/// Brands that get extra selection weight for Gold/Platinum customers.
const PREMIUM_BRANDS: &[&str] = &["Apple", "Samsung", "Nike", "Adidas", "Dyson", "KitchenAid"];

/// Read-only view over the product table. Selection never mutates a product;
/// in particular `stock_quantity` only gates eligibility and is never
/// decremented by composed orders.
#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    products: Vec<Product>,
}

impl CatalogIndex {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// Weighted draw over the eligible pool: in stock, not excluded, and
    /// matching the optional (category, subcategory) restriction.
    pub fn select_weighted(
        &self,
        rng: &mut StdRng,
        exclude: &BTreeSet<ProductId>,
        filter: Option<(Category, &str)>,
        tier: MembershipTier,
        order_date: NaiveDate,
    ) -> Result<&Product, EmptyCatalog> {
        let candidates = self.eligible(exclude, filter);
        if candidates.is_empty() {
            return Err(EmptyCatalog);
        }

        let weights: Vec<f64> = candidates
            .iter()
            .map(|product| selection_weight(product, tier, order_date.month()))
            .collect();

        // All weights are >= 1.0, so the distribution is always valid.
        let index = WeightedIndex::new(&weights).map_err(|_| EmptyCatalog)?;
        Ok(candidates[index.sample(rng)])
    }

    /// Uniform draw over the eligible pool. Cross-sell candidates are picked
    /// this way: the graph already did the biasing.
    pub fn select_uniform(
        &self,
        rng: &mut StdRng,
        exclude: &BTreeSet<ProductId>,
        filter: Option<(Category, &str)>,
    ) -> Result<&Product, EmptyCatalog> {
        let candidates = self.eligible(exclude, filter);
        if candidates.is_empty() {
            return Err(EmptyCatalog);
        }
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }

    fn eligible(
        &self,
        exclude: &BTreeSet<ProductId>,
        filter: Option<(Category, &str)>,
    ) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.in_stock() && !exclude.contains(&product.id))
            .filter(|product| match filter {
                Some((category, subcategory)) => {
                    product.category == category && product.subcategory == subcategory
                }
                None => true,
            })
            .collect()
    }
}

/// Multiplicative weight composition: featured, rating bands, premium brands
/// for premium tiers, and a seasonal category boost.
fn selection_weight(product: &Product, tier: MembershipTier, month: u32) -> f64 {
    let mut weight = 1.0_f64;

    if product.is_featured {
        weight *= 2.0;
    }

    if product.rating >= 4.5 {
        weight *= 1.5;
    } else if product.rating >= 4.0 {
        weight *= 1.2;
    }

    if tier.is_premium() && PREMIUM_BRANDS.contains(&product.brand.as_str()) {
        weight *= 1.3;
    }

    match month {
        11 | 12 => {
            if matches!(
                product.category,
                Category::Toys | Category::Electronics | Category::Home
            ) {
                weight *= 1.4;
            }
        }
        6..=8 => {
            if matches!(product.category, Category::Sports | Category::Clothing) {
                weight *= 1.3;
            }
        }
        _ => {}
    }

    weight
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;

    use super::{selection_weight, CatalogIndex};
    use crate::domain::customer::MembershipTier;
    use crate::domain::product::{Category, Product, ProductId};
    use crate::errors::EmptyCatalog;

    fn product(id: u32, stock: u32) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Widget {id}"),
            brand: "Acme".to_string(),
            category: Category::Electronics,
            subcategory: "Accessories".to_string(),
            price: Decimal::new(1999, 2),
            weight_kg: 0.3,
            stock_quantity: stock,
            rating: 4.1,
            is_featured: false,
            is_digital: false,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
    }

    #[test]
    fn never_selects_out_of_stock_products() {
        let catalog = CatalogIndex::new(vec![product(1, 0), product(2, 10)]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let picked = catalog
                .select_weighted(&mut rng, &BTreeSet::new(), None, MembershipTier::Bronze, date())
                .expect("one product is in stock");
            assert_eq!(picked.id, ProductId(2));
        }
    }

    #[test]
    fn empty_catalog_when_everything_is_excluded() {
        let catalog = CatalogIndex::new(vec![product(1, 5)]);
        let mut rng = StdRng::seed_from_u64(2);
        let exclude: BTreeSet<_> = [ProductId(1)].into_iter().collect();
        let result =
            catalog.select_weighted(&mut rng, &exclude, None, MembershipTier::Bronze, date());
        assert_eq!(result, Err(EmptyCatalog));
    }

    #[test]
    fn empty_catalog_when_only_candidate_is_out_of_stock() {
        let catalog = CatalogIndex::new(vec![product(1, 0)]);
        let mut rng = StdRng::seed_from_u64(3);
        let result =
            catalog.select_weighted(&mut rng, &BTreeSet::new(), None, MembershipTier::Gold, date());
        assert_eq!(result, Err(EmptyCatalog));
    }

    #[test]
    fn filter_restricts_to_category_and_subcategory() {
        let mut other = product(3, 9);
        other.subcategory = "Gaming".to_string();
        let catalog = CatalogIndex::new(vec![product(1, 5), other]);
        let mut rng = StdRng::seed_from_u64(4);
        let picked = catalog
            .select_uniform(&mut rng, &BTreeSet::new(), Some((Category::Electronics, "Gaming")))
            .expect("filtered candidate exists");
        assert_eq!(picked.id, ProductId(3));
    }

    #[test]
    fn featured_and_rating_factors_multiply() {
        let mut plain = product(1, 5);
        plain.rating = 3.0;
        let mut boosted = product(2, 5);
        boosted.is_featured = true;
        boosted.rating = 4.7;

        let base = selection_weight(&plain, MembershipTier::Bronze, 3);
        let heavy = selection_weight(&boosted, MembershipTier::Bronze, 3);
        assert!((base - 1.0).abs() < f64::EPSILON);
        assert!((heavy - 3.0).abs() < 1e-9, "2.0 featured x 1.5 rating, got {heavy}");
    }

    #[test]
    fn premium_brand_counts_only_for_premium_tiers() {
        let mut apple = product(1, 5);
        apple.brand = "Apple".to_string();
        apple.rating = 3.0;

        let bronze = selection_weight(&apple, MembershipTier::Bronze, 3);
        let gold = selection_weight(&apple, MembershipTier::Gold, 3);
        assert!((bronze - 1.0).abs() < f64::EPSILON);
        assert!((gold - 1.3).abs() < 1e-9);
    }

    #[test]
    fn seasonal_boost_applies_by_month() {
        let mut toy = product(1, 5);
        toy.category = Category::Toys;
        toy.rating = 3.0;

        let december = selection_weight(&toy, MembershipTier::Bronze, 12);
        let march = selection_weight(&toy, MembershipTier::Bronze, 3);
        assert!((december - 1.4).abs() < 1e-9);
        assert!((march - 1.0).abs() < f64::EPSILON);
    }
}
