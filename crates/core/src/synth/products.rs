use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::StandardNormal;
use rust_decimal::Decimal;

use crate::domain::product::{Category, Product, ProductId};

/// Brands that command a 1.2x-1.8x price premium.
const PRICE_PREMIUM_BRANDS: &[&str] = &[
    "Apple",
    "Samsung",
    "Nike",
    "Adidas",
    "Dyson",
    "KitchenAid",
    "LEGO",
    "Mattel",
    "Hasbro",
];

const COLORS: &[&str] = &[
    "Black", "White", "Red", "Blue", "Green", "Gray", "Navy", "Silver", "Gold",
];

/// Subcategories, brands, and per-subcategory price ranges (in whole
/// dollars) for one category.
struct CategoryTable {
    subcategories: &'static [&'static str],
    brands: &'static [&'static str],
    price_ranges: &'static [(u32, u32)],
}

fn category_table(category: Category) -> CategoryTable {
    match category {
        Category::Electronics => CategoryTable {
            subcategories: &[
                "Smartphones",
                "Laptops",
                "Tablets",
                "Headphones",
                "Cameras",
                "Gaming",
                "Smart Home",
                "Accessories",
            ],
            brands: &[
                "Apple", "Samsung", "Sony", "Bose", "Canon", "Nintendo", "Google",
                "Microsoft", "Dell", "HP", "Lenovo", "Logitech", "JBL",
            ],
            price_ranges: &[
                (50, 1_500),
                (200, 3_000),
                (100, 800),
                (20, 500),
                (200, 2_000),
                (30, 600),
                (30, 400),
                (5, 200),
            ],
        },
        Category::Clothing => CategoryTable {
            subcategories: &[
                "Tops",
                "Bottoms",
                "Dresses",
                "Outerwear",
                "Shoes",
                "Accessories",
                "Activewear",
            ],
            brands: &[
                "Nike",
                "Adidas",
                "Zara",
                "H&M",
                "Uniqlo",
                "Levi's",
                "Gap",
                "Calvin Klein",
                "Champion",
                "Puma",
                "Under Armour",
                "Patagonia",
            ],
            price_ranges: &[
                (15, 80),
                (25, 120),
                (30, 150),
                (50, 300),
                (40, 200),
                (10, 50),
                (20, 100),
            ],
        },
        Category::Beauty => CategoryTable {
            subcategories: &[
                "Skincare",
                "Makeup",
                "Fragrance",
                "Hair Care",
                "Body Care",
                "Tools",
            ],
            brands: &[
                "L'Oreal",
                "Maybelline",
                "Revlon",
                "MAC",
                "Glossier",
                "The Ordinary",
                "CeraVe",
                "Olay",
                "Neutrogena",
                "Clinique",
            ],
            price_ranges: &[(8, 50), (5, 80), (20, 200), (10, 60), (5, 40), (3, 30)],
        },
        Category::Home => CategoryTable {
            subcategories: &[
                "Furniture",
                "Decor",
                "Kitchen",
                "Bedding",
                "Bath",
                "Storage",
                "Lighting",
            ],
            brands: &[
                "IKEA",
                "West Elm",
                "Wayfair",
                "Amazon Basics",
                "Dyson",
                "KitchenAid",
                "Instant Pot",
                "Nespresso",
                "Philips",
                "Shark",
            ],
            price_ranges: &[
                (50, 800),
                (20, 200),
                (30, 500),
                (25, 300),
                (15, 150),
                (20, 200),
                (25, 300),
            ],
        },
        Category::Sports => CategoryTable {
            subcategories: &[
                "Fitness",
                "Outdoor",
                "Team Sports",
                "Cycling",
                "Running",
                "Yoga",
            ],
            brands: &[
                "Nike",
                "Adidas",
                "Under Armour",
                "Puma",
                "Reebok",
                "New Balance",
                "ASICS",
                "Wilson",
                "Coleman",
                "Columbia",
            ],
            price_ranges: &[
                (20, 200),
                (30, 300),
                (15, 150),
                (50, 500),
                (25, 200),
                (15, 100),
            ],
        },
        Category::Toys => CategoryTable {
            subcategories: &[
                "Action Figures",
                "Dolls",
                "Building Sets",
                "Board Games",
                "Puzzles",
                "Educational",
            ],
            brands: &[
                "LEGO",
                "Mattel",
                "Hasbro",
                "Fisher-Price",
                "Melissa & Doug",
                "VTech",
                "Playmobil",
                "Hot Wheels",
                "Nerf",
            ],
            price_ranges: &[
                (10, 100),
                (15, 80),
                (20, 200),
                (25, 150),
                (8, 50),
                (15, 120),
            ],
        },
    }
}

/// Synthesize `count` catalog products with sequential ids starting at 1.
pub fn synthesize_products(count: u32, rng: &mut StdRng) -> Vec<Product> {
    (1..=count).map(|id| synthesize_product(ProductId(id), rng)).collect()
}

fn synthesize_product(id: ProductId, rng: &mut StdRng) -> Product {
    let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
    let table = category_table(category);

    let subcategory_index = rng.gen_range(0..table.subcategories.len());
    let subcategory = table.subcategories[subcategory_index];
    let brand = table.brands[rng.gen_range(0..table.brands.len())];

    let name = product_name(brand, subcategory, rng);
    let price = draw_price(table.price_ranges[subcategory_index], brand, rng);
    let weight_kg = draw_weight(category, subcategory, rng);
    // A weightless product ships as a download.
    let is_digital = weight_kg == 0.0;

    Product {
        id,
        name,
        brand: brand.to_string(),
        category,
        subcategory: subcategory.to_string(),
        price,
        weight_kg,
        stock_quantity: draw_stock(category, rng),
        rating: draw_rating(rng),
        is_featured: rng.gen_bool(0.1),
        is_digital,
    }
}

fn product_name(brand: &str, subcategory: &str, rng: &mut StdRng) -> String {
    let mut name = if rng.gen_bool(0.7) {
        format!("{brand} {subcategory}")
    } else {
        subcategory.to_string()
    };
    if rng.gen_bool(0.4) {
        let color = COLORS[rng.gen_range(0..COLORS.len())];
        name = format!("{name} - {color}");
    }
    name
}

fn draw_price(range: (u32, u32), brand: &str, rng: &mut StdRng) -> Decimal {
    let mut price = rng.gen_range(f64::from(range.0)..=f64::from(range.1));
    if PRICE_PREMIUM_BRANDS.contains(&brand) {
        price *= rng.gen_range(1.2..1.8);
    }
    Decimal::from_f64_retain(price).unwrap_or(Decimal::ONE).round_dp(2)
}

fn draw_weight(category: Category, subcategory: &str, rng: &mut StdRng) -> f64 {
    let weight: f64 = match category {
        Category::Electronics => match subcategory {
            // Smart Home hubs occasionally ship as software only.
            "Smart Home" if rng.gen_bool(0.2) => 0.0,
            "Smartphones" => rng.gen_range(0.15..0.25),
            "Laptops" => rng.gen_range(1.2..2.5),
            "Tablets" => rng.gen_range(0.4..0.8),
            "Headphones" => rng.gen_range(0.2..0.4),
            _ => rng.gen_range(0.1..2.0),
        },
        Category::Clothing => match subcategory {
            "Dresses" => rng.gen_range(0.3..0.8),
            "Outerwear" => rng.gen_range(0.8..1.5),
            "Shoes" => rng.gen_range(0.5..1.2),
            _ => rng.gen_range(0.1..0.6),
        },
        Category::Beauty => rng.gen_range(0.01..0.5),
        Category::Home => match subcategory {
            "Furniture" => rng.gen_range(5.0..40.0),
            _ => rng.gen_range(0.2..5.0),
        },
        Category::Sports => rng.gen_range(0.2..8.0),
        Category::Toys => rng.gen_range(0.1..3.0),
    };
    (weight * 100.0).round() / 100.0
}

fn draw_stock(category: Category, rng: &mut StdRng) -> u32 {
    match category {
        Category::Electronics | Category::Clothing if rng.gen_bool(0.3) => {
            rng.gen_range(200..=1_000)
        }
        Category::Beauty | Category::Toys if rng.gen_bool(0.2) => rng.gen_range(100..=500),
        _ if rng.gen_bool(0.1) => 0,
        _ => rng.gen_range(5..=200),
    }
}

/// 15% of products are new and unrated; the rest cluster around 4.2.
fn draw_rating(rng: &mut StdRng) -> f64 {
    if rng.gen_bool(0.15) {
        return 0.0;
    }
    let z: f64 = rng.sample(StandardNormal);
    let rating = (4.2 + 0.6 * z).clamp(1.0, 5.0);
    (rating * 10.0).round() / 10.0
}
