use crate::domain::product::Category;

/// Static cross-sell relationships: which subcategories tend to ride along
/// once a main product from a given subcategory is in the cart. Entries are
/// repeated to bias the uniform pick toward the more common pairing. No edge
/// leaves its top-level category.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossSellGraph;

impl CrossSellGraph {
    pub fn new() -> Self {
        Self
    }

    /// Related subcategories for a (category, subcategory) pair; empty when
    /// the pair has no cross-sell edges.
    pub fn related_subcategories(
        &self,
        category: Category,
        subcategory: &str,
    ) -> &'static [&'static str] {
        match (category, subcategory) {
            (Category::Electronics, "Smartphones") => {
                &["Accessories", "Accessories", "Accessories"]
            }
            (Category::Electronics, "Laptops") => &["Accessories", "Accessories"],
            (Category::Electronics, "Headphones") => &["Accessories"],
            (Category::Electronics, "Cameras") => &["Accessories", "Accessories"],
            (Category::Electronics, "Gaming") => &["Accessories", "Accessories"],
            (Category::Clothing, "Tops") => &["Bottoms", "Accessories"],
            (Category::Clothing, "Dresses") => &["Shoes", "Accessories"],
            (Category::Clothing, "Shoes") => &["Accessories"],
            (Category::Clothing, "Outerwear") => &["Tops", "Bottoms"],
            (Category::Beauty, "Skincare") => &["Skincare", "Tools"],
            (Category::Beauty, "Makeup") => &["Makeup", "Tools"],
            (Category::Beauty, "Hair Care") => &["Hair Care", "Tools"],
            (Category::Home, "Furniture") => &["Decor", "Lighting"],
            (Category::Home, "Kitchen") => &["Kitchen", "Kitchen"],
            (Category::Home, "Bedding") => &["Bedding", "Bath"],
            (Category::Sports, "Fitness") => &["Fitness", "Activewear"],
            (Category::Sports, "Outdoor") => &["Outdoor", "Outdoor"],
            (Category::Sports, "Running") => &["Running", "Running"],
            (Category::Toys, "Building Sets") => &["Building Sets", "Puzzles"],
            (Category::Toys, "Board Games") => &["Board Games", "Puzzles"],
            (Category::Toys, "Educational") => &["Educational", "Educational"],
            _ => &[],
        }
    }
}
