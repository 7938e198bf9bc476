//! In-memory product catalog.
//!
//! Products are seeded in code at startup; there is no datastore behind
//! them. All queries are linear scans, which is fine for a catalog of a
//! few dozen handmade pieces.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pnoh_core::{Category, ProductId, SubCategory};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<SubCategory>,
    pub images: Vec<String>,
    /// Available size labels; empty when the product has no size axis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Available color labels; empty when the product has no color axis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can currently be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

/// Product catalog held in memory for the process lifetime.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
}

impl Catalog {
    /// Build the catalog from the seed collection.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            products: Arc::new(seed_products()),
        }
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// A page of the full catalog.
    #[must_use]
    pub fn page(&self, skip: usize, limit: usize) -> Vec<Product> {
        self.products.iter().skip(skip).take(limit).cloned().collect()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// A page of products in a category.
    #[must_use]
    pub fn by_category(&self, category: Category, skip: usize, limit: usize) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// A page of products in a sub-category.
    #[must_use]
    pub fn by_subcategory(
        &self,
        sub_category: SubCategory,
        skip: usize,
        limit: usize,
    ) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.sub_category == Some(sub_category))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// A page of products matching both a category and a sub-category.
    #[must_use]
    pub fn by_category_and_subcategory(
        &self,
        category: Category,
        sub_category: SubCategory,
        skip: usize,
        limit: usize,
    ) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category && p.sub_category == Some(sub_category))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over name, description, and category.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.category.as_str().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

/// The seed product collection.
///
/// Timestamps are fixed so that repeated startups produce identical
/// catalog payloads.
fn seed_products() -> Vec<Product> {
    let seeded_at = DateTime::parse_from_rfc3339("2025-11-02T09:00:00+02:00")
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    let product = |name: &str,
                   description: &str,
                   price: Decimal,
                   stock_quantity: u32,
                   category: Category,
                   sub_category: Option<SubCategory>,
                   images: &[&str],
                   sizes: &[&str],
                   colors: &[&str]| Product {
        id: ProductId::new(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        stock_quantity,
        category,
        sub_category,
        images: images.iter().map(ToString::to_string).collect(),
        sizes: sizes.iter().map(ToString::to_string).collect(),
        colors: colors.iter().map(ToString::to_string).collect(),
        created_at: seeded_at,
        updated_at: seeded_at,
    };

    vec![
        product(
            "Gold Ethnic Ring",
            "Handmade ethnic style gold ring with intricate patterns.",
            Decimal::new(5999, 2),
            10,
            Category::Rings,
            Some(SubCategory::Ethnic),
            &["/images/jewel_1.jpg", "/images/jewel_6.jpg"],
            &[],
            &[],
        ),
        product(
            "Minimal Silver Necklace",
            "Elegant minimal silver necklace for everyday wear.",
            Decimal::new(3999, 2),
            15,
            Category::Necklaces,
            Some(SubCategory::Minimal),
            &["/images/jewel_2.jpg"],
            &[],
            &[],
        ),
        product(
            "Luxury Diamond Bracelet",
            "Premium diamond bracelet crafted with precision.",
            Decimal::new(49999, 2),
            5,
            Category::Bracelets,
            Some(SubCategory::Luxury),
            &["/images/jewel_3.jpg", "/images/jewel_5.jpg"],
            &[],
            &[],
        ),
        product(
            "Random Earrings",
            "Premium best quality silver earrings you will ever see",
            Decimal::new(59999, 2),
            1,
            Category::Earrings,
            Some(SubCategory::OneOfAKind),
            &["/images/jewel_4.jpg", "/images/jewel_8.jpg"],
            &[],
            &[],
        ),
        product(
            "Χειροποίητο Δαχτυλίδι Ασημένιο",
            "Εκλεπτυσμένο χειροποίητο δαχτυλίδι από ασήμι 925, με μοναδικό σχέδιο \
             που εκφράζει την κομψότητα και τη γυναικεία αισθητική.",
            Decimal::new(4500, 2),
            8,
            Category::Rings,
            None,
            &["/images/silver-ring.jpg"],
            &["S", "M", "L", "XL"],
            &[],
        ),
        product(
            "Χρυσό Κολιέ με Κρεμαστό",
            "Πολυτελές χρυσό κολιέ με εκλεπτυσμένο κρεμαστό, ιδανικό για ειδικές \
             περιστάσεις και καθημερινή χρήση.",
            Decimal::new(8900, 2),
            12,
            Category::Necklaces,
            None,
            &["/images/gold-necklace.jpg"],
            &["40cm", "45cm", "50cm"],
            &[],
        ),
        product(
            "Σκουλαρίκια με Πέρλες",
            "Κλασικά σκουλαρίκια με φυσικές πέρλες, που προσδίδουν αριστοκρατική \
             αύρα σε κάθε εμφάνιση.",
            Decimal::new(3200, 2),
            0,
            Category::Earrings,
            None,
            &["/images/pearl-earrings.jpg"],
            &[],
            &[],
        ),
    ]
}
