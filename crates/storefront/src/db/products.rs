//! Product catalog repository.

use rust_decimal::Decimal;

use freshco_core::{CurrencyCode, Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Read-only source of catalog products.
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// All products, in catalog order.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A single product by ID.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
}

/// In-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
}

impl InMemoryProductRepository {
    /// Create a catalog from the given products.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The reference grocery catalog: twelve staples priced in rupees.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed_products())
    }
}

impl ProductRepository for InMemoryProductRepository {
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products.iter().find(|p| &p.id == id).cloned())
    }
}

const RICE_IMAGE: &str =
    "https://images.unsplash.com/photo-1586201375761-83865001e31c?w=300&h=300&fit=crop";
const SPICE_IMAGE: &str =
    "https://images.unsplash.com/photo-1615485500704-8e990f9900f7?w=300&h=300&fit=crop";
const OIL_IMAGE: &str =
    "https://images.unsplash.com/photo-1474979266404-7eaacbcd87c5?w=300&h=300&fit=crop";
const PULSE_IMAGE: &str =
    "https://images.unsplash.com/photo-1599909533730-f8b3c6e3d1c1?w=300&h=300&fit=crop";

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    original_price: Option<i64>,
    image: &'static str,
    category: &'static str,
    weight: &'static str,
    badge: Option<&'static str>,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "1",
        name: "Organic Basmati Rice 1kg",
        description: "Premium quality organic basmati rice, aged to perfection",
        price: 299,
        original_price: Some(350),
        image: RICE_IMAGE,
        category: "rice",
        weight: "1kg",
        badge: Some("Bestseller"),
    },
    Seed {
        id: "2",
        name: "Pure Turmeric Powder 500g",
        description: "Fresh ground turmeric powder with natural curcumin",
        price: 149,
        original_price: None,
        image: SPICE_IMAGE,
        category: "spices",
        weight: "500g",
        badge: None,
    },
    Seed {
        id: "3",
        name: "Cold Pressed Coconut Oil 1L",
        description: "Virgin coconut oil extracted using traditional methods",
        price: 450,
        original_price: Some(500),
        image: OIL_IMAGE,
        category: "oil",
        weight: "1L",
        badge: Some("Organic"),
    },
    Seed {
        id: "4",
        name: "Organic Moong Dal 1kg",
        description: "Premium quality organic moong dal, rich in protein",
        price: 180,
        original_price: None,
        image: PULSE_IMAGE,
        category: "pulses",
        weight: "1kg",
        badge: None,
    },
    Seed {
        id: "5",
        name: "Red Chili Powder 250g",
        description: "Spicy red chili powder made from finest red chilies",
        price: 120,
        original_price: None,
        image: SPICE_IMAGE,
        category: "spices",
        weight: "250g",
        badge: None,
    },
    Seed {
        id: "6",
        name: "Organic Brown Rice 2kg",
        description: "Nutritious brown rice packed with fiber and nutrients",
        price: 380,
        original_price: None,
        image: RICE_IMAGE,
        category: "rice",
        weight: "2kg",
        badge: Some("Healthy"),
    },
    Seed {
        id: "7",
        name: "Mustard Oil 1L",
        description: "Pure mustard oil with authentic taste and aroma",
        price: 220,
        original_price: None,
        image: OIL_IMAGE,
        category: "oil",
        weight: "1L",
        badge: None,
    },
    Seed {
        id: "8",
        name: "Organic Toor Dal 1kg",
        description: "High quality organic toor dal, perfect for daily cooking",
        price: 200,
        original_price: None,
        image: PULSE_IMAGE,
        category: "pulses",
        weight: "1kg",
        badge: None,
    },
    Seed {
        id: "9",
        name: "Garam Masala Powder 100g",
        description: "Aromatic blend of traditional Indian spices",
        price: 80,
        original_price: None,
        image: SPICE_IMAGE,
        category: "spices",
        weight: "100g",
        badge: None,
    },
    Seed {
        id: "10",
        name: "Organic Quinoa 500g",
        description: "Superfood quinoa rich in protein and essential amino acids",
        price: 350,
        original_price: None,
        image: RICE_IMAGE,
        category: "rice",
        weight: "500g",
        badge: Some("Superfood"),
    },
    Seed {
        id: "11",
        name: "Sesame Oil 500ml",
        description: "Cold pressed sesame oil with natural goodness",
        price: 280,
        original_price: None,
        image: OIL_IMAGE,
        category: "oil",
        weight: "500ml",
        badge: None,
    },
    Seed {
        id: "12",
        name: "Organic Chana Dal 1kg",
        description: "Premium quality organic chana dal, high in protein",
        price: 160,
        original_price: None,
        image: PULSE_IMAGE,
        category: "pulses",
        weight: "1kg",
        badge: None,
    },
];

fn inr(amount: i64) -> Price {
    Price::new(Decimal::from(amount), CurrencyCode::INR)
}

fn seed_products() -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            description: seed.description.to_owned(),
            unit_price: inr(seed.price),
            original_price: seed.original_price.map(inr),
            image_ref: seed.image.to_owned(),
            category: seed.category.to_owned(),
            weight_label: seed.weight.to_owned(),
            badge: seed.badge.map(str::to_owned),
        })
        .collect()
}
