//! Product browsing: filtering and sorting over the catalog.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use freshco_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// Errors from catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("invalid price range: {min} > {max}")]
    InvalidPriceRange { min: Decimal, max: Decimal },

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product ordering for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Alphabetical, ignoring case.
    #[default]
    Name,
    PriceLowToHigh,
    PriceHighToLow,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price-low" | "price_asc" | "price-asc" => Ok(Self::PriceLowToHigh),
            "price-high" | "price_desc" | "price-desc" => Ok(Self::PriceHighToLow),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filters for [`CatalogService::browse`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Exact category, case-insensitive.
    pub category: Option<String>,
    /// Inclusive lower bound on the unit price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the unit price.
    pub max_price: Option<Decimal>,
    /// Exact weight label, case-insensitive (e.g. "1kg").
    pub weight: Option<String>,
    pub sort: SortBy,
}

impl ProductQuery {
    fn matches(&self, product: &Product) -> bool {
        let price = product.unit_price.amount;
        self.category
            .as_deref()
            .is_none_or(|c| product.category.eq_ignore_ascii_case(c))
            && self.weight
                .as_deref()
                .is_none_or(|w| product.weight_label.eq_ignore_ascii_case(w))
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Read-only view over the product catalog.
pub struct CatalogService<P> {
    products: Arc<P>,
}

impl<P: ProductRepository> CatalogService<P> {
    #[must_use]
    pub const fn new(products: Arc<P>) -> Self {
        Self { products }
    }

    /// List products matching `query`, in the requested order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPriceRange` if the minimum exceeds the
    /// maximum.
    pub async fn browse(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        if let (Some(min), Some(max)) = (query.min_price, query.max_price)
            && min > max
        {
            return Err(CatalogError::InvalidPriceRange { min, max });
        }

        let mut products: Vec<Product> = self
            .products
            .list_products()
            .await?
            .into_iter()
            .filter(|p| query.matches(p))
            .collect();

        match query.sort {
            SortBy::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
            SortBy::PriceLowToHigh => products.sort_by_key(|p| p.unit_price.amount),
            SortBy::PriceHighToLow => {
                products.sort_by_key(|p| std::cmp::Reverse(p.unit_price.amount));
            }
        }

        Ok(products)
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this ID.
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.products
            .get_product(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Distinct categories, in the order they first appear in the catalog.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the catalog cannot be read.
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut categories: Vec<String> = Vec::new();
        for product in self.products.list_products().await? {
            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
        }
        Ok(categories)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use freshco_core::ProductId;

    use super::{CatalogError, CatalogService, ProductQuery, SortBy};
    use crate::db::InMemoryProductRepository;

    fn catalog() -> CatalogService<InMemoryProductRepository> {
        CatalogService::new(Arc::new(InMemoryProductRepository::seeded()))
    }

    #[tokio::test]
    async fn test_browse_defaults_to_name_order() {
        let products = catalog().browse(&ProductQuery::default()).await.unwrap();
        assert_eq!(products.len(), 12);

        let names: Vec<String> = products.iter().map(|p| p.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_browse_by_category_and_price() {
        let query = ProductQuery {
            category: Some("Spices".to_string()),
            max_price: Some(Decimal::from(120)),
            sort: SortBy::PriceLowToHigh,
            ..ProductQuery::default()
        };
        let products = catalog().browse(&query).await.unwrap();

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["9", "5"]);
    }

    #[tokio::test]
    async fn test_browse_by_weight_price_desc() {
        let query = ProductQuery {
            weight: Some("1KG".to_string()),
            sort: SortBy::PriceHighToLow,
            ..ProductQuery::default()
        };
        let products = catalog().browse(&query).await.unwrap();

        let prices: Vec<Decimal> = products.iter().map(|p| p.unit_price.amount).collect();
        assert_eq!(
            prices,
            [299, 200, 180, 160].map(Decimal::from).to_vec()
        );
    }

    #[tokio::test]
    async fn test_browse_rejects_inverted_range() {
        let query = ProductQuery {
            min_price: Some(Decimal::from(500)),
            max_price: Some(Decimal::from(100)),
            ..ProductQuery::default()
        };
        let err = catalog().browse(&query).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPriceRange { .. }));
    }

    #[tokio::test]
    async fn test_categories_in_catalog_order() {
        let categories = catalog().categories().await.unwrap();
        assert_eq!(categories, ["rice", "spices", "oil", "pulses"]);
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let catalog = catalog();
        assert_eq!(
            catalog.product(&ProductId::new("3")).await.unwrap().category,
            "oil"
        );
        assert!(matches!(
            catalog.product(&ProductId::new("nope")).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_sort_by_from_str() {
        assert_eq!("price-low".parse::<SortBy>().unwrap(), SortBy::PriceLowToHigh);
        assert_eq!("PRICE-HIGH".parse::<SortBy>().unwrap(), SortBy::PriceHighToLow);
        assert_eq!("name".parse::<SortBy>().unwrap(), SortBy::Name);
        assert!("newest".parse::<SortBy>().is_err());
    }
}
