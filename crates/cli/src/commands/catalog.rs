//! Catalog listing commands.

use freshco_storefront::config::StorefrontConfig;
use freshco_storefront::models::Product;
use freshco_storefront::services::{ConsoleNotifier, ProductQuery};

use super::{CommandError, open_storefront};

/// Print products matching `query`.
#[allow(clippy::print_stdout)]
pub async fn products(config: StorefrontConfig, query: &ProductQuery) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    let products = storefront
        .catalog()
        .browse(query)
        .await
        .map_err(freshco_storefront::error::AppError::from)?;

    if products.is_empty() {
        println!("No products match.");
        return Ok(());
    }

    for product in &products {
        println!("{}", format_product(product));
    }
    tracing::debug!(count = products.len(), "Listed products");
    Ok(())
}

/// Print the catalog's categories.
#[allow(clippy::print_stdout)]
pub async fn categories(config: StorefrontConfig) -> Result<(), CommandError> {
    let storefront = open_storefront(config, ConsoleNotifier::new()).await?;
    let categories = storefront
        .catalog()
        .categories()
        .await
        .map_err(freshco_storefront::error::AppError::from)?;

    for category in categories {
        println!("{category}");
    }
    Ok(())
}

/// One line per product: id, name, weight, price, and any discount or badge.
pub fn format_product(product: &Product) -> String {
    let mut line = format!(
        "{:>3}  {:<32} {:>6}  {}",
        product.id.as_str(),
        product.name,
        product.weight_label,
        product.unit_price
    );
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent()) {
        line.push_str(&format!("  (was {original}, {percent}% off)"));
    }
    if let Some(badge) = &product.badge {
        line.push_str(&format!("  [{badge}]"));
    }
    line
}
