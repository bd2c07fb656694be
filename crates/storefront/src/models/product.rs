//! Catalog product type.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use freshco_core::{Price, ProductId};

/// A product offered by the catalog. Read-only from the stores' perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Current selling price.
    pub unit_price: Price,
    /// Price before discount, if the product is on offer.
    pub original_price: Option<Price>,
    /// Image URL or asset reference.
    pub image_ref: String,
    /// Category slug (e.g. "rice", "spices").
    pub category: String,
    /// Pack size label (e.g. "1kg", "500ml").
    pub weight_label: String,
    /// Optional merchandising badge (e.g. "Bestseller").
    pub badge: Option<String>,
}

impl Product {
    /// Whole-percent saving against the original price.
    ///
    /// `None` when there is no original price, it is not higher than the
    /// selling price, or the currencies differ.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original.currency_code != self.unit_price.currency_code
            || original.amount <= self.unit_price.amount
        {
            return None;
        }

        let saving = (original.amount - self.unit_price.amount) / original.amount;
        (saving * Decimal::ONE_HUNDRED).round().to_u32()
    }
}

#[cfg(test)]
mod tests {
    use freshco_core::CurrencyCode;

    use super::*;

    fn product(price: i64, original: Option<i64>) -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Organic Basmati Rice 1kg".to_string(),
            description: String::new(),
            unit_price: Price::new(Decimal::from(price), CurrencyCode::INR),
            original_price: original.map(|o| Price::new(Decimal::from(o), CurrencyCode::INR)),
            image_ref: String::new(),
            category: "rice".to_string(),
            weight_label: "1kg".to_string(),
            badge: None,
        }
    }

    #[test]
    fn test_discount_percent() {
        // 299 vs 350 is a 14.57% saving
        assert_eq!(product(299, Some(350)).discount_percent(), Some(15));
        assert_eq!(product(450, Some(500)).discount_percent(), Some(10));
    }

    #[test]
    fn test_no_discount() {
        assert_eq!(product(299, None).discount_percent(), None);
        assert_eq!(product(299, Some(299)).discount_percent(), None);
        assert_eq!(product(299, Some(200)).discount_percent(), None);
    }
}
