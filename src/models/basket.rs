// Basket item model representing one requested product type

use serde::{Deserialize, Serialize};

use crate::models::{Price, PriceOffer, ProductType};

/// One entry of a user's basket.
///
/// Price fields stay unset until a store has been selected; the caller then
/// applies the winning store's offer via [`BasketItem::apply_offer`]. The
/// optimizer itself never mutates the caller's basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    /// Requested product type
    pub product_type: ProductType,

    /// Name shown to the user (also the key of substitution/upgrade maps)
    pub display_name: String,

    /// Requested quantity; fractional for weight-based units
    pub quantity: f64,

    /// Unit price at the selected store
    pub unit_price: Option<Price>,

    /// Pre-discount unit price at the selected store
    pub original_price: Option<Price>,

    /// Sales unit label at the selected store
    pub unit: Option<String>,

    /// Retailer-specific offer id at the selected store
    pub offer_id: Option<String>,
}

impl BasketItem {
    /// Creates a basket item with quantity 1 and unset price fields
    pub fn new<S: Into<String>>(product_type: ProductType, display_name: S) -> Self {
        Self {
            product_type,
            display_name: display_name.into(),
            quantity: 1.0,
            unit_price: None,
            original_price: None,
            unit: None,
            offer_id: None,
        }
    }

    /// Sets the requested quantity
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Copies price, name, unit and offer id from a store's offer
    pub fn apply_offer(&mut self, offer: &PriceOffer) {
        self.display_name = offer.display_name.clone();
        self.unit_price = Some(offer.final_price);
        self.original_price = Some(offer.original_price);
        self.unit = offer.unit.clone();
        self.offer_id = Some(offer.offer_id.clone());
    }
}
