// Product type and price offer models

use serde::{Deserialize, Serialize};

use crate::models::Price;

/// Marker that legacy catalog identifiers append to denote the organic
/// variant of a product family (e.g. `"chicken bio"`)
const ORGANIC_SUFFIX: &str = " bio";

/// An abstract product type, tagged with its organic flag.
///
/// Legacy catalogs key their rows by a single string identifier where a
/// trailing `" bio"` marks the organic variant. Internally the flag is a
/// proper field; the suffix encoding only exists at the catalog boundary
/// via [`ProductType::to_legacy_id`] and [`ProductType::from_legacy_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductType {
    /// Base identifier of the product family (e.g. `"chicken"`)
    pub base: String,

    /// Whether this is the organic variant of the family
    pub organic: bool,
}

impl ProductType {
    /// Creates the conventional (non-organic) variant of a product family
    pub fn conventional<S: Into<String>>(base: S) -> Self {
        Self {
            base: base.into(),
            organic: false,
        }
    }

    /// Creates the organic variant of a product family
    pub fn organic<S: Into<String>>(base: S) -> Self {
        Self {
            base: base.into(),
            organic: true,
        }
    }

    /// Parses a legacy catalog identifier, stripping the organic marker
    pub fn from_legacy_id(id: &str) -> Self {
        match id.strip_suffix(ORGANIC_SUFFIX) {
            Some(base) => Self::organic(base),
            None => Self::conventional(id),
        }
    }

    /// Renders the legacy catalog identifier, re-appending the organic marker
    pub fn to_legacy_id(&self) -> String {
        if self.organic {
            format!("{}{}", self.base, ORGANIC_SUFFIX)
        } else {
            self.base.clone()
        }
    }

    /// The organic variant of the same product family
    pub fn organic_variant(&self) -> Self {
        Self::organic(self.base.clone())
    }

    /// The conventional variant of the same product family
    pub fn conventional_variant(&self) -> Self {
        Self::conventional(self.base.clone())
    }
}

/// The cheapest in-stock catalog row for one product type at one retailer.
///
/// Computed fresh per query; never cached across optimizer calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOffer {
    /// Product type this offer resolves
    pub product_type: ProductType,

    /// Price after any active discount
    pub final_price: Price,

    /// Regular price before discount
    pub original_price: Price,

    /// Whether a discount is currently applied
    pub has_discount: bool,

    /// Retailer-facing product name
    pub display_name: String,

    /// Sales unit label (e.g. `"500g"`), when the catalog provides one
    pub unit: Option<String>,

    /// Retailer-specific offer identifier
    pub offer_id: String,
}

impl PriceOffer {
    /// Savings per unit when discounted, zero otherwise
    pub fn savings_per_unit(&self) -> Price {
        if self.has_discount {
            self.original_price - self.final_price
        } else {
            0.0
        }
    }
}
