// In-memory store directory and price catalog
//
// Reference implementations of the provider traits, backed by plain
// collections. The demo binary and the integration tests run against these.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{PriceOffer, ProductType, RetailerId, Store};
use crate::providers::{PriceCatalog, ProviderError, StoreDirectory};

/// One raw catalog row, keyed by the legacy product-type identifier
/// (organic variants carry the `" bio"` marker)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub product_type: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub discounted_price: Option<f64>,
    pub in_stock: bool,
    #[serde(default)]
    pub unit: Option<String>,
    pub offer_id: String,
}

impl CatalogRow {
    /// Discounted price when a discount record is present, else the
    /// regular price
    pub fn effective_price(&self) -> f64 {
        self.discounted_price.unwrap_or(self.price)
    }
}

/// Directory over a fixed list of stores
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    stores: Vec<Store>,
}

impl InMemoryDirectory {
    pub fn new(stores: Vec<Store>) -> Self {
        Self { stores }
    }
}

impl StoreDirectory for InMemoryDirectory {
    fn all_stores(&self) -> Result<Vec<Store>, ProviderError> {
        // Unset locations cannot take part in a distance search
        Ok(self
            .stores
            .iter()
            .filter(|store| store.location.is_set())
            .cloned()
            .collect())
    }
}

/// Catalog over per-retailer row lists
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    retailers: HashMap<RetailerId, Vec<CatalogRow>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) one retailer's rows
    pub fn insert_retailer(&mut self, retailer_id: RetailerId, rows: Vec<CatalogRow>) {
        self.retailers.insert(retailer_id, rows);
    }

    /// Loads a `{retailer_id: [rows]}` JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let retailers: HashMap<RetailerId, Vec<CatalogRow>> = serde_json::from_str(json)?;
        Ok(Self { retailers })
    }
}

impl PriceCatalog for InMemoryCatalog {
    fn fetch_prices(
        &self,
        retailer_id: &str,
        product_types: &[ProductType],
    ) -> Result<HashMap<ProductType, PriceOffer>, ProviderError> {
        let rows = self
            .retailers
            .get(retailer_id)
            .ok_or_else(|| ProviderError::Unavailable(format!("unknown retailer {retailer_id}")))?;

        let mut offers = HashMap::new();
        for product_type in product_types {
            let legacy_id = product_type.to_legacy_id();
            let cheapest = rows
                .iter()
                .filter(|row| row.product_type == legacy_id && row.in_stock && row.price > 0.0)
                .min_by(|a, b| {
                    a.effective_price()
                        .partial_cmp(&b.effective_price())
                        .unwrap_or(Ordering::Equal)
                });

            if let Some(row) = cheapest {
                offers.insert(
                    product_type.clone(),
                    PriceOffer {
                        product_type: product_type.clone(),
                        final_price: row.effective_price(),
                        original_price: row.price,
                        has_discount: row.discounted_price.is_some(),
                        display_name: row.name.clone(),
                        unit: row.unit.clone(),
                        offer_id: row.offer_id.clone(),
                    },
                );
            }
        }
        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn row(product_type: &str, price: f64, discounted: Option<f64>, in_stock: bool) -> CatalogRow {
        CatalogRow {
            product_type: product_type.to_string(),
            name: format!("{} (test)", product_type),
            price,
            discounted_price: discounted,
            in_stock,
            unit: None,
            offer_id: format!("offer-{}-{}", product_type, price),
        }
    }

    #[test]
    fn test_directory_excludes_unset_locations() {
        let directory = InMemoryDirectory::new(vec![
            Store::new(
                "s1",
                "Geocoded",
                "supermarket",
                "r1",
                "Addr 1",
                Location::new(47.0, 8.0),
            ),
            Store::new(
                "s2",
                "Not geocoded",
                "supermarket",
                "r1",
                "Addr 2",
                Location::new(0.0, 0.0),
            ),
        ]);

        let stores = directory.all_stores().unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].id, "s1");
    }

    #[test]
    fn test_cheapest_in_stock_selection() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_retailer(
            "r1".to_string(),
            vec![
                row("milk", 1.80, None, true),
                // cheaper after discount, should win
                row("milk", 2.00, Some(1.50), true),
                // cheapest of all but out of stock
                row("milk", 1.00, None, false),
                // zero-priced rows are data errors, never offers
                row("milk", 0.0, None, true),
            ],
        );

        let wanted = [ProductType::conventional("milk")];
        let offers = catalog.fetch_prices("r1", &wanted).unwrap();
        let offer = &offers[&wanted[0]];
        assert_eq!(offer.final_price, 1.50);
        assert_eq!(offer.original_price, 2.00);
        assert!(offer.has_discount);
    }

    #[test]
    fn test_missing_product_is_absent_not_error() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_retailer("r1".to_string(), vec![row("milk", 1.80, None, true)]);

        let wanted = [
            ProductType::conventional("milk"),
            ProductType::conventional("caviar"),
        ];
        let offers = catalog.fetch_prices("r1", &wanted).unwrap();
        assert_eq!(offers.len(), 1);
        assert!(!offers.contains_key(&wanted[1]));
    }

    #[test]
    fn test_unknown_retailer_is_error() {
        let catalog = InMemoryCatalog::new();
        let wanted = [ProductType::conventional("milk")];
        assert!(catalog.fetch_prices("nope", &wanted).is_err());
    }

    #[test]
    fn test_from_json() {
        let catalog = InMemoryCatalog::from_json(
            r#"{"r1": [{
                "product_type": "milk bio",
                "name": "Organic Milk",
                "price": 2.2,
                "in_stock": true,
                "offer_id": "m-1"
            }]}"#,
        )
        .unwrap();

        let wanted = [ProductType::organic("milk")];
        let offers = catalog.fetch_prices("r1", &wanted).unwrap();
        assert_eq!(offers[&wanted[0]].display_name, "Organic Milk");
    }
}
