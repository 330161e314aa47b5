// Store option model - the optimizer's output unit

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Km, Minutes, Price, Store};

/// One candidate store, priced against a concrete basket.
///
/// `unavailable_products` is empty for any option treated as a full match;
/// it is non-empty only on partial-fallback results. `total_price` always
/// reflects the set of items that were actually priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOption {
    /// The store this option refers to
    pub store: Store,

    /// Basket total over all priced items
    pub total_price: Price,

    /// Travel distance from the user to the store
    pub distance_km: Km,

    /// Travel duration, when the routing path provided one
    pub duration_minutes: Option<Minutes>,

    /// Display names of basket items this store cannot provide
    pub unavailable_products: Vec<String>,

    /// Requested organic item -> conventional product it was substituted with
    pub bio_substitutions: HashMap<String, String>,

    /// Requested conventional item -> cheaper organic product it was upgraded to
    pub bio_upgrades: HashMap<String, String>,

    /// Accumulated discount savings over all priced items
    pub total_savings: Price,
}

impl StoreOption {
    /// True when every basket item was priced (possibly via upgrade or
    /// substitution)
    pub fn is_full_match(&self) -> bool {
        self.unavailable_products.is_empty()
    }

    /// Number of basket items this option actually covers
    pub fn available_count(&self, basket_len: usize) -> usize {
        basket_len.saturating_sub(self.unavailable_products.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn option_with_unavailable(unavailable: Vec<String>) -> StoreOption {
        StoreOption {
            store: Store::new(
                "s1",
                "Branch One",
                "supermarket",
                "retailer-a",
                "Somewhere 1",
                Location::new(47.0, 8.0),
            ),
            total_price: 12.5,
            distance_km: 1.2,
            duration_minutes: None,
            unavailable_products: unavailable,
            bio_substitutions: HashMap::new(),
            bio_upgrades: HashMap::new(),
            total_savings: 0.0,
        }
    }

    #[test]
    fn test_full_match() {
        assert!(option_with_unavailable(vec![]).is_full_match());
        assert!(!option_with_unavailable(vec!["Milk".to_string()]).is_full_match());
    }

    #[test]
    fn test_available_count() {
        let option = option_with_unavailable(vec!["Milk".to_string()]);
        assert_eq!(option.available_count(3), 2);
        // never underflows, even on inconsistent inputs
        assert_eq!(option.available_count(0), 0);
    }
}
