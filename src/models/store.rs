// Store model representing a physical retail branch

use serde::{Deserialize, Serialize};

use crate::models::{Location, RetailerId, StoreId};

/// Immutable snapshot of one physical store, as provided by the directory.
///
/// Not created or mutated by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Unique identifier of this branch
    pub id: StoreId,

    /// Branch name
    pub name: String,

    /// Store format (e.g. `"supermarket"`, `"convenience"`)
    pub store_type: String,

    /// Retailer this branch belongs to
    pub retailer_id: RetailerId,

    /// Human-readable address
    pub address: String,

    /// Geographic location of the branch
    pub location: Location,
}

impl Store {
    pub fn new<S: Into<String>>(
        id: S,
        name: S,
        store_type: S,
        retailer_id: S,
        address: S,
        location: Location,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            store_type: store_type.into(),
            retailer_id: retailer_id.into(),
            address: address.into(),
            location,
        }
    }
}
