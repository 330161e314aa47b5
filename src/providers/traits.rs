// Provider seams for the external collaborators
//
// The real product talks to a document database (stores, price catalogs) and
// a mapping API (routing). The optimizer only depends on these traits, so the
// collaborators stay swappable and tests run against in-memory
// implementations.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{Location, PriceOffer, ProductType, Store};
use crate::providers::routing::{DistanceEstimate, TransportMode};

/// Failure of a provider query.
///
/// "No data for this store/product" is not an error: directories return
/// shorter lists and catalogs return maps with absent keys. Errors are for
/// queries that could not be answered at all.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing service could not be reached or rejected the query
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The backing service answered with data that cannot be interpreted
    #[error("malformed provider data: {0}")]
    Malformed(String),
}

/// Read access to the cross-retailer store directory
pub trait StoreDirectory {
    /// All known stores across all retailers. Implementations must exclude
    /// stores whose location is the unset (0, 0) placeholder.
    fn all_stores(&self) -> Result<Vec<Store>, ProviderError>;
}

/// Read access to one retailer's price catalog
pub trait PriceCatalog {
    /// The cheapest in-stock offer per requested product type, judged by
    /// discounted price where one is active and regular price otherwise.
    ///
    /// Product types with no matching in-stock offer (or whose individual
    /// lookup failed) are simply absent from the map; only a failure of the
    /// whole retailer query returns an error.
    fn fetch_prices(
        &self,
        retailer_id: &str,
        product_types: &[ProductType],
    ) -> Result<HashMap<ProductType, PriceOffer>, ProviderError>;
}

/// Travel distance/duration lookup between two coordinates
pub trait DistanceProvider {
    /// Best-effort estimate for the given transport mode. Never fails:
    /// implementations fall back to a great-circle estimate when routing is
    /// unavailable, tagging the result with its source.
    fn distance(&self, from: &Location, to: &Location, mode: TransportMode) -> DistanceEstimate;
}
