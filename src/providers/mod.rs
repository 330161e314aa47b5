// Providers module - seams to the external collaborators

mod memory;
mod routing;
mod traits;

// Re-export provider types
pub use self::memory::{CatalogRow, InMemoryCatalog, InMemoryDirectory};
pub use self::routing::{
    DistanceEstimate, DistanceSource, GreatCircle, RoutingClient, RoutingConfig, RoutingError,
    TransportMode,
};
pub use self::traits::{DistanceProvider, PriceCatalog, ProviderError, StoreDirectory};
