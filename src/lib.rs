// Public modules
pub mod algorithms;
pub mod models;
pub mod providers;
pub mod utils;

// Re-exports for convenience
pub use algorithms::{
    CancelFlag, DualResultCoordinator, OptimizeIntent, OptimizeRequest, StoreOptimizer,
};
pub use models::{BasketItem, Location, PriceOffer, ProductType, Store, StoreOption};
pub use providers::{GreatCircle, InMemoryCatalog, InMemoryDirectory, RoutingClient, TransportMode};
