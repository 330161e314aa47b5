// Algorithms module - basket pricing, store optimization, dual-result
// coordination

pub mod coordinator;
pub mod optimizer;
pub mod pricer;

// Re-export the engine types
pub use self::coordinator::{DualOutcome, DualResultCoordinator, DualSearchResult, OptimizeIntent};
pub use self::optimizer::{
    CancelFlag, OptimizeError, OptimizeOutcome, OptimizeRequest, SearchWarning, StoreOptimizer,
    StoreSearchResult,
};
pub use self::pricer::{BasketPricer, PricedBasket};
