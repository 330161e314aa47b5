// Models module - exports all model types

mod basket;
mod location;
mod product;
mod store;
mod store_option;

// Re-export model types
pub use self::basket::BasketItem;
pub use self::location::Location;
pub use self::product::{PriceOffer, ProductType};
pub use self::store::Store;
pub use self::store_option::StoreOption;

// Common type aliases for improved code readability
pub type RetailerId = String;
pub type StoreId = String;
pub type Price = f64;
pub type Km = f64;
pub type Minutes = f64;
