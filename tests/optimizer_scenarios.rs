// Integration tests for the store optimizer's search scenarios

use basket_optimizer::algorithms::{CancelFlag, OptimizeRequest, SearchWarning, StoreOptimizer};
use basket_optimizer::models::{BasketItem, Location, ProductType, Store};
use basket_optimizer::providers::{
    CatalogRow, GreatCircle, InMemoryCatalog, InMemoryDirectory, TransportMode,
};

fn user() -> Location {
    Location::new(47.3769, 8.5417)
}

/// Kilometers per degree of latitude under the haversine Earth radius
const KM_PER_LAT_DEGREE: f64 = 111.19492664455873;

/// A location a given straight-line distance due north of the user
fn km_north(km: f64) -> Location {
    let origin = user();
    Location::new(origin.latitude + km / KM_PER_LAT_DEGREE, origin.longitude)
}

fn store(id: &str, retailer: &str, km: f64) -> Store {
    Store::new(
        id.to_string(),
        id.to_string(),
        "supermarket".to_string(),
        retailer.to_string(),
        "Test Street 1".to_string(),
        km_north(km),
    )
}

fn row(product_type: &str, name: &str, price: f64) -> CatalogRow {
    CatalogRow {
        product_type: product_type.to_string(),
        name: name.to_string(),
        price,
        discounted_price: None,
        in_stock: true,
        unit: None,
        offer_id: format!("{}-{}", product_type, price),
    }
}

fn request(mode: TransportMode, max_distance_km: f64, allow: bool) -> OptimizeRequest {
    OptimizeRequest {
        user_location: user(),
        mode,
        max_distance_km,
        allow_non_bio_alternatives: allow,
    }
}

fn optimizer(
    stores: Vec<Store>,
    catalog: InMemoryCatalog,
) -> StoreOptimizer<InMemoryDirectory, InMemoryCatalog, GreatCircle> {
    StoreOptimizer::new(InMemoryDirectory::new(stores), catalog, GreatCircle)
}

#[test]
fn scenario_single_store_is_both_closest_and_cheapest() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("milk", "Milk 1L", 1.50)]);
    let optimizer = optimizer(vec![store("s1", "r1", 2.0)], catalog);

    let basket = [BasketItem::new(ProductType::conventional("milk"), "Milk")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Driving, 5.0, false),
            &CancelFlag::new(),
        )
        .unwrap()
        .expect("one full-match store expected");

    assert_eq!(outcome.closest.option.store.id, "s1");
    assert_eq!(outcome.cheapest.option.store.id, "s1");
    assert!(outcome.closest.option.is_full_match());
    assert!((outcome.closest.option.distance_km - 2.0).abs() < 0.01);
    assert!((outcome.cheapest.option.total_price - 1.50).abs() < 1e-9);
    assert!(outcome.warning.is_none());
}

#[test]
fn scenario_strict_search_skips_store_without_organic_product() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("milk", "Milk 1L", 1.50)]);
    catalog.insert_retailer(
        "r2".to_string(),
        vec![row("milk bio", "Organic Milk 1L", 2.00)],
    );
    let optimizer = optimizer(
        vec![store("s1", "r1", 3.0), store("s2", "r2", 4.0)],
        catalog,
    );

    let basket = [BasketItem::new(ProductType::organic("milk"), "Bio Milk")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Driving, 5.0, false),
            &CancelFlag::new(),
        )
        .unwrap()
        .expect("s2 should match in full");

    // s1 only has conventional milk and substitutions are not permitted
    assert_eq!(outcome.closest.option.store.id, "s2");
    assert_eq!(outcome.cheapest.option.store.id, "s2");
    assert!((outcome.cheapest.option.total_price - 2.00).abs() < 1e-9);
    assert!(outcome.cheapest.option.bio_substitutions.is_empty());
}

#[test]
fn scenario_permissive_search_substitutes_and_wins() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("milk", "Milk 1L", 1.50)]);
    catalog.insert_retailer(
        "r2".to_string(),
        vec![row("milk bio", "Organic Milk 1L", 2.00)],
    );
    let optimizer = optimizer(
        vec![store("s1", "r1", 3.0), store("s2", "r2", 4.0)],
        catalog,
    );

    let basket = [BasketItem::new(ProductType::organic("milk"), "Bio Milk")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Driving, 5.0, true),
            &CancelFlag::new(),
        )
        .unwrap()
        .expect("both stores should match in full");

    // s1 becomes eligible via substitution and is both cheaper and closer
    assert_eq!(outcome.cheapest.option.store.id, "s1");
    assert_eq!(outcome.closest.option.store.id, "s1");
    assert!((outcome.cheapest.option.total_price - 1.50).abs() < 1e-9);
    assert_eq!(
        outcome
            .cheapest
            .option
            .bio_substitutions
            .get("Bio Milk")
            .map(String::as_str),
        Some("Milk 1L")
    );
}

#[test]
fn scenario_radius_extension_rescues_nearby_store() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("bread", "Bread 500g", 2.80)]);
    let optimizer = optimizer(vec![store("s1", "r1", 2.27)], catalog);

    let basket = [BasketItem::new(ProductType::conventional("bread"), "Bread")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Walking, 2.0, false),
            &CancelFlag::new(),
        )
        .unwrap()
        .expect("the 2.27 km store is inside the walking extension");

    assert_eq!(outcome.closest.option.store.id, "s1");
    match outcome.warning {
        Some(SearchWarning::RangeExtended {
            requested_km,
            actual_km,
        }) => {
            assert_eq!(requested_km, 2.0);
            assert!(
                actual_km > 2.25 && actual_km < 2.35,
                "expected first success around 2.3 km, got {}",
                actual_km
            );
        }
        other => panic!("expected a range-extended warning, got {:?}", other),
    }
}

#[test]
fn scenario_extension_is_bounded_per_mode() {
    // Walking may extend at most 0.5 km; a store at 2.7 km stays out of a
    // 2.0 km search
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("bread", "Bread 500g", 2.80)]);
    let optimizer = optimizer(vec![store("s1", "r1", 2.7)], catalog);

    let basket = [BasketItem::new(ProductType::conventional("bread"), "Bread")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Walking, 2.0, false),
            &CancelFlag::new(),
        )
        .unwrap();

    assert!(outcome.is_none());
}

#[test]
fn scenario_unstocked_product_yields_null() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("bread", "Bread 500g", 2.80)]);
    let optimizer = optimizer(vec![store("s1", "r1", 1.0)], catalog);

    let basket = [BasketItem::new(ProductType::conventional("caviar"), "Caviar")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Driving, 5.0, true),
            &CancelFlag::new(),
        )
        .unwrap();

    // the only in-range store carries nothing from the basket
    assert!(outcome.is_none());
}

#[test]
fn scenario_no_stores_in_range_yields_null() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer("r1".to_string(), vec![row("milk", "Milk 1L", 1.50)]);
    let optimizer = optimizer(vec![store("s1", "r1", 50.0)], catalog);

    let basket = [BasketItem::new(ProductType::conventional("milk"), "Milk")];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Walking, 2.0, false),
            &CancelFlag::new(),
        )
        .unwrap();

    assert!(outcome.is_none());
}

#[test]
fn scenario_partial_fallback_keeps_best_coverage() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer(
        "r1".to_string(),
        vec![
            row("milk", "Milk 1L", 1.50),
            row("bread", "Bread 500g", 2.80),
        ],
    );
    catalog.insert_retailer("r2".to_string(), vec![row("milk", "Milk 1L", 1.20)]);
    let optimizer = optimizer(
        vec![store("s1", "r1", 1.0), store("s2", "r2", 2.0)],
        catalog,
    );

    let basket = [
        BasketItem::new(ProductType::conventional("milk"), "Milk"),
        BasketItem::new(ProductType::conventional("bread"), "Bread"),
        BasketItem::new(ProductType::conventional("eggs"), "Eggs"),
    ];
    let outcome = optimizer
        .find_optimal_stores(
            &basket,
            &request(TransportMode::Driving, 5.0, false),
            &CancelFlag::new(),
        )
        .unwrap()
        .expect("partial fallback should return the 2-of-3 store");

    // s1 covers two items, s2 only one; only s1 survives
    assert_eq!(outcome.closest.option.store.id, "s1");
    assert_eq!(outcome.cheapest.option.store.id, "s1");
    assert_eq!(outcome.cheapest.option.unavailable_products, vec!["Eggs"]);
    assert_eq!(
        outcome.warning,
        Some(SearchWarning::PartialMatch { missing_count: 1 })
    );
}

#[test]
fn search_results_reprice_basket_against_selected_store() {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert_retailer(
        "r1".to_string(),
        vec![row("milk", "Milk 1L", 1.50), row("bread", "Bread 500g", 2.80)],
    );
    let optimizer = optimizer(vec![store("s1", "r1", 2.0)], catalog);

    let basket = [
        BasketItem::new(ProductType::conventional("milk"), "Milk"),
        BasketItem::new(ProductType::conventional("bread"), "Bread").with_quantity(2.0),
    ];
    let result = optimizer
        .find_cheapest_store(
            &basket,
            &request(TransportMode::Driving, 5.0, false),
            &CancelFlag::new(),
        )
        .unwrap();

    let cheapest = result.cheapest.expect("full match expected");
    assert!((cheapest.total_price - (1.50 + 2.0 * 2.80)).abs() < 1e-9);

    assert_eq!(result.optimized_items.len(), 2);
    assert_eq!(result.optimized_items[0].display_name, "Milk 1L");
    assert_eq!(result.optimized_items[0].unit_price, Some(1.50));
    assert_eq!(result.optimized_items[1].unit_price, Some(2.80));
    // the caller's basket is untouched
    assert!(basket[0].unit_price.is_none());
}
