use basket_optimizer::algorithms::{
    CancelFlag, DualResultCoordinator, OptimizeRequest, StoreOptimizer, StoreSearchResult,
};
use basket_optimizer::models::Location;
use basket_optimizer::providers::{GreatCircle, TransportMode};
use basket_optimizer::utils::demo_data::{demo_basket, generate_world};

fn main() {
    env_logger::init();

    // Zurich main station as the user's location
    let center = Location::new(47.3769, 8.5417);
    let world = generate_world(center, 4, 42);
    let basket = demo_basket();

    println!("Shopping basket:");
    for item in &basket {
        println!(
            "  {} x{:.1} ({})",
            item.display_name,
            item.quantity,
            item.product_type.to_legacy_id()
        );
    }

    let optimizer = StoreOptimizer::new(world.directory, world.catalog, GreatCircle);
    let cancel = CancelFlag::new();
    let request = OptimizeRequest {
        user_location: center,
        mode: TransportMode::Walking,
        max_distance_km: 3.0,
        allow_non_bio_alternatives: true,
    };

    println!(
        "\nSearching stores within {:.1} km ({:?})...",
        request.max_distance_km, request.mode
    );
    match optimizer.find_cheapest_store(&basket, &request, &cancel) {
        Ok(result) => print_search_result(&result),
        Err(e) => {
            eprintln!("Store search failed: {}", e);
            return;
        }
    }

    // Same basket again, this time letting the coordinator decide whether the
    // organic request needs a second, substitution-permissive result
    let coordinator = DualResultCoordinator::new(&optimizer);
    println!("\nWith-alternatives search:");
    match coordinator.find_cheapest_store_with_alternatives(&basket, &request, &cancel) {
        Ok(dual) => {
            match &dual.exact {
                Some(exact) => {
                    println!("Exact-match result:");
                    print_search_result(exact);
                }
                None => println!("Exact-match pass found no store."),
            }
            if dual.needs_dual_display {
                if let Some(alternative) = &dual.alternative {
                    println!("Alternative result (with substitutes):");
                    print_search_result(alternative);
                }
            } else {
                println!("(single result is sufficient)");
            }
        }
        Err(e) => eprintln!("Store search failed: {}", e),
    }
}

fn print_search_result(result: &StoreSearchResult) {
    let (cheapest, closest) = match (&result.cheapest, &result.closest) {
        (Some(cheapest), Some(closest)) => (cheapest, closest),
        _ => {
            println!("  No stores found.");
            return;
        }
    };

    println!("------------------------------------------");
    println!(
        "  Cheapest: {} ({}) - {:.2} CHF at {:.2} km",
        cheapest.store.name,
        cheapest.store.retailer_id,
        cheapest.total_price,
        cheapest.distance_km
    );
    println!(
        "  Closest:  {} ({}) - {:.2} CHF at {:.2} km",
        closest.store.name, closest.store.retailer_id, closest.total_price, closest.distance_km
    );
    if cheapest.total_savings > 0.0 {
        println!("  Savings at cheapest store: {:.2} CHF", cheapest.total_savings);
    }
    for (requested, substitute) in &cheapest.bio_substitutions {
        println!("  Substituted: {} -> {}", requested, substitute);
    }
    for (requested, upgrade) in &cheapest.bio_upgrades {
        println!("  Upgraded: {} -> {}", requested, upgrade);
    }
    if !cheapest.unavailable_products.is_empty() {
        println!("  Unavailable: {}", cheapest.unavailable_products.join(", "));
    }
    if let Some(warning) = &result.warning {
        println!("  Note: {}", warning.user_message());
    }

    println!("  Optimized items:");
    for item in &result.optimized_items {
        match item.unit_price {
            Some(price) => println!(
                "    {} x{:.1}: {:.2} CHF each",
                item.display_name, item.quantity, price
            ),
            None => println!("    {} x{:.1}: unavailable", item.display_name, item.quantity),
        }
    }

    // Trade-off analysis between the two candidates
    if cheapest.store.id != closest.store.id && closest.total_price > 0.0 {
        println!(
            "  Closest store is {:.2} km nearer but {:.1}% more expensive than the cheapest.",
            cheapest.distance_km - closest.distance_km,
            100.0 * (closest.total_price - cheapest.total_price) / closest.total_price
        );
    }
}
