// Synthetic multi-retailer world generation for demos and benchmarks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{BasketItem, Location, ProductType, Store};
use crate::providers::{CatalogRow, InMemoryCatalog, InMemoryDirectory};

/// Product families every generated retailer may stock
const FAMILIES: &[&str] = &[
    "milk", "bread", "chicken", "eggs", "apples", "rice", "cheese", "tomatoes",
];

/// Retailer chains of the generated world: (id, display name)
const RETAILERS: &[(&str, &str)] = &[
    ("alpmart", "Alpmart"),
    ("vita", "Vita Markt"),
    ("quickshop", "Quickshop"),
];

/// Roughly one kilometer in degrees of latitude
const DEG_PER_KM_LAT: f64 = 1.0 / 111.195;

/// A generated directory/catalog pair centered on a coordinate
pub struct DemoWorld {
    pub directory: InMemoryDirectory,
    pub catalog: InMemoryCatalog,
    pub center: Location,
}

/// Generates `branches_per_retailer` branches per retailer scattered within
/// a few kilometers of `center`, with catalogs including organic variants,
/// discounts and stock-outs. Deterministic for a fixed seed.
pub fn generate_world(center: Location, branches_per_retailer: usize, seed: u64) -> DemoWorld {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut stores = Vec::new();
    let mut catalog = InMemoryCatalog::new();

    for (retailer_id, retailer_name) in RETAILERS {
        for branch in 0..branches_per_retailer {
            let lat_offset = rng.gen_range(-4.0..4.0) * DEG_PER_KM_LAT;
            // longitude degrees shrink with latitude; close enough for a demo
            let lon_offset =
                rng.gen_range(-4.0..4.0) * DEG_PER_KM_LAT / center.latitude.to_radians().cos();
            stores.push(Store::new(
                format!("{}-{}", retailer_id, branch),
                format!("{} {}", retailer_name, branch + 1),
                "supermarket".to_string(),
                retailer_id.to_string(),
                format!("Demo Street {}", branch + 1),
                Location::new(center.latitude + lat_offset, center.longitude + lon_offset),
            ));
        }
        catalog.insert_retailer(retailer_id.to_string(), generate_rows(&mut rng, retailer_id));
    }

    DemoWorld {
        directory: InMemoryDirectory::new(stores),
        catalog,
        center,
    }
}

fn generate_rows(rng: &mut StdRng, retailer_id: &str) -> Vec<CatalogRow> {
    let mut rows = Vec::new();
    for family in FAMILIES {
        let price = (rng.gen_range(1.0..12.0_f64) * 20.0).round() / 20.0;
        let discounted = rng
            .gen_bool(0.25)
            .then(|| ((price * rng.gen_range(0.70..0.95)) * 20.0).round() / 20.0);
        rows.push(CatalogRow {
            product_type: family.to_string(),
            name: display_name(family, false),
            price,
            discounted_price: discounted,
            in_stock: rng.gen_bool(0.95),
            unit: Some("piece".to_string()),
            offer_id: format!("{}-{}", retailer_id, family),
        });

        // Organic variant at a markup, stocked less reliably
        if rng.gen_bool(0.7) {
            let organic_price = ((price * rng.gen_range(1.1..1.6)) * 20.0).round() / 20.0;
            rows.push(CatalogRow {
                product_type: format!("{} bio", family),
                name: display_name(family, true),
                price: organic_price,
                discounted_price: None,
                in_stock: rng.gen_bool(0.8),
                unit: Some("piece".to_string()),
                offer_id: format!("{}-{}-bio", retailer_id, family),
            });
        }
    }
    rows
}

fn display_name(family: &str, organic: bool) -> String {
    let mut name = String::new();
    let mut chars = family.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    if organic {
        name.push_str(" (bio)");
    }
    name
}

/// A basket covering a few families, including one organic request
pub fn demo_basket() -> Vec<BasketItem> {
    vec![
        BasketItem::new(ProductType::conventional("milk"), "Milk"),
        BasketItem::new(ProductType::conventional("bread"), "Bread"),
        BasketItem::new(ProductType::organic("eggs"), "Eggs (bio)"),
        BasketItem::new(ProductType::conventional("apples"), "Apples").with_quantity(1.5),
    ]
}
