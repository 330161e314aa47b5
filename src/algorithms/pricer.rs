// Basket pricing against a single store's catalog

use std::collections::HashMap;

use crate::models::{BasketItem, PriceOffer, ProductType, Store, StoreOption};
use crate::providers::{DistanceEstimate, PriceCatalog, ProviderError};

/// A store option together with the basket re-priced against that store.
///
/// `items` are copies; the caller's basket is never touched. They become the
/// `optimized_items` of a search result once the store is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedBasket {
    pub option: StoreOption,
    pub items: Vec<BasketItem>,
}

/// Prices whole baskets against one store at a time
pub struct BasketPricer<'a, C: PriceCatalog> {
    catalog: &'a C,
}

impl<'a, C: PriceCatalog> BasketPricer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Prices every basket item at `store`.
    ///
    /// Per item, in order:
    /// 1. use the direct offer for the exact product type;
    /// 2. a conventional item with a direct offer still probes its organic
    ///    variant, and is silently upgraded when the organic offer is
    ///    strictly cheaper - this runs regardless of
    ///    `allow_non_bio_alternatives`;
    /// 3. an organic item without a direct offer falls back to its
    ///    conventional variant, but only when `allow_non_bio_alternatives`;
    /// 4. anything still unresolved is recorded as unavailable.
    ///
    /// Every item resolves to exactly one of the four outcomes.
    pub fn price(
        &self,
        store: &Store,
        basket: &[BasketItem],
        estimate: &DistanceEstimate,
        allow_non_bio_alternatives: bool,
    ) -> Result<PricedBasket, ProviderError> {
        let offers = self
            .catalog
            .fetch_prices(&store.retailer_id, &query_set(basket))?;

        let mut option = StoreOption {
            store: store.clone(),
            total_price: 0.0,
            distance_km: estimate.distance_km,
            duration_minutes: estimate.duration_minutes,
            unavailable_products: Vec::new(),
            bio_substitutions: HashMap::new(),
            bio_upgrades: HashMap::new(),
            total_savings: 0.0,
        };
        let mut items = Vec::with_capacity(basket.len());

        for item in basket {
            let resolved: Option<&PriceOffer> = match offers.get(&item.product_type) {
                Some(direct) if !item.product_type.organic => {
                    match offers.get(&item.product_type.organic_variant()) {
                        Some(organic) if organic.final_price < direct.final_price => {
                            option
                                .bio_upgrades
                                .insert(item.display_name.clone(), organic.display_name.clone());
                            Some(organic)
                        }
                        _ => Some(direct),
                    }
                }
                Some(direct) => Some(direct),
                None if item.product_type.organic && allow_non_bio_alternatives => {
                    offers
                        .get(&item.product_type.conventional_variant())
                        .map(|conventional| {
                            option.bio_substitutions.insert(
                                item.display_name.clone(),
                                conventional.display_name.clone(),
                            );
                            conventional
                        })
                }
                None => None,
            };

            match resolved {
                Some(offer) => {
                    option.total_price += offer.final_price * item.quantity;
                    option.total_savings += offer.savings_per_unit() * item.quantity;
                    let mut priced = item.clone();
                    priced.apply_offer(offer);
                    items.push(priced);
                }
                None => {
                    option.unavailable_products.push(item.display_name.clone());
                    items.push(item.clone());
                }
            }
        }

        Ok(PricedBasket { option, items })
    }
}

/// Every basket type plus the variants the substitution policy may probe
fn query_set(basket: &[BasketItem]) -> Vec<ProductType> {
    let mut types: Vec<ProductType> = Vec::with_capacity(basket.len() * 2);
    for item in basket {
        let variant = if item.product_type.organic {
            item.product_type.conventional_variant()
        } else {
            item.product_type.organic_variant()
        };
        if !types.contains(&item.product_type) {
            types.push(item.product_type.clone());
        }
        if !types.contains(&variant) {
            types.push(variant);
        }
    }
    types
}
