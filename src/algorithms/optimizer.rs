// Store optimization engine - adaptive radius search with partial fallback

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};
use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::algorithms::pricer::{BasketPricer, PricedBasket};
use crate::models::{BasketItem, Km, Location, Store, StoreId, StoreOption};
use crate::providers::{
    DistanceProvider, PriceCatalog, ProviderError, StoreDirectory, TransportMode,
};

/// Cooperative cancellation handle for an in-flight optimization.
///
/// Clonable; the caller keeps one clone and flips it when the user navigates
/// away or re-submits with new parameters. The optimizer checks it at every
/// radius iteration and around each pricing pass.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Relaxed)
    }
}

/// Terminal failures of one optimization call.
///
/// Per-store and per-product lookup failures never surface here; they are
/// logged and the affected store simply contributes no data.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("optimization cancelled")]
    Cancelled,

    #[error("store directory unavailable: {0}")]
    Directory(#[source] ProviderError),
}

/// Non-fatal conditions the caller should surface alongside the result
#[derive(Debug, Clone, PartialEq)]
pub enum SearchWarning {
    /// A full match was only found beyond the user's distance budget
    RangeExtended { requested_km: Km, actual_km: Km },

    /// No store covers the whole basket; the returned options are
    /// best-effort partial solutions
    PartialMatch { missing_count: usize },
}

impl SearchWarning {
    /// User-presentable message. Callers suppress the partial-match variant
    /// once the user picks an option with no unavailable products.
    pub fn user_message(&self) -> String {
        match self {
            SearchWarning::RangeExtended {
                requested_km,
                actual_km,
            } => format!(
                "Search range increased from {:.1} km to {:.1} km to cover your whole basket",
                requested_km, actual_km
            ),
            SearchWarning::PartialMatch { missing_count } => format!(
                "No store carries your whole basket; the best options are missing {} item(s)",
                missing_count
            ),
        }
    }
}

/// Parameters of one optimization call
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub user_location: Location,
    pub mode: TransportMode,
    pub max_distance_km: Km,
    pub allow_non_bio_alternatives: bool,
}

/// The optimizer's result pair.
///
/// `closest` and `cheapest` may refer to the same store.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeOutcome {
    pub closest: PricedBasket,
    pub cheapest: PricedBasket,
    pub warning: Option<SearchWarning>,
}

/// Caller-facing result of the find-cheapest / find-closest entry points.
///
/// `None` options mean "no stores found". `optimized_items` is the basket
/// re-priced against the selected store, ready for display and for a
/// subsequent confirm-and-shop action.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSearchResult {
    pub cheapest: Option<StoreOption>,
    pub closest: Option<StoreOption>,
    pub optimized_items: Vec<BasketItem>,
    pub warning: Option<SearchWarning>,
}

impl StoreSearchResult {
    fn empty() -> Self {
        Self {
            cheapest: None,
            closest: None,
            optimized_items: Vec::new(),
            warning: None,
        }
    }
}

/// Finds the best stores for a basket across all retailers.
///
/// Explicitly constructed with its three collaborators and owned by the
/// caller for the session; holds no state between calls, so every call is
/// idempotent given unchanged backend data.
pub struct StoreOptimizer<D, C, R> {
    directory: D,
    catalog: C,
    distance: R,
}

impl<D, C, R> StoreOptimizer<D, C, R>
where
    D: StoreDirectory,
    C: PriceCatalog + Sync,
    R: DistanceProvider + Sync,
{
    pub fn new(directory: D, catalog: C, distance: R) -> Self {
        Self {
            directory,
            catalog,
            distance,
        }
    }

    /// Adaptive search for the (closest, cheapest) pair of full-match stores.
    ///
    /// Starts at the user's distance budget and widens the radius in
    /// mode-dependent steps, stopping at the first radius with at least one
    /// store covering the whole basket. When the fully extended radius still
    /// has no full match, falls back to the stores with the best partial
    /// coverage. Returns `Ok(None)` only when no store is in range at all or
    /// no in-range store carries a single basket item.
    pub fn find_optimal_stores(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        cancel: &CancelFlag,
    ) -> Result<Option<OptimizeOutcome>, OptimizeError> {
        if basket.is_empty() {
            return Ok(None);
        }

        let mut stores = self.directory.all_stores().map_err(OptimizeError::Directory)?;
        stores.retain(|store| store.location.is_set());
        if stores.is_empty() {
            debug!("store directory is empty, nothing to search");
            return Ok(None);
        }

        let pricer = BasketPricer::new(&self.catalog);
        let hard_limit = request.max_distance_km + request.mode.max_extension_km();
        // Pricing is radius-independent, so each store is priced at most once
        // per call; widening the radius only prices newly reachable stores.
        let mut priced: HashMap<StoreId, Option<PricedBasket>> = HashMap::new();

        let mut radius = request.max_distance_km;
        loop {
            if cancel.is_cancelled() {
                return Err(OptimizeError::Cancelled);
            }

            let in_range = self.stores_within(&stores, request.user_location, radius);
            debug!("radius {:.2} km: {} candidate stores", radius, in_range.len());
            self.price_pending(&pricer, &in_range, basket, request, &mut priced, cancel)?;

            let full_matches: Vec<&PricedBasket> = in_range
                .iter()
                .filter_map(|store| priced.get(&store.id).and_then(Option::as_ref))
                .filter(|candidate| candidate.option.is_full_match())
                .collect();

            if !full_matches.is_empty() {
                let survivors = dedup_by_retailer(full_matches);
                let warning = (radius > request.max_distance_km).then(|| {
                    SearchWarning::RangeExtended {
                        requested_km: request.max_distance_km,
                        actual_km: radius,
                    }
                });
                return Ok(select_pair(&survivors, warning));
            }

            if radius >= hard_limit {
                break;
            }
            radius = (radius + request.mode.radius_step_km()).min(hard_limit);
        }

        self.partial_fallback(&pricer, &stores, basket, request, hard_limit, priced, cancel)
    }

    /// Best-effort search once the extended radius is exhausted: keep the
    /// stores covering the most basket items and pick the pair among them.
    #[allow(clippy::too_many_arguments)]
    fn partial_fallback(
        &self,
        pricer: &BasketPricer<C>,
        stores: &[Store],
        basket: &[BasketItem],
        request: &OptimizeRequest,
        hard_limit: Km,
        mut priced: HashMap<StoreId, Option<PricedBasket>>,
        cancel: &CancelFlag,
    ) -> Result<Option<OptimizeOutcome>, OptimizeError> {
        let in_range = self.stores_within(stores, request.user_location, hard_limit);
        self.price_pending(pricer, &in_range, basket, request, &mut priced, cancel)?;

        let candidates: Vec<&PricedBasket> = in_range
            .iter()
            .filter_map(|store| priced.get(&store.id).and_then(Option::as_ref))
            .collect();

        let max_available = candidates
            .iter()
            .map(|candidate| candidate.option.available_count(basket.len()))
            .max()
            .unwrap_or(0);
        if max_available == 0 {
            debug!("partial fallback found no coverage at all");
            return Ok(None);
        }

        let best: Vec<&PricedBasket> = candidates
            .into_iter()
            .filter(|candidate| candidate.option.available_count(basket.len()) == max_available)
            .collect();
        let survivors = dedup_by_retailer(best);
        let warning = Some(SearchWarning::PartialMatch {
            missing_count: basket.len() - max_available,
        });
        Ok(select_pair(&survivors, warning))
    }

    fn stores_within<'s>(&self, stores: &'s [Store], user: Location, radius: Km) -> Vec<&'s Store> {
        // Straight-line prefilter; the routed distance is looked up only for
        // survivors
        stores
            .iter()
            .filter(|store| user.distance_to(&store.location) <= radius)
            .collect()
    }

    /// Prices every store that has not been priced yet. Fan-out is per store;
    /// aggregation happens only after the whole pass has been collected.
    fn price_pending(
        &self,
        pricer: &BasketPricer<C>,
        in_range: &[&Store],
        basket: &[BasketItem],
        request: &OptimizeRequest,
        priced: &mut HashMap<StoreId, Option<PricedBasket>>,
        cancel: &CancelFlag,
    ) -> Result<(), OptimizeError> {
        let pending: Vec<&Store> = in_range
            .iter()
            .copied()
            .filter(|store| !priced.contains_key(&store.id))
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        let distance = &self.distance;
        let results: Vec<(StoreId, Option<PricedBasket>)> = pending
            .par_iter()
            .map(|store| {
                if cancel.is_cancelled() {
                    return (store.id.clone(), None);
                }
                let estimate =
                    distance.distance(&request.user_location, &store.location, request.mode);
                match pricer.price(store, basket, &estimate, request.allow_non_bio_alternatives) {
                    Ok(candidate) => (store.id.clone(), Some(candidate)),
                    Err(err) => {
                        warn!(
                            "pricing failed for store {} (retailer {}): {}",
                            store.id, store.retailer_id, err
                        );
                        (store.id.clone(), None)
                    }
                }
            })
            .collect();

        if cancel.is_cancelled() {
            return Err(OptimizeError::Cancelled);
        }
        priced.extend(results);
        Ok(())
    }

    /// Full search keyed to the cheapest option: the optimized items are the
    /// basket re-priced at the cheapest store.
    pub fn find_cheapest_store(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        cancel: &CancelFlag,
    ) -> Result<StoreSearchResult, OptimizeError> {
        Ok(match self.find_optimal_stores(basket, request, cancel)? {
            Some(outcome) => StoreSearchResult {
                optimized_items: outcome.cheapest.items.clone(),
                cheapest: Some(outcome.cheapest.option),
                closest: Some(outcome.closest.option),
                warning: outcome.warning,
            },
            None => StoreSearchResult::empty(),
        })
    }

    /// Full search keyed to the closest option: the optimized items are the
    /// basket re-priced at the closest store.
    pub fn find_closest_store(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        cancel: &CancelFlag,
    ) -> Result<StoreSearchResult, OptimizeError> {
        Ok(match self.find_optimal_stores(basket, request, cancel)? {
            Some(outcome) => StoreSearchResult {
                optimized_items: outcome.closest.items.clone(),
                cheapest: Some(outcome.cheapest.option),
                closest: Some(outcome.closest.option),
                warning: outcome.warning,
            },
            None => StoreSearchResult::empty(),
        })
    }
}

/// Keeps only the closest branch per retailer
fn dedup_by_retailer(candidates: Vec<&PricedBasket>) -> Vec<&PricedBasket> {
    let mut best: HashMap<&str, &PricedBasket> = HashMap::new();
    for candidate in candidates {
        let entry = best
            .entry(candidate.option.store.retailer_id.as_str())
            .or_insert(candidate);
        if candidate.option.distance_km < entry.option.distance_km {
            *entry = candidate;
        }
    }
    best.into_values().collect()
}

/// Picks (closest, cheapest) among the surviving candidates
fn select_pair(
    survivors: &[&PricedBasket],
    warning: Option<SearchWarning>,
) -> Option<OptimizeOutcome> {
    let closest = survivors.iter().min_by(|a, b| {
        a.option
            .distance_km
            .partial_cmp(&b.option.distance_km)
            .unwrap_or(Ordering::Equal)
    })?;
    let cheapest = survivors.iter().min_by(|a, b| {
        a.option
            .total_price
            .partial_cmp(&b.option.total_price)
            .unwrap_or(Ordering::Equal)
    })?;
    Some(OptimizeOutcome {
        closest: (*closest).clone(),
        cheapest: (*cheapest).clone(),
        warning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());

        let observer = flag.clone();
        flag.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn test_warning_messages() {
        let extended = SearchWarning::RangeExtended {
            requested_km: 2.0,
            actual_km: 2.3,
        };
        assert!(extended.user_message().contains("Search range increased"));

        let partial = SearchWarning::PartialMatch { missing_count: 2 };
        assert!(partial.user_message().contains("missing 2 item(s)"));
    }
}
