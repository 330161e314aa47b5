// Dual-result coordination for baskets containing organic products

use crate::algorithms::optimizer::{
    CancelFlag, OptimizeError, OptimizeOutcome, OptimizeRequest, StoreOptimizer,
    StoreSearchResult,
};
use crate::algorithms::pricer::PricedBasket;
use crate::models::BasketItem;
use crate::providers::{DistanceProvider, PriceCatalog, StoreDirectory};

/// Which of the two Pareto candidates the caller is optimizing for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeIntent {
    Cheapest,
    Closest,
}

/// The exact and substitution-permissive passes over the same basket
#[derive(Debug, Clone, PartialEq)]
pub struct DualOutcome {
    pub exact: Option<OptimizeOutcome>,
    pub alternative: Option<OptimizeOutcome>,
    pub needs_dual_display: bool,
}

/// Caller-facing shape of a with-alternatives search.
///
/// `exact` is `None` when the strict pass found no store at all; the same
/// holds for `alternative`.
#[derive(Debug, Clone, PartialEq)]
pub struct DualSearchResult {
    pub exact: Option<StoreSearchResult>,
    pub alternative: Option<StoreSearchResult>,
    pub needs_dual_display: bool,
}

/// Runs the optimizer twice - strict, then substitution-permissive - and
/// decides whether the caller must present both outcomes (e.g. "exact bio
/// basket" next to "basket with conventional substitutes").
pub struct DualResultCoordinator<'a, D, C, R> {
    optimizer: &'a StoreOptimizer<D, C, R>,
}

impl<'a, D, C, R> DualResultCoordinator<'a, D, C, R>
where
    D: StoreDirectory,
    C: PriceCatalog + Sync,
    R: DistanceProvider + Sync,
{
    pub fn new(optimizer: &'a StoreOptimizer<D, C, R>) -> Self {
        Self { optimizer }
    }

    /// Runs both passes and decides the display mode.
    ///
    /// Dual display is needed when the strict pass found nothing but the
    /// permissive one did, when the permissive winner covers strictly more
    /// items, or when it records at least one substitution. Otherwise the
    /// exact result is equivalent or better and is shown alone. Baskets
    /// without any organic item skip the permissive pass entirely.
    pub fn resolve(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        intent: OptimizeIntent,
        cancel: &CancelFlag,
    ) -> Result<DualOutcome, OptimizeError> {
        let strict_request = OptimizeRequest {
            allow_non_bio_alternatives: false,
            ..request.clone()
        };
        let exact = self
            .optimizer
            .find_optimal_stores(basket, &strict_request, cancel)?;

        if !basket.iter().any(|item| item.product_type.organic) {
            return Ok(DualOutcome {
                exact,
                alternative: None,
                needs_dual_display: false,
            });
        }

        let permissive_request = OptimizeRequest {
            allow_non_bio_alternatives: true,
            ..request.clone()
        };
        let alternative = self
            .optimizer
            .find_optimal_stores(basket, &permissive_request, cancel)?;

        let needs_dual_display = match (&exact, &alternative) {
            (None, Some(_)) => true,
            (Some(exact), Some(alternative)) => {
                let exact_winner = winner(exact, intent);
                let alternative_winner = winner(alternative, intent);
                let covered = |candidate: &PricedBasket| {
                    candidate.option.available_count(basket.len())
                };
                covered(alternative_winner) > covered(exact_winner)
                    || !alternative_winner.option.bio_substitutions.is_empty()
            }
            _ => false,
        };

        Ok(DualOutcome {
            exact,
            alternative,
            needs_dual_display,
        })
    }

    /// With-alternatives search keyed to the cheapest option
    pub fn find_cheapest_store_with_alternatives(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        cancel: &CancelFlag,
    ) -> Result<DualSearchResult, OptimizeError> {
        self.with_alternatives(basket, request, OptimizeIntent::Cheapest, cancel)
    }

    /// With-alternatives search keyed to the closest option
    pub fn find_closest_store_with_alternatives(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        cancel: &CancelFlag,
    ) -> Result<DualSearchResult, OptimizeError> {
        self.with_alternatives(basket, request, OptimizeIntent::Closest, cancel)
    }

    fn with_alternatives(
        &self,
        basket: &[BasketItem],
        request: &OptimizeRequest,
        intent: OptimizeIntent,
        cancel: &CancelFlag,
    ) -> Result<DualSearchResult, OptimizeError> {
        let dual = self.resolve(basket, request, intent, cancel)?;
        Ok(DualSearchResult {
            exact: dual.exact.map(|outcome| to_search_result(outcome, intent)),
            alternative: dual
                .alternative
                .map(|outcome| to_search_result(outcome, intent)),
            needs_dual_display: dual.needs_dual_display,
        })
    }
}

fn winner(outcome: &OptimizeOutcome, intent: OptimizeIntent) -> &PricedBasket {
    match intent {
        OptimizeIntent::Cheapest => &outcome.cheapest,
        OptimizeIntent::Closest => &outcome.closest,
    }
}

fn to_search_result(outcome: OptimizeOutcome, intent: OptimizeIntent) -> StoreSearchResult {
    let optimized_items = match intent {
        OptimizeIntent::Cheapest => outcome.cheapest.items.clone(),
        OptimizeIntent::Closest => outcome.closest.items.clone(),
    };
    StoreSearchResult {
        optimized_items,
        cheapest: Some(outcome.cheapest.option),
        closest: Some(outcome.closest.option),
        warning: outcome.warning,
    }
}
