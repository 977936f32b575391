use crate::model::*;
use crate::observability;

/// Which stored rate a price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Tier(usize),
    Weekly,
    Base,
}

impl PriceSource {
    pub fn label(self) -> &'static str {
        match self {
            PriceSource::Tier(_) => "tier",
            PriceSource::Weekly => "weekly",
            PriceSource::Base => "base",
        }
    }
}

/// Nightly rate to display for a listing given how many days are selected.
///
/// Tier rates are stored per night and returned as-is. With no tier for the
/// night count (including the empty selection, which has zero nights) the
/// weekly rate spread over seven nights is used, then the base nightly rate.
pub fn resolve_price(rates: &NightPriceTable, selected_day_count: usize) -> f64 {
    let (price, source) = resolve_price_with_source(rates, selected_day_count);
    metrics::counter!(observability::PRICE_RESOLUTIONS_TOTAL, "source" => source.label())
        .increment(1);
    price
}

pub fn resolve_price_with_source(
    rates: &NightPriceTable,
    selected_day_count: usize,
) -> (f64, PriceSource) {
    let nights = selected_day_count.saturating_sub(1);
    if (2..=7).contains(&nights)
        && let Some(rate) = rates.tier(nights)
    {
        return (rate, PriceSource::Tier(nights));
    }
    if let Some(weekly) = rates.weekly {
        return ((weekly / 7.0).round(), PriceSource::Weekly);
    }
    (
        rates.standardized_minimum_nightly_price.unwrap_or(0.0),
        PriceSource::Base,
    )
}

/// Resolve every visible listing for the current day count.
pub fn resolve_prices(listings: &[Listing], selected_day_count: usize) -> Vec<ListingPrice> {
    listings
        .iter()
        .map(|l| ListingPrice {
            listing: l.id.clone(),
            nightly: resolve_price(&l.rates, selected_day_count),
        })
        .collect()
}
