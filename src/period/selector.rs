//! Period selection for datetime features.

use chrono::NaiveDateTime;
use tracing::debug;

use super::types::PeriodUnit;
use crate::error::Result;
use crate::series::FeatureSeries;

/// Number of buckets a datetime chart should ideally show.
pub const OPTIMAL_POINTS: f64 = 150.0;

/// Choose the unit whose estimated bucket count is closest to [`OPTIMAL_POINTS`].
///
/// The span is measured in whole days across reference and production
/// combined. When every timestamp is identical (or there are none) all
/// units score the same and the first one, [`PeriodUnit::Year`], wins.
pub fn choose_period_for(
    reference: &[NaiveDateTime],
    production: Option<&[NaiveDateTime]>,
) -> PeriodUnit {
    let production = production.unwrap_or_default();
    let lo = reference.iter().chain(production).min();
    let hi = reference.iter().chain(production).max();
    let days = match (lo, hi) {
        (Some(lo), Some(hi)) => (*hi - *lo).num_days() as f64,
        _ => 0.0,
    };

    let mut best = PeriodUnit::Year;
    let mut best_gap = f64::INFINITY;
    for unit in PeriodUnit::ALL {
        let gap = (OPTIMAL_POINTS - days / unit.length_in_days()).abs();
        // Strict comparison keeps the coarser unit on ties.
        if gap < best_gap {
            best = unit;
            best_gap = gap;
        }
    }
    debug!(days, unit = %best, "chose aggregation period");
    best
}

/// Choose the aggregation unit for a datetime feature.
///
/// Fails when a cell is not a timestamp.
pub fn choose_period(
    reference: &FeatureSeries,
    production: Option<&FeatureSeries>,
) -> Result<PeriodUnit> {
    let reference = reference.datetimes()?;
    let production = production.map(FeatureSeries::datetimes).transpose()?;
    Ok(choose_period_for(&reference, production.as_deref()))
}
