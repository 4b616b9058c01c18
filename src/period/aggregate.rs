//! Bucketing of datetime features and reference/production boundary stitching.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use super::types::{BoundaryMerge, Bucket, BucketedSeries, PeriodUnit};
use crate::error::Result;
use crate::series::FeatureSeries;

/// Count timestamps per period start.
pub fn bucket_counts(timestamps: &[NaiveDateTime], unit: PeriodUnit) -> BucketedSeries {
    let mut counts: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for &ts in timestamps {
        *counts.entry(unit.floor(ts)).or_insert(0) += 1;
    }
    BucketedSeries::new(
        counts
            .into_iter()
            .map(|(start, count)| Bucket { start, count })
            .collect(),
    )
}

/// Stitch two series that share their boundary bucket.
///
/// When the last reference period equals the first production period, the
/// smaller of the two counts is added to the larger side and the bucket is
/// dropped from the smaller side. Ties keep the bucket on the reference
/// side. Total counts are conserved. Series that do not touch are returned
/// unchanged.
pub fn merge_boundary(
    reference: BucketedSeries,
    production: BucketedSeries,
) -> (BucketedSeries, BucketedSeries, Option<BoundaryMerge>) {
    let (Some(ref_last), Some(prod_first)) = (reference.last().copied(), production.first().copied())
    else {
        return (reference, production, None);
    };
    if ref_last.start != prod_first.start {
        return (reference, production, None);
    }

    let mut ref_buckets = reference.into_buckets();
    let mut prod_buckets = production.into_buckets();
    let ref_idx = ref_buckets.len() - 1;
    let start = ref_last.start;

    let merge = if prod_first.count > ref_last.count {
        prod_buckets[0].count += ref_last.count;
        ref_buckets.truncate(ref_idx);
        BoundaryMerge::IntoProduction {
            start,
            moved: ref_last.count,
        }
    } else {
        ref_buckets[ref_idx].count += prod_first.count;
        prod_buckets.remove(0);
        BoundaryMerge::IntoReference {
            start,
            moved: prod_first.count,
        }
    };
    debug!(?merge, "merged shared boundary bucket");

    (
        BucketedSeries::new(ref_buckets),
        BucketedSeries::new(prod_buckets),
        Some(merge),
    )
}

/// Bucket a datetime feature for reference and, if present, production.
///
/// Production buckets are stitched to reference buckets with
/// [`merge_boundary`]. Input series are left untouched.
pub fn aggregate(
    reference: &FeatureSeries,
    production: Option<&FeatureSeries>,
    unit: PeriodUnit,
) -> Result<(BucketedSeries, Option<BucketedSeries>)> {
    let ref_buckets = bucket_counts(&reference.datetimes()?, unit);
    let Some(production) = production else {
        return Ok((ref_buckets, None));
    };
    let prod_buckets = bucket_counts(&production.datetimes()?, unit);
    let (ref_buckets, prod_buckets, _) = merge_boundary(ref_buckets, prod_buckets);
    Ok((ref_buckets, Some(prod_buckets)))
}
