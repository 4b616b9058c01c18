//! Datetime aggregation
//!
//! Turns datetime features into period counts that can be plotted side by
//! side for reference and production:
//! - `choose_period`: picks year/quarter/month/week/day/hour granularity
//! - `aggregate`: buckets both sides and stitches a shared boundary period

mod aggregate;
mod selector;
mod types;


pub use aggregate::{aggregate, bucket_counts, merge_boundary};
pub use selector::{choose_period, choose_period_for, OPTIMAL_POINTS};
pub use types::{BoundaryMerge, Bucket, BucketedSeries, PeriodUnit};
