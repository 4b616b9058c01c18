//! Property tests for drift detection
//!
//! Ensures the detection pipeline satisfies its invariants:
//! - Boundary stitching conserves counts
//! - Scores stay in their documented ranges
//! - Verdicts do not depend on the order of cells or of features

use chrono::{Duration, NaiveDate, NaiveDateTime};
use driftscope::period::{aggregate, choose_period_for, PeriodUnit};
use driftscope::stattest::run_test;
use driftscope::{DriftConfig, DriftPolicy, FeatureSeries, TestName};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// Strategy Helpers
// =============================================================================

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Timestamps within roughly three years of 2020-01-01, at hour resolution
fn timestamps(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<NaiveDateTime>> {
    vec(0i64..26_000, len).prop_map(|hours| {
        hours
            .into_iter()
            .map(|h| epoch() + Duration::hours(h))
            .collect()
    })
}

fn samples(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    vec(-1e3f64..1e3, len)
}

fn unit() -> impl Strategy<Value = PeriodUnit> {
    prop::sample::select(PeriodUnit::ALL.to_vec())
}

// =============================================================================
// Aggregation Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_aggregate_conserves_total(
        reference in timestamps(1..60),
        production in timestamps(1..60),
        unit in unit(),
    ) {
        let r = FeatureSeries::new("t", reference.clone());
        let p = FeatureSeries::new("t", production.clone());
        let (rb, pb) = aggregate(&r, Some(&p), unit).unwrap();
        let pb = pb.unwrap();

        prop_assert_eq!(rb.total() + pb.total(), reference.len() + production.len());
        // No period is shared after the stitch
        if let (Some(last), Some(first)) = (rb.last(), pb.first()) {
            prop_assert!(last.start != first.start);
        }
    }

    #[test]
    fn prop_choose_period_symmetric(
        reference in timestamps(1..40),
        production in timestamps(1..40),
    ) {
        prop_assert_eq!(
            choose_period_for(&reference, Some(&production)),
            choose_period_for(&production, Some(&reference))
        );
    }
}

// =============================================================================
// Statistical Test Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_scores_in_range(
        a in samples(2..80),
        b in samples(2..80),
    ) {
        let r = FeatureSeries::new("x", a);
        let p = FeatureSeries::new("x", b);
        for test in TestName::ALL {
            let result = run_test(test, &r, &p, test.default_threshold()).unwrap();
            prop_assert!(result.score.is_finite(), "{} gave {}", test, result.score);
            if test == TestName::Wasserstein {
                prop_assert!(result.score >= 0.0);
            } else {
                prop_assert!((0.0..=1.0).contains(&result.score));
            }
        }
    }

    #[test]
    fn prop_ks_order_independent(
        a in samples(2..50),
        b in samples(2..50),
    ) {
        let forward = run_test(
            TestName::KolmogorovSmirnov,
            &FeatureSeries::new("x", a.clone()),
            &FeatureSeries::new("x", b.clone()),
            0.05,
        ).unwrap();

        let mut a_rev = a;
        a_rev.reverse();
        let mut b_rev = b;
        b_rev.reverse();
        let reversed = run_test(
            TestName::KolmogorovSmirnov,
            &FeatureSeries::new("x", a_rev),
            &FeatureSeries::new("x", b_rev),
            0.05,
        ).unwrap();

        prop_assert_eq!(forward, reversed);
    }
}

// =============================================================================
// Policy Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_decide_all_independent_of_feature_order(
        columns in vec((samples(2..30), samples(2..30)), 1..6),
    ) {
        let reference: Vec<_> = columns
            .iter()
            .enumerate()
            .map(|(i, (a, _))| FeatureSeries::new(format!("f{i}"), a.clone()))
            .collect();
        let production: Vec<_> = columns
            .iter()
            .enumerate()
            .map(|(i, (_, b))| FeatureSeries::new(format!("f{i}"), b.clone()))
            .collect();

        let policy = DriftPolicy::new(DriftConfig::default());
        let forward = policy.decide_all(&reference, &production);

        let mut shuffled = reference.clone();
        shuffled.reverse();
        let backward = policy.decide_all(&shuffled, &production);

        prop_assert_eq!(forward.verdicts, backward.verdicts);
        prop_assert!(forward.failures.is_empty());
    }
}
