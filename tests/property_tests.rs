//! Property-based tests using proptest.
//!
//! Pins the numeric laws the pipeline relies on: the standard-score
//! round-trip, exact dataset restoration after leave-one-out runs, k = 1
//! determinism against a brute-force nearest search, and the documented
//! behaviour of non-finite distances from zero-variance features.

use clasificar::prelude::*;
use clasificar::stats;
use proptest::prelude::*;

fn label_strategy() -> impl Strategy<Value = Label> {
    (0..Label::COUNT).prop_map(|i| Label::ALL[i])
}

fn method_strategy() -> impl Strategy<Value = Method> {
    (0..Method::ALL.len()).prop_map(|i| Method::ALL[i])
}

/// A dataset of `n` samples with `d` feature dimensions, values in a tame
/// finite range.
fn dataset_strategy(n: usize, d: usize) -> impl Strategy<Value = Dataset> {
    proptest::collection::vec(
        (proptest::collection::vec(-100.0f32..100.0, d), label_strategy()),
        n,
    )
    .prop_map(|rows| {
        Dataset::new(
            rows.into_iter()
                .map(|(features, label)| Sample::new(features, label))
                .collect(),
        )
        .expect("generated samples are uniform")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Standard-score round-trip: z * sd + mean recovers x.
    #[test]
    fn standardize_round_trips(values in proptest::collection::vec(-1000.0f32..1000.0, 2..20)) {
        let mean = stats::mean(&values);
        let sd = stats::standard_deviation(&values, mean);
        prop_assume!(sd > 1e-3);

        let scaled = stats::standardize(&values, mean, sd);
        for (z, x) in scaled.iter().zip(values.iter()) {
            prop_assert!((z * sd + mean - x).abs() < 1e-2);
        }
    }

    // The degenerate-input fallback never turns into a crash or a non-zero
    // value, whatever the mean argument.
    #[test]
    fn degenerate_statistics_fall_back_to_zero(m in -1000.0f32..1000.0, x in -1000.0f32..1000.0) {
        prop_assert_eq!(stats::mean(&[]), 0.0);
        prop_assert_eq!(stats::standard_deviation(&[], m), 0.0);
        prop_assert_eq!(stats::standard_deviation(&[x], m), 0.0);
    }

    // Leave-one-out always hands the dataset back exactly as it found it.
    #[test]
    fn leave_one_out_restores_samples_and_counts(
        mut dataset in dataset_strategy(6, 3),
        k in 1usize..=5,
        method in method_strategy(),
        bits in 1u64..8,
    ) {
        let mask = FeatureMask::from_bits(bits, 3);
        let samples = dataset.samples().to_vec();
        let counts = dataset.label_counts();

        LeaveOneOut::new()
            .accuracy(&mut dataset, &mask, k, method)
            .expect("configuration is valid by construction");

        prop_assert_eq!(dataset.samples(), &samples[..]);
        prop_assert_eq!(dataset.label_counts(), counts);
    }

    // Classification never mutates the dataset and is deterministic.
    #[test]
    fn classify_is_pure_and_deterministic(
        dataset in dataset_strategy(8, 2),
        query in proptest::collection::vec(-100.0f32..100.0, 2),
        k in 1usize..=7,
        method in method_strategy(),
        bits in 1u64..4,
    ) {
        let mask = FeatureMask::from_bits(bits, 2);
        let samples = dataset.samples().to_vec();

        let first = classify(&dataset, &mask, &query, k, method).expect("valid query");
        let second = classify(&dataset, &mask, &query, k, method).expect("valid query");

        prop_assert_eq!(first, second);
        prop_assert_eq!(dataset.samples(), &samples[..]);
    }

    // k = 1 agrees with a brute-force nearest search where ties go to the
    // lowest index.
    #[test]
    fn classify_k1_matches_brute_force(
        dataset in dataset_strategy(7, 3),
        query in proptest::collection::vec(-100.0f32..100.0, 3),
        bits in 1u64..8,
    ) {
        let mask = FeatureMask::from_bits(bits, 3);
        // Keep every masked dimension non-degenerate so all distances are
        // finite and plain `<` comparison is meaningful.
        for d in mask.selected() {
            prop_assume!(dataset.sd_of(d) > 1e-3);
        }

        let standardized: Vec<f32> = (0..3)
            .map(|d| (query[d] - dataset.mean_of(d)) / dataset.sd_of(d))
            .collect();

        let mut best = 0;
        let mut best_distance = f32::INFINITY;
        for i in 0..dataset.len() {
            let row = dataset.standardized_row(i);
            let distance: f32 = mask
                .selected()
                .map(|d| (standardized[d] - row[d]).powi(2))
                .sum();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        let label = classify(&dataset, &mask, &query, 1, Method::Normal)
            .expect("valid query");
        prop_assert_eq!(label, dataset.sample(best).label);
    }

    // A zero-variance feature standardizes to NaN, every distance over it
    // is non-finite, and the classifier falls back to encounter order: the
    // first sample wins at k = 1. Pinned per the propagate-don't-guard
    // policy.
    #[test]
    fn constant_feature_yields_first_sample_at_k1(
        constant in -50i32..50,
        labels in proptest::collection::vec(label_strategy(), 3..8),
    ) {
        let samples: Vec<Sample> = labels
            .iter()
            .map(|&label| Sample::new(vec![constant as f32], label))
            .collect();
        let dataset = Dataset::new(samples).expect("valid dataset");

        prop_assert_eq!(dataset.sd_of(0), 0.0);
        prop_assert!(dataset.standardized_row(0)[0].is_nan());

        let label = classify(
            &dataset,
            &FeatureMask::all(1),
            &[constant as f32],
            1,
            Method::Normal,
        )
        .expect("valid query");
        prop_assert_eq!(label, dataset.sample(0).label);
    }

    // Mean of an average-accuracy sweep stays inside the percentage range.
    #[test]
    fn average_accuracy_is_a_percentage(
        mut dataset in dataset_strategy(5, 2),
        k in 1usize..=4,
        method in method_strategy(),
    ) {
        let average = find_average_accuracy(&mut dataset, k, method)
            .expect("configuration is valid by construction");
        prop_assert!((0.0..=100.0).contains(&average));
    }
}
