//! Leave-one-out validation and exhaustive configuration search.
//!
//! [`LeaveOneOut`] scores a single classifier configuration by holding out
//! each sample in turn: the sample is removed, statistics are recomputed on
//! the remainder (no leakage), the held-out vector is classified, and the
//! sample is put back exactly where it was. [`find_best_accuracy`] and
//! [`find_average_accuracy`] drive that evaluator across every non-empty
//! feature subset — and, for the best-search, a range of neighbour counts —
//! to locate or summarize the strongest configuration.
//!
//! # Example
//!
//! ```
//! use clasificar::classification::Method;
//! use clasificar::dataset::{Dataset, FeatureMask, Label, Sample};
//! use clasificar::model_selection::LeaveOneOut;
//!
//! let mut dataset = Dataset::new(vec![
//!     Sample::new(vec![0.0], Label::U),
//!     Sample::new(vec![1.0], Label::U),
//!     Sample::new(vec![2.0], Label::U),
//! ]).expect("valid dataset");
//!
//! let accuracy = LeaveOneOut::new()
//!     .accuracy(&mut dataset, &FeatureMask::all(1), 1, Method::Normal)
//!     .expect("valid configuration");
//! assert_eq!(accuracy, 100.0);
//! ```

use crate::classification::{classify_unvalidated, Method};
use crate::dataset::{Dataset, FeatureMask};
use crate::error::{ClasificarError, Result};
use crate::stats;
use serde::Serialize;

/// Leave-one-out cross-validation harness.
///
/// The reset mode controls whether a finished run recomputes statistics for
/// every dimension, returning the dataset to its pre-call baseline. It
/// defaults to enabled; the exhaustive searches disable it because each
/// configuration rescales from scratch anyway, and restore the baseline
/// themselves once the whole sweep is done.
#[derive(Debug, Clone)]
pub struct LeaveOneOut {
    reset: bool,
}

impl LeaveOneOut {
    /// Creates a harness with the reset mode enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { reset: true }
    }

    /// Sets whether the dataset's statistics are restored to the
    /// all-dimensions baseline after a run.
    #[must_use]
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Scores one configuration, returning the percentage of samples
    /// classified correctly (0–100).
    ///
    /// Every fold removes one sample, recomputes statistics for the selected
    /// dimensions on the remainder, classifies the held-out vector, and
    /// reinserts the sample at its original index. The removal and
    /// reinsertion always pair — validation happens up front, so nothing in
    /// the fold body can fail between them — and the per-label counts and
    /// sample order are exact after every fold.
    ///
    /// # Errors
    ///
    /// Rejects, before any mutation, a neighbour count outside
    /// `[1, len − 1]` ([`ClasificarError::InvalidNeighborCount`]) and a mask
    /// whose width doesn't match the dataset
    /// ([`ClasificarError::DimensionMismatch`]).
    pub fn accuracy(
        &self,
        dataset: &mut Dataset,
        mask: &FeatureMask,
        k: usize,
        method: Method,
    ) -> Result<f32> {
        let total = dataset.len();
        let max = total.saturating_sub(1);
        if k < 1 || k > max {
            return Err(ClasificarError::InvalidNeighborCount { k, max });
        }
        if mask.len() != dataset.n_features() {
            return Err(ClasificarError::DimensionMismatch {
                expected: dataset.n_features(),
                actual: mask.len(),
            });
        }

        let mut correct = 0usize;
        for i in 0..total {
            let expected = dataset.sample(i).label;
            let removed = dataset.remove(i);

            dataset.statistics_for(mask);
            dataset.restandardize(mask);
            let predicted = classify_unvalidated(dataset, mask, removed.features(), k, method);

            dataset.reinsert(removed);
            if predicted == expected {
                correct += 1;
            }
        }

        if self.reset {
            dataset.recompute_all();
        }
        Ok(correct as f32 / total as f32 * 100.0)
    }
}

impl Default for LeaveOneOut {
    fn default() -> Self {
        Self::new()
    }
}

/// The strongest configuration found by [`find_best_accuracy`].
#[derive(Debug, Clone, Serialize)]
pub struct BestConfiguration {
    /// Leave-one-out accuracy percentage of the winning configuration.
    pub accuracy: f32,
    /// Winning neighbour count.
    pub k: usize,
    /// Winning feature subset.
    pub mask: FeatureMask,
}

/// Exhaustively searches every non-empty feature subset and every neighbour
/// count in `[k_min, k_max]` for the configuration with the greatest
/// leave-one-out accuracy.
///
/// `(k_max − k_min + 1) · (2^D − 1)` evaluations are performed. Comparison
/// is strictly greater-than, so the first configuration reaching the best
/// accuracy wins ties; enumeration order is ascending `k`, then ascending
/// mask bit pattern. The sweep runs with the evaluator's reset mode
/// disabled and restores the all-dimensions statistics baseline before
/// returning.
///
/// # Errors
///
/// Rejects an inverted or zero-based range
/// ([`ClasificarError::InvalidNeighborRange`]) and an upper bound exceeding
/// the dataset ([`ClasificarError::InvalidNeighborCount`]) before any
/// evaluation.
pub fn find_best_accuracy(
    dataset: &mut Dataset,
    k_min: usize,
    k_max: usize,
    method: Method,
) -> Result<BestConfiguration> {
    if k_min < 1 || k_min > k_max {
        return Err(ClasificarError::InvalidNeighborRange { k_min, k_max });
    }
    let max = dataset.len().saturating_sub(1);
    if k_max > max {
        return Err(ClasificarError::InvalidNeighborCount { k: k_max, max });
    }

    let harness = LeaveOneOut::new().with_reset(false);
    let mut best: Option<BestConfiguration> = None;

    for k in k_min..=k_max {
        for mask in FeatureMask::subsets(dataset.n_features()) {
            let accuracy = harness.accuracy(dataset, &mask, k, method)?;
            if best.as_ref().map_or(true, |b| accuracy > b.accuracy) {
                best = Some(BestConfiguration { accuracy, k, mask });
            }
        }
    }

    dataset.recompute_all();
    Ok(best.expect("the k range and subset enumeration are both non-empty"))
}

/// Mean leave-one-out accuracy over every non-empty feature subset for a
/// fixed neighbour count.
///
/// `2^D − 1` evaluations are performed, with the evaluator's reset mode
/// disabled; the all-dimensions statistics baseline is restored before
/// returning.
///
/// # Errors
///
/// Rejects a neighbour count outside `[1, len − 1]`
/// ([`ClasificarError::InvalidNeighborCount`]) before any evaluation.
pub fn find_average_accuracy(dataset: &mut Dataset, k: usize, method: Method) -> Result<f32> {
    let max = dataset.len().saturating_sub(1);
    if k < 1 || k > max {
        return Err(ClasificarError::InvalidNeighborCount { k, max });
    }

    let harness = LeaveOneOut::new().with_reset(false);
    let mut accuracies = Vec::with_capacity((1usize << dataset.n_features()) - 1);
    for mask in FeatureMask::subsets(dataset.n_features()) {
        accuracies.push(harness.accuracy(dataset, &mask, k, method)?);
    }

    dataset.recompute_all();
    Ok(stats::mean(&accuracies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Label, Sample};

    fn clustered_dataset() -> Dataset {
        // Two tight clusters; every point's nearest neighbours share its
        // label, so leave-one-out is perfect for small k.
        Dataset::new(vec![
            Sample::new(vec![0.0, 0.1], Label::S),
            Sample::new(vec![0.2, 0.0], Label::S),
            Sample::new(vec![0.1, 0.2], Label::S),
            Sample::new(vec![10.0, 10.1], Label::U),
            Sample::new(vec![10.2, 10.0], Label::U),
            Sample::new(vec![10.1, 10.2], Label::U),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn test_accuracy_perfect_on_clustered_data() {
        let mut dataset = clustered_dataset();
        let accuracy = LeaveOneOut::new()
            .accuracy(&mut dataset, &FeatureMask::all(2), 2, Method::Normal)
            .expect("valid configuration");
        assert_eq!(accuracy, 100.0);
    }

    #[test]
    fn test_accuracy_rejects_bad_k_without_mutation() {
        let mut dataset = clustered_dataset();
        let before = dataset.samples().to_vec();

        let err = LeaveOneOut::new()
            .accuracy(&mut dataset, &FeatureMask::all(2), 6, Method::Normal)
            .expect_err("k = n");
        assert!(matches!(
            err,
            ClasificarError::InvalidNeighborCount { k: 6, max: 5 }
        ));
        assert_eq!(dataset.samples(), &before[..]);
    }

    #[test]
    fn test_accuracy_rejects_mismatched_mask() {
        let mut dataset = clustered_dataset();
        let err = LeaveOneOut::new()
            .accuracy(&mut dataset, &FeatureMask::all(3), 1, Method::Normal)
            .expect_err("wide mask");
        assert!(matches!(err, ClasificarError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_accuracy_restores_dataset_with_reset() {
        let mut dataset = clustered_dataset();
        let samples = dataset.samples().to_vec();
        let counts = dataset.label_counts();
        let baseline: Vec<Vec<f32>> = (0..dataset.len())
            .map(|i| dataset.standardized_row(i).to_vec())
            .collect();

        LeaveOneOut::new()
            .accuracy(
                &mut dataset,
                &FeatureMask::new(vec![true, false]),
                1,
                Method::Weighted,
            )
            .expect("valid configuration");

        assert_eq!(dataset.samples(), &samples[..]);
        assert_eq!(dataset.label_counts(), counts);
        for (i, row) in baseline.iter().enumerate() {
            assert_eq!(dataset.standardized_row(i), &row[..]);
        }
    }

    #[test]
    fn test_accuracy_without_reset_leaves_fold_statistics() {
        let mut dataset = clustered_dataset();
        let baseline_mean = dataset.mean_of(0);

        LeaveOneOut::new()
            .with_reset(false)
            .accuracy(&mut dataset, &FeatureMask::all(2), 1, Method::Normal)
            .expect("valid configuration");

        // The last fold's statistics (computed without the final sample)
        // are still cached; samples and counts are restored regardless.
        assert_ne!(dataset.mean_of(0), baseline_mean);
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.count_of(Label::S), 3);
        assert_eq!(dataset.count_of(Label::U), 3);
    }

    #[test]
    fn test_accuracy_k_equal_to_len_minus_one() {
        // The largest permissible neighbour count: every remaining sample
        // votes in every fold.
        let mut dataset = clustered_dataset();
        let accuracy = LeaveOneOut::new()
            .accuracy(&mut dataset, &FeatureMask::all(2), 5, Method::Weighted)
            .expect("k = n - 1 is permitted");
        assert!((0.0..=100.0).contains(&accuracy));
    }

    #[test]
    fn test_find_best_accuracy_on_separable_data() {
        let mut dataset = clustered_dataset();
        let best =
            find_best_accuracy(&mut dataset, 1, 2, Method::Normal).expect("valid range");
        assert_eq!(best.accuracy, 100.0);
        // Strict comparison keeps the first configuration reaching the best
        // accuracy: k = 1 with the lowest qualifying bit pattern.
        assert_eq!(best.k, 1);
    }

    #[test]
    fn test_find_best_accuracy_rejects_inverted_range() {
        let mut dataset = clustered_dataset();
        let err =
            find_best_accuracy(&mut dataset, 3, 2, Method::Normal).expect_err("inverted");
        assert!(matches!(
            err,
            ClasificarError::InvalidNeighborRange { k_min: 3, k_max: 2 }
        ));

        let err = find_best_accuracy(&mut dataset, 0, 2, Method::Normal).expect_err("zero");
        assert!(matches!(err, ClasificarError::InvalidNeighborRange { .. }));
    }

    #[test]
    fn test_find_best_accuracy_rejects_oversized_k_max() {
        let mut dataset = clustered_dataset();
        let err = find_best_accuracy(&mut dataset, 1, 6, Method::Normal).expect_err("k = n");
        assert!(matches!(
            err,
            ClasificarError::InvalidNeighborCount { k: 6, max: 5 }
        ));
    }

    #[test]
    fn test_find_best_accuracy_restores_baseline() {
        let mut dataset = clustered_dataset();
        let baseline: Vec<Vec<f32>> = (0..dataset.len())
            .map(|i| dataset.standardized_row(i).to_vec())
            .collect();

        find_best_accuracy(&mut dataset, 1, 1, Method::BayesNaive).expect("valid range");

        for (i, row) in baseline.iter().enumerate() {
            assert_eq!(dataset.standardized_row(i), &row[..]);
        }
    }

    #[test]
    fn test_find_average_accuracy_uniform_labels() {
        let mut dataset = Dataset::new(vec![
            Sample::new(vec![1.0, 5.0], Label::V),
            Sample::new(vec![2.0, 6.0], Label::V),
            Sample::new(vec![3.0, 7.0], Label::V),
            Sample::new(vec![4.0, 8.0], Label::V),
        ])
        .expect("valid dataset");

        // Every subset classifies perfectly when only one label exists, so
        // the average is exactly 100.
        for method in Method::ALL {
            let average =
                find_average_accuracy(&mut dataset, 2, method).expect("valid configuration");
            assert_eq!(average, 100.0, "method {method}");
        }
    }

    #[test]
    fn test_find_average_accuracy_rejects_bad_k() {
        let mut dataset = clustered_dataset();
        let err = find_average_accuracy(&mut dataset, 0, Method::Normal).expect_err("k = 0");
        assert!(matches!(err, ClasificarError::InvalidNeighborCount { .. }));
    }
}
