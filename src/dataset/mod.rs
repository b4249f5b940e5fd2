//! Labelled telemetry samples and the mutable training dataset.
//!
//! A [`Dataset`] is an ordered collection of labelled feature vectors
//! together with the derived state every classification needs: per-label
//! frequencies, per-dimension mean and sample standard deviation, and the
//! standardized view of the data. Order matters only so that a temporarily
//! removed sample can be put back in its exact position during leave-one-out
//! folds; it carries no statistical meaning.
//!
//! Statistics are cached per dimension and refreshed through an explicit
//! mutation API ([`Dataset::statistics_for`], [`Dataset::restandardize`],
//! [`Dataset::recompute_all`]). Recomputation restricted to a [`FeatureMask`]
//! leaves the other dimensions' cached values untouched even when stale —
//! the distance computation never reads an unselected dimension, and the
//! exhaustive searches rescale on every configuration anyway.
//!
//! # Example
//!
//! ```
//! use clasificar::dataset::{Dataset, Label, Sample};
//!
//! let dataset = Dataset::new(vec![
//!     Sample::new(vec![12.0, 8.4], Label::S),
//!     Sample::new(vec![30.5, 9.1], Label::U),
//!     Sample::new(vec![28.0, 8.9], Label::U),
//! ]).expect("uniform two-dimensional samples");
//!
//! assert_eq!(dataset.len(), 3);
//! assert_eq!(dataset.count_of(Label::U), 2);
//! ```

use crate::error::{ClasificarError, Result};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Behavioural category assigned to a 12-hour telemetry period.
///
/// The set is closed; tallies are indexed by [`Label::index`] so a vote
/// count exists for every category by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    S,
    T,
    U,
    V,
    #[serde(rename = "TX")]
    Tx,
}

impl Label {
    /// Number of categories.
    pub const COUNT: usize = 5;

    /// Every category, in tally order.
    pub const ALL: [Label; Label::COUNT] = [Label::S, Label::T, Label::U, Label::V, Label::Tx];

    /// Position of this category in tally order.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Label::S => 0,
            Label::T => 1,
            Label::U => 2,
            Label::V => 3,
            Label::Tx => 4,
        }
    }

    /// Token used in the tabular dataset source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Label::S => "S",
            Label::T => "T",
            Label::U => "U",
            Label::V => "V",
            Label::Tx => "TX",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ClasificarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S" => Ok(Label::S),
            "T" => Ok(Label::T),
            "U" => Ok(Label::U),
            "V" => Ok(Label::V),
            "TX" => Ok(Label::Tx),
            other => Err(ClasificarError::UnknownLabel {
                token: other.to_string(),
            }),
        }
    }
}

/// One labelled feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Raw (unstandardized) feature values.
    pub features: Vec<f32>,
    /// Expert-assigned category.
    pub label: Label,
}

impl Sample {
    /// Creates a sample from raw feature values and a category.
    #[must_use]
    pub fn new(features: Vec<f32>, label: Label) -> Self {
        Self { features, label }
    }
}

/// Receipt for a temporarily removed sample.
///
/// Returned by [`Dataset::remove`] and consumed by [`Dataset::reinsert`];
/// holds everything needed to reverse the removal exactly. The fields are
/// deliberately inaccessible for mutation so a fold cannot put back anything
/// other than what it took out.
#[derive(Debug)]
pub struct RemovedSample {
    index: usize,
    sample: Sample,
}

impl RemovedSample {
    /// Original position of the removed sample.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw feature values of the removed sample.
    #[must_use]
    pub fn features(&self) -> &[f32] {
        &self.sample.features
    }

    /// Category of the removed sample.
    #[must_use]
    pub fn label(&self) -> Label {
        self.sample.label
    }
}

/// Boolean selection of the feature dimensions participating in a
/// computation.
///
/// Unselected dimensions are ignored entirely: they are neither rescaled by
/// masked statistics recomputation nor compared in the distance loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMask(Vec<bool>);

impl FeatureMask {
    /// Builds a mask from explicit per-dimension flags.
    #[must_use]
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// Mask selecting every one of `n` dimensions.
    #[must_use]
    pub fn all(n: usize) -> Self {
        Self(vec![true; n])
    }

    /// Mask whose flag for dimension `d` is bit `d` of `bits`.
    #[must_use]
    pub fn from_bits(bits: u64, n: usize) -> Self {
        Self((0..n).map(|d| (bits >> d) & 1 == 1).collect())
    }

    /// Number of dimensions covered by the mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the mask covers no dimensions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if dimension `d` participates.
    ///
    /// # Panics
    ///
    /// Panics if `d` is out of range.
    #[must_use]
    pub fn is_selected(&self, d: usize) -> bool {
        self.0[d]
    }

    /// Indices of the selected dimensions, ascending.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(d, &on)| on.then_some(d))
    }

    /// Number of selected dimensions.
    #[must_use]
    pub fn count_selected(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }

    /// Per-dimension flags.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Iterator over every non-empty mask of `n` dimensions.
    ///
    /// Visits all `2^n − 1` masks exactly once by counting through the
    /// non-zero bit patterns.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds 32; the exhaustive searches assume a modest,
    /// enumerable dimension space.
    #[must_use]
    pub fn subsets(n: usize) -> Subsets {
        assert!(n <= 32, "subset enumeration over {n} dimensions is not tractable");
        Subsets {
            next: 1,
            limit: (1u64 << n) - 1,
            n,
        }
    }
}

impl fmt::Display for FeatureMask {
    /// Renders the mask as a bit string, dimension 0 first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &on in &self.0 {
            f.write_str(if on { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Iterator produced by [`FeatureMask::subsets`].
#[derive(Debug)]
pub struct Subsets {
    next: u64,
    limit: u64,
    n: usize,
}

impl Iterator for Subsets {
    type Item = FeatureMask;

    fn next(&mut self) -> Option<FeatureMask> {
        if self.next > self.limit {
            return None;
        }
        let mask = FeatureMask::from_bits(self.next, self.n);
        self.next += 1;
        Some(mask)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.limit + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Subsets {}

/// Ordered collection of labelled samples with derived statistics.
///
/// Invariant: the per-label counts always equal the number of samples
/// currently carrying each label, including while a sample is temporarily
/// removed during a leave-one-out fold.
#[derive(Debug, Clone)]
pub struct Dataset {
    n_features: usize,
    samples: Vec<Sample>,
    counts: [usize; Label::COUNT],
    means: Vec<f32>,
    sds: Vec<f32>,
    standardized: Vec<Vec<f32>>,
}

impl Dataset {
    /// Builds a dataset from labelled samples and computes statistics and
    /// the standardized view for every dimension.
    ///
    /// # Errors
    ///
    /// Returns [`ClasificarError::EmptyDataset`] when `samples` is empty or
    /// the feature vectors have zero width, and
    /// [`ClasificarError::DimensionMismatch`] when the samples disagree on
    /// width.
    pub fn new(samples: Vec<Sample>) -> Result<Self> {
        let n_features = match samples.first() {
            Some(sample) if !sample.features.is_empty() => sample.features.len(),
            _ => return Err(ClasificarError::EmptyDataset),
        };
        for sample in &samples {
            if sample.features.len() != n_features {
                return Err(ClasificarError::DimensionMismatch {
                    expected: n_features,
                    actual: sample.features.len(),
                });
            }
        }

        let mut counts = [0usize; Label::COUNT];
        for sample in &samples {
            counts[sample.label.index()] += 1;
        }

        let standardized = vec![vec![0.0; n_features]; samples.len()];
        let mut dataset = Self {
            n_features,
            samples,
            counts,
            means: vec![0.0; n_features],
            sds: vec![0.0; n_features],
            standardized,
        };
        dataset.recompute_all();
        Ok(dataset)
    }

    /// Number of samples currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if no samples are currently held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature dimensionality.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// The samples in order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The sample at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn sample(&self, index: usize) -> &Sample {
        &self.samples[index]
    }

    /// How many samples currently carry `label`.
    #[must_use]
    pub fn count_of(&self, label: Label) -> usize {
        self.counts[label.index()]
    }

    /// Per-label counts in tally order.
    #[must_use]
    pub fn label_counts(&self) -> [usize; Label::COUNT] {
        self.counts
    }

    /// Cached mean of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d` is out of range.
    #[must_use]
    pub fn mean_of(&self, d: usize) -> f32 {
        self.means[d]
    }

    /// Cached sample standard deviation of dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d` is out of range.
    #[must_use]
    pub fn sd_of(&self, d: usize) -> f32 {
        self.sds[d]
    }

    /// Standardized feature values of the sample at `index`.
    ///
    /// Only dimensions covered by the most recent [`Self::restandardize`] or
    /// [`Self::recompute_all`] call are current; the rest are stale by
    /// design.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn standardized_row(&self, index: usize) -> &[f32] {
        &self.standardized[index]
    }

    /// Removes the sample at `index`, keeping the per-label counts in step.
    ///
    /// Returns a receipt for the paired [`Self::reinsert`]. Cached
    /// statistics are not refreshed here; the caller decides which
    /// dimensions to recompute.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> RemovedSample {
        let sample = self.samples.remove(index);
        self.standardized.remove(index);
        self.counts[sample.label.index()] -= 1;
        RemovedSample { index, sample }
    }

    /// Puts a removed sample back at its original position.
    ///
    /// Afterwards the sample sequence, its order, and the per-label counts
    /// are indistinguishable from the state before the paired
    /// [`Self::remove`]. The reinserted standardized row is derived from the
    /// currently cached statistics; callers refresh it with
    /// [`Self::restandardize`] or [`Self::recompute_all`] before the next
    /// read.
    ///
    /// # Panics
    ///
    /// Panics if the recorded index no longer fits the sequence.
    pub fn reinsert(&mut self, removed: RemovedSample) {
        let RemovedSample { index, sample } = removed;
        let row = sample
            .features
            .iter()
            .enumerate()
            .map(|(d, &x)| (x - self.means[d]) / self.sds[d])
            .collect();
        self.counts[sample.label.index()] += 1;
        self.samples.insert(index, sample);
        self.standardized.insert(index, row);
    }

    /// Recomputes mean and standard deviation for the selected dimensions
    /// from the current samples.
    ///
    /// Unselected dimensions keep their cached values even if stale.
    ///
    /// # Panics
    ///
    /// Panics if the mask width doesn't match the dataset.
    pub fn statistics_for(&mut self, mask: &FeatureMask) {
        assert_eq!(mask.len(), self.n_features, "mask width must match dataset");
        for d in mask.selected() {
            let column = self.column(d);
            let mean = stats::mean(&column);
            self.means[d] = mean;
            self.sds[d] = stats::standard_deviation(&column, mean);
        }
    }

    /// Rebuilds the standardized view for the selected dimensions from the
    /// cached statistics.
    ///
    /// Unselected dimensions keep their previous standardized values.
    ///
    /// # Panics
    ///
    /// Panics if the mask width doesn't match the dataset.
    pub fn restandardize(&mut self, mask: &FeatureMask) {
        assert_eq!(mask.len(), self.n_features, "mask width must match dataset");
        for d in mask.selected() {
            let column = self.column(d);
            let scaled = stats::standardize(&column, self.means[d], self.sds[d]);
            for (row, z) in self.standardized.iter_mut().zip(scaled) {
                row[d] = z;
            }
        }
    }

    /// Refreshes statistics and the standardized view for every dimension.
    ///
    /// This is the baseline state after construction, and the state the
    /// evaluator restores when its reset mode is enabled.
    pub fn recompute_all(&mut self) {
        let everything = FeatureMask::all(self.n_features);
        self.statistics_for(&everything);
        self.restandardize(&everything);
    }

    /// Gathers the raw values of dimension `d` across all samples.
    fn column(&self, d: usize) -> Vec<f32> {
        self.samples.iter().map(|s| s.features[d]).collect()
    }
}
