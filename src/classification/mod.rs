//! Nearest-neighbour classification with configurable voting.
//!
//! [`classify`] standardizes a query vector against the dataset's current
//! statistics, measures squared Euclidean distance to every training sample
//! over the selected dimensions, keeps the `k` nearest, and resolves a
//! category through [`resolve_vote`]. Four voting methods are supported; all
//! of them share the same deterministic tie resolution, which discards the
//! farthest counted neighbour until exactly one category holds the maximal
//! tally.
//!
//! # Example
//!
//! ```
//! use clasificar::classification::{classify, Method};
//! use clasificar::dataset::{Dataset, FeatureMask, Label, Sample};
//!
//! let dataset = Dataset::new(vec![
//!     Sample::new(vec![0.0], Label::S),
//!     Sample::new(vec![10.0], Label::T),
//!     Sample::new(vec![20.0], Label::U),
//!     Sample::new(vec![30.0], Label::V),
//! ]).expect("valid dataset");
//!
//! let mask = FeatureMask::all(1);
//! let label = classify(&dataset, &mask, &[1.0], 1, Method::Normal)
//!     .expect("k and sample width are valid");
//! assert_eq!(label, Label::S);
//! ```

use crate::dataset::{Dataset, FeatureMask, Label};
use crate::error::{ClasificarError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voting method applied to the `k` nearest neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// One vote per neighbour.
    Normal,
    /// The neighbour at rank `r` (0 = nearest) votes with weight `k − r`.
    Weighted,
    /// The neighbour at rank `r` votes with weight `(k − r)²`.
    WeightedSquared,
    /// One vote per neighbour, with each category's tally divided by that
    /// category's frequency in the current dataset — a
    /// likelihood-over-prior approximation.
    BayesNaive,
}

impl Method {
    /// Every method, in a fixed enumeration order.
    pub const ALL: [Method; 4] = [
        Method::Normal,
        Method::Weighted,
        Method::WeightedSquared,
        Method::BayesNaive,
    ];

    /// Vote weight contributed by the neighbour at `rank` when `k`
    /// neighbours are counted.
    fn rank_weight(self, k: usize, rank: usize) -> f32 {
        match self {
            Method::Normal | Method::BayesNaive => 1.0,
            Method::Weighted => (k - rank) as f32,
            Method::WeightedSquared => ((k - rank) * (k - rank)) as f32,
        }
    }

    /// Token used in configuration and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Normal => "normal",
            Method::Weighted => "weighted",
            Method::WeightedSquared => "weighted-squared",
            Method::BayesNaive => "bayes-naive",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ClasificarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Method::Normal),
            "weighted" => Ok(Method::Weighted),
            "weighted-squared" | "weighted_squared" => Ok(Method::WeightedSquared),
            "bayes-naive" | "bayes_naive" => Ok(Method::BayesNaive),
            other => Err(ClasificarError::InvalidMethod {
                name: other.to_string(),
            }),
        }
    }
}

/// Distance from the query to one training sample, with that sample's
/// category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Squared Euclidean distance over the selected dimensions.
    pub distance: f32,
    /// Category of the training sample.
    pub label: Label,
}

/// True when a candidate distance ranks strictly ahead of an existing one.
///
/// Equal distances keep the earlier-encountered neighbour in front, and a
/// non-finite distance never ranks ahead of a finite one (it ranks behind
/// everything, in encounter order among other non-finite distances).
fn sorts_before(candidate: f32, existing: f32) -> bool {
    candidate < existing || (candidate.is_finite() && !existing.is_finite())
}

/// Fixed-capacity buffer of the `k` nearest neighbours seen so far, ordered
/// ascending by rank.
#[derive(Debug)]
struct NeighborList {
    capacity: usize,
    entries: Vec<Neighbor>,
}

impl NeighborList {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Offers a candidate; it is kept only while it ranks ahead of the
    /// current worst (strict comparison, so earlier candidates win ties).
    fn offer(&mut self, distance: f32, label: Label) {
        if self.entries.len() == self.capacity {
            let worst = self.entries[self.capacity - 1].distance;
            if !sorts_before(distance, worst) {
                return;
            }
            self.entries.pop();
        }
        let position = self
            .entries
            .partition_point(|n| !sorts_before(distance, n.distance));
        self.entries.insert(position, Neighbor { distance, label });
    }

    fn as_slice(&self) -> &[Neighbor] {
        &self.entries
    }
}

/// Classifies a query vector against the dataset's current statistics.
///
/// The query is standardized on every dimension with the cached mean and
/// standard deviation; distance is then accumulated only over the dimensions
/// selected by `mask`. With `k == 1` the nearest sample's category is
/// returned directly, otherwise the neighbours vote per `method` (see
/// [`resolve_vote`]).
///
/// Statistics must be current for the dataset — they are after construction,
/// and after any evaluator call with reset enabled.
///
/// # Errors
///
/// Rejects, before touching the dataset, a neighbour count outside
/// `[1, len − 1]` ([`ClasificarError::InvalidNeighborCount`]) and a sample or
/// mask whose width doesn't match the dataset
/// ([`ClasificarError::DimensionMismatch`]).
pub fn classify(
    dataset: &Dataset,
    mask: &FeatureMask,
    sample: &[f32],
    k: usize,
    method: Method,
) -> Result<Label> {
    let max = dataset.len().saturating_sub(1);
    if k < 1 || k > max {
        return Err(ClasificarError::InvalidNeighborCount { k, max });
    }
    if sample.len() != dataset.n_features() {
        return Err(ClasificarError::DimensionMismatch {
            expected: dataset.n_features(),
            actual: sample.len(),
        });
    }
    if mask.len() != dataset.n_features() {
        return Err(ClasificarError::DimensionMismatch {
            expected: dataset.n_features(),
            actual: mask.len(),
        });
    }
    Ok(classify_unvalidated(dataset, mask, sample, k, method))
}

/// Classification body with the preconditions already established by the
/// caller.
///
/// The leave-one-out evaluator validates `k` against the full dataset size
/// and then calls this per fold, where the reduced dataset would wrongly
/// fail the public check for `k = len`.
pub(crate) fn classify_unvalidated(
    dataset: &Dataset,
    mask: &FeatureMask,
    sample: &[f32],
    k: usize,
    method: Method,
) -> Label {
    let standardized: Vec<f32> = sample
        .iter()
        .enumerate()
        .map(|(d, &x)| (x - dataset.mean_of(d)) / dataset.sd_of(d))
        .collect();

    let mut neighbors = NeighborList::new(k);
    for i in 0..dataset.len() {
        let row = dataset.standardized_row(i);
        let mut distance = 0.0f32;
        for d in mask.selected() {
            let diff = standardized[d] - row[d];
            distance += diff * diff;
        }
        neighbors.offer(distance, dataset.sample(i).label);
    }

    let neighbors = neighbors.as_slice();
    if k == 1 {
        return neighbors[0].label;
    }
    resolve_vote(neighbors, method, &dataset.label_counts())
}

/// Resolves a category from an ordered neighbour list.
///
/// Tallies rank weights per category, then checks for a strictly maximal
/// tally. While the maximum is shared, the farthest still-counted
/// neighbour's contribution is withdrawn (its original rank weight) and the
/// check repeats; the nearest neighbour alone always yields a unique
/// maximum, so the loop terminates.
///
/// For [`Method::BayesNaive`] the compared score is the tally divided by the
/// category's frequency in `label_counts`, recomputed after every
/// withdrawal. A tally of zero scores zero outright: a category with votes
/// always has a non-zero frequency, so the quotient is never taken over
/// zero.
///
/// # Panics
///
/// Panics if `neighbors` is empty.
#[must_use]
pub fn resolve_vote(
    neighbors: &[Neighbor],
    method: Method,
    label_counts: &[usize; Label::COUNT],
) -> Label {
    assert!(!neighbors.is_empty(), "vote requires at least one neighbour");
    let k = neighbors.len();

    let mut tally = [0.0f32; Label::COUNT];
    for (rank, neighbor) in neighbors.iter().enumerate() {
        tally[neighbor.label.index()] += method.rank_weight(k, rank);
    }

    let mut counted = k;
    loop {
        if let Some(winner) = unique_winner(&scores(&tally, method, label_counts)) {
            return winner;
        }
        // No outright winner: withdraw the farthest counted vote. Growing
        // the neighbourhood instead could stay tied past the whole dataset;
        // shrinking reaches a guaranteed winner at the nearest neighbour.
        counted -= 1;
        let neighbor = &neighbors[counted];
        tally[neighbor.label.index()] -= method.rank_weight(k, counted);
    }
}

/// Per-category comparison scores for the current tally.
fn scores(
    tally: &[f32; Label::COUNT],
    method: Method,
    label_counts: &[usize; Label::COUNT],
) -> [f32; Label::COUNT] {
    match method {
        Method::BayesNaive => {
            let mut normalized = [0.0f32; Label::COUNT];
            for (i, &votes) in tally.iter().enumerate() {
                if votes > 0.0 {
                    normalized[i] = votes / label_counts[i] as f32;
                }
            }
            normalized
        }
        _ => *tally,
    }
}

/// Index of the strictly maximal score, or `None` when the maximum is
/// shared.
fn unique_winner(scores: &[f32; Label::COUNT]) -> Option<Label> {
    let mut winner = 0;
    let mut shared = false;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[winner] {
            winner = i;
            shared = false;
        } else if score == scores[winner] {
            shared = true;
        }
    }
    (!shared).then(|| Label::ALL[winner])
}
