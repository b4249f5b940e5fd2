//! Clasificar: nearest-neighbour classification of behavioural telemetry.
//!
//! Clasificar assigns one of five behavioural categories to a fixed-length
//! feature vector summarizing a 12-hour telemetry period. Classification is
//! KNN-k over standardized features with a configurable voting method and
//! deterministic tie resolution; a leave-one-out harness scores
//! configurations, and exhaustive searches over feature subsets and
//! neighbour counts locate the strongest one.
//!
//! # Quick Start
//!
//! ```
//! use clasificar::prelude::*;
//!
//! // Four labelled periods, one feature each.
//! let mut dataset = Dataset::new(vec![
//!     Sample::new(vec![0.0], Label::S),
//!     Sample::new(vec![10.0], Label::T),
//!     Sample::new(vec![20.0], Label::U),
//!     Sample::new(vec![30.0], Label::V),
//! ]).expect("uniform samples");
//!
//! // Classify a fresh period against its nearest neighbour.
//! let mask = FeatureMask::all(1);
//! let label = classify(&dataset, &mask, &[1.0], 1, Method::Normal)
//!     .expect("valid configuration");
//! assert_eq!(label, Label::S);
//!
//! // Score the same configuration by leave-one-out cross-validation.
//! let accuracy = LeaveOneOut::new()
//!     .accuracy(&mut dataset, &mask, 1, Method::Normal)
//!     .expect("valid configuration");
//! assert!((0.0..=100.0).contains(&accuracy));
//! ```
//!
//! # Modules
//!
//! - [`stats`]: mean, sample standard deviation, standard-score transform
//! - [`dataset`]: labelled samples, feature masks, and the mutable dataset
//! - [`classification`]: KNN voting methods and the classifier
//! - [`model_selection`]: leave-one-out validation and exhaustive search
//! - [`loading`]: the whitespace-table dataset source
//! - [`error`]: crate error type

pub mod classification;
pub mod dataset;
pub mod error;
pub mod loading;
pub mod model_selection;
pub mod prelude;
pub mod stats;

pub use dataset::{Dataset, FeatureMask, Label, Sample};
pub use error::{ClasificarError, Result};
