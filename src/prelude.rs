//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use clasificar::prelude::*;
//! ```

pub use crate::classification::{classify, Method, Neighbor};
pub use crate::dataset::{Dataset, FeatureMask, Label, RemovedSample, Sample};
pub use crate::error::{ClasificarError, Result};
pub use crate::loading::read_dataset;
pub use crate::model_selection::{
    find_average_accuracy, find_best_accuracy, BestConfiguration, LeaveOneOut,
};
