//! Variable classification
//!
//! Splits the data variables of a dataset into those that vary along the time
//! axis and those that do not (metadata).

use crate::dataset::DatasetView;
use std::collections::HashSet;

/// Default name of the time axis
pub const DEFAULT_TIME_DIMENSION: &str = "time";

/// Partition of a dataset's data variables
///
/// The two lists are disjoint and together cover every data variable exactly
/// once, each in the dataset's iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub time_dependent: Vec<String>,
    pub time_independent: Vec<String>,
}

impl Classification {
    /// True when no variable depends on the time axis, so no series can be built
    pub fn has_no_series(&self) -> bool {
        self.time_dependent.is_empty()
    }

    pub fn len(&self) -> usize {
        self.time_dependent.len() + self.time_independent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the partition is total and disjoint over `all`.
    pub fn is_partition_of(&self, all: &[String]) -> bool {
        let series: HashSet<&str> = self.time_dependent.iter().map(String::as_str).collect();
        let metadata: HashSet<&str> = self.time_independent.iter().map(String::as_str).collect();
        let expected: HashSet<&str> = all.iter().map(String::as_str).collect();

        series.len() == self.time_dependent.len()
            && metadata.len() == self.time_independent.len()
            && series.is_disjoint(&metadata)
            && series.union(&metadata).copied().collect::<HashSet<_>>() == expected
    }
}

/// Classify every data variable of `dset` by whether `time_dim` is among its
/// dimensions.
pub fn find_time_dependent_vars<D: DatasetView + ?Sized>(dset: &D, time_dim: &str) -> Classification {
    let mut classification = Classification::default();

    for name in dset.data_variable_names() {
        let is_series = dset
            .variable_dimensions(&name)
            .map_or(false, |dims| dims.iter().any(|d| d == time_dim));

        if is_series {
            classification.time_dependent.push(name);
        } else {
            classification.time_independent.push(name);
        }
    }

    log::debug!(
        "Classified {} time-dependent and {} time-independent variables",
        classification.time_dependent.len(),
        classification.time_independent.len()
    );

    classification
}
