//! Count-to-probability conversion
//!
//! Turns a small histogram into a cumulative table for inverse-CDF sampling.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GroverError, Result};

/// Running-sum normalization of a histogram into [0, 1]
///
/// Non-decreasing, same length as the source counts, last entry exactly 1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CumulativeTable {
    entries: Vec<f64>,
}

impl CumulativeTable {
    /// Build from counts whose order the caller has already fixed
    ///
    /// Entry i is `sum(counts[..=i]) / sum(counts)`. Sums are kept in integer
    /// arithmetic, so the final entry is `total / total` and never drifts
    /// below 1.0.
    pub fn from_counts(counts: &[u64]) -> Result<Self> {
        let total = checked_total(counts)?;

        let mut running = 0u64;
        let entries: Vec<f64> = counts
            .iter()
            .map(|c| {
                running += c;
                running as f64 / total as f64
            })
            .collect();

        debug!("Built cumulative table {:?} from counts {:?}", entries, counts);
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Plain (non-cumulative) probabilities, `count / total`
pub fn flat_distribution(counts: &[u64]) -> Result<Vec<f64>> {
    let total = checked_total(counts)?;
    Ok(counts.iter().map(|c| *c as f64 / total as f64).collect())
}

/// Every running sum is bounded by this total, so it is the only addition
/// that needs an overflow check
fn checked_total(counts: &[u64]) -> Result<u64> {
    let total = counts
        .iter()
        .try_fold(0u64, |acc, c| acc.checked_add(*c))
        .ok_or(GroverError::CountOverflow)?;
    if total == 0 {
        return Err(GroverError::InvalidInput);
    }
    Ok(total)
}
