//! Inverse-CDF sampling over a cumulative table

use log::{debug, info};

use crate::probability::CumulativeTable;
use crate::random::UniformSource;

/// Draws indices from cumulative tables
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedSampler {
    /// Log every draw and the index it produced
    pub diagnostic: bool,
}

impl WeightedSampler {
    pub fn new(diagnostic: bool) -> Self {
        Self { diagnostic }
    }

    /// Consume exactly one draw and return the selected index
    pub fn sample<S: UniformSource + ?Sized>(&self, table: &CumulativeTable, source: &mut S) -> usize {
        let u = source.next_unit();
        let index = select_index(table.entries(), u);
        if self.diagnostic {
            info!("{} yields {}", u, index);
        }
        index
    }
}

/// Smallest index whose cumulative entry is strictly greater than `u`
///
/// Falls back to the last index when rounding leaves every entry at or below
/// `u`. Returns 0 for an empty table.
pub fn select_index(entries: &[f64], u: f64) -> usize {
    match entries.iter().position(|p| *p > u) {
        Some(index) => index,
        None => {
            let last = entries.len().saturating_sub(1);
            debug!("Draw {} not below any entry of {:?}; clamping to {}", u, entries, last);
            last
        }
    }
}
