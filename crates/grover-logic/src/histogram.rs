//! Measurement-count histogram supplied by the quantum run

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GroverError, Result};

/// Bit-string labels in outcome order
pub const OUTCOME_KEYS: [&str; 4] = ["00", "01", "10", "11"];

/// Occurrence counts for the four 2-bit outcomes
///
/// Never mutated after construction. Every derived view is a copy, so the
/// end-of-game report always shows what the collaborator actually supplied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountHistogram {
    counts: [u64; 4],
}

impl CountHistogram {
    /// Build from counts ordered "00", "01", "10", "11"
    pub fn new(counts: [u64; 4]) -> Self {
        Self { counts }
    }

    /// Build from a bit-string keyed map such as a job's `get_counts()`
    ///
    /// Missing keys count as zero. Keys outside the four outcomes are rejected.
    pub fn from_map(map: &BTreeMap<String, u64>) -> Result<Self> {
        let mut counts = [0u64; 4];
        for (key, count) in map {
            let index = OUTCOME_KEYS
                .iter()
                .position(|k| *k == key.trim())
                .ok_or_else(|| GroverError::UnknownOutcome(key.clone()))?;
            counts[index] = *count;
        }
        Ok(Self { counts })
    }

    /// Parse a JSON object like `{"00": 12, "11": 980}`
    pub fn from_json(json: &str) -> Result<Self> {
        let map: BTreeMap<String, u64> = serde_json::from_str(json)?;
        Self::from_map(&map)
    }

    /// Counts in outcome order (Gun, Laugh, ForgetPoint, NormalThrow)
    pub fn outcome_counts(&self) -> [u64; 4] {
        self.counts
    }

    /// The first three counts, used for the rock/paper/scissors table
    pub fn throw_counts(&self) -> [u64; 3] {
        [self.counts[0], self.counts[1], self.counts[2]]
    }

    /// `None` when the counts overflow a u64
    pub fn total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0u64, |acc, c| acc.checked_add(*c))
    }

    /// Back to the keyed map form, omitting nothing
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        OUTCOME_KEYS
            .iter()
            .zip(self.counts.iter())
            .map(|(k, c)| (k.to_string(), *c))
            .collect()
    }
}

impl fmt::Display for CountHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, count)) in OUTCOME_KEYS.iter().zip(self.counts.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", key, count)?;
        }
        write!(f, "}}")
    }
}
