//! Percentile placement of a new score against past scores
//!
//! The rule, in integer arithmetic over the `n` historical scores sorted
//! ascending:
//!
//! 1. `pos` is the first index whose value is `>= score` (`n` when the
//!    score beats everything).
//! 2. `raw = (pos + 1) * 100 / n`, clamped to 100.
//! 3. Round `raw` down to a multiple of 5; add 5 when the result is below 100.
//!
//! The new score is never part of the denominator. With no history there
//! is nothing to rank against and the score is reported as the first one.

use serde::Serialize;
use std::fmt;

const BUCKET: u32 = 5;

/// A percentile bucket in `{5, 10, ..., 100}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Percentile(u32);

impl Percentile {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Where a score lands relative to the recorded history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum Placement {
    /// Nothing recorded yet
    FirstScore { score: u32 },
    Ranked {
        score: u32,
        percentile: Percentile,
        /// Number of historical scores ranked against
        compared_to: usize,
    },
}

impl Placement {
    pub fn score(&self) -> u32 {
        match self {
            Placement::FirstScore { score } | Placement::Ranked { score, .. } => *score,
        }
    }

    pub fn percentile(&self) -> Option<Percentile> {
        match self {
            Placement::FirstScore { .. } => None,
            Placement::Ranked { percentile, .. } => Some(*percentile),
        }
    }
}

/// First index in `ascending` whose value is `>= score`
pub fn insertion_position(ascending: &[u32], score: u32) -> usize {
    ascending.partition_point(|&s| s < score)
}

/// Percentile of `score` against `history` (any order), or None for an empty history
pub fn percentile(score: u32, history: &[u32]) -> Option<Percentile> {
    if history.is_empty() {
        return None;
    }

    let mut ascending = history.to_vec();
    ascending.sort_unstable();

    let pos = insertion_position(&ascending, score) as u64;
    let n = ascending.len() as u64;
    let raw = ((pos + 1) * 100 / n).min(100) as u32;

    let mut bucket = raw - raw % BUCKET;
    if bucket < 100 {
        bucket += BUCKET;
    }
    Some(Percentile(bucket))
}

/// Rank `score` against `history` and describe the result
pub fn place(score: u32, history: &[u32]) -> Placement {
    match percentile(score, history) {
        Some(percentile) => Placement::Ranked {
            score,
            percentile,
            compared_to: history.len(),
        },
        None => Placement::FirstScore { score },
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn percentile_is_a_bucket_between_5_and_100(
            history in prop::collection::vec(0u32..50, 1..200),
            score in 0u32..60,
        ) {
            let p = percentile(score, &history).map(Percentile::value);
            prop_assert!(p.is_some());
            let p = p.unwrap_or_default();
            prop_assert!(p >= 5 && p <= 100);
            prop_assert_eq!(p % 5, 0);
        }

        #[test]
        fn higher_score_never_ranks_lower(
            history in prop::collection::vec(0u32..50, 1..100),
            a in 0u32..60,
            b in 0u32..60,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percentile(lo, &history) <= percentile(hi, &history));
        }
    }
}
