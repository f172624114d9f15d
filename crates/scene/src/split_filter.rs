use std::collections::BTreeSet;

use catalog::split::{SplitSelection, TrainTier};

/// Per-task split membership, keyed by ingestion index. Loaded once
/// alongside the tile data; read-only after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitIndex {
    pub train_100: BTreeSet<u32>,
    pub train_50: BTreeSet<u32>,
    pub train_5: BTreeSet<u32>,
    pub validation: BTreeSet<u32>,
    pub random_test: BTreeSet<u32>,
    pub geographic_test: BTreeSet<u32>,
}

impl SplitIndex {
    pub fn tier(&self, tier: TrainTier) -> &BTreeSet<u32> {
        match tier {
            TrainTier::Full => &self.train_100,
            TrainTier::Half => &self.train_50,
            TrainTier::Five => &self.train_5,
        }
    }
}

/// Resolve the split selection to the admitted ingestion indices.
///
/// - `None`: the task has no split data, so split filtering does not apply.
/// - `Some(empty)`: split data exists but nothing is checked; the filter is
///   active and excludes everything.
///
/// The asymmetry is load-bearing: it decides whether the default is "show
/// everything" (no data) or "show nothing" (data, zero boxes checked), and
/// callers must not collapse the two.
///
/// The train tiers are mutually exclusive; a checked train box contributes
/// exactly the selected tier, never a union of tiers.
pub fn resolve_indices(
    split: Option<&SplitIndex>,
    selection: &SplitSelection,
) -> Option<BTreeSet<u32>> {
    let split = split?;

    let mut out = BTreeSet::new();
    if selection.train {
        out.extend(split.tier(selection.train_tier).iter().copied());
    }
    if selection.validation {
        out.extend(split.validation.iter().copied());
    }
    if selection.random_test {
        out.extend(split.random_test.iter().copied());
    }
    if selection.geographic_test {
        out.extend(split.geographic_test.iter().copied());
    }
    Some(out)
}
