use serde::{Deserialize, Serialize};

/// Train subset size. The tiers are mutually exclusive: the control panel
/// exposes one selector, not three checkboxes, so exactly one tier is active
/// whenever the train split is checked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainTier {
    Full,
    Half,
    Five,
}

/// Dataset partitions tiles may belong to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Split {
    Train,
    Validation,
    RandomTest,
    GeographicTest,
}

/// Split checkbox state plus the train-tier selector.
///
/// Note the downstream semantics in `scene::split_filter`: the selection
/// alone never decides between "show nothing" and "show everything"; that
/// depends on whether the task has split data at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSelection {
    pub train: bool,
    pub validation: bool,
    pub random_test: bool,
    pub geographic_test: bool,
    pub train_tier: TrainTier,
}

impl SplitSelection {
    /// Nothing checked; train tier parked at 100%.
    pub fn none() -> Self {
        Self {
            train: false,
            validation: false,
            random_test: false,
            geographic_test: false,
            train_tier: TrainTier::Full,
        }
    }

    /// Everything checked (the control panel's initial state).
    pub fn all() -> Self {
        Self {
            train: true,
            validation: true,
            random_test: true,
            geographic_test: true,
            train_tier: TrainTier::Full,
        }
    }

    pub fn any_checked(&self) -> bool {
        self.train || self.validation || self.random_test || self.geographic_test
    }
}

impl Default for SplitSelection {
    fn default() -> Self {
        Self::all()
    }
}
