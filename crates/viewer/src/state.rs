use std::collections::BTreeSet;

use catalog::modality::Modality;
use catalog::split::SplitSelection;
use catalog::task::TaskId;
use scene::attribute_filter::SpeciesSelection;

/// Control-panel selections, held in one place.
///
/// Single-writer discipline: the controller mutates this in response to
/// named input events, everything else reads it by reference. Hover state is
/// deliberately not here; the hover machine is its sole writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    pub modality: Modality,
    pub splits: SplitSelection,
    pub species: SpeciesSelection,
    /// Tasks currently rendering their measured value as a fill layer
    /// (suppresses the plain solid fill for those tasks).
    pub value_overlay_tasks: BTreeSet<TaskId>,
}

impl Default for Selections {
    fn default() -> Self {
        Self {
            modality: Modality::Solid,
            splits: SplitSelection::all(),
            species: SpeciesSelection::All,
            value_overlay_tasks: BTreeSet::new(),
        }
    }
}
