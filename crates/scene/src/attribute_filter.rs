use catalog::task::TaskKind;

use crate::tile::TileRecord;

/// Species selector state. The selector starts on the `All` sentinel, which
/// disables the filter entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeciesSelection {
    #[default]
    All,
    Only(String),
}

impl SpeciesSelection {
    pub fn only(label: impl Into<String>) -> Self {
        SpeciesSelection::Only(label.into())
    }
}

/// Task-specific secondary filter.
///
/// Scalar tasks always pass. For the species task a selected label admits a
/// tile iff its species list contains that label; tiles without a species
/// list are excluded while a label is selected.
pub fn matches(kind: TaskKind, selection: &SpeciesSelection, tile: &TileRecord) -> bool {
    if kind != TaskKind::Species {
        return true;
    }
    match selection {
        SpeciesSelection::All => true,
        SpeciesSelection::Only(label) => tile
            .properties
            .species
            .as_deref()
            .is_some_and(|list| list.iter().any(|s| s == label)),
    }
}
