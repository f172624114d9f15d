use std::collections::BTreeSet;

use catalog::task::TaskKind;
use foundation::geo::GeoBounds;

use crate::attribute_filter::{self, SpeciesSelection};
use crate::index::TileIndex;
use crate::visible_set::VisibleSet;

/// Inputs for one visible-set computation.
#[derive(Debug, Clone)]
pub struct ResolveQuery<'a> {
    pub viewport: GeoBounds,
    /// Admitted ingestion indices from the split filter; `None` = no split
    /// filtering for this task.
    pub admitted_indices: Option<&'a BTreeSet<u32>>,
    pub task_kind: TaskKind,
    pub species: &'a SpeciesSelection,
}

/// Compute the authoritative visible set for one task:
/// viewport intersection ∧ split membership ∧ attribute filter.
///
/// Linear scan over the cached tile bounds. Task sizes are bounded in the
/// thousands, so a scan per recomputation is the intended cost model and no
/// spatial index is kept.
pub fn resolve_visible(index: &TileIndex, query: &ResolveQuery<'_>) -> VisibleSet {
    let mut out = VisibleSet::new();

    for tile in index.iter() {
        if !tile.bounds.intersects(&query.viewport) {
            continue;
        }

        if let Some(admitted) = query.admitted_indices
            && !admitted.contains(&tile.ingestion_index)
        {
            continue;
        }

        if !attribute_filter::matches(query.task_kind, query.species, tile) {
            continue;
        }

        out.insert(tile.id.clone());
    }

    out
}
