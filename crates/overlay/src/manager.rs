use std::collections::BTreeMap;

use catalog::endpoints;
use catalog::modality::Modality;
use catalog::task::{TaskId, TaskSpec};
use scene::index::TileIndex;
use scene::tile::TileId;
use scene::visible_set::VisibleSet;

use crate::style::{BoundaryStyle, RASTER_OPACITY, raster_wanted};
use crate::surface::{BoundaryHandle, MapSurface, RasterHandle};

/// Live overlay handles for one visible tile.
#[derive(Debug, Clone, PartialEq)]
struct OverlayRecord {
    boundary: BoundaryHandle,
    raster: Option<RasterHandle>,
}

/// Inputs for one reconciliation pass over a task.
#[derive(Debug, Clone)]
pub struct ReconcileParams<'a> {
    pub task: &'a TaskSpec,
    /// The freshly resolved visible set; the authoritative target state.
    pub visible: &'a VisibleSet,
    pub modality: Modality,
    pub zoom: f64,
    /// Set on modality changes, split changes, zoom-threshold crossings and
    /// explicit task toggles. Surviving boundaries are restyled in place;
    /// every raster is torn down and rebuilt for the new modality within
    /// this same call, so no frame shows stale styling.
    pub force_full_rebuild: bool,
    /// The task is currently rendering its measured value as a fill layer,
    /// which suppresses the plain solid fill.
    pub value_overlay: bool,
    /// Base URL raster sources are addressed under.
    pub raster_base: &'a str,
}

/// Operation counts from one `reconcile` call; the no-op fast path returns
/// all zeros.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub boundaries_attached: usize,
    pub boundaries_detached: usize,
    pub boundaries_restyled: usize,
    pub rasters_attached: usize,
    pub rasters_detached: usize,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns every live overlay, keyed by task then tile id.
///
/// Invariants:
/// - After any `reconcile`, the tile ids holding a live boundary overlay for
///   the task equal exactly the visible set passed in.
/// - A raster handle exists only while its tile is visible, an imagery
///   modality is selected, and zoom is at or above the pixel-detail
///   threshold.
/// - Handles are created and destroyed here and nowhere else.
///
/// Each call runs to completion synchronously, so the record map is always
/// an authoritative snapshot for the next diff.
#[derive(Debug, Default)]
pub struct OverlayManager {
    records: BTreeMap<TaskId, BTreeMap<TileId, OverlayRecord>>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the task's previous visible set against `params.visible` and
    /// apply the minimal attach/detach/restyle operations to `surface`.
    pub fn reconcile<S: MapSurface>(
        &mut self,
        surface: &mut S,
        index: &TileIndex,
        params: &ReconcileParams<'_>,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let records = self.records.entry(params.task.id.clone()).or_default();

        let to_remove: Vec<TileId> = records
            .keys()
            .filter(|id| !params.visible.contains(id))
            .cloned()
            .collect();
        let to_add: Vec<TileId> = params
            .visible
            .iter()
            .filter(|id| !records.contains_key(*id))
            .cloned()
            .collect();

        // Fast path: pan events fire every frame and mostly change nothing.
        if to_add.is_empty() && to_remove.is_empty() && !params.force_full_rebuild {
            return summary;
        }

        for id in &to_remove {
            let Some(record) = records.remove(id) else {
                continue;
            };
            surface.detach_boundary(record.boundary);
            summary.boundaries_detached += 1;
            if let Some(raster) = record.raster {
                surface.detach_raster(raster);
                summary.rasters_detached += 1;
            }
        }

        let style = BoundaryStyle::derive(
            &params.task.color,
            params.modality,
            params.zoom,
            params.value_overlay,
        );
        let want_raster = raster_wanted(params.modality, params.zoom);

        if params.force_full_rebuild {
            for (id, record) in records.iter_mut() {
                surface.restyle_boundary(record.boundary, &style);
                summary.boundaries_restyled += 1;

                if let Some(raster) = record.raster.take() {
                    surface.detach_raster(raster);
                    summary.rasters_detached += 1;
                }
                if want_raster
                    && let Some(tile) = index.get(id)
                {
                    record.raster = Some(attach_raster(surface, params, id, tile.bounds));
                    summary.rasters_attached += 1;
                }
            }
        }

        for id in &to_add {
            // The visible set is resolved from the same index, so a miss here
            // would mean the index was swapped mid-reconcile; skip defensively
            // rather than attach an overlay with no bounds.
            let Some(tile) = index.get(id) else {
                continue;
            };

            let boundary = surface.attach_boundary(&params.task.id, id, tile.bounds, &style);
            summary.boundaries_attached += 1;

            let raster = if want_raster {
                summary.rasters_attached += 1;
                Some(attach_raster(surface, params, id, tile.bounds))
            } else {
                None
            };
            records.insert(id.clone(), OverlayRecord { boundary, raster });
        }

        summary
    }

    /// Remove every live overlay for a task and clear its bookkeeping.
    ///
    /// Runs unconditionally, independent of diffing: unchecking a task must
    /// win over whatever visible set was last resolved.
    pub fn hide_task<S: MapSurface>(&mut self, surface: &mut S, task: &TaskId) {
        let Some(records) = self.records.remove(task) else {
            return;
        };
        for (_, record) in records {
            surface.detach_boundary(record.boundary);
            if let Some(raster) = record.raster {
                surface.detach_raster(raster);
            }
        }
    }

    /// Tile ids with a live boundary overlay for `task`, ascending.
    pub fn live_tiles(&self, task: &TaskId) -> Vec<&TileId> {
        self.records
            .get(task)
            .map(|records| records.keys().collect())
            .unwrap_or_default()
    }

    pub fn has_overlay(&self, task: &TaskId, tile: &TileId) -> bool {
        self.records
            .get(task)
            .is_some_and(|records| records.contains_key(tile))
    }

    pub fn live_raster_count(&self, task: &TaskId) -> usize {
        self.records
            .get(task)
            .map(|records| records.values().filter(|r| r.raster.is_some()).count())
            .unwrap_or(0)
    }
}

fn attach_raster<S: MapSurface>(
    surface: &mut S,
    params: &ReconcileParams<'_>,
    id: &TileId,
    bounds: foundation::geo::GeoBounds,
) -> RasterHandle {
    let source = endpoints::raster_tile_url(
        params.raster_base,
        &params.task.id,
        params.modality,
        id.as_str(),
    );
    surface.attach_raster(&params.task.id, id, bounds, &source, RASTER_OPACITY)
}
