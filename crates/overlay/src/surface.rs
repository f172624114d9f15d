use std::collections::BTreeMap;

use catalog::task::TaskId;
use foundation::geo::GeoBounds;
use foundation::handles::Handle;
use scene::tile::TileId;

use crate::style::BoundaryStyle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundaryHandle(pub Handle);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RasterHandle(pub Handle);

/// Seam to the off-the-shelf mapping library.
///
/// The map engine owns pan/zoom, projection, and primitive vector/raster
/// rendering; the viewer drives it exclusively through this trait. Handles
/// returned here are owned by the overlay manager and never outlive the
/// attach/detach pairing it maintains.
pub trait MapSurface {
    fn attach_boundary(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        bounds: GeoBounds,
        style: &BoundaryStyle,
    ) -> BoundaryHandle;

    fn restyle_boundary(&mut self, handle: BoundaryHandle, style: &BoundaryStyle);

    fn detach_boundary(&mut self, handle: BoundaryHandle);

    /// `source` is the raster image URL. A missing image upstream is the
    /// surface's concern and is tolerated silently: the overlay simply never
    /// paints, nothing is retried and nothing propagates.
    fn attach_raster(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        bounds: GeoBounds,
        source: &str,
        opacity: f64,
    ) -> RasterHandle;

    fn detach_raster(&mut self, handle: RasterHandle);
}

/// One recorded surface operation (see [`RecordingSurface`]).
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AttachBoundary { task: TaskId, tile: TileId },
    RestyleBoundary { tile: TileId },
    DetachBoundary { tile: TileId },
    AttachRaster { tile: TileId, source: String },
    DetachRaster { tile: TileId },
}

/// In-memory surface that records every operation and tracks live overlays.
///
/// This is the test double for the whole lifecycle contract: the manager's
/// invariants ("live boundaries equal the visible set", "no raster below the
/// detail threshold", "idempotent reconcile performs zero operations") are
/// assertions over `ops` and the live maps.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_index: u32,
    ops: Vec<SurfaceOp>,
    boundaries: BTreeMap<BoundaryHandle, (TaskId, TileId)>,
    rasters: BTreeMap<RasterHandle, (TaskId, TileId, String)>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drop the op log (live overlay tracking is unaffected); lets a test
    /// assert "this step performed exactly these operations".
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn live_boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn live_raster_count(&self) -> usize {
        self.rasters.len()
    }

    /// Tile ids with a live boundary for `task`, ascending.
    pub fn live_boundary_tiles(&self, task: &TaskId) -> Vec<TileId> {
        let mut out: Vec<TileId> = self
            .boundaries
            .values()
            .filter(|(t, _)| t == task)
            .map(|(_, tile)| tile.clone())
            .collect();
        out.sort();
        out
    }

    pub fn live_raster_sources(&self) -> Vec<&str> {
        self.rasters.values().map(|(_, _, src)| src.as_str()).collect()
    }

    fn next_handle(&mut self) -> Handle {
        let h = Handle::new(self.next_index, 0);
        self.next_index += 1;
        h
    }
}

impl MapSurface for RecordingSurface {
    fn attach_boundary(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        _bounds: GeoBounds,
        _style: &BoundaryStyle,
    ) -> BoundaryHandle {
        let handle = BoundaryHandle(self.next_handle());
        self.boundaries
            .insert(handle, (task.clone(), tile.clone()));
        self.ops.push(SurfaceOp::AttachBoundary {
            task: task.clone(),
            tile: tile.clone(),
        });
        handle
    }

    fn restyle_boundary(&mut self, handle: BoundaryHandle, _style: &BoundaryStyle) {
        if let Some((_, tile)) = self.boundaries.get(&handle) {
            self.ops.push(SurfaceOp::RestyleBoundary { tile: tile.clone() });
        }
    }

    fn detach_boundary(&mut self, handle: BoundaryHandle) {
        if let Some((_, tile)) = self.boundaries.remove(&handle) {
            self.ops.push(SurfaceOp::DetachBoundary { tile });
        }
    }

    fn attach_raster(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        _bounds: GeoBounds,
        source: &str,
        _opacity: f64,
    ) -> RasterHandle {
        let handle = RasterHandle(self.next_handle());
        self.rasters
            .insert(handle, (task.clone(), tile.clone(), source.to_string()));
        self.ops.push(SurfaceOp::AttachRaster {
            tile: tile.clone(),
            source: source.to_string(),
        });
        handle
    }

    fn detach_raster(&mut self, handle: RasterHandle) {
        if let Some((_, tile, _)) = self.rasters.remove(&handle) {
            self.ops.push(SurfaceOp::DetachRaster { tile });
        }
    }
}
