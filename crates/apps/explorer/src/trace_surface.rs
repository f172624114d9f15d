use catalog::task::TaskId;
use foundation::geo::GeoBounds;
use foundation::handles::Handle;
use overlay::style::BoundaryStyle;
use overlay::surface::{BoundaryHandle, MapSurface, RasterHandle};
use scene::tile::TileId;
use tracing::debug;

/// Headless stand-in for the real map surface.
///
/// Logs every overlay operation and keeps live counts, so a drive run shows
/// exactly what the lifecycle manager would do to a browser map.
#[derive(Debug, Default)]
pub struct TraceSurface {
    next_index: u32,
    boundaries: usize,
    rasters: usize,
}

impl TraceSurface {
    pub fn live_boundaries(&self) -> usize {
        self.boundaries
    }

    pub fn live_rasters(&self) -> usize {
        self.rasters
    }

    fn next_handle(&mut self) -> Handle {
        let h = Handle::new(self.next_index, 0);
        self.next_index += 1;
        h
    }
}

impl MapSurface for TraceSurface {
    fn attach_boundary(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        _bounds: GeoBounds,
        style: &BoundaryStyle,
    ) -> BoundaryHandle {
        self.boundaries += 1;
        debug!(%task, %tile, weight = style.weight, fill = style.fill_opacity, "attach boundary");
        BoundaryHandle(self.next_handle())
    }

    fn restyle_boundary(&mut self, handle: BoundaryHandle, style: &BoundaryStyle) {
        debug!(index = handle.0.index(), fill = style.fill_opacity, "restyle boundary");
    }

    fn detach_boundary(&mut self, handle: BoundaryHandle) {
        self.boundaries = self.boundaries.saturating_sub(1);
        debug!(index = handle.0.index(), "detach boundary");
    }

    fn attach_raster(
        &mut self,
        task: &TaskId,
        tile: &TileId,
        _bounds: GeoBounds,
        source: &str,
        _opacity: f64,
    ) -> RasterHandle {
        self.rasters += 1;
        debug!(%task, %tile, source, "attach raster");
        RasterHandle(self.next_handle())
    }

    fn detach_raster(&mut self, handle: RasterHandle) {
        self.rasters = self.rasters.saturating_sub(1);
        debug!(index = handle.0.index(), "detach raster");
    }
}
