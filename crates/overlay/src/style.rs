use catalog::modality::{Modality, PIXEL_DETAIL_ZOOM};

/// Fill opacity of a solid boundary overlay.
pub const SOLID_FILL_OPACITY: f64 = 0.7;
/// Opacity of a raster image overlay.
pub const RASTER_OPACITY: f64 = 0.7;

const WEIGHT_COARSE: f64 = 1.0;
const WEIGHT_DETAIL: f64 = 3.0;

/// Resolved styling for one tile's boundary overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryStyle {
    /// CSS color, shared by stroke and fill; per task.
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl BoundaryStyle {
    /// Derive the boundary style for a task at the current zoom.
    ///
    /// - Stroke thickens at pixel-detail zoom, where a single tile can span
    ///   much of the screen and a hairline border disappears.
    /// - Fill is opaque only under the solid modality while the task is not
    ///   rendering a value overlay; any imagery modality needs transparent
    ///   fill so the raster underneath shows through.
    pub fn derive(color: &str, modality: Modality, zoom: f64, value_overlay: bool) -> Self {
        let weight = if zoom >= PIXEL_DETAIL_ZOOM {
            WEIGHT_DETAIL
        } else {
            WEIGHT_COARSE
        };
        let fill_opacity = if modality.is_solid() && !value_overlay {
            SOLID_FILL_OPACITY
        } else {
            0.0
        };
        Self {
            color: color.to_string(),
            weight,
            fill_opacity,
        }
    }
}

/// Whether a raster overlay should exist at all under this modality/zoom.
///
/// This is the raster-gating invariant: never below the pixel-detail
/// threshold, never for the solid modality.
pub fn raster_wanted(modality: Modality, zoom: f64) -> bool {
    !modality.is_solid() && zoom >= PIXEL_DETAIL_ZOOM
}
