use serde::{Deserialize, Serialize};

/// Zoom level at or above which pixel-level raster overlays and hover
/// inspection are available. Below it the viewer renders boundaries only;
/// zoomed out over many tasks that is thousands of boxes, and per-tile
/// imagery or tooltips would be both unreadable and expensive.
pub const PIXEL_DETAIL_ZOOM: f64 = 10.0;

/// A pixel-level raster layer renderable per tile.
///
/// `Solid` is the no-raster default: boundary overlays carry an opaque fill
/// and nothing is fetched. The remaining variants name upstream PNG
/// directories, so `as_str` is part of the wire contract.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modality {
    Solid,
    Sentinel2,
    Worldcover,
    Elevation,
    CloudMask,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::Solid,
        Modality::Sentinel2,
        Modality::Worldcover,
        Modality::Elevation,
        Modality::CloudMask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Solid => "solid",
            Modality::Sentinel2 => "Sentinel2",
            Modality::Worldcover => "ESA_Worldcover",
            Modality::Elevation => "Aster_DEM",
            Modality::CloudMask => "Cloud_Mask",
        }
    }

    pub fn from_name(name: &str) -> Option<Modality> {
        Modality::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Modality::Solid)
    }
}
