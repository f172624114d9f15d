use catalog::modality::PIXEL_DETAIL_ZOOM;

/// Raster overlays and hover inspection are available at or above the
/// pixel-detail zoom, suspended below it.
pub fn is_pixel_detail(zoom: f64) -> bool {
    zoom >= PIXEL_DETAIL_ZOOM
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ThresholdCrossing {
    Up,
    Down,
}

/// Detect a pixel-detail threshold crossing between two settled zoom levels.
///
/// A crossing obliges the caller to run a forced rebuild for every checked
/// task; `Down` additionally resets the modality selector to solid and
/// force-hides the info panel.
pub fn crossing(previous: f64, current: f64) -> Option<ThresholdCrossing> {
    match (is_pixel_detail(previous), is_pixel_detail(current)) {
        (false, true) => Some(ThresholdCrossing::Up),
        (true, false) => Some(ThresholdCrossing::Down),
        _ => None,
    }
}
