use crate::geo::LatLng;

/// Position in world pixels at a given zoom (origin at the north-west corner
/// of the projected world, y growing southward).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

pub const TILE_SIZE_PX: f64 = 256.0;

/// Latitude limit of the Web-Mercator projection.
pub const MAX_LAT_DEG: f64 = 85.051_128_78;

/// Project a geographic position to world-pixel coordinates.
///
/// Standard slippy-map Web Mercator: the world is `256 * 2^zoom` pixels wide.
/// Fractional zoom is allowed (pinch zoom reports intermediate levels).
pub fn project(p: LatLng, zoom: f64) -> ScreenPoint {
    let scale = TILE_SIZE_PX * zoom.exp2();
    let lat = p.lat.clamp(-MAX_LAT_DEG, MAX_LAT_DEG);
    let siny = (lat.to_radians()).sin();

    let x = (p.lon + 180.0) / 360.0 * scale;
    let y = (0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * std::f64::consts::PI)) * scale;
    ScreenPoint { x, y }
}
