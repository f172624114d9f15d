/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned geographic bounding box in degrees.
///
/// Conventions:
/// - `south <= north`, `west <= east` (no antimeridian wrapping).
/// - All edge comparisons are inclusive, so boxes sharing only an edge
///   still intersect. Adjacent benchmark tiles share edges; hover and
///   visibility must treat them as touching, not as a gap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// A degenerate box covering exactly one point; grow it with `extend`.
    pub fn at(p: LatLng) -> Self {
        Self {
            south: p.lat,
            west: p.lon,
            north: p.lat,
            east: p.lon,
        }
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.west = self.west.min(p.lon);
        self.north = self.north.max(p.lat);
        self.east = self.east.max(p.lon);
    }

    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south && p.lat <= self.north && p.lon >= self.west && p.lon <= self.east
    }

    /// North-west corner; the info panel anchors here.
    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north, self.west)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) * 0.5,
            (self.west + self.east) * 0.5,
        )
    }
}
