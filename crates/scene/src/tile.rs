use foundation::geo::GeoBounds;

/// Identifies a tile within its task.
///
/// Upstream `properties.ID` values arrive as JSON numbers or strings; both
/// canonicalize to the number's JSON text so the two spellings of one id
/// collide, and so ids stay opaque (no arithmetic, ordering is lexical).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for TileId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semi-structured per-tile property record.
///
/// Named optional fields instead of a property dictionary: a field the
/// upstream payload lacks is a `None` at decode time rather than a stringly
/// lookup miss somewhere downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileProperties {
    /// Measured value for the owning task (keyed by the task id upstream).
    pub value: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Acquisition date, upstream formatting kept verbatim.
    pub date: Option<String>,
    pub mean_temperature: Option<f64>,
    pub annual_precipitation: Option<f64>,
    /// Cloud / cloud-shadow cover, percent.
    pub cloud_fraction: Option<f64>,
    pub cloud_shadow_fraction: Option<f64>,
    /// Species labels present in the tile (species task only).
    pub species: Option<Vec<String>>,
}

/// One georeferenced sample unit. Created at task load, never mutated,
/// discarded only when the whole task's data is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    pub id: TileId,
    /// Cached at load time from the polygon ring coordinates; pan/zoom
    /// recomputation only ever reads this box.
    pub bounds: GeoBounds,
    pub properties: TileProperties,
    /// Position in the upstream feature collection. Split membership is
    /// expressed in these indices, not in tile ids.
    pub ingestion_index: u32,
}
