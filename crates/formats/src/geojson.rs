//! Task geometry decoding.
//!
//! The metadata endpoint serves one GeoJSON feature collection per task.
//! `properties.ID` is the canonical tile id (number or string upstream);
//! the feature's position in the collection is its ingestion index, which is
//! what the split arrays refer to.
//!
//! Bounds are min/maxed directly over the raw ring coordinates instead of
//! building polygon objects first. Tasks run to thousands of tiles and the
//! cached boxes are all the viewer ever consults, so decode stays a single
//! pass over the coordinate arrays.

use serde::Deserialize;
use serde_json::Value;

use foundation::geo::{GeoBounds, LatLng};
use scene::tile::{TileId, TileProperties, TileRecord};

use crate::error::FormatError;
use crate::species::SpeciesListRepr;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
    geometry: Option<Value>,
}

/// Decode a task's feature collection into tile records.
///
/// `value_key` names the property carrying the task's measured value; by
/// upstream convention it equals the task id.
pub fn decode_feature_collection(
    json: &str,
    value_key: &str,
) -> Result<Vec<TileRecord>, FormatError> {
    let collection: FeatureCollection = serde_json::from_str(json)?;

    let mut tiles = Vec::with_capacity(collection.features.len());
    for (position, feature) in collection.features.into_iter().enumerate() {
        let id = tile_id(&feature, position)?;
        let bounds = ring_bounds(&feature, position)?;
        let properties = decode_properties(&feature.properties, value_key);

        tiles.push(TileRecord {
            id,
            bounds,
            properties,
            ingestion_index: position as u32,
        });
    }
    Ok(tiles)
}

fn tile_id(feature: &Feature, position: usize) -> Result<TileId, FormatError> {
    match feature.properties.get("ID") {
        Some(Value::String(s)) => Ok(TileId::new(s.clone())),
        // Numbers canonicalize to their JSON text, so 42 and "42" collide.
        Some(Value::Number(n)) => Ok(TileId::new(n.to_string())),
        _ => Err(FormatError::MissingField {
            feature: position,
            field: "properties.ID",
        }),
    }
}

fn ring_bounds(feature: &Feature, position: usize) -> Result<GeoBounds, FormatError> {
    let Some(geometry) = &feature.geometry else {
        return Err(FormatError::BadGeometry {
            feature: position,
            reason: "no geometry".into(),
        });
    };
    let Some(coordinates) = geometry.get("coordinates") else {
        return Err(FormatError::BadGeometry {
            feature: position,
            reason: "no coordinates".into(),
        });
    };

    let mut bounds: Option<GeoBounds> = None;
    accumulate_positions(coordinates, &mut bounds);
    bounds.ok_or_else(|| FormatError::BadGeometry {
        feature: position,
        reason: "no coordinate pairs".into(),
    })
}

/// Walk the nested coordinate arrays of a Polygon or MultiPolygon and feed
/// every `[lon, lat]` pair into the running box. Nesting depth is irrelevant,
/// which is exactly why no geometry object is needed.
fn accumulate_positions(value: &Value, bounds: &mut Option<GeoBounds>) {
    let Value::Array(items) = value else {
        return;
    };

    // A position is an array starting with two numbers ([lon, lat, ...]).
    if let [Value::Number(lon), Value::Number(lat), ..] = items.as_slice() {
        let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) else {
            return;
        };
        let p = LatLng::new(lat, lon);
        match bounds {
            Some(b) => b.extend(p),
            None => *bounds = Some(GeoBounds::at(p)),
        }
        return;
    }

    for item in items {
        accumulate_positions(item, bounds);
    }
}

fn decode_properties(props: &serde_json::Map<String, Value>, value_key: &str) -> TileProperties {
    TileProperties {
        value: number(props, value_key),
        lat: number(props, "lat"),
        lon: number(props, "lon"),
        date: string(props, "date"),
        mean_temperature: number(props, "mean_temperature"),
        annual_precipitation: number(props, "annual_precipitation"),
        cloud_fraction: number(props, "cloud_fraction"),
        cloud_shadow_fraction: number(props, "cloud_shadow_fraction"),
        species: species_list(props),
    }
}

fn number(props: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    props.get(key).and_then(Value::as_f64)
}

fn string(props: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(String::from)
}

fn species_list(props: &serde_json::Map<String, Value>) -> Option<Vec<String>> {
    let raw = props.get("species")?.clone();
    let repr: SpeciesListRepr = serde_json::from_value(raw).ok()?;
    Some(repr.into_labels())
}
