//! URL builders for the read endpoints behind the edge proxy.
//!
//! Every request is a plain GET; the proxy forwards the path unchanged to the
//! upstream store, so these shapes are the actual upstream layout.

use crate::modality::Modality;
use crate::task::TaskId;

/// `{base}/{task}/{task}_map_gdf.geojson`
pub fn task_geometry_url(base: &str, task: &TaskId) -> String {
    format!("{}/{task}/{task}_map_gdf.geojson", base.trim_end_matches('/'))
}

/// `{base}/{task}/{task}_split_data.json`
pub fn split_data_url(base: &str, task: &TaskId) -> String {
    format!("{}/{task}/{task}_split_data.json", base.trim_end_matches('/'))
}

/// `{base}/{task}/png_tiles/{modality}/tile_{id}_{modality}.png`
///
/// Only meaningful for non-solid modalities; there is no upstream directory
/// named "solid".
pub fn raster_tile_url(base: &str, task: &TaskId, modality: Modality, tile_id: &str) -> String {
    let m = modality.as_str();
    format!(
        "{}/{task}/png_tiles/{m}/tile_{tile_id}_{m}.png",
        base.trim_end_matches('/')
    )
}

/// `{base}/species/species_labels.json`
pub fn species_labels_url(base: &str) -> String {
    format!("{}/species/species_labels.json", base.trim_end_matches('/'))
}
