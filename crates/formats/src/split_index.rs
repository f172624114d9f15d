use serde::Deserialize;

use scene::split_filter::SplitIndex;

use crate::error::FormatError;

/// Wire shape of `{task}_split_data.json`. Index arrays refer to positions
/// in the task's feature collection, not to tile ids.
#[derive(Debug, Deserialize)]
struct SplitPayload {
    #[serde(rename = "train_100%_indices", default)]
    train_100: Vec<u32>,
    #[serde(rename = "train_50%_indices", default)]
    train_50: Vec<u32>,
    #[serde(rename = "train_5%_indices", default)]
    train_5: Vec<u32>,
    #[serde(rename = "val_indices", default)]
    validation: Vec<u32>,
    #[serde(rename = "random_test_indices", default)]
    random_test: Vec<u32>,
    #[serde(rename = "geographic_test_indices", default)]
    geographic_test: Vec<u32>,
}

pub fn decode_split_index(json: &str) -> Result<SplitIndex, FormatError> {
    let payload: SplitPayload = serde_json::from_str(json)?;
    Ok(SplitIndex {
        train_100: payload.train_100.into_iter().collect(),
        train_50: payload.train_50.into_iter().collect(),
        train_5: payload.train_5.into_iter().collect(),
        validation: payload.validation.into_iter().collect(),
        random_test: payload.random_test.into_iter().collect(),
        geographic_test: payload.geographic_test.into_iter().collect(),
    })
}
