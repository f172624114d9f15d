use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::FormatError;

/// Upstream species lists come in two shapes, a JSON array of labels or one
/// delimited string, depending on which export produced the task data. Both
/// must normalize to the same label vector or the species filter would treat
/// identical tiles differently.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SpeciesListRepr {
    List(Vec<String>),
    Delimited(String),
}

impl SpeciesListRepr {
    pub fn into_labels(self) -> Vec<String> {
        match self {
            SpeciesListRepr::List(labels) => labels
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            SpeciesListRepr::Delimited(joined) => joined
                .split([',', ';'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// Decode the species label listing: a JSON object of name → index.
///
/// Returns the names ordered by their upstream index (ties broken by name),
/// ready to populate the selector.
pub fn decode_species_labels(json: &str) -> Result<Vec<String>, FormatError> {
    let by_name: BTreeMap<String, u32> = serde_json::from_str(json)?;

    let mut pairs: Vec<(u32, String)> = by_name
        .into_iter()
        .map(|(name, index)| (index, name))
        .collect();
    pairs.sort();
    Ok(pairs.into_iter().map(|(_, name)| name).collect())
}
