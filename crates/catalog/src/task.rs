use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifies a benchmark task ("biomass", "soil_nitrogen", ...).
///
/// The id doubles as the upstream path segment and as the property key under
/// which each tile stores its measured value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a task carries a secondary attribute filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    /// Single measured value per tile (biomass, soil properties).
    Scalar,
    /// Presence task: tiles carry a species label list and the species
    /// selector narrows the visible set.
    Species,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: TaskId,
    pub title: String,
    /// Boundary/fill color, CSS form, consumed verbatim by the map surface.
    pub color: String,
    pub kind: TaskKind,
}

impl TaskSpec {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        color: impl Into<String>,
        kind: TaskKind,
    ) -> Self {
        Self {
            id: TaskId::new(id),
            title: title.into(),
            color: color.into(),
            kind,
        }
    }
}

/// The fixed task set, configured at startup and immutable after.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: BTreeMap<TaskId, TaskSpec>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The benchmark's standard task set.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for spec in [
            TaskSpec::new("biomass", "Biomass", "green", TaskKind::Scalar),
            TaskSpec::new("species", "Species", "red", TaskKind::Species),
            TaskSpec::new("soil_nitrogen", "Soil nitrogen", "blue", TaskKind::Scalar),
            TaskSpec::new(
                "soil_organic_carbon",
                "Soil organic carbon",
                "saddlebrown",
                TaskKind::Scalar,
            ),
            TaskSpec::new("soil_pH", "Soil pH", "purple", TaskKind::Scalar),
        ] {
            registry.insert(spec);
        }
        registry
    }

    pub fn insert(&mut self, spec: TaskSpec) {
        self.tasks.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &TaskId) -> Option<&TaskSpec> {
        self.tasks.get(id)
    }

    /// Tasks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
