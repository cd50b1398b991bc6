use std::fmt;

use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identifier of a scene within a project.
///
/// Identifiers are assigned in batches when a script is analyzed: every
/// scene of one batch shares the batch prefix and carries its own index,
/// so identifiers of a batch are pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Build the identifier of the `index`-th scene (zero-based) of a batch.
    pub fn sequential(batch: &uuid::Uuid, index: usize) -> Self {
        Self(format!("scene-{}-{}", batch.simple(), index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
