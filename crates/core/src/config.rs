use serde::{Deserialize, Serialize};

use crate::Coordinates;

/// Loaded from `.retropom/config.json`, controls the generated coordinates and where the
/// finished descriptor is written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Coordinates used when the base descriptor is generated rather than read from a file
    #[serde(default)]
    pub coordinates: Coordinates,

    /// Output path of `create-pom`, relative to the project root (default: "build/poms/pom-default.xml")
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_output() -> String {
    "build/poms/pom-default.xml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coordinates: Coordinates::default(),
            output: default_output(),
        }
    }
}
