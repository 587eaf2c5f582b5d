use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identity of the published library, written into a generated descriptor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    #[serde(default = "default_group_id")]
    pub group_id: String,

    #[serde(default = "default_artifact_id")]
    pub artifact_id: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Free-form `<description>`, omitted from the descriptor when absent
    #[serde(default = "default_description")]
    pub description: Option<String>,

    /// Project website, written as `<url>`
    #[serde(default = "default_url")]
    pub url: Option<String>,
}

fn default_group_id() -> String {
    "com.memoizr".to_string()
}

fn default_artifact_id() -> String {
    "retro-optional".to_string()
}

fn default_version() -> String {
    "v0.1.4".to_string()
}

fn default_description() -> Option<String> {
    Some("A backport of Java 8 optional for Java 7".to_string())
}

fn default_url() -> Option<String> {
    Some("https://github.com/memoizr/retro-optional".to_string())
}

impl Default for Coordinates {
    fn default() -> Self {
        Self {
            group_id: default_group_id(),
            artifact_id: default_artifact_id(),
            version: default_version(),
            description: default_description(),
            url: default_url(),
        }
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id,
            self.artifact_id.bold(),
            self.version.green()
        )
    }
}
