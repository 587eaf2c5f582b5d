use serde::{Deserialize, Serialize};

pub const APACHE_2_0_NAME: &str = "The Apache Software License, Version 2.0";
pub const APACHE_2_0_URL: &str = "http://www.apache.org/licenses/LICENSE-2.0.txt";
pub const APACHE_2_0_DISTRIBUTION: &str = "repo";

/// A single `<license>` entry of a project descriptor.
///
/// The injector only ever writes [`LicenseEntry::apache_2_0`]; the struct exists so the
/// block builder and the parse-back reader share one shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LicenseEntry {
    pub name: String,
    pub url: String,
    pub distribution: String,
}

impl LicenseEntry {
    /// The Apache 2.0 entry appended to every descriptor
    #[must_use]
    pub fn apache_2_0() -> Self {
        Self {
            name: APACHE_2_0_NAME.to_string(),
            url: APACHE_2_0_URL.to_string(),
            distribution: APACHE_2_0_DISTRIBUTION.to_string(),
        }
    }
}
