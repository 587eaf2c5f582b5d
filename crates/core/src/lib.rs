//! # retropom-core
//!
//! Plain data shared by the retropom crates: the license entry appended to every descriptor,
//! the project coordinates used to generate one, and the `.retropom/config.json` configuration.

pub mod config;
pub mod coordinates;
pub mod license;

pub use config::Config;
pub use coordinates::Coordinates;
pub use license::LicenseEntry;
