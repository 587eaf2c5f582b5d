use std::path::{Path, PathBuf};

pub const RETROPOM_DIR: &str = ".retropom";

/// Nearest `.retropom` directory at or above `current_dir`.
///
/// Falls back to `current_dir/.retropom` when no ancestor has one, so `init` knows where to
/// create it.
#[must_use]
pub fn get_retropom_dir(current_dir: &Path) -> PathBuf {
    current_dir
        .ancestors()
        .map(|dir| dir.join(RETROPOM_DIR))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| current_dir.join(RETROPOM_DIR))
}

/// Directory that relative paths in the configuration resolve against
#[must_use]
pub fn get_project_root(current_dir: &Path) -> PathBuf {
    get_retropom_dir(current_dir)
        .parent()
        .map_or_else(|| current_dir.to_path_buf(), Path::to_path_buf)
}
