use std::path::Path;

/// `./`-prefixed path of `path` relative to `base`, or `path` unchanged when it lies elsewhere
#[must_use]
pub fn get_relative_path(base: &Path, path: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => format!("./{}", relative.to_string_lossy()),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
