mod get_relative_path;
mod get_retropom_config;
mod get_retropom_dir;
mod write_descriptor;

pub use get_relative_path::get_relative_path;
pub use get_retropom_config::{CONFIG_FILE, get_retropom_config};
pub use get_retropom_dir::{RETROPOM_DIR, get_project_root, get_retropom_dir};
pub use write_descriptor::write_descriptor;
