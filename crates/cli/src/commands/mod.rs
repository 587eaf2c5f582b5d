mod check;
mod config;
mod create_pom;
mod generate;
mod init;
mod inject;

pub use check::CheckArgs;
pub use check::handle_check;
pub use config::ConfigArgs;
pub use config::handle_config;
pub use create_pom::CreatePomArgs;
pub use create_pom::{handle_create_pom, handle_create_pom_with_prompter};
pub use generate::GenerateArgs;
pub use generate::handle_generate;
pub use init::InitArgs;
pub use init::handle_init;
pub use inject::InjectArgs;
pub use inject::handle_inject;
