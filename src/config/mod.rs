pub mod env;
mod loader;

pub use env::{AppConfig, ClassifierConfig, DirectoryConfig, VirusTotalConfig};
pub use loader::load_config;
