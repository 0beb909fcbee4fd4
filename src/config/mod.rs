//! Configuration module

mod settings;
mod site;

pub use settings::{Settings, SETTINGS_FILE};
pub use site::{SiteConfig, DEFAULT_ROOT_FOLDER};
