use std::path::PathBuf;

use tracing::error;

mod scraper;

pub use self::scraper::*;

pub const CONFIG_DIR: &str = "awful-scraping";

pub fn get_default_config_path() -> Option<PathBuf> {
    let config_path = dirs::config_dir().map(|p| p.join(CONFIG_DIR));

    if config_path.is_none() {
        error!("Could not get configuration path!");
    }

    config_path
}
