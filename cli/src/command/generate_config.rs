use std::path::{Path, PathBuf};

use serde_derive::Serialize;
use tracing::info;

use awful_scraping::config::ScraperConfig;

use crate::error::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenerateConfigResult {
    pub config_file: PathBuf,
}

pub fn generate_config(location: &Path) -> Result<GenerateConfigResult, CliError> {
    let config_file = ScraperConfig::write_default(location)?;

    info!("Default configuration is at {}", config_file.display());

    Ok(GenerateConfigResult { config_file })
}
