use std::path::Path;

use tracing::{debug, info};

use awful_scraping::config::ResolvedScraperConfig;
use awful_scraping::scraper::{PageOptions, PageType, ScrapedPage};

use crate::error::*;

pub fn scrape(
    page_type: PageType,
    path: &Path,
    options: &PageOptions,
    config: &ResolvedScraperConfig,
) -> Result<ScrapedPage, CliError> {
    info!("Scraping {} as {page_type:?}", path.display());
    debug!("Page options: {options:?}");

    let root = awful_scraping::parse_file(path)?;
    let page = page_type.scrape_page(&root, config, options)?;

    Ok(page)
}
