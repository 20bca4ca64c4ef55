use serde_derive::Serialize;

use awful_scraping::config::ResolvedScraperConfig;
use awful_scraping::location::{ThreadPageLocator, ThreadPageRequest};

use crate::error::*;

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocateResult {
    pub thread_id: String,
    pub locator: ThreadPageLocator,
    pub page: String,
    pub author_user_id: Option<String>,
    pub posts_per_page: Option<u32>,
    pub update_last_read: bool,
    /// The same request, re-encoded against the configured base URL.
    pub url: String,
}

pub fn locate(url: &str, config: &ResolvedScraperConfig) -> Result<LocateResult, CliError> {
    let url = config
        .base_url
        .join(url.trim())
        .map_err(|err| CliError::new(CliErrorKind::Arguments, format!("Invalid URL '{url}': {err}")))?;

    let request = ThreadPageRequest::from_url(&url)
        .ok_or_else(|| CliError::new(CliErrorKind::Arguments, format!("No thread id in '{url}'")))?;

    let encoded = request.to_url(&config.base_url)?;

    Ok(LocateResult {
        thread_id: request.thread_id,
        locator: request.locator,
        page: request.locator.to_string(),
        author_user_id: request.author_user_id,
        posts_per_page: request.posts_per_page,
        update_last_read: request.update_last_read,
        url: encoded.to_string(),
    })
}
