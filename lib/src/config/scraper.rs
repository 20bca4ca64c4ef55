use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use url::Url;

use crate::date::CompoundDateParser;
use crate::error::*;
use crate::util;

use super::*;

pub const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

pub const DEFAULT_BASE_URL: &str = "https://forums.somethingawful.com/";

pub const DEFAULT_POSTS_PER_PAGE: u32 = 40;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateFormatsConfig {
    pub post_date: Option<Vec<String>>,
    pub regdate: Option<Vec<String>>,
    pub last_post: Option<Vec<String>>,
    pub sent_date: Option<Vec<String>>,
    pub edit_date: Option<Vec<String>>,
    pub punishment: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScraperConfig {
    pub base_url: Option<String>,
    pub posts_per_page: Option<u32>,
    #[serde(default)]
    pub date_formats: DateFormatsConfig,
}

/// Date parsers for every date shape the forums render.
#[derive(Clone, Debug, PartialEq)]
pub struct DateParsers {
    pub post_date: CompoundDateParser,
    pub regdate: CompoundDateParser,
    pub last_post: CompoundDateParser,
    pub sent_date: CompoundDateParser,
    pub edit_date: CompoundDateParser,
    pub punishment: CompoundDateParser,
}

impl Default for DateParsers {
    fn default() -> Self {
        Self {
            post_date: CompoundDateParser::post_date(),
            regdate: CompoundDateParser::regdate(),
            last_post: CompoundDateParser::last_post(),
            sent_date: CompoundDateParser::sent_date(),
            edit_date: CompoundDateParser::edit_date(),
            punishment: CompoundDateParser::punishment(),
        }
    }
}

/// Configuration with every default filled in, handed to scrapers at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedScraperConfig {
    pub base_url: Url,
    pub posts_per_page: u32,
    pub dates: DateParsers,
}

impl Default for ResolvedScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            dates: DateParsers::default(),
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("default base URL is valid"),
    }
}

impl ScraperConfig {
    pub fn from_file(path: &Path) -> Result<Self, ScrapeError> {
        let toml_str = util::read_file_string(path).map_err(ScrapeError::ReadConfig)?;

        Self::from_str(&toml_str)
    }

    pub fn default_location() -> Option<PathBuf> {
        get_default_config_path()
    }

    fn path_from_location(path: &Path) -> PathBuf {
        path.join(CONFIG_FILENAME)
    }

    pub fn from_location(path: &Path) -> Result<Self, ScrapeError> {
        let config_file_path = Self::path_from_location(path);

        if config_file_path.exists() {
            Ok(Self::from_file(&config_file_path)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_default_location() -> Result<Self, ScrapeError> {
        if let Some(path) = Self::default_location() {
            Self::from_location(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the commented default config file to `location`, unless one already exists.
    /// Returns the path of the config file.
    pub fn write_default(location: &Path) -> Result<PathBuf, ScrapeError> {
        let config_file_path = Self::path_from_location(location);

        if !config_file_path.exists() {
            util::write_file_with_parents(&config_file_path, DEFAULT_CONFIG_TOML.as_bytes())
                .map_err(ScrapeError::WriteFile)?;
        }

        Ok(config_file_path)
    }

    pub fn resolve(self) -> Result<ResolvedScraperConfig, ScrapeError> {
        let base_url = match self.base_url {
            Some(base_url) => Url::parse(&base_url)
                .map_err(|err| ScrapeError::Config(format!("Invalid base URL '{base_url}': {err}").into()))?,
            None => default_base_url(),
        };

        let posts_per_page = match self.posts_per_page {
            Some(0) => return Err(ScrapeError::Config("posts-per-page must be at least 1".into())),
            Some(posts_per_page) => posts_per_page,
            None => DEFAULT_POSTS_PER_PAGE,
        };

        let formats = self.date_formats;
        let defaults = DateParsers::default();
        let pick = |formats: Option<Vec<String>>, default: CompoundDateParser| match formats {
            Some(formats) if !formats.is_empty() => CompoundDateParser::new(formats),
            _ => default,
        };

        let dates = DateParsers {
            post_date: pick(formats.post_date, defaults.post_date),
            regdate: pick(formats.regdate, defaults.regdate),
            last_post: pick(formats.last_post, defaults.last_post),
            sent_date: pick(formats.sent_date, defaults.sent_date),
            edit_date: pick(formats.edit_date, defaults.edit_date),
            punishment: pick(formats.punishment, defaults.punishment),
        };

        Ok(ResolvedScraperConfig {
            base_url,
            posts_per_page,
            dates,
        })
    }
}

impl FromStr for ScraperConfig {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).map_err(|err| ScrapeError::ParseConfig(err.to_string().into()))?;

        Ok(config)
    }
}
