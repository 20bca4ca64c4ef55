use std::borrow::Cow;

use awful_scraping::ScrapeError;

#[derive(Debug)]
pub enum CliErrorKind {
    Arguments,
    Config,
    Input,
    Site,
    Scrape,
    Other,
}

impl CliErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments => 1,
            Self::Config => 2,
            Self::Input => 3,
            Self::Site => 4,
            Self::Scrape => 5,
            Self::Other => 101,
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub kind: CliErrorKind,
    pub description: Cow<'static, str>,
}

impl CliError {
    pub fn new<S: Into<Cow<'static, str>>>(kind: CliErrorKind, description: S) -> CliError {
        CliError {
            kind,
            description: description.into(),
        }
    }
}

impl From<ScrapeError> for CliError {
    fn from(error: ScrapeError) -> Self {
        match error {
            ScrapeError::SiteFailure(failure) => CliError::new(CliErrorKind::Site, failure.to_string()),
            ScrapeError::MissingContainer(err) => {
                CliError::new(CliErrorKind::Scrape, format!("Page has no {err}; is this the right page type?"))
            }
            ScrapeError::EntityNotFound(err) => CliError::new(CliErrorKind::Scrape, format!("No {err} on page")),
            ScrapeError::ReadConfig(err) => {
                CliError::new(CliErrorKind::Config, format!("Error reading config file: {err:#}"))
            }
            ScrapeError::ParseConfig(err) => {
                CliError::new(CliErrorKind::Config, format!("Error parsing configuration: {err}"))
            }
            ScrapeError::Config(err) => CliError::new(CliErrorKind::Config, format!("Configuration error: {err}")),
            ScrapeError::ReadFile(err) => CliError::new(CliErrorKind::Input, format!("Error reading file: {err:#}")),
            ScrapeError::WriteFile(err) => CliError::new(CliErrorKind::Other, format!("Error writing file: {err:#}")),
            ScrapeError::Other(err) => CliError::new(CliErrorKind::Other, err.to_string()),
        }
    }
}
