use std::borrow::Cow;
use std::fmt;

use serde_derive::Serialize;
use thiserror::Error;

/// Kind of site-wide failure page the forums served instead of the requested content.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteFailureKind {
    DatabaseUnavailable,
    LoginRequired,
    Standard,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SiteFailure {
    pub kind: SiteFailureKind,
    pub message: String,
}

impl fmt::Display for SiteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SiteFailureKind::DatabaseUnavailable => "Forums database unavailable",
            SiteFailureKind::LoginRequired => "Login required",
            SiteFailureKind::Standard => "Forums error",
        };

        if self.message.is_empty() {
            write!(f, "{kind}")
        } else {
            write!(f, "{kind}: {}", self.message)
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    SiteFailure(SiteFailure),
    #[error("No matching container found: {0}")]
    MissingContainer(Cow<'static, str>),
    #[error("Required entity not found: {0}")]
    EntityNotFound(Cow<'static, str>),
    #[error("Error reading config")]
    ReadConfig(anyhow::Error),
    #[error("Error parsing config")]
    ParseConfig(Cow<'static, str>),
    #[error("Configuration error")]
    Config(Cow<'static, str>),
    #[error("Error reading file")]
    ReadFile(anyhow::Error),
    #[error("Error writing file")]
    WriteFile(anyhow::Error),
    #[error("Error")]
    Other(Cow<'static, str>),
}

impl ScrapeError {
    /// True for failures that describe the page as a whole rather than a local I/O or config problem.
    pub fn is_scrape_wide(&self) -> bool {
        matches!(
            self,
            Self::SiteFailure(_) | Self::MissingContainer(_) | Self::EntityNotFound(_)
        )
    }
}
