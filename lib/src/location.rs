//! The forums' thread pagination query parameters.
//!
//! `showthread.php` picks the page to render from `pagenumber=N`, or from one of two
//! `goto` sentinels: `goto=lastpost` for the last page and `goto=newpost` for the page
//! holding the first post the account hasn't seen. Anything else renders page 1.

use std::fmt;
use std::str::FromStr;

use serde_derive::Serialize;
use url::Url;

use crate::error::ScrapeError;
use crate::extract::parse_href;

pub const PAGE_NUMBER_PARAM: &str = "pagenumber";
pub const GOTO_PARAM: &str = "goto";
pub const GOTO_LAST_POST: &str = "lastpost";
pub const GOTO_NEW_POST: &str = "newpost";
pub const USER_ID_PARAM: &str = "userid";
pub const PER_PAGE_PARAM: &str = "perpage";
pub const NO_SEEN_PARAM: &str = "noseen";
pub const THREAD_ID_PARAM: &str = "threadid";

pub const SHOWTHREAD_PATH: &str = "showthread.php";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "page")]
pub enum ThreadPageLocator {
    /// A specific page, counting from 1.
    Page(u32),
    Last,
    FirstUnread,
    /// No page at all, e.g. a pagination link that doesn't point at one.
    None,
}

impl Default for ThreadPageLocator {
    fn default() -> Self {
        Self::Page(1)
    }
}

impl ThreadPageLocator {
    /// Read the locator out of query parameters. Missing or unrecognized values mean page 1.
    pub fn decode<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut page_number = None;
        let mut goto = None;

        for (key, value) in params {
            let value = value.as_ref().trim();

            match key.as_ref() {
                PAGE_NUMBER_PARAM if page_number.is_none() => {
                    page_number = value.parse::<u32>().ok().filter(|n| *n >= 1);
                }
                GOTO_PARAM if goto.is_none() => match value {
                    GOTO_LAST_POST => goto = Some(Self::Last),
                    GOTO_NEW_POST => goto = Some(Self::FirstUnread),
                    _ => {}
                },
                _ => {}
            }
        }

        goto.or_else(|| page_number.map(Self::Page)).unwrap_or_default()
    }

    /// Locator of a link, or [`ThreadPageLocator::None`] when the href can't be parsed.
    pub fn from_href(href: &str) -> Self {
        match parse_href(href) {
            Some(url) => Self::decode(url.query_pairs()),
            None => Self::None,
        }
    }

    /// Query parameters selecting this page, in wire order.
    pub fn encode(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Page(page_number) => vec![(PAGE_NUMBER_PARAM, page_number.to_string())],
            Self::Last => vec![(GOTO_PARAM, GOTO_LAST_POST.to_owned())],
            Self::FirstUnread => vec![(GOTO_PARAM, GOTO_NEW_POST.to_owned())],
            Self::None => Vec::new(),
        }
    }
}

impl fmt::Display for ThreadPageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page_number) => write!(f, "{page_number}"),
            Self::Last => write!(f, "last"),
            Self::FirstUnread => write!(f, "unread"),
            Self::None => write!(f, "none"),
        }
    }
}

impl FromStr for ThreadPageLocator {
    type Err = ScrapeError;

    /// Parse the short form used on the command line: a page number, `last` or `unread`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last" => Ok(Self::Last),
            "unread" => Ok(Self::FirstUnread),
            "none" => Ok(Self::None),
            s => match s.parse::<u32>() {
                Ok(page_number) if page_number >= 1 => Ok(Self::Page(page_number)),
                _ => Err(ScrapeError::Other(
                    format!("Invalid page '{s}'. Expected a page number, 'last' or 'unread'.").into(),
                )),
            },
        }
    }
}

/// Everything that goes into a `showthread.php` request for one page of a thread.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ThreadPageRequest {
    pub thread_id: String,
    pub locator: ThreadPageLocator,
    /// Show only this user's posts.
    pub author_user_id: Option<String>,
    pub posts_per_page: Option<u32>,
    /// When false, ask the forums not to move the account's last-read marker.
    pub update_last_read: bool,
}

impl ThreadPageRequest {
    pub fn new(thread_id: impl Into<String>, locator: ThreadPageLocator) -> Self {
        Self {
            thread_id: thread_id.into(),
            locator,
            author_user_id: None,
            posts_per_page: None,
            update_last_read: true,
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(THREAD_ID_PARAM, self.thread_id.clone())];

        if let Some(author_user_id) = &self.author_user_id {
            pairs.push((USER_ID_PARAM, author_user_id.clone()));
        }

        if let Some(posts_per_page) = self.posts_per_page {
            pairs.push((PER_PAGE_PARAM, posts_per_page.to_string()));
        }

        pairs.extend(self.locator.encode());

        if !self.update_last_read {
            pairs.push((NO_SEEN_PARAM, "1".to_owned()));
        }

        pairs
    }

    pub fn to_url(&self, base_url: &Url) -> Result<Url, ScrapeError> {
        let mut url = base_url
            .join(SHOWTHREAD_PATH)
            .map_err(|err| ScrapeError::Other(format!("Error building thread URL: {err}").into()))?;

        url.query_pairs_mut().clear().extend_pairs(self.query_pairs());

        Ok(url)
    }

    /// Decode a thread URL. Returns `None` if it has no numeric thread id.
    pub fn from_url(url: &Url) -> Option<Self> {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let thread_id = param(THREAD_ID_PARAM).filter(|id| id.bytes().all(|b| b.is_ascii_digit()))?;

        Some(Self {
            thread_id,
            locator: ThreadPageLocator::decode(url.query_pairs()),
            author_user_id: param(USER_ID_PARAM).filter(|id| id != "0"),
            posts_per_page: param(PER_PAGE_PARAM).and_then(|n| n.parse().ok()),
            update_last_read: param(NO_SEEN_PARAM).as_deref() != Some("1"),
        })
    }
}
