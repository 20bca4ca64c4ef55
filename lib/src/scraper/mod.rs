//! One scraper per page shape.
//!
//! Every scraper first checks for the site-wide failure pages the forums serve in place of
//! real content. After that, repeated items (thread rows, posts, messages, punishments)
//! are read one at a time, and an item missing its id is skipped without failing the page.

use kuchikiki::NodeRef;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ResolvedScraperConfig;
use crate::error::*;
use crate::html::NodeExt;
use crate::location::ThreadPageLocator;
use crate::model::*;
use crate::store::{Persist, RecordStore};

pub mod forms;
pub mod forums;
pub mod lepers;
pub mod messages;
pub mod posts;
pub mod profile;
pub mod threads;

pub use self::forms::FormScraper;
pub use self::forums::{ForumHierarchyScraper, ForumListShape};
pub use self::lepers::LepersColonyScraper;
pub use self::messages::{MessageFolderScraper, PrivateMessageScraper, UnreadMessageCountScraper};
pub use self::posts::{PostsPageContext, PostsPageScraper};
pub use self::profile::ProfileScraper;
pub use self::threads::{ThreadListScraper, ThreadListShape};

pub trait Scraper {
    type Output: Persist;

    /// Extract records from a parsed page.
    fn scrape(&self, root: &NodeRef) -> Result<Self::Output, ScrapeError>;

    /// Extract records and upsert them into `store`. Nothing is stored when the scrape fails.
    fn scrape_into(&self, root: &NodeRef, store: &mut dyn RecordStore) -> Result<Self::Output, ScrapeError> {
        let output = self.scrape(root)?;
        output.persist(store);

        Ok(output)
    }
}

const DATABASE_UNAVAILABLE_PHRASES: &[&str] = &[
    "database is temporarily unavailable",
    "database is currently unavailable",
    "database is unavailable",
];

const LOGIN_REQUIRED_PHRASES: &[&str] = &[
    "must be logged in",
    "not logged in",
    "must be a registered forums member",
];

/// Fail with [`ScrapeError::SiteFailure`] if the page is one of the forums' error pages.
pub fn check_site_failure(root: &NodeRef) -> Result<(), ScrapeError> {
    for node in root.all("div.standarderror, div.standard div.inner") {
        let text = node.text();
        let lowercase = text.to_lowercase();

        if DATABASE_UNAVAILABLE_PHRASES.iter().any(|phrase| lowercase.contains(phrase)) {
            warn!("Forums database unavailable: {text}");

            return Err(ScrapeError::SiteFailure(SiteFailure {
                kind: SiteFailureKind::DatabaseUnavailable,
                message: text,
            }));
        }
    }

    if let Some(error) = root.first("div.standarderror") {
        let message = error
            .first("div.inner")
            .map(|inner| inner.text())
            .unwrap_or_else(|| error.text());
        let lowercase = message.to_lowercase();

        let kind = if LOGIN_REQUIRED_PHRASES.iter().any(|phrase| lowercase.contains(phrase)) {
            SiteFailureKind::LoginRequired
        } else {
            SiteFailureKind::Standard
        };

        warn!("Forums error page ({kind:?}): {message}");

        return Err(ScrapeError::SiteFailure(SiteFailure { kind, message }));
    }

    Ok(())
}

/// Optional `data-*` attribute on `<body>`, which newer templates use for page context.
pub(crate) fn body_data(root: &NodeRef, name: &str) -> Option<String> {
    root.first("body")
        .and_then(|body| body.attr(name))
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub(crate) fn skipped(item: &str, reason: &str) {
    debug!("Skipping {item}: {reason}");
}

/// The kinds of page a scraper exists for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageType {
    Forums,
    Threads,
    Bookmarks,
    Posts,
    Folder,
    Message,
    UnreadCount,
    Profile,
    Lepers,
    Forms,
}

/// Request context for [`PageType::scrape_page`]. Each page type reads the parts it needs.
#[derive(Clone, Debug, Default)]
pub struct PageOptions {
    pub forum_id: Option<String>,
    pub thread_id: Option<String>,
    pub locator: ThreadPageLocator,
    pub author_filter: Option<String>,
    pub anchor_post_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "page", content = "data", rename_all = "kebab-case")]
pub enum ScrapedPage {
    Forums(ForumHierarchy),
    Threads(ThreadListPage),
    Posts(PostsPage),
    Folder(MessageFolder),
    Message(PrivateMessage),
    UnreadCount(u32),
    Profile(UserProfile),
    Lepers(Vec<Punishment>),
    Forms(Vec<FormDescriptor>),
}

impl ScrapedPage {
    pub fn persist(&self, store: &mut dyn RecordStore) {
        match self {
            Self::Forums(output) => output.persist(store),
            Self::Threads(output) => output.persist(store),
            Self::Posts(output) => output.persist(store),
            Self::Folder(output) => output.persist(store),
            Self::Message(output) => output.persist(store),
            Self::UnreadCount(output) => output.persist(store),
            Self::Profile(output) => output.persist(store),
            Self::Lepers(output) => output.persist(store),
            Self::Forms(output) => output.persist(store),
        }
    }
}

impl PageType {
    pub fn scrape_page(
        &self,
        root: &NodeRef,
        config: &ResolvedScraperConfig,
        options: &PageOptions,
    ) -> Result<ScrapedPage, ScrapeError> {
        debug!("Scraping {self:?} page");

        Ok(match self {
            Self::Forums => ScrapedPage::Forums(ForumHierarchyScraper::new(None).scrape(root)?),
            Self::Threads => ScrapedPage::Threads(
                ThreadListScraper::new(
                    config,
                    ThreadListShape::Forum {
                        forum_id: options.forum_id.clone(),
                    },
                )
                .scrape(root)?,
            ),
            Self::Bookmarks => {
                ScrapedPage::Threads(ThreadListScraper::new(config, ThreadListShape::Bookmarks).scrape(root)?)
            }
            Self::Posts => {
                let context = PostsPageContext {
                    thread_id: options.thread_id.clone(),
                    locator: options.locator,
                    author_filter: options.author_filter.clone(),
                    anchor_post_id: options.anchor_post_id.clone(),
                };

                ScrapedPage::Posts(PostsPageScraper::new(config, context).scrape(root)?)
            }
            Self::Folder => ScrapedPage::Folder(MessageFolderScraper::new(config).scrape(root)?),
            Self::Message => ScrapedPage::Message(PrivateMessageScraper::new(config).scrape(root)?),
            Self::UnreadCount => ScrapedPage::UnreadCount(UnreadMessageCountScraper.scrape(root)?),
            Self::Profile => ScrapedPage::Profile(ProfileScraper::new(config).scrape(root)?),
            Self::Lepers => ScrapedPage::Lepers(LepersColonyScraper::new(config).scrape(root)?),
            Self::Forms => ScrapedPage::Forms(FormScraper::new(config).scrape(root)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::html;

    use super::*;

    const DATABASE_UNAVAILABLE: &'static str = r#"<html><head><title>The Something Awful Forums</title></head>
<body><div class="standard"><h2>Oops</h2><div class="inner">The forums database is temporarily unavailable. Please try again in a few minutes.</div></div></body></html>"#;

    const LOGIN_REQUIRED: &'static str = r#"<html><body><div class="standarderror"><div class="inner">
Sorry, you must be a registered forums member to view this page.
</div></div></body></html>"#;

    const ALL_PAGE_TYPES: &[PageType] = &[
        PageType::Forums,
        PageType::Threads,
        PageType::Bookmarks,
        PageType::Posts,
        PageType::Folder,
        PageType::Message,
        PageType::UnreadCount,
        PageType::Profile,
        PageType::Lepers,
        PageType::Forms,
    ];

    #[test]
    fn database_banner_short_circuits_every_scraper() {
        let root = html::parse_string(DATABASE_UNAVAILABLE);
        let config = ResolvedScraperConfig::default();

        for page_type in ALL_PAGE_TYPES {
            let result = page_type.scrape_page(&root, &config, &PageOptions::default());

            match result {
                Err(ScrapeError::SiteFailure(failure)) => {
                    assert_eq!(failure.kind, SiteFailureKind::DatabaseUnavailable, "{page_type:?}");
                    assert!(failure.message.contains("temporarily unavailable"));
                }
                other => panic!("{page_type:?} did not report the banner: {other:?}"),
            }
        }
    }

    #[test]
    fn failed_scrapes_store_nothing() {
        let root = html::parse_string(DATABASE_UNAVAILABLE);
        let mut store = crate::store::MemoryStore::new();

        let scraper = ThreadListScraper::new(&ResolvedScraperConfig::default(), ThreadListShape::Bookmarks);
        assert!(scraper.scrape_into(&root, &mut store).is_err());
        assert_eq!(store.thread_count(), 0);
    }

    #[test]
    fn login_required_is_recognized() {
        let root = html::parse_string(LOGIN_REQUIRED);

        match check_site_failure(&root) {
            Err(ScrapeError::SiteFailure(failure)) => {
                assert_eq!(failure.kind, SiteFailureKind::LoginRequired);
                assert!(failure.message.starts_with("Sorry, you must be"));
            }
            other => panic!("expected login failure, got {other:?}"),
        }
    }

    #[test]
    fn other_error_pages_are_standard_failures() {
        let root = html::parse_string(
            r#"<div class="standarderror"><div class="inner">Invalid thread specified.</div></div>"#,
        );

        match check_site_failure(&root) {
            Err(ScrapeError::SiteFailure(failure)) => {
                assert_eq!(failure.kind, SiteFailureKind::Standard);
                assert_eq!(failure.message, "Invalid thread specified.");
            }
            other => panic!("expected standard failure, got {other:?}"),
        }
    }

    #[test]
    fn database_phrases_outside_error_containers_pass() {
        let root = html::parse_string(
            r#"<html><head><title>GBS - The database is unavailable - The Something Awful Forums</title></head>
<body><h2>The database is unavailable</h2><div class="postbody">what if the database is currently unavailable</div></body></html>"#,
        );

        assert!(check_site_failure(&root).is_ok());
        assert!(PageType::Forms
            .scrape_page(&root, &ResolvedScraperConfig::default(), &PageOptions::default())
            .is_ok());
    }

    #[test]
    fn ordinary_pages_pass() {
        let root = html::parse_string(r#"<html><head><title>GBS - The Something Awful Forums</title></head><body></body></html>"#);

        assert!(check_site_failure(&root).is_ok());
    }
}
