use kuchikiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ResolvedScraperConfig;
use crate::date::CompoundDateParser;
use crate::extract::*;
use crate::html::NodeExt;

use super::*;

static BOOKMARK_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bm(\d)$").unwrap());
static RATING_TITLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\s+votes?\s*-\s*([\d.]+)\s+average").unwrap());
static RATING_IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)stars?$").unwrap());

const THREAD_LIST_SELECTOR: &str = "table#forum, table.threadlist";

/// Which listing the rows come from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ThreadListShape {
    /// One forum's thread list. Without an id, the page's own `data-forum` is used.
    Forum { forum_id: Option<String> },
    /// The account's bookmarked threads, which span forums.
    Bookmarks,
}

pub struct ThreadListScraper {
    shape: ThreadListShape,
    last_post_dates: CompoundDateParser,
}

impl ThreadListScraper {
    pub fn new(config: &ResolvedScraperConfig, shape: ThreadListShape) -> Self {
        Self {
            shape,
            last_post_dates: config.dates.last_post.clone(),
        }
    }

    fn thread_from_row(&self, row: &NodeRef, forum_id: Option<&str>, is_bookmarks_page: bool) -> Option<ThreadSummary> {
        if row.has_class("announcement") || row.first("td.title a.announcement").is_some() {
            skipped("thread row", "announcement");
            return None;
        }

        let title_link = row
            .first("a.thread_title[href]")
            .or_else(|| row.first("td.title a[href*='threadid=']"));

        let id = match title_link
            .as_ref()
            .and_then(|link| link.attr("href"))
            .and_then(|href| numeric_query_param(&href, "threadid"))
        {
            Some(id) => id,
            None => {
                skipped("thread row", "no thread id link");
                return None;
            }
        };

        let title = title_link.map(|link| link.text()).unwrap_or_default();

        let is_sticky = row.has_class("sticky")
            || row
                .first("td.title")
                .map(|cell| cell.has_class("title_sticky"))
                .unwrap_or(false);

        let star_cell = row.first("td.star");
        let star_category = star_cell.as_ref().and_then(|cell| {
            cell.classes().iter().find_map(|class| {
                BOOKMARK_CLASS_REGEX
                    .captures(class)
                    .and_then(|captures| captures[1].parse::<u8>().ok())
                    .filter(|star| *star <= 5)
            })
        });
        let is_bookmarked = if is_bookmarks_page {
            Some(true)
        } else {
            star_cell.map(|_| star_category.is_some())
        };

        let icon_name = |selector: &str| {
            row.first(selector)
                .and_then(|img| img.attr("src"))
                .and_then(|src| icon_image_name(&src))
        };

        let author = row.first("td.author a").map(|link| extract_user_link(&link)).unwrap_or_default();

        let total_replies = row.first("td.replies").and_then(|cell| parse_count(&cell.text()));

        let (rating, rating_votes) = row.first("td.rating img").map(|img| rating_from_image(&img)).unwrap_or_default();

        let last_post = row.first("td.lastpost");
        let last_post_date = last_post
            .as_ref()
            .and_then(|cell| cell.first("div.date"))
            .and_then(|date| self.last_post_dates.parse(&date.text()));
        let last_post_author_username = last_post
            .as_ref()
            .and_then(|cell| cell.first("a.author"))
            .map(|author| author.text())
            .filter(|name| !name.is_empty());

        let last_seen = row.first("div.lastseen");
        let unread_post_count = last_seen.as_ref().map(|seen| {
            seen.first("a.count")
                .and_then(|count| parse_count(&count.text()))
                .unwrap_or(0)
        });

        Some(ThreadSummary {
            id,
            title,
            forum_id: forum_id.map(str::to_owned),
            author_user_id: author.user_id,
            author_username: author.username,
            icon_image_name: icon_name("td.icon img[src]"),
            icon_image_name2: icon_name("td.icon2 img[src]"),
            is_sticky,
            is_closed: row.has_class("closed"),
            is_bookmarked,
            star_category,
            rating,
            rating_votes,
            total_replies,
            has_been_seen: last_seen.is_some(),
            unread_post_count,
            last_post_date,
            last_post_author_username,
        })
    }
}

/// Average rating and vote count from a rating image, e.g. `title="159 votes - 4.79 average"`.
/// Falls back to the star count in the image name. Ratings outside 0 to 5 are dropped.
fn rating_from_image(img: &NodeRef) -> (Option<f32>, Option<u32>) {
    let from_title = img.attr("title").and_then(|title| {
        let captures = RATING_TITLE_REGEX.captures(&title)?;
        let votes = parse_count(&captures[1]);
        let average = captures[2].parse::<f32>().ok()?;

        Some((average, votes))
    });

    let (rating, votes) = match from_title {
        Some((average, votes)) => (Some(average), votes),
        None => {
            let stars = img
                .attr("src")
                .and_then(|src| icon_image_name(&src))
                .and_then(|name| {
                    RATING_IMAGE_REGEX
                        .captures(&name)
                        .and_then(|captures| captures[1].parse::<f32>().ok())
                });

            (stars, None)
        }
    };

    (rating.filter(|rating| (0.0..=5.0).contains(rating)), votes)
}

impl Scraper for ThreadListScraper {
    type Output = ThreadListPage;

    fn scrape(&self, root: &NodeRef) -> Result<ThreadListPage, ScrapeError> {
        check_site_failure(root)?;

        let table = root
            .first(THREAD_LIST_SELECTOR)
            .ok_or_else(|| ScrapeError::MissingContainer("thread list".into()))?;

        let is_bookmarks_page =
            self.shape == ThreadListShape::Bookmarks || root.first("form[name='bookmarks']").is_some();

        let forum_id = match &self.shape {
            ThreadListShape::Forum { forum_id: Some(forum_id) } => Some(forum_id.clone()),
            ThreadListShape::Forum { forum_id: None } if !is_bookmarks_page => body_data(root, "data-forum"),
            _ => None,
        };

        let threads = table
            .all("tr.thread")
            .iter()
            .filter_map(|row| self.thread_from_row(row, forum_id.as_deref(), is_bookmarks_page))
            .collect();

        Ok(ThreadListPage {
            forum_id,
            is_bookmarks_page,
            can_post_new_thread: root.first("a[href*='action=newthread']").is_some(),
            page: extract_page_info(root),
            threads,
        })
    }
}
