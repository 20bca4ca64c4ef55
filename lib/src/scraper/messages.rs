use chrono::{DateTime, Utc};
use kuchikiki::NodeRef;

use crate::config::{DateParsers, ResolvedScraperConfig};
use crate::extract::*;
use crate::html::NodeExt;

use super::*;

const FOLDER_TABLE_SELECTOR: &str = "table.standard";

/// Seen, replied and forwarded flags from a message status image such as `newpm.gif`.
/// Without an image nothing is known, so all three are false.
fn status_flags(img_src: Option<&str>) -> (bool, bool, bool) {
    match img_src.and_then(icon_image_name) {
        Some(name) => (
            !name.contains("newpm"),
            name.contains("replied"),
            name.contains("forwarded"),
        ),
        None => (false, false, false),
    }
}

pub struct MessageFolderScraper {
    dates: DateParsers,
}

impl MessageFolderScraper {
    pub fn new(config: &ResolvedScraperConfig) -> Self {
        Self {
            dates: config.dates.clone(),
        }
    }

    fn parse_date(&self, text: &str) -> Option<DateTime<Utc>> {
        self.dates.sent_date.parse(text).or_else(|| self.dates.post_date.parse(text))
    }

    fn summary_from_row(&self, row: &NodeRef) -> Option<MessageSummary> {
        let link = row.first("td.title a[href*='privatemessageid=']");

        let id = match link
            .as_ref()
            .and_then(|link| link.attr("href"))
            .and_then(|href| numeric_query_param(&href, "privatemessageid"))
        {
            Some(id) => id,
            None => {
                skipped("message row", "no message id");
                return None;
            }
        };

        let sender = row.first("td.sender");
        let sender_link = sender.as_ref().and_then(|cell| cell.first("a[href*='userid=']"));
        let (from_user_id, from_username) = match (&sender, sender_link) {
            (_, Some(link)) => {
                let user = extract_user_link(&link);
                (user.user_id, user.username)
            }
            (Some(cell), None) => (None, Some(cell.text()).filter(|name| !name.is_empty())),
            (None, None) => (None, None),
        };

        let status_src = row.first("td.status img[src]").and_then(|img| img.attr("src"));
        let (seen, replied, forwarded) = status_flags(status_src.as_deref());

        let icon_image_url = row
            .first("td.icon img[src]")
            .and_then(|img| img.attr("src"))
            .map(|src| src.trim().to_owned())
            .filter(|src| !src.is_empty());

        Some(MessageSummary {
            id,
            subject: link.map(|link| link.text()).unwrap_or_default(),
            from_user_id,
            from_username,
            sent_date: row.first("td.date").and_then(|cell| self.parse_date(&cell.text())),
            seen,
            replied,
            forwarded,
            icon_image_name: icon_image_url.as_deref().and_then(icon_image_name),
            icon_image_url,
        })
    }
}

impl Scraper for MessageFolderScraper {
    type Output = MessageFolder;

    fn scrape(&self, root: &NodeRef) -> Result<MessageFolder, ScrapeError> {
        check_site_failure(root)?;

        let table = root
            .first(FOLDER_TABLE_SELECTOR)
            .ok_or_else(|| ScrapeError::MissingContainer("message list".into()))?;

        let messages = table
            .all("tbody tr")
            .iter()
            .filter(|row| row.first("td").is_some())
            .filter_map(|row| self.summary_from_row(row))
            .collect();

        let folder_options: Vec<(Folder, bool)> = root
            .all("select[name='folderid'] option[value]")
            .iter()
            .filter_map(|option| {
                let id = option.attr("value")?.trim().to_owned();

                if id.is_empty() {
                    return None;
                }

                Some((Folder { id, name: option.text() }, option.attr("selected").is_some()))
            })
            .collect();

        Ok(MessageFolder {
            folder: folder_options
                .iter()
                .find(|(_, selected)| *selected)
                .map(|(folder, _)| folder.clone()),
            all_folders: folder_options.into_iter().map(|(folder, _)| folder).collect(),
            is_showing_last_fifty: root.first("div.pmwarn a[href*='showall']").is_some(),
            messages,
        })
    }
}

pub struct PrivateMessageScraper {
    dates: DateParsers,
}

impl PrivateMessageScraper {
    pub fn new(config: &ResolvedScraperConfig) -> Self {
        Self {
            dates: config.dates.clone(),
        }
    }
}

impl Scraper for PrivateMessageScraper {
    type Output = PrivateMessage;

    fn scrape(&self, root: &NodeRef) -> Result<PrivateMessage, ScrapeError> {
        check_site_failure(root)?;

        let container = root
            .first("table.post")
            .ok_or_else(|| ScrapeError::EntityNotFound("private message".into()))?;

        let id = root
            .first("div.buttons a[href*='privatemessageid=']")
            .and_then(|link| link.attr("href"))
            .and_then(|href| numeric_query_param(&href, "privatemessageid"))
            .or_else(|| {
                root.first("input[name='privatemessageid']")
                    .and_then(|input| input.attr("value"))
                    .map(|value| value.trim().to_owned())
                    .filter(|value| !value.is_empty())
            })
            .ok_or_else(|| ScrapeError::EntityNotFound("private message id".into()))?;

        // The breadcrumbs end with "Private Messages > Inbox > Subject".
        let subject = root
            .first("div.breadcrumbs b")
            .map(|crumbs| crumbs.text())
            .and_then(|crumbs| crumbs.rsplit('>').next().map(|s| s.trim().to_owned()))
            .unwrap_or_default();

        let postdate = container.first("td.postdate");
        let status_src = postdate
            .as_ref()
            .and_then(|cell| cell.first("img[src]"))
            .and_then(|img| img.attr("src"));
        let (seen, replied, forwarded) = status_flags(status_src.as_deref());

        let sent_date = postdate.and_then(|cell| cell.last_text_child()).and_then(|text| {
            self.dates
                .post_date
                .parse(&text)
                .or_else(|| self.dates.sent_date.parse(&text))
        });

        Ok(PrivateMessage {
            id,
            subject,
            from: extract_author(&container, &self.dates.regdate).unwrap_or_default(),
            sent_date,
            seen,
            replied,
            forwarded,
            inner_html: container
                .first("td.postbody")
                .map(|body| body.inner_html())
                .unwrap_or_default(),
        })
    }
}

/// Number of unread messages listed on the inbox page.
pub struct UnreadMessageCountScraper;

impl Scraper for UnreadMessageCountScraper {
    type Output = u32;

    fn scrape(&self, root: &NodeRef) -> Result<u32, ScrapeError> {
        check_site_failure(root)?;

        let table = root
            .first(FOLDER_TABLE_SELECTOR)
            .ok_or_else(|| ScrapeError::MissingContainer("message list".into()))?;

        Ok(table.all("td.status img[src*='newpm']").len() as u32)
    }
}
