use kuchikiki::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{DateParsers, ResolvedScraperConfig};
use crate::extract::*;
use crate::html::NodeExt;
use crate::location::ThreadPageLocator;

use super::*;

static EDITED_BY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<editor>.+?) fucked around with this message at (?P<date>.+?)$").unwrap());
static POST_ANCHOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^post(\d+)$").unwrap());

const POST_SELECTOR: &str = "table.post";

/// What the request for this page asked for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PostsPageContext {
    /// Known thread id, used when the page doesn't carry one itself.
    pub thread_id: Option<String>,
    pub locator: ThreadPageLocator,
    /// User id the page was filtered to, if any.
    pub author_filter: Option<String>,
    /// Post id from the fragment of the URL the forums redirected a "first unread" request to.
    pub anchor_post_id: Option<String>,
}

pub struct PostsPageScraper {
    context: PostsPageContext,
    dates: DateParsers,
    posts_per_page: u32,
}

/// A post container with the per-post values that only make sense once all posts are known.
struct RawPost {
    node: NodeRef,
    position: usize,
    explicit_index: Option<u32>,
}

impl PostsPageScraper {
    pub fn new(config: &ResolvedScraperConfig, context: PostsPageContext) -> Self {
        Self {
            context,
            dates: config.dates.clone(),
            posts_per_page: config.posts_per_page,
        }
    }

    fn post_from_node(&self, raw: &RawPost, thread_id: Option<&str>, indices: (u32, u32)) -> Option<PostRecord> {
        let node = &raw.node;
        let body = node.first("div.complete_shit").or_else(|| node.first("td.postbody"));

        let id = match post_id(node) {
            Some(id) => id,
            None => {
                skipped("post", "no post id anchor");
                return None;
            }
        };

        let author = extract_author(node, &self.dates.regdate).unwrap_or_default();

        let post_date = node
            .first("td.postdate")
            .and_then(|cell| cell.last_text_child())
            .and_then(|text| self.dates.post_date.parse(&text));

        let edit = node
            .first("p.editedby")
            .and_then(|marker| post_edit(&marker.text(), &self.dates));

        let attachment_id = node
            .first("img[src*='attachment.php'], a[href*='attachment.php']")
            .and_then(|attachment| attachment.attr("src").or_else(|| attachment.attr("href")))
            .and_then(|href| numeric_query_param(&href, "attachmentid").or_else(|| numeric_query_param(&href, "postid")));

        let (thread_index, filtered_thread_index) = indices;

        Some(PostRecord {
            id,
            thread_id: thread_id.map(str::to_owned),
            thread_index,
            filtered_thread_index,
            author,
            post_date,
            inner_html: body.map(|body| cleaned_body_html(&body)).unwrap_or_default(),
            edit,
            editable: node.first("ul.postbuttons a[href*='editpost.php']").is_some(),
            been_seen: node.first("tr.seen1, tr.seen2").is_some(),
            is_ignored: node.has_class("ignored"),
            attachment_id,
        })
    }

    /// Thread-wide and author-filtered indices for every post container on the page.
    fn indices(&self, raw_posts: &[RawPost], page_number: Option<u32>) -> Vec<(u32, u32)> {
        // Offsets that overflow leave the index unknown.
        let page_offset = page_number.and_then(|page| page.saturating_sub(1).checked_mul(self.posts_per_page));

        // Index of the first post, from the first container that states its own.
        let first_known = raw_posts
            .iter()
            .find_map(|raw| raw.explicit_index.map(|index| index as i64 - raw.position as i64));

        raw_posts
            .iter()
            .map(|raw| {
                let counted = page_offset.and_then(|offset| {
                    u32::try_from(raw.position)
                        .ok()
                        .and_then(|position| offset.checked_add(position))
                        .and_then(|index| index.checked_add(1))
                });

                if self.context.author_filter.is_some() {
                    (raw.explicit_index.unwrap_or(0), counted.unwrap_or(0))
                } else {
                    let thread_index = raw
                        .explicit_index
                        .or_else(|| {
                            first_known
                                .map(|first| first + raw.position as i64)
                                .filter(|index| *index >= 1)
                                .and_then(|index| u32::try_from(index).ok())
                        })
                        .or(counted)
                        .unwrap_or(0);

                    (thread_index, 0)
                }
            })
            .collect()
    }
}

/// Post id from the container's own `id="postN"`, then the permalink anchor in the post
/// date, then the post's buttons. Body and author links point elsewhere and are never read.
fn post_id(post: &NodeRef) -> Option<String> {
    let anchor_id = |value: &str| {
        POST_ANCHOR_REGEX
            .captures(value.trim())
            .map(|captures| captures[1].to_owned())
    };

    if let Some(id) = post.attr("id").and_then(|id| anchor_id(&id)) {
        return Some(id);
    }

    let permalinks = post.all("td.postdate a");
    let buttons = post.all("td.postdate a[href], ul.postbuttons a[href]");

    permalinks
        .iter()
        .find_map(|a| a.attr("name").and_then(|name| anchor_id(&name)))
        .or_else(|| {
            permalinks
                .iter()
                .find_map(|a| a.attr("href").and_then(|href| fragment(&href)).and_then(|f| anchor_id(&f)))
        })
        .or_else(|| {
            buttons
                .iter()
                .find_map(|a| a.attr("href").and_then(|href| numeric_query_param(&href, "postid")))
        })
}

/// Edit marker from the text of `p.editedby`. Blank markers are not edits.
fn post_edit(text: &str, dates: &DateParsers) -> Option<PostEdit> {
    if text.is_empty() {
        return None;
    }

    Some(match EDITED_BY_REGEX.captures(text) {
        Some(captures) => PostEdit {
            editor_username: Some(captures["editor"].trim().to_owned()),
            date: dates.edit_date.parse(&captures["date"]),
        },
        None => PostEdit::default(),
    })
}

/// Body markup as written, minus `p.editedby` paragraphs that hold no text.
fn cleaned_body_html(body: &NodeRef) -> String {
    body.children()
        .filter(|child| !(child.matches("p.editedby") && child.text().is_empty()))
        .map(|child| child.to_string())
        .collect()
}

impl Scraper for PostsPageScraper {
    type Output = PostsPage;

    fn scrape(&self, root: &NodeRef) -> Result<PostsPage, ScrapeError> {
        check_site_failure(root)?;

        let containers = root.all(POST_SELECTOR);

        if containers.is_empty() && root.first("div#thread").is_none() {
            return Err(ScrapeError::MissingContainer("thread posts".into()));
        }

        let breadcrumb = root.first("div.breadcrumbs a.bclast").or_else(|| root.first("a.bclast"));

        let thread_id = self
            .context
            .thread_id
            .clone()
            .or_else(|| body_data(root, "data-thread"))
            .or_else(|| {
                breadcrumb
                    .as_ref()
                    .and_then(|link| link.attr("href"))
                    .and_then(|href| numeric_query_param(&href, "threadid"))
            });

        let page = extract_page_info(root);
        let page_number = page.map(|page| page.page_number).or(match self.context.locator {
            ThreadPageLocator::Page(page_number) => Some(page_number),
            _ => None,
        });

        let raw_posts: Vec<RawPost> = containers
            .into_iter()
            .enumerate()
            .map(|(position, node)| RawPost {
                explicit_index: node.attr("data-idx").and_then(|idx| idx.trim().parse().ok()),
                node,
                position,
            })
            .collect();

        let indices = self.indices(&raw_posts, page_number);

        let posts: Vec<PostRecord> = raw_posts
            .iter()
            .zip(indices)
            .filter_map(|(raw, indices)| self.post_from_node(raw, thread_id.as_deref(), indices))
            .collect();

        let first_unread_index = match self.context.locator {
            ThreadPageLocator::FirstUnread => match &self.context.anchor_post_id {
                Some(anchor) => {
                    let anchor = anchor.trim_start_matches('#').trim_start_matches("post");
                    posts.iter().position(|post| post.id == anchor)
                }
                None => posts.iter().position(|post| !post.been_seen),
            },
            _ => None,
        };

        let thread_bookmarked = root.first("img.thread_bookmark").map(|img| img.has_class("unbookmark"));

        Ok(PostsPage {
            thread_id,
            thread_title: breadcrumb.map(|link| link.text()).filter(|title| !title.is_empty()),
            forum_id: body_data(root, "data-forum"),
            thread_closed: root.first("ul.postbuttons img[src*='closed']").is_some(),
            thread_bookmarked,
            author_filter: self.context.author_filter.clone(),
            page,
            posts,
            first_unread_index,
            advertisement_html: root
                .first("#ad_banner_user a")
                .map(|ad| ad.outer_html())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use crate::html;
    use crate::store::MemoryStore;

    use super::*;

    const AD_HTML: &'static str = r#"<a href="https://www.example.com/ad?id=1" target="_blank"><img src="https://fi.somethingawful.com/ads/banner.gif" alt=""></a>"#;

    fn post_table(id: Option<u32>, username: &str, seen: bool, body: &str) -> String {
        let seen_class = if seen { "seen1" } else { "altcolor1" };
        let (anchor, links) = match id {
            Some(id) => (
                format!(r##"<a href="#post{id}" title="Link to this post">#</a>"##),
                format!(
                    r#"<li><a href="newreply.php?action=newreply&amp;postid={id}">Quote</a></li><li><a href="editpost.php?action=editpost&amp;postid={id}">Edit</a></li>"#
                ),
            ),
            None => (String::new(), String::new()),
        };

        format!(
            r#"<table class="post" data-idx="{idx}"{id_attr}>
<tr class="{seen_class}">
    <td class="userinfo userid-{user_id}"><dl class="userinfo"><dt class="author">{username}</dt><dd class="registered">Feb 26, 2004</dd></dl></td>
    <td class="postbody">{body}</td>
</tr>
<tr class="{seen_class}">
    <td class="postdate">{anchor} Mar 14, 2015 21:26</td>
    <td class="postlinks"><ul class="postbuttons">{links}</ul></td>
</tr>
</table>"#,
            idx = id.unwrap_or(0) % 100,
            id_attr = id.map(|id| format!(r#" id="post{id}""#)).unwrap_or_default(),
            user_id = id.unwrap_or(0) + 1000,
        )
    }

    fn thread_page(posts: &str) -> String {
        format!(
            r#"<html><body data-thread="3550424" data-forum="46">
<div class="breadcrumbs"><a href="forumdisplay.php?forumid=46">Debate &amp; Discussion</a> &gt; <a class="bclast" href="showthread.php?threadid=3550424">Fixture thread</a></div>
<div class="pages" data-current-page="2" data-total-pages="5"></div>
<div id="ad_banner_user">{AD_HTML}</div>
<div id="thread">{posts}</div>
</body></html>"#
        )
    }

    fn three_posts() -> String {
        let posts = [
            post_table(Some(411), "alpha", true, "First!"),
            post_table(None, "beta", true, "<b>lost</b>"),
            post_table(
                Some(413),
                "gamma",
                false,
                r#"Third <i>post</i><p class="editedby"><span>gamma fucked around with this message at 18:20 on Jan 11, 2013</span></p>"#,
            ),
        ];

        thread_page(&posts.concat())
    }

    #[test]
    fn posts_without_ids_are_skipped() {
        let root = html::parse_string(&three_posts());

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].id, "411");
        assert_eq!(page.posts[1].id, "413");
        assert_eq!(page.advertisement_html, html::normalize_fragment(AD_HTML));
        assert_eq!(page.first_unread_index, None);

        assert_eq!(page.thread_id.as_deref(), Some("3550424"));
        assert_eq!(page.forum_id.as_deref(), Some("46"));
        assert_eq!(page.thread_title.as_deref(), Some("Fixture thread"));
        assert_eq!(page.page.map(|p| p.page_number), Some(2));
        assert!(page.posts.iter().all(|p| p.thread_id.as_deref() == Some("3550424")));
    }

    #[test]
    fn post_fields() {
        let root = html::parse_string(&three_posts());

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();
        let first = &page.posts[0];
        let third = &page.posts[1];

        assert_eq!(first.inner_html, "First!");
        assert_eq!(first.author.username.as_deref(), Some("alpha"));
        assert_eq!(first.author.user_id.as_deref(), Some("1411"));
        assert_eq!(first.thread_index, 11);
        assert_eq!(first.filtered_thread_index, 0);
        assert!(first.editable);
        assert!(first.been_seen);
        assert_eq!(first.edit, None);

        let date = first.post_date.unwrap();
        assert_eq!((date.year(), date.month(), date.day(), date.hour()), (2015, 3, 14, 21));

        assert!(!third.been_seen);
        assert!(third.inner_html.starts_with("Third <i>post</i>"));
        let edit = third.edit.as_ref().unwrap();
        assert_eq!(edit.editor_username.as_deref(), Some("gamma"));
        assert_eq!(edit.date.map(|d| (d.year(), d.hour(), d.minute())), Some((2013, 18, 20)));
    }

    #[test]
    fn empty_edit_markers_are_removed() {
        let posts = post_table(Some(500), "delta", true, r#"Body<p class="editedby"> </p>"#);
        let root = html::parse_string(&thread_page(&posts));

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert_eq!(page.posts[0].edit, None);
        assert_eq!(page.posts[0].inner_html, "Body");
    }

    #[test]
    fn quote_links_in_bodies_are_not_post_ids() {
        let body = r#"<div class="bbc-block"><h4><a class="quote_link" href="showthread.php?goto=post&amp;postid=999">alpha posted:</a></h4></div>"#;
        let posts = [post_table(None, "beta", true, body), post_table(Some(412), "gamma", true, "ok")];
        let root = html::parse_string(&thread_page(&posts.concat()));

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].id, "412");
    }

    #[test]
    fn first_unread_by_anchor_or_first_unseen() {
        let root = html::parse_string(&three_posts());

        let anchored = PostsPageScraper::new(
            &ResolvedScraperConfig::default(),
            PostsPageContext {
                locator: ThreadPageLocator::FirstUnread,
                anchor_post_id: Some("#post413".to_owned()),
                ..Default::default()
            },
        )
        .scrape(&root)
        .unwrap();
        assert_eq!(anchored.first_unread_index, Some(1));

        let unseen = PostsPageScraper::new(
            &ResolvedScraperConfig::default(),
            PostsPageContext {
                locator: ThreadPageLocator::FirstUnread,
                ..Default::default()
            },
        )
        .scrape(&root)
        .unwrap();
        assert_eq!(unseen.first_unread_index, Some(1));
    }

    #[test]
    fn indices_without_data_idx() {
        let posts = [
            post_table(Some(1), "a", true, "one").replace(r#" data-idx="1""#, ""),
            post_table(Some(2), "b", true, "two").replace(r#" data-idx="2""#, ""),
        ];
        let root = html::parse_string(&thread_page(&posts.concat()));

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();
        assert_eq!(
            page.posts.iter().map(|p| p.thread_index).collect::<Vec<_>>(),
            vec![41, 42]
        );

        let filtered = PostsPageScraper::new(
            &ResolvedScraperConfig::default(),
            PostsPageContext {
                author_filter: Some("1001".to_owned()),
                ..Default::default()
            },
        )
        .scrape(&root)
        .unwrap();
        assert_eq!(
            filtered.posts.iter().map(|p| (p.thread_index, p.filtered_thread_index)).collect::<Vec<_>>(),
            vec![(0, 41), (0, 42)]
        );
        assert_eq!(filtered.author_filter.as_deref(), Some("1001"));
    }

    #[test]
    fn container_id_wins_over_links_in_the_custom_title() {
        let title = r#"<dd class="title"><a href="showthread.php?goto=post&amp;postid=999">my best post</a></dd>"#;
        let posts = post_table(Some(411), "alpha", true, "Hi").replace(
            r#"<dd class="registered">"#,
            &format!(r#"{title}<dd class="registered">"#),
        );
        let root = html::parse_string(&thread_page(&posts));

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].id, "411");
    }

    #[test]
    fn custom_title_links_are_not_post_ids() {
        let title = r#"<dd class="title"><a href="showthread.php?goto=post&amp;postid=999">my best post</a></dd>"#;
        let posts = post_table(None, "beta", true, "Hi").replace(
            r#"<dd class="registered">"#,
            &format!(r#"{title}<dd class="registered">"#),
        );
        let root = html::parse_string(&thread_page(&posts));

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert!(page.posts.is_empty());
    }

    #[test]
    fn huge_page_numbers_leave_indices_unknown() {
        let posts = [
            post_table(Some(1), "a", true, "one").replace(r#" data-idx="1""#, ""),
            post_table(Some(2), "b", true, "two").replace(r#" data-idx="2""#, ""),
        ];
        let page_html =
            thread_page(&posts.concat()).replace(r#"data-current-page="2""#, r#"data-current-page="200000000""#);
        let root = html::parse_string(&page_html);

        let page = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape(&root)
            .unwrap();

        assert_eq!(page.posts.len(), 2);
        assert!(page.posts.iter().all(|p| p.thread_index == 0));
    }

    #[test]
    fn posts_and_authors_reach_the_store() {
        let root = html::parse_string(&three_posts());
        let mut store = MemoryStore::new();

        PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default())
            .scrape_into(&root, &mut store)
            .unwrap();

        assert_eq!(store.post_count(), 2);
        assert!(store.post("411").is_some());
        assert_eq!(store.users().len(), 2);
        assert!(store.user_by_id("1413").unwrap().regdate.is_some());
    }

    #[test]
    fn pages_without_posts_are_a_scrape_wide_error() {
        let root = html::parse_string("<html><body><p>Nope</p></body></html>");

        let result = PostsPageScraper::new(&ResolvedScraperConfig::default(), PostsPageContext::default()).scrape(&root);

        assert!(matches!(result, Err(ScrapeError::MissingContainer(_))));
    }
}
