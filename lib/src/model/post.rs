use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use super::{AuthorInfo, PageInfo};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PostEdit {
    pub editor_username: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub thread_id: Option<String>,
    /// 1-based position within the whole thread, 0 when unknown.
    pub thread_index: u32,
    /// 1-based position among one author's posts when the page was filtered to them, 0 otherwise.
    pub filtered_thread_index: u32,
    pub author: AuthorInfo,
    pub post_date: Option<DateTime<Utc>>,
    pub inner_html: String,
    pub edit: Option<PostEdit>,
    pub editable: bool,
    pub been_seen: bool,
    pub is_ignored: bool,
    pub attachment_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PostsPage {
    pub thread_id: Option<String>,
    pub thread_title: Option<String>,
    pub forum_id: Option<String>,
    pub thread_closed: bool,
    pub thread_bookmarked: Option<bool>,
    pub author_filter: Option<String>,
    pub page: Option<PageInfo>,
    pub posts: Vec<PostRecord>,
    /// Position in `posts` of the first unread post. Only set for "first unread" requests.
    pub first_unread_index: Option<usize>,
    pub advertisement_html: String,
}
