use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use super::PageInfo;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub forum_id: Option<String>,
    pub author_user_id: Option<String>,
    pub author_username: Option<String>,
    pub icon_image_name: Option<String>,
    pub icon_image_name2: Option<String>,
    pub is_sticky: bool,
    pub is_closed: bool,
    /// Only known when the page was rendered for a logged-in account.
    pub is_bookmarked: Option<bool>,
    /// Bookmark colour, 0 through 5.
    pub star_category: Option<u8>,
    pub rating: Option<f32>,
    pub rating_votes: Option<u32>,
    pub total_replies: Option<u32>,
    pub has_been_seen: bool,
    pub unread_post_count: Option<u32>,
    pub last_post_date: Option<DateTime<Utc>>,
    pub last_post_author_username: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ThreadListPage {
    pub forum_id: Option<String>,
    pub is_bookmarks_page: bool,
    pub can_post_new_thread: bool,
    pub page: Option<PageInfo>,
    pub threads: Vec<ThreadSummary>,
}
