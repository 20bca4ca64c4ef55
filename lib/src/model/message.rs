use chrono::{DateTime, Utc};
use serde_derive::Serialize;

use super::AuthorInfo;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MessageSummary {
    pub id: String,
    pub subject: String,
    pub from_user_id: Option<String>,
    pub from_username: Option<String>,
    pub sent_date: Option<DateTime<Utc>>,
    pub seen: bool,
    pub replied: bool,
    pub forwarded: bool,
    pub icon_image_url: Option<String>,
    pub icon_image_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MessageFolder {
    pub folder: Option<Folder>,
    pub all_folders: Vec<Folder>,
    /// The forums only list the latest fifty messages until asked to show all of them.
    pub is_showing_last_fifty: bool,
    pub messages: Vec<MessageSummary>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PrivateMessage {
    pub id: String,
    pub subject: String,
    pub from: AuthorInfo,
    pub sent_date: Option<DateTime<Utc>>,
    pub seen: bool,
    pub replied: bool,
    pub forwarded: bool,
    pub inner_html: String,
}
