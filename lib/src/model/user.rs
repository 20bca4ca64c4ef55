use chrono::{DateTime, Utc};
use serde_derive::Serialize;

/// Identity of a user as linked from somewhere on a page. At least one half is known.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct UserRef {
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl UserRef {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.username.is_none()
    }
}

/// Everything the sidebar next to a post (or a profile header) says about its author.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AuthorInfo {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub regdate: Option<DateTime<Utc>>,
    pub custom_title_html: Option<String>,
    pub avatar_url: Option<String>,
    pub is_administrator: bool,
    pub is_moderator: bool,
    pub is_original_poster: bool,
    pub can_receive_private_messages: Option<bool>,
}

impl AuthorInfo {
    pub fn user_ref(&self) -> UserRef {
        UserRef {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }

    /// Partial profile carrying only what the author block showed, for upserting.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            regdate: self.regdate,
            custom_title_html: self.custom_title_html.clone(),
            avatar_url: self.avatar_url.clone(),
            is_administrator: Some(self.is_administrator),
            is_moderator: Some(self.is_moderator),
            can_receive_private_messages: self.can_receive_private_messages,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    /// The forums' own "prefer not to say" choice, which it words as "porpoise".
    Unspecified,
    Other(String),
    /// The page did not say at all.
    #[default]
    Unknown,
}

impl Gender {
    /// Map the word following "claims to be a" on a profile.
    pub fn from_claim(claim: &str) -> Self {
        let claim = claim.trim().trim_end_matches('.').trim();

        match claim.to_lowercase().as_str() {
            "" => Self::Unknown,
            "male" | "man" | "he" => Self::Male,
            "female" | "woman" | "she" => Self::Female,
            "porpoise" => Self::Unspecified,
            _ => Self::Other(claim.to_owned()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub about_me_html: Option<String>,
    pub homepage_url: Option<String>,
    pub interests: Option<String>,
    pub location: Option<String>,
    pub occupation: Option<String>,
    pub gender: Gender,
    pub regdate: Option<DateTime<Utc>>,
    pub last_post_date: Option<DateTime<Utc>>,
    pub post_count: Option<u32>,
    pub post_rate: Option<String>,
    pub aim_name: Option<String>,
    pub icq_name: Option<String>,
    pub yahoo_name: Option<String>,
    pub avatar_url: Option<String>,
    pub custom_title_html: Option<String>,
    /// Only known from pages that render the user's author block.
    pub is_administrator: Option<bool>,
    pub is_moderator: Option<bool>,
    pub can_receive_private_messages: Option<bool>,
}
