use crate::model::*;

/// Non-blanking merge of a freshly scraped record onto a stored one.
pub trait Merge {
    fn merge_from(&mut self, scraped: Self);
}

fn merge_option<T>(stored: &mut Option<T>, scraped: Option<T>) {
    if scraped.is_some() {
        *stored = scraped;
    }
}

fn merge_string(stored: &mut String, scraped: String) {
    if !scraped.is_empty() {
        *stored = scraped;
    }
}

fn merge_index(stored: &mut u32, scraped: u32) {
    if scraped != 0 {
        *stored = scraped;
    }
}

impl Merge for UserProfile {
    fn merge_from(&mut self, scraped: Self) {
        merge_option(&mut self.user_id, scraped.user_id);
        merge_option(&mut self.username, scraped.username);
        merge_option(&mut self.about_me_html, scraped.about_me_html);
        merge_option(&mut self.homepage_url, scraped.homepage_url);
        merge_option(&mut self.interests, scraped.interests);
        merge_option(&mut self.location, scraped.location);
        merge_option(&mut self.occupation, scraped.occupation);
        if scraped.gender.is_known() {
            self.gender = scraped.gender;
        }
        merge_option(&mut self.regdate, scraped.regdate);
        merge_option(&mut self.last_post_date, scraped.last_post_date);
        merge_option(&mut self.post_count, scraped.post_count);
        merge_option(&mut self.post_rate, scraped.post_rate);
        merge_option(&mut self.aim_name, scraped.aim_name);
        merge_option(&mut self.icq_name, scraped.icq_name);
        merge_option(&mut self.yahoo_name, scraped.yahoo_name);
        merge_option(&mut self.avatar_url, scraped.avatar_url);
        merge_option(&mut self.custom_title_html, scraped.custom_title_html);
        merge_option(&mut self.is_administrator, scraped.is_administrator);
        merge_option(&mut self.is_moderator, scraped.is_moderator);
        merge_option(&mut self.can_receive_private_messages, scraped.can_receive_private_messages);
    }
}

impl Merge for ThreadSummary {
    fn merge_from(&mut self, scraped: Self) {
        merge_string(&mut self.title, scraped.title);
        merge_option(&mut self.forum_id, scraped.forum_id);
        merge_option(&mut self.author_user_id, scraped.author_user_id);
        merge_option(&mut self.author_username, scraped.author_username);
        merge_option(&mut self.icon_image_name, scraped.icon_image_name);
        merge_option(&mut self.icon_image_name2, scraped.icon_image_name2);
        self.is_sticky = scraped.is_sticky;
        self.is_closed = scraped.is_closed;
        merge_option(&mut self.is_bookmarked, scraped.is_bookmarked);
        merge_option(&mut self.star_category, scraped.star_category);
        merge_option(&mut self.rating, scraped.rating);
        merge_option(&mut self.rating_votes, scraped.rating_votes);
        merge_option(&mut self.total_replies, scraped.total_replies);
        self.has_been_seen = scraped.has_been_seen;
        merge_option(&mut self.unread_post_count, scraped.unread_post_count);
        merge_option(&mut self.last_post_date, scraped.last_post_date);
        merge_option(&mut self.last_post_author_username, scraped.last_post_author_username);
    }
}

impl Merge for PostRecord {
    fn merge_from(&mut self, scraped: Self) {
        merge_option(&mut self.thread_id, scraped.thread_id);
        merge_index(&mut self.thread_index, scraped.thread_index);
        merge_index(&mut self.filtered_thread_index, scraped.filtered_thread_index);
        self.author = scraped.author;
        merge_option(&mut self.post_date, scraped.post_date);
        merge_string(&mut self.inner_html, scraped.inner_html);
        merge_option(&mut self.edit, scraped.edit);
        self.editable = scraped.editable;
        self.been_seen = scraped.been_seen;
        self.is_ignored = scraped.is_ignored;
        merge_option(&mut self.attachment_id, scraped.attachment_id);
    }
}

impl Merge for PrivateMessage {
    fn merge_from(&mut self, scraped: Self) {
        merge_string(&mut self.subject, scraped.subject);
        self.from = scraped.from;
        merge_option(&mut self.sent_date, scraped.sent_date);
        self.seen = scraped.seen;
        self.replied = scraped.replied;
        self.forwarded = scraped.forwarded;
        merge_string(&mut self.inner_html, scraped.inner_html);
    }
}

impl Merge for MessageSummary {
    fn merge_from(&mut self, scraped: Self) {
        merge_string(&mut self.subject, scraped.subject);
        merge_option(&mut self.from_user_id, scraped.from_user_id);
        merge_option(&mut self.from_username, scraped.from_username);
        merge_option(&mut self.sent_date, scraped.sent_date);
        self.seen = scraped.seen;
        self.replied = scraped.replied;
        self.forwarded = scraped.forwarded;
        merge_option(&mut self.icon_image_url, scraped.icon_image_url);
        merge_option(&mut self.icon_image_name, scraped.icon_image_name);
    }
}

impl Merge for Punishment {
    fn merge_from(&mut self, scraped: Self) {
        if scraped.kind != PunishmentKind::Unknown {
            self.kind = scraped.kind;
        }
        merge_option(&mut self.date, scraped.date);
        merge_option(&mut self.moderator, scraped.moderator);
        merge_option(&mut self.admin, scraped.admin);
        merge_string(&mut self.reason_html, scraped.reason_html);
        merge_option(&mut self.post_id, scraped.post_id);
    }
}

impl Merge for Category {
    /// Categories are rebuilt whole from each forum list, so the scraped tree replaces the stored one.
    fn merge_from(&mut self, scraped: Self) {
        merge_string(&mut self.name, scraped.name);
        self.index = scraped.index;
        self.forums = scraped.forums;
    }
}
