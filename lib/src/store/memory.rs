use std::collections::BTreeMap;

use tracing::trace;

use crate::model::*;

use super::*;

/// Record store backed by plain collections, keyed the same way a database would be.
#[derive(Debug, Default)]
pub struct MemoryStore {
    categories: Vec<Category>,
    threads: BTreeMap<String, ThreadSummary>,
    posts: BTreeMap<String, PostRecord>,
    users: Vec<UserProfile>,
    messages: BTreeMap<String, PrivateMessage>,
    message_summaries: BTreeMap<String, MessageSummary>,
    punishments: Vec<Punishment>,
}

fn upsert_keyed<T: Merge>(map: &mut BTreeMap<String, T>, key: &str, record: T) {
    match map.get_mut(key) {
        Some(stored) => stored.merge_from(record),
        None => {
            map.insert(key.to_owned(), record);
        }
    }
}

fn same_user(a: &UserRef, b: &UserRef) -> bool {
    match (&a.user_id, &b.user_id) {
        (Some(a_id), Some(b_id)) => a_id == b_id,
        _ => a.username.is_some() && a.username == b.username,
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn thread(&self, id: &str) -> Option<&ThreadSummary> {
        self.threads.get(id)
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn post(&self, id: &str) -> Option<&PostRecord> {
        self.posts.get(id)
    }

    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.user_id.as_deref() == Some(user_id))
    }

    pub fn user_by_name(&self, username: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.username.as_deref() == Some(username))
    }

    pub fn message(&self, id: &str) -> Option<&PrivateMessage> {
        self.messages.get(id)
    }

    pub fn message_summary(&self, id: &str) -> Option<&MessageSummary> {
        self.message_summaries.get(id)
    }

    pub fn punishments(&self) -> &[Punishment] {
        &self.punishments
    }
}

impl RecordStore for MemoryStore {
    fn upsert_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(stored) => stored.merge_from(category),
            None => self.categories.push(category),
        }
    }

    fn upsert_thread(&mut self, thread: ThreadSummary) {
        let id = thread.id.clone();
        upsert_keyed(&mut self.threads, &id, thread);
    }

    fn upsert_post(&mut self, post: PostRecord) {
        let id = post.id.clone();
        upsert_keyed(&mut self.posts, &id, post);
    }

    /// Users are matched by id. A user known only by name matches on the name instead, so two
    /// accounts that have shared a username over time can end up merged.
    fn upsert_user(&mut self, user: UserProfile) {
        let key = UserRef {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
        };

        if key.is_empty() {
            trace!("Not storing user with neither id nor name");
            return;
        }

        let existing = self.users.iter_mut().find(|stored| {
            let stored_key = UserRef {
                user_id: stored.user_id.clone(),
                username: stored.username.clone(),
            };

            same_user(&stored_key, &key)
        });

        match existing {
            Some(stored) => stored.merge_from(user),
            None => self.users.push(user),
        }
    }

    fn upsert_message(&mut self, message: PrivateMessage) {
        let id = message.id.clone();
        upsert_keyed(&mut self.messages, &id, message);
    }

    fn upsert_message_summary(&mut self, summary: MessageSummary) {
        let id = summary.id.clone();
        upsert_keyed(&mut self.message_summaries, &id, summary);
    }

    fn upsert_punishment(&mut self, punishment: Punishment) {
        let existing = self.punishments.iter_mut().find(|stored| {
            same_user(&stored.jerk, &punishment.jerk)
                && stored.date == punishment.date
                && stored.post_id == punishment.post_id
        });

        match existing {
            Some(stored) => stored.merge_from(punishment),
            None => self.punishments.push(punishment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upserting_never_blanks_known_values() {
        let mut store = MemoryStore::new();

        store.upsert_user(UserProfile {
            user_id: Some("27691".to_owned()),
            username: Some("carry on then".to_owned()),
            location: Some("Here".to_owned()),
            gender: Gender::Female,
            ..Default::default()
        });

        store.upsert_user(UserProfile {
            user_id: Some("27691".to_owned()),
            post_count: Some(99),
            ..Default::default()
        });

        assert_eq!(store.users().len(), 1);

        let user = store.user_by_id("27691").unwrap();
        assert_eq!(user.username.as_deref(), Some("carry on then"));
        assert_eq!(user.location.as_deref(), Some("Here"));
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.post_count, Some(99));
    }

    #[test]
    fn username_only_users_merge_into_known_ones() {
        let mut store = MemoryStore::new();

        store.upsert_user(UserProfile {
            username: Some("Nobody".to_owned()),
            location: Some("Nowhere".to_owned()),
            ..Default::default()
        });
        store.upsert_user(UserProfile {
            user_id: Some("5".to_owned()),
            username: Some("Nobody".to_owned()),
            ..Default::default()
        });

        assert_eq!(store.users().len(), 1);
        assert_eq!(store.user_by_id("5").unwrap().location.as_deref(), Some("Nowhere"));
    }

    #[test]
    fn posts_keep_known_index() {
        let mut store = MemoryStore::new();

        store.upsert_post(PostRecord {
            id: "1".to_owned(),
            thread_index: 41,
            inner_html: "first".to_owned(),
            ..Default::default()
        });
        store.upsert_post(PostRecord {
            id: "1".to_owned(),
            filtered_thread_index: 2,
            inner_html: "edited".to_owned(),
            ..Default::default()
        });

        let post = store.post("1").unwrap();
        assert_eq!(store.post_count(), 1);
        assert_eq!(post.thread_index, 41);
        assert_eq!(post.filtered_thread_index, 2);
        assert_eq!(post.inner_html, "edited");
    }
}
