//! Hand-off of scraped records to whatever keeps them.
//!
//! A [`RecordStore`] finds or inserts each record by its natural id and merges the scraped
//! values onto the stored ones. Values the page did not show (`None`, empty strings,
//! zero indices) never overwrite what the store already knows; see [`Merge`].

mod memory;
mod merge;

pub use self::memory::*;
pub use self::merge::*;

use crate::model::*;

pub trait RecordStore {
    fn upsert_category(&mut self, category: Category);
    fn upsert_thread(&mut self, thread: ThreadSummary);
    fn upsert_post(&mut self, post: PostRecord);
    fn upsert_user(&mut self, user: UserProfile);
    fn upsert_message(&mut self, message: PrivateMessage);
    fn upsert_message_summary(&mut self, summary: MessageSummary);
    fn upsert_punishment(&mut self, punishment: Punishment);
}

/// Scrape output that knows which records it contributes to a store.
pub trait Persist {
    fn persist(&self, store: &mut dyn RecordStore);
}

impl Persist for ForumHierarchy {
    fn persist(&self, store: &mut dyn RecordStore) {
        for category in &self.categories {
            store.upsert_category(category.clone());
        }
    }
}

impl Persist for ThreadListPage {
    fn persist(&self, store: &mut dyn RecordStore) {
        for thread in &self.threads {
            store.upsert_thread(thread.clone());

            if thread.author_user_id.is_some() || thread.author_username.is_some() {
                store.upsert_user(UserProfile {
                    user_id: thread.author_user_id.clone(),
                    username: thread.author_username.clone(),
                    ..Default::default()
                });
            }
        }
    }
}

impl Persist for PostsPage {
    fn persist(&self, store: &mut dyn RecordStore) {
        for post in &self.posts {
            store.upsert_user(post.author.to_profile());
            store.upsert_post(post.clone());
        }
    }
}

impl Persist for MessageFolder {
    fn persist(&self, store: &mut dyn RecordStore) {
        for message in &self.messages {
            store.upsert_message_summary(message.clone());
        }
    }
}

impl Persist for PrivateMessage {
    fn persist(&self, store: &mut dyn RecordStore) {
        store.upsert_user(self.from.to_profile());
        store.upsert_message(self.clone());
    }
}

impl Persist for UserProfile {
    fn persist(&self, store: &mut dyn RecordStore) {
        store.upsert_user(self.clone());
    }
}

impl Persist for Vec<Punishment> {
    fn persist(&self, store: &mut dyn RecordStore) {
        for punishment in self {
            for user in [Some(&punishment.jerk), punishment.moderator.as_ref(), punishment.admin.as_ref()]
                .into_iter()
                .flatten()
            {
                store.upsert_user(UserProfile {
                    user_id: user.user_id.clone(),
                    username: user.username.clone(),
                    ..Default::default()
                });
            }

            store.upsert_punishment(punishment.clone());
        }
    }
}

/// Counts and forms aren't records; nothing to store.
impl Persist for u32 {
    fn persist(&self, _store: &mut dyn RecordStore) {}
}

impl Persist for Vec<FormDescriptor> {
    fn persist(&self, _store: &mut dyn RecordStore) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moderator_post() -> PostsPage {
        PostsPage {
            posts: vec![PostRecord {
                id: "411".to_owned(),
                author: AuthorInfo {
                    user_id: Some("42".to_owned()),
                    username: Some("pokeyman".to_owned()),
                    is_moderator: true,
                    ..Default::default()
                },
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn thread_lists_keep_known_roles() {
        let mut store = MemoryStore::new();

        moderator_post().persist(&mut store);
        ThreadListPage {
            threads: vec![ThreadSummary {
                id: "3550424".to_owned(),
                title: "Fixture thread".to_owned(),
                author_user_id: Some("42".to_owned()),
                author_username: Some("pokeyman".to_owned()),
                ..Default::default()
            }],
            ..Default::default()
        }
        .persist(&mut store);

        let user = store.user_by_id("42").unwrap();
        assert_eq!(user.is_moderator, Some(true));
        assert_eq!(user.is_administrator, Some(false));
    }

    #[test]
    fn punishments_keep_known_roles() {
        let mut store = MemoryStore::new();

        moderator_post().persist(&mut store);
        vec![Punishment {
            kind: PunishmentKind::Probation,
            date: None,
            jerk: UserRef {
                user_id: Some("42".to_owned()),
                username: Some("pokeyman".to_owned()),
            },
            moderator: None,
            admin: None,
            reason_html: String::new(),
            post_id: None,
        }]
        .persist(&mut store);

        assert_eq!(store.user_by_id("42").unwrap().is_moderator, Some(true));
    }
}
