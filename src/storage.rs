use std::collections::{BTreeMap, HashMap};

use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;

use crate::domain::{NewSubscriber, NewUser, Subscriber, User};

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("{0} is already on the waitlist")]
    DuplicateEmail(String),
    #[error("username {0} is already taken")]
    DuplicateUsername(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Persistence contract for waitlist subscribers and user accounts.
///
/// `create_*` operations enforce uniqueness themselves, so a lookup
/// followed by a create is never needed to keep records unique.
pub trait Storage: Send + Sync + 'static {
    fn find_subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, StorageError>;

    fn create_subscriber(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StorageError>;

    /// All subscribers ordered by id.
    fn subscribers(&self) -> Result<Vec<Subscriber>, StorageError>;

    fn get_user(&self, id: u64) -> Result<Option<User>, StorageError>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    fn create_user(&self, new_user: NewUser) -> Result<User, StorageError>;
}

#[derive(Default)]
struct Tables {
    subscribers: BTreeMap<u64, Subscriber>,
    subscriber_ids_by_email: HashMap<String, u64>,
    last_subscriber_id: u64,
    users: BTreeMap<u64, User>,
    user_ids_by_username: HashMap<String, u64>,
    last_user_id: u64,
}

/// Process-lifetime store. Every write happens under a single lock, which
/// makes check-and-insert atomic.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemStorage {
    fn find_subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, StorageError> {
        let tables = self.tables.read();

        Ok(tables
            .subscriber_ids_by_email
            .get(email)
            .and_then(|id| tables.subscribers.get(id))
            .cloned())
    }

    #[tracing::instrument(name = "Saving new subscriber", skip(self, new_subscriber))]
    fn create_subscriber(&self, new_subscriber: &NewSubscriber) -> Result<Subscriber, StorageError> {
        let email = new_subscriber.email.as_ref();
        let mut tables = self.tables.write();

        if tables.subscriber_ids_by_email.contains_key(email) {
            return Err(StorageError::DuplicateEmail(email.to_owned()));
        }

        tables.last_subscriber_id += 1;
        let subscriber = Subscriber {
            id: tables.last_subscriber_id,
            email: email.to_owned(),
            consent_to_privacy_policy: new_subscriber.consent_to_privacy_policy,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        tables
            .subscriber_ids_by_email
            .insert(subscriber.email.clone(), subscriber.id);
        tables.subscribers.insert(subscriber.id, subscriber.clone());

        Ok(subscriber)
    }

    fn subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        Ok(self.tables.read().subscribers.values().cloned().collect())
    }

    fn get_user(&self, id: u64) -> Result<Option<User>, StorageError> {
        Ok(self.tables.read().users.get(&id).cloned())
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let tables = self.tables.read();

        Ok(tables
            .user_ids_by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    #[tracing::instrument(name = "Saving new user", skip(self, new_user), fields(username = %new_user.username))]
    fn create_user(&self, new_user: NewUser) -> Result<User, StorageError> {
        let mut tables = self.tables.write();

        if tables.user_ids_by_username.contains_key(&new_user.username) {
            return Err(StorageError::DuplicateUsername(new_user.username));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new_user.username,
            password: new_user.password,
        };

        tables
            .user_ids_by_username
            .insert(user.username.clone(), user.id);
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }
}
