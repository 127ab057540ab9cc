use super::local::KeyValueStore;
use crate::errors::CoreError;
use crate::models::user::User;

/// Storage key under which the signed-in user is kept.
pub const USER_KEY: &str = "user";

/// Owner of the persisted session record.
///
/// The session gate reaches durable storage only through this trait, so a
/// test can hand it any implementation.
pub trait SessionStore: Send + Sync {
    /// The stored user, or `None` when nobody is signed in.
    fn load(&self) -> Result<Option<User>, CoreError>;

    fn save(&self, user: &User) -> Result<(), CoreError>;

    fn clear(&self) -> Result<(), CoreError>;
}

/// [`SessionStore`] that keeps the user as JSON under [`USER_KEY`].
pub struct LocalSessionStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> LocalSessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> SessionStore for LocalSessionStore<S> {
    fn load(&self) -> Result<Option<User>, CoreError> {
        let Some(raw) = self.store.get_item(USER_KEY)? else {
            return Ok(None);
        };
        let user = serde_json::from_str(&raw)
            .map_err(|e| CoreError::Deserialization(format!("Invalid stored user record: {e}")))?;
        Ok(Some(user))
    }

    fn save(&self, user: &User) -> Result<(), CoreError> {
        let raw = serde_json::to_string(user)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize user: {e}")))?;
        self.store.set_item(USER_KEY, &raw)
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.store.remove_item(USER_KEY)
    }
}
