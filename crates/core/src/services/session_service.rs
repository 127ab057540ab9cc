use crate::errors::CoreError;
use crate::models::user::User;
use crate::storage::session::SessionStore;

/// Decides between the login surface and the authenticated shell.
///
/// The stored record is the only source of truth: whatever [`SessionStore::load`]
/// returns is trusted without expiry or server validation.
pub struct SessionGate {
    store: Box<dyn SessionStore>,
    user: Option<User>,
}

impl SessionGate {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self { store, user: None }
    }

    /// Read the stored session. Returns `true` when a user was found.
    ///
    /// An unreadable or corrupted record counts as "not signed in".
    pub fn start(&mut self) -> bool {
        self.user = self.read_stored();
        self.user.is_some()
    }

    /// Persist `user` as handed over by the login flow and mark the session
    /// authenticated. The record is not checked; only a store failure fails.
    pub fn login(&mut self, user: User) -> Result<(), CoreError> {
        self.store.save(&user)?;
        tracing::info!(email = %user.email, "user signed in");
        self.user = Some(user);
        Ok(())
    }

    /// Pick up a record written by an external login flow.
    /// Returns `true` when the session is now authenticated.
    pub fn complete_login(&mut self) -> bool {
        if let Some(user) = self.read_stored() {
            self.user = Some(user);
        }
        self.user.is_some()
    }

    /// Forget the user and remove the stored record.
    ///
    /// The in-memory session is cleared even if the store fails; the error
    /// is still returned so the caller can surface it.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        let previous = self.user.take();
        if let Some(user) = &previous {
            tracing::info!(email = %user.email, "user signed out");
        }
        self.store.clear()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn read_stored(&self) -> Option<User> {
        match self.store.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable session record");
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
