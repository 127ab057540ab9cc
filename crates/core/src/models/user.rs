use serde::{Deserialize, Serialize};

/// The signed-in user, as persisted in durable local storage.
///
/// The record is written by the login flow and trusted as-is on the next
/// startup: there is no expiry and no server-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// First letter of the name, uppercased (avatar badge in the navigation bar).
    pub fn initial(&self) -> Option<char> {
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}
