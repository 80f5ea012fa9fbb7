//! Account entity, creation input, and partial-update patch.

use serde::{Deserialize, Deserializer, Serialize};

use super::AccountId;

/// A registered account. Authors posts and comments.
///
/// `email` is unique across all accounts; the store enforces this on
/// both creation and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Contact email, unique among accounts.
    pub email: String,
    /// Optional age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// Fields required to create an [`Account`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Optional age in years.
    #[serde(default)]
    pub age: Option<u32>,
}

impl NewAccount {
    /// Convenience constructor for an account without an age.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: None,
        }
    }

    /// Sets the age.
    #[must_use]
    pub const fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

/// Partial update for an [`Account`].
///
/// Absent fields leave the stored value untouched. For `age`, the outer
/// `Option` is presence and the inner one is the new value, so
/// `Some(None)` clears the age while `None` keeps it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    /// New email; must not belong to another account.
    #[serde(default)]
    pub email: Option<String>,
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New age, or `Some(None)` to clear it.
    #[serde(default, deserialize_with = "present_or_null")]
    pub age: Option<Option<u32>>,
}

/// Result of an account deletion, including everything removed by the
/// cascade.
#[derive(Debug, Clone)]
pub struct AccountRemoval {
    /// The removed account.
    pub account: Account,
    /// Posts the account authored.
    pub posts: Vec<super::Post>,
    /// Comments the account authored plus comments on its posts.
    pub comments: Vec<super::Comment>,
}

impl Account {
    pub(crate) fn create(id: AccountId, input: NewAccount) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            age: input.age,
        }
    }

    pub(crate) fn apply(&mut self, patch: AccountPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
    }
}

/// Maps a present JSON field (including `null`) to `Some(..)`, leaving
/// absence to `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
