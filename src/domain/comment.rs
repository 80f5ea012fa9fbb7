//! Comment entity, creation input, and partial-update patch.

use serde::{Deserialize, Serialize};

use super::{AccountId, CommentId, PostId};

/// A comment left by an account on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Store-assigned identifier.
    pub id: CommentId,
    /// Comment text.
    pub text: String,
    /// Authoring account.
    pub author_id: AccountId,
    /// Post the comment is attached to.
    pub post_id: PostId,
}

/// Fields required to create a [`Comment`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    /// Comment text.
    pub text: String,
    /// Authoring account; must exist.
    pub author_id: AccountId,
    /// Target post; must exist and be published.
    pub post_id: PostId,
}

impl NewComment {
    /// Builds a creation input.
    #[must_use]
    pub fn new(text: impl Into<String>, author_id: AccountId, post_id: PostId) -> Self {
        Self {
            text: text.into(),
            author_id,
            post_id,
        }
    }
}

/// Partial update for a [`Comment`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    /// New text.
    #[serde(default)]
    pub text: Option<String>,
}

impl Comment {
    pub(crate) fn create(id: CommentId, input: NewComment) -> Self {
        Self {
            id,
            text: input.text,
            author_id: input.author_id,
            post_id: input.post_id,
        }
    }

    pub(crate) fn apply(&mut self, patch: CommentPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
    }
}
