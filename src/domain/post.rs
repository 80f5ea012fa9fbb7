//! Post entity, creation input, and partial-update patch.

use serde::{Deserialize, Serialize};

use super::{AccountId, PostId};

/// A post written by an account.
///
/// Only published posts accept new comments and show up on the `post`
/// change topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identifier.
    pub id: PostId,
    /// Headline.
    pub title: String,
    /// Content.
    pub body: String,
    /// Whether the post is visible to readers.
    pub published: bool,
    /// Authoring account.
    pub author_id: AccountId,
}

/// Fields required to create a [`Post`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    /// Headline.
    pub title: String,
    /// Content.
    pub body: String,
    /// Initial visibility.
    pub published: bool,
    /// Authoring account; must exist.
    pub author_id: AccountId,
}

impl NewPost {
    /// Builds a creation input.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        published: bool,
        author_id: AccountId,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            published,
            author_id,
        }
    }
}

/// Partial update for a [`Post`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New content.
    #[serde(default)]
    pub body: Option<String>,
    /// New visibility.
    #[serde(default)]
    pub published: Option<bool>,
}

impl PostPatch {
    /// Patch that only flips visibility.
    #[must_use]
    pub const fn published(published: bool) -> Self {
        Self {
            title: None,
            body: None,
            published: Some(published),
        }
    }
}

/// Result of a post update: the snapshot taken before the patch and the
/// value after it.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    /// Post as it was before the update.
    pub before: Post,
    /// Post as it is after the update.
    pub after: Post,
}

/// Result of a post deletion.
#[derive(Debug, Clone)]
pub struct PostRemoval {
    /// The removed post.
    pub post: Post,
    /// Comments removed with it.
    pub comments: Vec<super::Comment>,
}

impl Post {
    pub(crate) fn create(id: PostId, input: NewPost) -> Self {
        Self {
            id,
            title: input.title,
            body: input.body,
            published: input.published,
            author_id: input.author_id,
        }
    }

    pub(crate) fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
    }

    /// Case-insensitive substring match on title or body.
    #[must_use]
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.body.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_patch_keeps_text() {
        let mut post = Post::create(
            PostId::new(),
            NewPost::new("Title 1", "Post body 1", false, AccountId::new()),
        );
        post.apply(PostPatch::published(true));
        assert!(post.published);
        assert_eq!(post.title, "Title 1");
        assert_eq!(post.body, "Post body 1");
    }

    #[test]
    fn mentions_checks_title_and_body() {
        let post = Post::create(
            PostId::new(),
            NewPost::new("Rust Tips", "Borrowing explained", true, AccountId::new()),
        );
        assert!(post.mentions("rust"));
        assert!(post.mentions("borrow"));
        assert!(!post.mentions("python"));
    }
}
