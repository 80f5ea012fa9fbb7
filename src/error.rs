//! Store error types with error-kind mapping.
//!
//! [`StoreError`] is the central error type for every mutation. Each
//! variant belongs to one [`ErrorKind`] and carries a stable numeric code
//! that an API layer can forward to its clients.

use serde::Serialize;

use crate::domain::{AccountId, CommentId, PostId};

/// Coarse error category, for translation into protocol-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An update/delete target id is absent from its collection.
    NotFound,
    /// A uniqueness constraint would be violated.
    Conflict,
    /// A referenced foreign id is unknown, or a comment targets an
    /// unpublished post.
    Validation,
}

/// Mutation failure. A failed mutation leaves the store untouched.
///
/// # Error Code Ranges
///
/// | Range     | Category              |
/// |-----------|-----------------------|
/// | 1000–1999 | Validation            |
/// | 2000–2999 | Not Found / Conflict  |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Account with the given id does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// Post with the given id does not exist.
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    /// Comment with the given id does not exist.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Another account already uses this email.
    #[error("email is already taken: {0}")]
    EmailTaken(String),

    /// A post names an author that does not exist.
    #[error("author does not exist: {0}")]
    UnknownAuthor(AccountId),

    /// The comment author is unknown, or the target post is unknown or
    /// not published.
    #[error("unable to post comment: post {post_id} is not published or author {author_id} does not exist")]
    CommentRejected {
        /// Requested author.
        author_id: AccountId,
        /// Requested target post.
        post_id: PostId,
    },
}

impl StoreError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) | Self::PostNotFound(_) | Self::CommentNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::EmailTaken(_) => ErrorKind::Conflict,
            Self::UnknownAuthor(_) | Self::CommentRejected { .. } => ErrorKind::Validation,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::UnknownAuthor(_) => 1001,
            Self::CommentRejected { .. } => 1002,
            Self::AccountNotFound(_) => 2001,
            Self::PostNotFound(_) => 2002,
            Self::CommentNotFound(_) => 2003,
            Self::EmailTaken(_) => 2101,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_categories() {
        assert_eq!(
            StoreError::AccountNotFound(AccountId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            StoreError::EmailTaken("a@x.com".to_string()).kind(),
            ErrorKind::Conflict
        );
        let rejected = StoreError::CommentRejected {
            author_id: AccountId::new(),
            post_id: PostId::new(),
        };
        assert_eq!(rejected.kind(), ErrorKind::Validation);
        assert_eq!(rejected.error_code(), 1002);
    }

    #[test]
    fn message_names_the_email() {
        let err = StoreError::EmailTaken("a@x.com".to_string());
        assert_eq!(err.to_string(), "email is already taken: a@x.com");
    }
}
