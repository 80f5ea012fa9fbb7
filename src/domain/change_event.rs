//! Change events and the topics they are published on.
//!
//! Post events go to the global [`Topic::Post`]; comment events go to the
//! per-post [`Topic::Comment`] keyed by the comment's post id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Comment, Post, PostId};

/// What happened to the entity carried by a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// The entity became visible.
    Created,
    /// A visible entity changed.
    Updated,
    /// The entity stopped being visible.
    Deleted,
}

impl ChangeKind {
    /// Returns the wire name (`"CREATED"`, `"UPDATED"`, `"DELETED"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A post changed visibility or content.
    Post {
        /// Kind of change.
        mutation: ChangeKind,
        /// Post snapshot the event refers to.
        data: Post,
        /// When the event was produced.
        timestamp: DateTime<Utc>,
    },
    /// A comment was created, edited, or removed.
    Comment {
        /// Kind of change.
        mutation: ChangeKind,
        /// Comment snapshot the event refers to.
        data: Comment,
        /// When the event was produced.
        timestamp: DateTime<Utc>,
    },
}

impl ChangeEvent {
    /// Builds a post event stamped with the current time.
    #[must_use]
    pub fn post(mutation: ChangeKind, data: Post) -> Self {
        Self::Post {
            mutation,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Builds a comment event stamped with the current time.
    #[must_use]
    pub fn comment(mutation: ChangeKind, data: Comment) -> Self {
        Self::Comment {
            mutation,
            data,
            timestamp: Utc::now(),
        }
    }

    /// Returns the mutation kind.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Post { mutation, .. } | Self::Comment { mutation, .. } => *mutation,
        }
    }

    /// Returns the carried post, if this is a post event.
    #[must_use]
    pub const fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post { data, .. } => Some(data),
            Self::Comment { .. } => None,
        }
    }

    /// Returns the carried comment, if this is a comment event.
    #[must_use]
    pub const fn as_comment(&self) -> Option<&Comment> {
        match self {
            Self::Comment { data, .. } => Some(data),
            Self::Post { .. } => None,
        }
    }
}

/// Subscription key partitioning the event space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Published-post changes (`"post"`).
    Post,
    /// Comment changes on one post (`"comment:<postId>"`).
    Comment(PostId),
}

const POST_TOPIC: &str = "post";
const COMMENT_PREFIX: &str = "comment:";

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str(POST_TOPIC),
            Self::Comment(post_id) => write!(f, "{COMMENT_PREFIX}{post_id}"),
        }
    }
}

/// A topic string that is neither `"post"` nor `"comment:<uuid>"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid topic: {0}")]
pub struct InvalidTopic(pub String);

impl FromStr for Topic {
    type Err = InvalidTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == POST_TOPIC {
            return Ok(Self::Post);
        }
        s.strip_prefix(COMMENT_PREFIX)
            .and_then(|id| id.parse::<PostId>().ok())
            .map(Self::Comment)
            .ok_or_else(|| InvalidTopic(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, CommentId};

    fn sample_post() -> Post {
        Post {
            id: PostId::new(),
            title: "Title 1".to_string(),
            body: "Post body 1".to_string(),
            published: true,
            author_id: AccountId::new(),
        }
    }

    #[test]
    fn topic_round_trips_through_text() {
        let post_id = PostId::new();
        for topic in [Topic::Post, Topic::Comment(post_id)] {
            let Ok(parsed) = topic.to_string().parse::<Topic>() else {
                panic!("topic {topic} should parse");
            };
            assert_eq!(parsed, topic);
        }
        assert_eq!(Topic::Comment(post_id).to_string(), format!("comment:{post_id}"));
    }

    #[test]
    fn malformed_topics_are_rejected() {
        for raw in ["", "posts", "comment:", "comment:42", "comment"] {
            assert!(raw.parse::<Topic>().is_err(), "{raw} accepted");
        }
    }

    #[test]
    fn post_event_serializes_with_mutation_tag() {
        let event = ChangeEvent::post(ChangeKind::Created, sample_post());
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains(r#""entity":"post""#));
        assert!(json.contains(r#""mutation":"CREATED""#));
        assert!(json.contains("Title 1"));
    }

    #[test]
    fn comment_event_carries_its_post_id() {
        let post_id = PostId::new();
        let event = ChangeEvent::comment(
            ChangeKind::Updated,
            Comment {
                id: CommentId::new(),
                text: "hi".to_string(),
                author_id: AccountId::new(),
                post_id,
            },
        );
        assert_eq!(event.as_comment().map(|c| c.post_id), Some(post_id));
        assert_eq!(event.kind(), ChangeKind::Updated);
        assert!(event.as_post().is_none());
    }
}
