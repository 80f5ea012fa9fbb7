//! Decides whether a mutation is externally observable.
//!
//! Pure functions: no store access, no I/O. The service layer feeds each
//! mutation outcome through here and publishes whatever comes back.

use super::change_event::{ChangeEvent, ChangeKind, Topic};
use super::{Comment, Post};

/// A post mutation outcome, borrowed from the store's return value.
#[derive(Debug, Clone, Copy)]
pub enum PostChange<'a> {
    /// A post was created.
    Created(&'a Post),
    /// A post was patched.
    Updated {
        /// Snapshot before the patch.
        before: &'a Post,
        /// Value after the patch.
        after: &'a Post,
    },
    /// A post was removed, directly or by cascade.
    Deleted(&'a Post),
}

/// An event together with the topic it must be published on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Destination topic.
    pub topic: Topic,
    /// Payload.
    pub event: ChangeEvent,
}

/// Maps a post mutation to at most one event on [`Topic::Post`].
///
/// Only changes to the published set are visible: unpublished posts never
/// produce events, publishing reads as a creation, and unpublishing reads
/// as a deletion carrying the pre-update snapshot.
#[must_use]
pub fn for_post(change: PostChange<'_>) -> Option<Notification> {
    let (kind, post) = match change {
        PostChange::Created(post) => (post.published.then_some(ChangeKind::Created)?, post),
        PostChange::Deleted(post) => (post.published.then_some(ChangeKind::Deleted)?, post),
        PostChange::Updated { before, after } => match (before.published, after.published) {
            (false, true) => (ChangeKind::Created, after),
            (true, false) => (ChangeKind::Deleted, before),
            (true, true) => (ChangeKind::Updated, after),
            (false, false) => return None,
        },
    };
    Some(Notification {
        topic: Topic::Post,
        event: ChangeEvent::post(kind, post.clone()),
    })
}

/// Maps a comment mutation to its event on the comment's post topic.
/// Every comment mutation is visible.
#[must_use]
pub fn for_comment(kind: ChangeKind, comment: &Comment) -> Notification {
    Notification {
        topic: Topic::Comment(comment.post_id),
        event: ChangeEvent::comment(kind, comment.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, CommentId, PostId};

    fn post(published: bool, title: &str) -> Post {
        Post {
            id: PostId::new(),
            title: title.to_string(),
            body: "body".to_string(),
            published,
            author_id: AccountId::new(),
        }
    }

    fn republished(base: &Post, published: bool, title: &str) -> Post {
        Post {
            published,
            title: title.to_string(),
            ..base.clone()
        }
    }

    fn kind_of(n: Option<Notification>) -> Option<ChangeKind> {
        n.map(|n| n.event.kind())
    }

    #[test]
    fn create_emits_only_when_published() {
        assert_eq!(
            kind_of(for_post(PostChange::Created(&post(true, "a")))),
            Some(ChangeKind::Created)
        );
        assert_eq!(kind_of(for_post(PostChange::Created(&post(false, "a")))), None);
    }

    #[test]
    fn delete_emits_only_when_published() {
        assert_eq!(
            kind_of(for_post(PostChange::Deleted(&post(true, "a")))),
            Some(ChangeKind::Deleted)
        );
        assert_eq!(kind_of(for_post(PostChange::Deleted(&post(false, "a")))), None);
    }

    #[test]
    fn publishing_reads_as_creation_of_new_value() {
        let before = post(false, "draft");
        let after = republished(&before, true, "final");
        let Some(n) = for_post(PostChange::Updated {
            before: &before,
            after: &after,
        }) else {
            panic!("expected event");
        };
        assert_eq!(n.topic, Topic::Post);
        assert_eq!(n.event.kind(), ChangeKind::Created);
        assert_eq!(n.event.as_post().map(|p| p.title.as_str()), Some("final"));
    }

    #[test]
    fn unpublishing_reads_as_deletion_of_old_value() {
        let before = post(true, "live");
        let after = republished(&before, false, "edited while hiding");
        let Some(n) = for_post(PostChange::Updated {
            before: &before,
            after: &after,
        }) else {
            panic!("expected event");
        };
        assert_eq!(n.event.kind(), ChangeKind::Deleted);
        assert_eq!(n.event.as_post(), Some(&before));
    }

    #[test]
    fn edits_to_published_post_are_updates() {
        let before = post(true, "old");
        let after = republished(&before, true, "new");
        let n = for_post(PostChange::Updated {
            before: &before,
            after: &after,
        });
        assert_eq!(
            n.as_ref().and_then(|n| n.event.as_post()).map(|p| p.title.as_str()),
            Some("new")
        );
        assert_eq!(kind_of(n), Some(ChangeKind::Updated));
    }

    #[test]
    fn edits_to_draft_are_silent() {
        let before = post(false, "old");
        let after = republished(&before, false, "new");
        assert!(
            for_post(PostChange::Updated {
                before: &before,
                after: &after,
            })
            .is_none()
        );
    }

    #[test]
    fn comments_always_notify_their_post_topic() {
        let post_id = PostId::new();
        let comment = Comment {
            id: CommentId::new(),
            text: "hi".to_string(),
            author_id: AccountId::new(),
            post_id,
        };
        for kind in [ChangeKind::Created, ChangeKind::Updated, ChangeKind::Deleted] {
            let n = for_comment(kind, &comment);
            assert_eq!(n.topic, Topic::Comment(post_id));
            assert_eq!(n.event.kind(), kind);
        }
    }
}
