//! Demo data for local runs.
//!
//! Everything goes through [`BlogService`], so the seeded state satisfies
//! the same invariants as any other state.

use crate::domain::{NewAccount, NewComment, NewPost, PostPatch};
use crate::error::StoreError;
use crate::service::BlogService;

/// Counts of what [`seed_demo_data`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Accounts created.
    pub accounts: usize,
    /// Posts created.
    pub posts: usize,
    /// Comments created.
    pub comments: usize,
}

/// Loads three accounts, three posts (one left published), and four
/// comments.
///
/// Comments can only be added to published posts, so all posts start
/// published and the drafts are unpublished once their comments exist.
///
/// # Errors
///
/// Returns a [`StoreError`] if any step is rejected, e.g. when the demo
/// emails are already taken.
pub async fn seed_demo_data(service: &BlogService) -> Result<SeedSummary, StoreError> {
    let nathan = service
        .create_account(NewAccount::new("Nathan", "nathan@example.com").with_age(29))
        .await?;
    let andrew = service
        .create_account(NewAccount::new("Andrew", "andrew@example.com"))
        .await?;
    let sarah = service
        .create_account(NewAccount::new("Sarah", "sarah@example.com"))
        .await?;

    let first = service
        .create_post(NewPost::new("Title 1", "Post body 1", true, nathan.id))
        .await?;
    let second = service
        .create_post(NewPost::new("Title 2", "Post body test 2", true, andrew.id))
        .await?;
    let third = service
        .create_post(NewPost::new("Title 3", "Post body test 3", true, sarah.id))
        .await?;

    let comments = [
        ("This is the first text comment", nathan.id, third.id),
        ("This is the second text comment", nathan.id, third.id),
        ("This is the third text comment", andrew.id, second.id),
        ("This is the fourth text comment", sarah.id, first.id),
    ];
    for (text, author_id, post_id) in comments {
        service
            .create_comment(NewComment::new(text, author_id, post_id))
            .await?;
    }

    for draft in [second.id, third.id] {
        service
            .update_post(draft, PostPatch::published(false))
            .await?;
    }

    tracing::info!("demo data seeded");
    Ok(SeedSummary {
        accounts: 3,
        posts: 3,
        comments: comments.len(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{ChangeBus, EntityStore};
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn seeds_expected_shape() {
        let service = BlogService::new(Arc::new(EntityStore::new()), ChangeBus::new(8));
        let Ok(summary) = seed_demo_data(&service).await else {
            panic!("seeding failed");
        };
        assert_eq!(
            summary,
            SeedSummary {
                accounts: 3,
                posts: 3,
                comments: 4,
            }
        );

        let queries = service.queries();
        assert_eq!(queries.list_accounts(None).await.len(), 3);
        assert_eq!(queries.list_comments().await.len(), 4);
        let published: Vec<String> = queries
            .list_posts(None)
            .await
            .into_iter()
            .filter(|p| p.published)
            .map(|p| p.title)
            .collect();
        assert_eq!(published, vec!["Title 1"]);
    }

    #[tokio::test]
    async fn seeding_twice_conflicts() {
        let service = BlogService::new(Arc::new(EntityStore::new()), ChangeBus::new(8));
        let _ = seed_demo_data(&service).await;
        let again = seed_demo_data(&service).await;
        assert_eq!(again.map_err(|e| e.kind()).err(), Some(ErrorKind::Conflict));
    }
}
