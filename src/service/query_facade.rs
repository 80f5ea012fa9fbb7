//! Read-only lookups and filters over the entity store.

use std::sync::Arc;

use crate::domain::{Account, AccountId, Comment, CommentId, EntityStore, Post, PostId};

/// Read-side view of an [`EntityStore`].
///
/// Each call takes the store's shared lock once, so it sees a consistent
/// state and never a cascade in progress. Results are owned copies.
#[derive(Debug, Clone)]
pub struct QueryFacade {
    store: Arc<EntityStore>,
}

impl QueryFacade {
    /// Creates a facade over `store`.
    #[must_use]
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Lists accounts, optionally those whose name contains `query`
    /// (case-insensitive). An empty query lists everything.
    pub async fn list_accounts(&self, query: Option<&str>) -> Vec<Account> {
        let needle = lowered(query);
        let tables = self.store.read().await;
        tables
            .accounts()
            .iter()
            .filter(|a| {
                needle
                    .as_deref()
                    .is_none_or(|n| a.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect()
    }

    /// Lists posts, optionally those whose title or body contains `query`
    /// (case-insensitive) **or** that are published. An empty query lists
    /// everything.
    pub async fn list_posts(&self, query: Option<&str>) -> Vec<Post> {
        let needle = lowered(query);
        let tables = self.store.read().await;
        tables
            .posts()
            .iter()
            .filter(|p| {
                needle
                    .as_deref()
                    .is_none_or(|n| p.mentions(n) || p.published)
            })
            .cloned()
            .collect()
    }

    /// Lists every comment.
    pub async fn list_comments(&self) -> Vec<Comment> {
        self.store.read().await.comments().to_vec()
    }

    /// Posts authored by `author_id`.
    pub async fn posts_by_account(&self, author_id: AccountId) -> Vec<Post> {
        let tables = self.store.read().await;
        tables
            .posts()
            .iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect()
    }

    /// Comments authored by `author_id`.
    pub async fn comments_by_account(&self, author_id: AccountId) -> Vec<Comment> {
        let tables = self.store.read().await;
        tables
            .comments()
            .iter()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect()
    }

    /// Comments attached to `post_id`.
    pub async fn comments_by_post(&self, post_id: PostId) -> Vec<Comment> {
        let tables = self.store.read().await;
        tables
            .comments()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    /// Account with the given id, if any.
    pub async fn account_by_id(&self, id: AccountId) -> Option<Account> {
        self.store.read().await.account(id).cloned()
    }

    /// Post with the given id, if any.
    pub async fn post_by_id(&self, id: PostId) -> Option<Post> {
        self.store.read().await.post(id).cloned()
    }

    /// Comment with the given id, if any.
    pub async fn comment_by_id(&self, id: CommentId) -> Option<Comment> {
        self.store.read().await.comment(id).cloned()
    }
}

fn lowered(query: Option<&str>) -> Option<String> {
    query.filter(|q| !q.is_empty()).map(str::to_lowercase)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewAccount, NewComment, NewPost};

    struct Fixture {
        queries: QueryFacade,
        nathan: AccountId,
        sarah: AccountId,
        rust_post: PostId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(EntityStore::new());
        let Ok(nathan) = store
            .create_account(NewAccount::new("Nathan", "nathan@example.com"))
            .await
        else {
            panic!("account creation failed");
        };
        let Ok(sarah) = store
            .create_account(NewAccount::new("Sarah", "sarah@example.com"))
            .await
        else {
            panic!("account creation failed");
        };
        let Ok(rust_post) = store
            .create_post(NewPost::new("Learning Rust", "ownership", true, nathan.id))
            .await
        else {
            panic!("post creation failed");
        };
        let _ = store
            .create_post(NewPost::new("Gardening", "tomatoes", false, sarah.id))
            .await;
        let _ = store
            .create_post(NewPost::new("Cooking", "pasta", true, sarah.id))
            .await;
        let _ = store
            .create_comment(NewComment::new("great", sarah.id, rust_post.id))
            .await;

        Fixture {
            queries: QueryFacade::new(store),
            nathan: nathan.id,
            sarah: sarah.id,
            rust_post: rust_post.id,
        }
    }

    #[tokio::test]
    async fn account_search_is_case_insensitive() {
        let f = fixture().await;
        let found = f.queries.list_accounts(Some("NAT")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|a| a.id), Some(f.nathan));
        assert_eq!(f.queries.list_accounts(None).await.len(), 2);
        assert_eq!(f.queries.list_accounts(Some("")).await.len(), 2);
    }

    #[tokio::test]
    async fn post_search_also_matches_every_published_post() {
        let f = fixture().await;
        // Likely unintended upstream: any published post matches regardless
        // of the query. Kept as-is; do not build on it.
        let titles: Vec<String> = f
            .queries
            .list_posts(Some("tomato"))
            .await
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Learning Rust", "Gardening", "Cooking"]);

        let drafts_only: Vec<String> = f
            .queries
            .list_posts(Some("zzz"))
            .await
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(drafts_only, vec!["Learning Rust", "Cooking"]);
    }

    #[tokio::test]
    async fn relationship_lookups_follow_foreign_ids() {
        let f = fixture().await;
        assert_eq!(f.queries.posts_by_account(f.sarah).await.len(), 2);
        assert_eq!(f.queries.posts_by_account(f.nathan).await.len(), 1);
        assert_eq!(f.queries.comments_by_account(f.sarah).await.len(), 1);
        assert!(f.queries.comments_by_account(f.nathan).await.is_empty());

        let on_post = f.queries.comments_by_post(f.rust_post).await;
        assert_eq!(on_post.len(), 1);
        let Some(comment) = on_post.first() else {
            panic!("expected comment");
        };
        assert_eq!(
            f.queries.comment_by_id(comment.id).await.as_ref(),
            Some(comment)
        );
        assert_eq!(
            f.queries.post_by_id(f.rust_post).await.map(|p| p.author_id),
            Some(f.nathan)
        );
        assert!(f.queries.account_by_id(AccountId::new()).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_reads_agree() {
        let f = fixture().await;
        let (posts, accounts_a, accounts_b, again) = tokio::join!(
            f.queries.list_posts(None),
            f.queries.list_accounts(None),
            f.queries.list_accounts(Some("a")),
            f.queries.list_posts(None),
        );
        assert_eq!(posts, again);
        assert_eq!(posts.len(), 3);
        assert_eq!(accounts_a.len(), 2);
        assert_eq!(accounts_b.len(), 2);
        assert_eq!(f.queries.list_comments().await.len(), 1);
    }
}
