//! Blog service: orchestrates store mutations and emits change events.

use std::sync::Arc;

use tokio::sync::Mutex;

use super::QueryFacade;
use crate::domain::notification_policy::{self, Notification, PostChange};
use crate::domain::{
    Account, AccountId, AccountPatch, ChangeBus, ChangeKind, Comment, CommentId, CommentPatch,
    EntityStore, NewAccount, NewComment, NewPost, Post, PostId, PostPatch, Subscription, Topic,
};
use crate::error::StoreError;

/// Orchestration layer for every mutation.
///
/// Owns references to [`EntityStore`] for state and [`ChangeBus`] for
/// event emission. Every mutation method follows the pattern: acquire the
/// mutation gate → mutate the store (validation and cascades included) →
/// run the notification policy → publish → return result.
///
/// The gate spans store commit and publish, so per-topic event order
/// always matches the order mutations were applied. Publishing never
/// blocks, so holding it there costs nothing.
#[derive(Debug, Clone)]
pub struct BlogService {
    store: Arc<EntityStore>,
    bus: ChangeBus,
    gate: Arc<Mutex<()>>,
}

impl BlogService {
    /// Creates a new `BlogService`.
    #[must_use]
    pub fn new(store: Arc<EntityStore>, bus: ChangeBus) -> Self {
        Self {
            store,
            bus,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the inner [`ChangeBus`].
    #[must_use]
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Returns a reference to the inner [`EntityStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Returns a read-only query view over the same store.
    #[must_use]
    pub fn queries(&self) -> QueryFacade {
        QueryFacade::new(Arc::clone(&self.store))
    }

    /// Subscribes to change events on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] for a comment topic whose post
    /// does not exist.
    pub async fn subscribe(&self, topic: Topic) -> Result<Subscription, StoreError> {
        let _gate = self.gate.lock().await;
        if let Topic::Comment(post_id) = topic
            && self.store.read().await.post(post_id).is_none()
        {
            return Err(StoreError::PostNotFound(post_id));
        }
        Ok(self.bus.subscribe(topic))
    }

    /// Creates an account. Accounts have no change topic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmailTaken`] on a duplicate email.
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, StoreError> {
        let _gate = self.gate.lock().await;
        let account = self.store.create_account(input).await?;
        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Applies a partial update to an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccountNotFound`] or [`StoreError::EmailTaken`].
    pub async fn update_account(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, StoreError> {
        let _gate = self.gate.lock().await;
        let account = self.store.update_account(id, patch).await?;
        tracing::debug!(account_id = %id, "account updated");
        Ok(account)
    }

    /// Deletes an account and everything that depends on it, emitting
    /// deletion events for each cascaded published post and comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccountNotFound`] if the id is unknown.
    pub async fn delete_account(&self, id: AccountId) -> Result<Account, StoreError> {
        let _gate = self.gate.lock().await;
        let removal = self.store.delete_account(id).await?;

        for comment in &removal.comments {
            self.emit(Some(notification_policy::for_comment(
                ChangeKind::Deleted,
                comment,
            )));
        }
        for post in &removal.posts {
            self.emit(notification_policy::for_post(PostChange::Deleted(post)));
            self.bus.close(&Topic::Comment(post.id));
        }

        tracing::info!(
            account_id = %id,
            posts = removal.posts.len(),
            comments = removal.comments.len(),
            "account deleted"
        );
        Ok(removal.account)
    }

    /// Creates a post; emits `CREATED` if it starts out published.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownAuthor`] if the author does not exist.
    pub async fn create_post(&self, input: NewPost) -> Result<Post, StoreError> {
        let _gate = self.gate.lock().await;
        let post = self.store.create_post(input).await?;
        self.emit(notification_policy::for_post(PostChange::Created(&post)));
        tracing::info!(post_id = %post.id, published = post.published, "post created");
        Ok(post)
    }

    /// Applies a partial update to a post, emitting whatever the change to
    /// the published set implies.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] if the id is unknown.
    pub async fn update_post(&self, id: PostId, patch: PostPatch) -> Result<Post, StoreError> {
        let _gate = self.gate.lock().await;
        let update = self.store.update_post(id, patch).await?;
        self.emit(notification_policy::for_post(PostChange::Updated {
            before: &update.before,
            after: &update.after,
        }));
        tracing::debug!(post_id = %id, published = update.after.published, "post updated");
        Ok(update.after)
    }

    /// Deletes a post and its comments, then closes the post's comment
    /// topic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] if the id is unknown.
    pub async fn delete_post(&self, id: PostId) -> Result<Post, StoreError> {
        let _gate = self.gate.lock().await;
        let removal = self.store.delete_post(id).await?;

        for comment in &removal.comments {
            self.emit(Some(notification_policy::for_comment(
                ChangeKind::Deleted,
                comment,
            )));
        }
        self.emit(notification_policy::for_post(PostChange::Deleted(
            &removal.post,
        )));
        self.bus.close(&Topic::Comment(id));

        tracing::info!(post_id = %id, comments = removal.comments.len(), "post deleted");
        Ok(removal.post)
    }

    /// Creates a comment on a published post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CommentRejected`] if the author or post is
    /// unknown, or the post is not published.
    pub async fn create_comment(&self, input: NewComment) -> Result<Comment, StoreError> {
        let _gate = self.gate.lock().await;
        let comment = self.store.create_comment(input).await?;
        self.emit(Some(notification_policy::for_comment(
            ChangeKind::Created,
            &comment,
        )));
        tracing::info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    /// Applies a partial update to a comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CommentNotFound`] if the id is unknown.
    pub async fn update_comment(
        &self,
        id: CommentId,
        patch: CommentPatch,
    ) -> Result<Comment, StoreError> {
        let _gate = self.gate.lock().await;
        let comment = self.store.update_comment(id, patch).await?;
        self.emit(Some(notification_policy::for_comment(
            ChangeKind::Updated,
            &comment,
        )));
        Ok(comment)
    }

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CommentNotFound`] if the id is unknown.
    pub async fn delete_comment(&self, id: CommentId) -> Result<Comment, StoreError> {
        let _gate = self.gate.lock().await;
        let comment = self.store.delete_comment(id).await?;
        self.emit(Some(notification_policy::for_comment(
            ChangeKind::Deleted,
            &comment,
        )));
        tracing::info!(comment_id = %id, "comment deleted");
        Ok(comment)
    }

    fn emit(&self, notification: Option<Notification>) {
        let Some(Notification { topic, event }) = notification else {
            return;
        };
        let kind = event.kind();
        let delivered = self.bus.publish(&topic, event);
        tracing::debug!(%topic, %kind, delivered, "change published");
    }
}
