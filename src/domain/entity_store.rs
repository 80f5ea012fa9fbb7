//! In-memory relational store for accounts, posts, and comments.
//!
//! [`EntityStore`] owns the three collections behind a single
//! [`tokio::sync::RwLock`]. Every mutation takes the write lock for its
//! whole validate → mutate → cascade sequence, so readers never observe
//! a half-applied cascade and a failed mutation leaves nothing behind.

use std::collections::HashSet;

use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard};

use super::account::{AccountPatch, AccountRemoval, NewAccount};
use super::comment::{CommentPatch, NewComment};
use super::post::{NewPost, PostPatch, PostRemoval, PostUpdate};
use super::{Account, AccountId, Comment, CommentId, Post, PostId};
use crate::error::StoreError;

/// The three entity collections, in insertion order.
///
/// Relationships are stored only as foreign ids on the child; the
/// one-to-many direction is always derived by scanning.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Collections {
    accounts: Vec<Account>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Collections {
    /// All accounts.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// All posts.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// All comments.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Looks up a post by id.
    #[must_use]
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Looks up a comment by id.
    #[must_use]
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    fn email_taken(&self, email: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .iter()
            .any(|a| a.email == email && Some(a.id) != except)
    }
}

/// Central store for all entities.
///
/// # Concurrency
///
/// - Reads share the lock and may run concurrently.
/// - Mutations are exclusive: one writer at a time, cascades included.
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: RwLock<Collections>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a shared read view of all collections.
    ///
    /// Hold the guard only for as long as the read needs; mutations wait
    /// for it to be released.
    pub async fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.tables.read().await
    }

    /// Returns an owned copy of every collection.
    pub async fn snapshot(&self) -> Collections {
        self.tables.read().await.clone()
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EmailTaken`] if any account already uses the
    /// email.
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&input.email, None) {
            return Err(StoreError::EmailTaken(input.email));
        }
        let account = Account::create(AccountId::new(), input);
        tables.accounts.push(account.clone());
        Ok(account)
    }

    /// Applies a partial update to an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccountNotFound`] if the id is unknown, or
    /// [`StoreError::EmailTaken`] if the new email belongs to a different
    /// account.
    pub async fn update_account(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.account(id).is_none() {
            return Err(StoreError::AccountNotFound(id));
        }
        if let Some(email) = &patch.email
            && tables.email_taken(email, Some(id))
        {
            return Err(StoreError::EmailTaken(email.clone()));
        }
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.apply(patch);
        Ok(account.clone())
    }

    /// Deletes an account together with its posts, the comments on those
    /// posts, and every comment it authored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AccountNotFound`] if the id is unknown.
    pub async fn delete_account(&self, id: AccountId) -> Result<AccountRemoval, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::AccountNotFound(id))?;
        let account = tables.accounts.remove(index);

        let posts = take_where(&mut tables.posts, |p| p.author_id == id);
        let orphaned: HashSet<PostId> = posts.iter().map(|p| p.id).collect();
        let comments = take_where(&mut tables.comments, |c| {
            c.author_id == id || orphaned.contains(&c.post_id)
        });

        Ok(AccountRemoval {
            account,
            posts,
            comments,
        })
    }

    /// Creates a new post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownAuthor`] if the author does not exist.
    pub async fn create_post(&self, input: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.account(input.author_id).is_none() {
            return Err(StoreError::UnknownAuthor(input.author_id));
        }
        let post = Post::create(PostId::new(), input);
        tables.posts.push(post.clone());
        Ok(post)
    }

    /// Applies a partial update to a post, returning both the pre-update
    /// snapshot and the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] if the id is unknown.
    pub async fn update_post(&self, id: PostId, patch: PostPatch) -> Result<PostUpdate, StoreError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PostNotFound(id))?;
        let before = post.clone();
        post.apply(patch);
        Ok(PostUpdate {
            before,
            after: post.clone(),
        })
    }

    /// Deletes a post and every comment attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PostNotFound`] if the id is unknown.
    pub async fn delete_post(&self, id: PostId) -> Result<PostRemoval, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PostNotFound(id))?;
        let post = tables.posts.remove(index);
        let comments = take_where(&mut tables.comments, |c| c.post_id == id);
        Ok(PostRemoval { post, comments })
    }

    /// Creates a new comment on a published post.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CommentRejected`] if the author is unknown,
    /// the post is unknown, or the post is not published.
    pub async fn create_comment(&self, input: NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        let author_exists = tables.account(input.author_id).is_some();
        let post_is_published = tables.post(input.post_id).is_some_and(|p| p.published);
        if !author_exists || !post_is_published {
            return Err(StoreError::CommentRejected {
                author_id: input.author_id,
                post_id: input.post_id,
            });
        }
        let comment = Comment::create(CommentId::new(), input);
        tables.comments.push(comment.clone());
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
        let mut tables = self.tables.write().await;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::CommentNotFound(id))?;
        comment.apply(patch);
        Ok(comment.clone())
    }

    /// Deletes a single comment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CommentNotFound`] if the id is unknown.
    pub async fn delete_comment(&self, id: CommentId) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .comments
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::CommentNotFound(id))?;
        Ok(tables.comments.remove(index))
    }
}

/// Moves every item matching `pred` out of `items`, preserving the order
/// of both halves.
fn take_where<T>(items: &mut Vec<T>, pred: impl FnMut(&T) -> bool) -> Vec<T> {
    let (taken, kept): (Vec<T>, Vec<T>) = std::mem::take(items).into_iter().partition(pred);
    *items = kept;
    taken
}
