//! Domain layer: entities, the entity store, and the change system.
//!
//! This module contains the relational model (accounts, posts, comments
//! and their typed ids), the [`EntityStore`] enforcing referential
//! integrity, the pure notification policy, and the topic-keyed
//! [`ChangeBus`] delivering change events to subscribers.

pub mod account;
pub mod change_bus;
pub mod change_event;
pub mod comment;
pub mod entity_store;
pub mod ids;
pub mod notification_policy;
pub mod post;
pub mod subscription;

pub use account::{Account, AccountPatch, AccountRemoval, NewAccount};
pub use change_bus::ChangeBus;
pub use change_event::{ChangeEvent, ChangeKind, InvalidTopic, Topic};
pub use comment::{Comment, CommentPatch, NewComment};
pub use entity_store::{Collections, EntityStore};
pub use ids::{AccountId, CommentId, PostId};
pub use notification_policy::{Notification, PostChange};
pub use post::{NewPost, Post, PostPatch, PostRemoval, PostUpdate};
pub use subscription::Subscription;
