//! # blogwire
//!
//! In-memory account/post/comment graph with referential integrity and
//! live change notifications.
//!
//! The store enforces foreign keys, email uniqueness, and two-level
//! cascading deletes. Every post or comment mutation that changes what
//! readers can see is published on a topic-keyed change bus. Transport,
//! schema, and persistence belong to outer layers that call into
//! [`app_state::AppState`].
//!
//! ## Architecture
//!
//! ```text
//! Outer API layer (not part of this crate)
//!     │
//!     ├── BlogService (service/)  ── mutations + subscribe
//!     ├── QueryFacade (service/)  ── reads
//!     │
//!     ├── EntityStore (domain/)   ── collections, invariants, cascades
//!     ├── notification_policy     ── mutation → event?
//!     └── ChangeBus (domain/)     ── per-topic broadcast
//! ```

pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod seed;
pub mod service;
