//! Service layer: mutation orchestration and read queries.
//!
//! [`BlogService`] coordinates store mutations and emits events through
//! the [`super::domain::ChangeBus`]; [`QueryFacade`] serves read-only
//! lookups.

pub mod blog_service;
pub mod query_facade;

pub use blog_service::BlogService;
pub use query_facade::QueryFacade;
