//! Shared application state handed to the API layer.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{ChangeBus, EntityStore};
use crate::service::{BlogService, QueryFacade};

/// Everything an outer layer needs to call into the core: mutations,
/// reads, and subscriptions, all sharing one store and one bus.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Mutations and subscriptions.
    pub blog_service: Arc<BlogService>,
    /// Read-only queries.
    pub queries: QueryFacade,
}

impl AppState {
    /// Builds a fresh, empty store and bus sized per `config`.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Arc::new(EntityStore::new());
        let bus = ChangeBus::new(config.change_bus_capacity);
        let blog_service = Arc::new(BlogService::new(store, bus));
        let queries = blog_service.queries();
        Self {
            blog_service,
            queries,
        }
    }
}
