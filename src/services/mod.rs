//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod import;
pub mod members;

use std::sync::Arc;

use crate::{clock::Clock, repository::CatalogStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub circulation: circulation::CirculationService,
    pub import: import::ImportService,
    store: Arc<dyn CatalogStore>,
}

impl Services {
    /// Create all services sharing one catalog store
    pub fn new(
        store: Arc<dyn CatalogStore>,
        clock: Arc<dyn Clock>,
        catalog_source: Arc<dyn import::CatalogSource>,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            members: members::MembersService::new(store.clone()),
            circulation: circulation::CirculationService::new(store.clone(), clock),
            import: import::ImportService::new(store.clone(), catalog_source),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }
}
