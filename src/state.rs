use std::sync::Arc;

use crate::services::catalog_service::PoiCatalog;
use crate::services::chat_service::ChatService;
use crate::services::trip_planner_service::TripPlanner;

/// Shared per-process state. The catalog is read-only reference data, so
/// one copy serves every concurrent request.
pub struct AppState {
    pub catalog: Arc<PoiCatalog>,
    pub planner: TripPlanner,
    pub chat: ChatService,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(PoiCatalog::new()))
    }

    pub fn with_catalog(catalog: Arc<PoiCatalog>) -> Self {
        let planner = TripPlanner::new(catalog.clone());
        Self {
            catalog,
            planner,
            chat: ChatService::from_env(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
