use std::sync::Arc;

use crate::domain::ports::inbound::PropertyQueryService;

#[derive(Clone)]
pub struct AppState {
    pub property_service: Arc<dyn PropertyQueryService>,
}

impl AppState {
    pub fn new(property_service: Arc<dyn PropertyQueryService>) -> Self {
        Self { property_service }
    }
}
