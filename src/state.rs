//! Shared application state for all routes.

use crate::service::EntityStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
}

impl AppState {
    pub fn new(store: impl EntityStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }
}
