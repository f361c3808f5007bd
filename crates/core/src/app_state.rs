use crate::store::LedgerStore;
use bankline_primitives::models::app_config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn LedgerStore>, config: AppConfig) -> Arc<Self> {
        Arc::new(Self { store, config })
    }
}
