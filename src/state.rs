use crate::database::UserStore;
use crate::services::auth_service::TokenKeys;
use crate::services::PerformanceAnalyzer;
use std::sync::Arc;

/// Shared, read-only dependencies handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub analyzer: Arc<dyn PerformanceAnalyzer>,
    pub tokens: TokenKeys,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        analyzer: Arc<dyn PerformanceAnalyzer>,
        tokens: TokenKeys,
    ) -> Self {
        Self { users, analyzer, tokens }
    }
}
