use std::sync::Arc;

use crate::context::ContextStore;
use crate::model::GenerativeModel;
use crate::observability::AppMetrics;
use crate::services::generation::ResponseGenerator;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Session-keyed conversation context store
    pub context_store: Arc<ContextStore>,
    /// Response generator for the query pipeline
    pub response_generator: Arc<dyn ResponseGenerator>,
    /// Generative model client for the raw chat path
    pub model: Arc<dyn GenerativeModel>,
    /// Application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("context_store", &self.context_store)
            .field("response_generator", &"Arc<dyn ResponseGenerator>")
            .field("model", &"Arc<dyn GenerativeModel>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        context_store: Arc<ContextStore>,
        response_generator: Arc<dyn ResponseGenerator>,
        model: Arc<dyn GenerativeModel>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            context_store,
            response_generator,
            model,
            metrics,
        }
    }
}
