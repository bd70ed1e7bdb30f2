//! Application state management
//!
//! Shared state passed to every handler via Axum's state extraction. The
//! engine and configuration are built once at startup and are read-only
//! afterwards, so cloning the state only bumps reference counts.

use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use ration_lab_shared::DietEngine;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Validated feed library plus model parameters
    pub engine: Arc<DietEngine>,
    pub config: Arc<AppConfig>,
    /// Present only when a Prometheus recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(engine: DietEngine, config: AppConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// Attach the handle used to render `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn engine(&self) -> &DietEngine {
        &self.engine
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_clone_shares_engine() {
        let state = AppState::new(DietEngine::standard(), AppConfig::default());
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.engine, &cloned.engine));
        assert!(cloned.metrics.is_none());
    }

    #[test]
    fn test_state_exposes_library() {
        let state = AppState::new(DietEngine::standard(), AppConfig::default());
        assert_eq!(state.engine().library().len(), 6);
        assert_eq!(state.config().server.port, 8080);
    }
}
