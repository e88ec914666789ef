//! Shared application state for the page routes.

use std::sync::Arc;

use crate::config::ZlmaConfig;
use crate::process::CommandRunner;

/// Read-only state available to every route via `State<Arc<AppState>>`.
pub struct AppState {
    /// Page configuration.
    pub config: Arc<ZlmaConfig>,
    /// Runner for external commands.
    pub runner: Arc<dyn CommandRunner>,
}

impl AppState {
    /// Create state around a config and a command runner.
    pub fn new(config: ZlmaConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config: Arc::new(config),
            runner,
        }
    }
}
