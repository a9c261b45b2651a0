//! Shared application state for the HTTP host

use std::sync::Arc;

use resx_workflows::WorkflowRegistry;

/// State handed to every route handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WorkflowRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<WorkflowRegistry>) -> Self {
        Self { registry }
    }
}
