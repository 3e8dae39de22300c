//! Shared application state for the callback endpoint.

use crate::cache::SharedCache;
use crate::dispatch::DispatchService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub gateway: Arc<dyn crate::gateway::BackendGateway>,
    pub dispatch: Arc<DispatchService>,
}
