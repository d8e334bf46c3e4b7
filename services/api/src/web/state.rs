//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use opion_crm_core::ports::CrmRepository;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn CrmRepository>,
    pub config: Arc<Config>,
}
