//! Handler types and dependencies.

use std::sync::Arc;

use remitcore::{RateSource, SessionStore, Settings};

/// Error type for handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers. Cheap to clone; everything behind Arc.
#[derive(Clone)]
pub struct HandlerDeps {
    pub settings: Arc<Settings>,
    pub rate_source: Arc<RateSource>,
    pub sessions: Arc<SessionStore>,
}

impl HandlerDeps {
    pub fn new(settings: Arc<Settings>, rate_source: Arc<RateSource>, sessions: Arc<SessionStore>) -> Self {
        Self {
            settings,
            rate_source,
            sessions,
        }
    }
}
