//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the persistence gateway (both tiers behind one `persist` call), the
//! optional email notifier, and the admin token. All fields are cheap to
//! clone.

use std::sync::Arc;

use crate::services::notify::Notifier;
use crate::services::persistence::PersistenceGateway;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PersistenceGateway>,
    /// `None` when Resend is not configured.
    pub notifier: Option<Arc<dyn Notifier>>,
    /// `None` closes the admin routes.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    #[must_use]
    pub fn new(gateway: PersistenceGateway, notifier: Option<Arc<dyn Notifier>>, admin_token: Option<String>) -> Self {
        Self { gateway: Arc::new(gateway), notifier, admin_token: admin_token.map(Arc::from) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
