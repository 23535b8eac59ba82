use crate::auth::AdminAuth;
use crate::storage::MockStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handler state: the store behind one lock (every operation is a
/// whole-store read-modify-write, so one writer at a time is the model)
/// and the admin gate.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<MockStore>>,
    auth: Arc<AdminAuth>,
}

impl AppState {
    pub fn new(store: MockStore, auth: AdminAuth) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            auth: Arc::new(auth),
        }
    }

    pub fn store(&self) -> &Arc<RwLock<MockStore>> {
        &self.store
    }

    pub fn auth(&self) -> &AdminAuth {
        &self.auth
    }
}
