use std::sync::Arc;

use crate::db::Store;

/// Shared by every handler. The store is the only shared resource.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::new(Arc::new(crate::db::memory::MemoryStore::default()))
    }
}
