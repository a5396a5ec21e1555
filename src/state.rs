//! Shared router state

use crate::records::RecordStore;
use std::sync::Arc;

/// State handed to every handler
///
/// Holds the record store chosen at startup. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Record store capability
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Wrap a record store
    pub fn new<S>(store: S) -> Self
    where
        S: RecordStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }
}
