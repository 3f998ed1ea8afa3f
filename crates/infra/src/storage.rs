//! Session storage selection

use std::sync::Arc;

use tracing::debug;
use wastewise_common::auth::SessionStorage;
use wastewise_common::{FileSessionStorage, KeychainProvider, MemorySessionStorage};
use wastewise_domain::{Result, StorageBackend, StorageConfig, WasteWiseError};

/// Build the session storage named by `config`
///
/// # Errors
/// Returns `WasteWiseError::Config` when the file backend has no path.
pub fn session_storage(config: &StorageConfig) -> Result<Arc<dyn SessionStorage>> {
    debug!(backend = %config.backend, "Creating session storage");
    let storage: Arc<dyn SessionStorage> = match config.backend {
        StorageBackend::Keychain => Arc::new(KeychainProvider::new(config.service_name.clone())),
        StorageBackend::File => {
            let path = config.path.clone().ok_or_else(|| {
                WasteWiseError::Config("storage.path is required for the file backend".to_string())
            })?;
            Arc::new(FileSessionStorage::new(path))
        }
        StorageBackend::Memory => Arc::new(MemorySessionStorage::new()),
    };
    Ok(storage)
}
