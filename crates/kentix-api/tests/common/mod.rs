//! Common test utilities for API tests.

use std::sync::Arc;

use kentix_api::ServerState;
use kentix_core::{AssetMapping, ConfigStore, Configuration, StoreError, StoreResult};
use kentix_storage::MemoryConfigStore;

/// Server state over a fresh in-memory store.
pub fn create_test_server_state() -> (ServerState, Arc<MemoryConfigStore>) {
    let store = Arc::new(MemoryConfigStore::new());
    (ServerState::new(store.clone()), store)
}

/// Server state whose store fails every call.
pub fn create_failing_server_state() -> ServerState {
    ServerState::new(Arc::new(FailingStore))
}

pub fn sample_config() -> Configuration {
    Configuration::new("http://10.0.0.5", "secret")
        .with_refresh_interval(30)
        .with_projects(["1", "2"])
}

struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Backend("database unavailable".to_string()))
}

impl ConfigStore for FailingStore {
    fn list_configurations(&self) -> StoreResult<Vec<Configuration>> {
        unavailable()
    }

    fn get_configuration(&self, _id: i64) -> StoreResult<Option<Configuration>> {
        unavailable()
    }

    fn insert_configuration(&self, _config: Configuration) -> StoreResult<Configuration> {
        unavailable()
    }

    fn update_configuration(&self, _config: &Configuration) -> StoreResult<bool> {
        unavailable()
    }

    fn update_configuration_active_state(&self, _id: i64, _active: bool) -> StoreResult<u64> {
        unavailable()
    }

    fn update_all_configurations_active_state(&self, _active: bool) -> StoreResult<u64> {
        unavailable()
    }

    fn find_asset_mapping(
        &self,
        _configuration_id: i64,
        _project_id: &str,
        _serial_number: &str,
    ) -> StoreResult<Option<AssetMapping>> {
        unavailable()
    }

    fn insert_asset_mapping(&self, _mapping: AssetMapping) -> StoreResult<AssetMapping> {
        unavailable()
    }

    fn list_asset_mappings(&self, _configuration_id: i64) -> StoreResult<Vec<AssetMapping>> {
        unavailable()
    }
}
