//! Persistent store abstraction for configurations and asset mappings.
//!
//! Implementations live in `kentix-storage`. The trait is synchronous;
//! callers share it as `Arc<dyn ConfigStore>`.

use crate::asset::AssetMapping;
use crate::configuration::Configuration;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Backend (database, I/O) error.
    #[error("Storage error: {0}")]
    Backend(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A row with the same key already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Row not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Create/read/update access to configurations and device→asset mappings.
///
/// Rows are never deleted through this interface.
pub trait ConfigStore: Send + Sync {
    /// All configurations, ordered by identifier.
    fn list_configurations(&self) -> StoreResult<Vec<Configuration>>;

    fn get_configuration(&self, id: i64) -> StoreResult<Option<Configuration>>;

    /// Insert a configuration. An identifier is assigned when `config.id`
    /// is `None`; an explicit identifier that already exists is a conflict.
    fn insert_configuration(&self, config: Configuration) -> StoreResult<Configuration>;

    /// Replace an existing configuration. The stored `active` flag is kept;
    /// only the scheduler changes it. Returns `false` if the id is unknown.
    fn update_configuration(&self, config: &Configuration) -> StoreResult<bool>;

    /// Set the active flag of one configuration, returning the affected row count.
    fn update_configuration_active_state(&self, id: i64, active: bool) -> StoreResult<u64>;

    /// Set the active flag of every configuration, returning the affected row count.
    fn update_all_configurations_active_state(&self, active: bool) -> StoreResult<u64>;

    fn find_asset_mapping(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial_number: &str,
    ) -> StoreResult<Option<AssetMapping>>;

    /// Insert a mapping unless one exists for the same triple.
    ///
    /// Returns the mapping that is stored afterwards: the given one, or the
    /// existing one if another writer got there first.
    fn insert_asset_mapping(&self, mapping: AssetMapping) -> StoreResult<AssetMapping>;

    /// Mappings owned by one configuration.
    fn list_asset_mappings(&self, configuration_id: i64) -> StoreResult<Vec<AssetMapping>>;
}
