//! Redb configuration store.
//!
//! Configurations are stored as JSON keyed by identifier. Asset mappings use
//! the (configuration, project, serial) triple as the key, so the table
//! itself enforces one asset per device.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::redb::{Database, ReadableTable, TableDefinition};
use kentix_core::{AssetMapping, ConfigStore, Configuration, StoreResult};

use crate::error::{Error, Result};

// Configurations table: key = configuration id, value = Configuration (JSON)
const CONFIGURATIONS_TABLE: TableDefinition<i64, &str> = TableDefinition::new("configurations");

// Asset mappings table: key = (configuration id, project id, serial number), value = asset id
const ASSET_MAPPINGS_TABLE: TableDefinition<(i64, &str, &str), i32> =
    TableDefinition::new("asset_mappings");

// Counters table: key = counter name, value = last issued value
const META_TABLE: TableDefinition<&str, i64> = TableDefinition::new("meta");

const CONFIGURATION_SEQ: &str = "configuration_seq";

/// Persistent [`ConfigStore`] backed by a single redb file.
pub struct RedbConfigStore {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbConfigStore {
    /// Open or create a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Arc<Self>> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(path)?;

        // Create tables up front so read transactions never miss them
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CONFIGURATIONS_TABLE)?;
            let _ = write_txn.open_table(ASSET_MAPPINGS_TABLE)?;
            let _ = write_txn.open_table(META_TABLE)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened configuration store");

        Ok(Arc::new(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        }))
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_configurations(&self) -> Result<Vec<Configuration>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIGURATIONS_TABLE)?;

        let mut configs = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            configs.push(serde_json::from_str(value.value())?);
        }
        Ok(configs)
    }

    fn load_configuration(&self, id: i64) -> Result<Option<Configuration>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONFIGURATIONS_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    fn store_new_configuration(&self, mut config: Configuration) -> Result<Configuration> {
        let write_txn = self.db.begin_write()?;
        {
            let mut meta = write_txn.open_table(META_TABLE)?;
            let mut table = write_txn.open_table(CONFIGURATIONS_TABLE)?;

            let seq = meta.get(CONFIGURATION_SEQ)?.map(|v| v.value()).unwrap_or(0);
            let id = match config.id {
                Some(id) => {
                    if table.get(id)?.is_some() {
                        return Err(Error::Conflict(format!("configuration {} already exists", id)));
                    }
                    id
                }
                None => seq + 1,
            };

            meta.insert(CONFIGURATION_SEQ, seq.max(id))?;
            config.id = Some(id);
            let json = serde_json::to_string(&config)?;
            table.insert(id, json.as_str())?;
        }
        write_txn.commit()?;

        Ok(config)
    }

    fn replace_configuration(&self, config: &Configuration) -> Result<bool> {
        let Some(id) = config.id else {
            return Ok(false);
        };

        let write_txn = self.db.begin_write()?;
        let replaced = {
            let mut table = write_txn.open_table(CONFIGURATIONS_TABLE)?;
            let stored: Option<Configuration> = match table.get(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            match stored {
                None => false,
                Some(stored) => {
                    // The run state belongs to the scheduler.
                    let mut row = config.clone();
                    row.active = stored.active;
                    let json = serde_json::to_string(&row)?;
                    table.insert(id, json.as_str())?;
                    true
                }
            }
        };
        write_txn.commit()?;

        Ok(replaced)
    }

    /// Rewrite the active flag of the selected rows. `None` selects all rows.
    fn write_active_flag(&self, id: Option<i64>, active: bool) -> Result<u64> {
        let write_txn = self.db.begin_write()?;
        let affected = {
            let mut table = write_txn.open_table(CONFIGURATIONS_TABLE)?;

            let rows: Vec<(i64, String)> = match id {
                Some(id) => table
                    .get(id)?
                    .map(|v| vec![(id, v.value().to_string())])
                    .unwrap_or_default(),
                None => {
                    let mut rows = Vec::new();
                    for result in table.iter()? {
                        let (key, value) = result?;
                        rows.push((key.value(), value.value().to_string()));
                    }
                    rows
                }
            };

            for (key, json) in &rows {
                let mut config: Configuration = serde_json::from_str(json)?;
                config.active = Some(active);
                let json = serde_json::to_string(&config)?;
                table.insert(*key, json.as_str())?;
            }
            rows.len() as u64
        };
        write_txn.commit()?;

        Ok(affected)
    }

    fn lookup_mapping(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial_number: &str,
    ) -> Result<Option<AssetMapping>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ASSET_MAPPINGS_TABLE)?;

        let asset_id = table
            .get((configuration_id, project_id, serial_number))?
            .map(|v| v.value());
        Ok(asset_id.map(|asset_id| {
            AssetMapping::new(configuration_id, project_id, serial_number, asset_id)
        }))
    }

    fn store_mapping_if_absent(&self, mapping: AssetMapping) -> Result<AssetMapping> {
        let write_txn = self.db.begin_write()?;
        let stored = {
            let mut table = write_txn.open_table(ASSET_MAPPINGS_TABLE)?;
            let key = (
                mapping.configuration_id,
                mapping.project_id.as_str(),
                mapping.serial_number.as_str(),
            );

            let existing = table.get(key)?.map(|v| v.value());
            match existing {
                Some(asset_id) => AssetMapping {
                    asset_id,
                    ..mapping
                },
                None => {
                    table.insert(key, mapping.asset_id)?;
                    mapping
                }
            }
        };
        write_txn.commit()?;

        Ok(stored)
    }

    fn load_mappings(&self, configuration_id: i64) -> Result<Vec<AssetMapping>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ASSET_MAPPINGS_TABLE)?;

        let mut mappings = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            let (config_id, project_id, serial_number) = key.value();
            if config_id == configuration_id {
                mappings.push(AssetMapping::new(
                    config_id,
                    project_id,
                    serial_number,
                    value.value(),
                ));
            }
        }
        Ok(mappings)
    }
}

impl ConfigStore for RedbConfigStore {
    fn list_configurations(&self) -> StoreResult<Vec<Configuration>> {
        Ok(self.load_configurations()?)
    }

    fn get_configuration(&self, id: i64) -> StoreResult<Option<Configuration>> {
        Ok(self.load_configuration(id)?)
    }

    fn insert_configuration(&self, config: Configuration) -> StoreResult<Configuration> {
        Ok(self.store_new_configuration(config)?)
    }

    fn update_configuration(&self, config: &Configuration) -> StoreResult<bool> {
        Ok(self.replace_configuration(config)?)
    }

    fn update_configuration_active_state(&self, id: i64, active: bool) -> StoreResult<u64> {
        Ok(self.write_active_flag(Some(id), active)?)
    }

    fn update_all_configurations_active_state(&self, active: bool) -> StoreResult<u64> {
        Ok(self.write_active_flag(None, active)?)
    }

    fn find_asset_mapping(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial_number: &str,
    ) -> StoreResult<Option<AssetMapping>> {
        Ok(self.lookup_mapping(configuration_id, project_id, serial_number)?)
    }

    fn insert_asset_mapping(&self, mapping: AssetMapping) -> StoreResult<AssetMapping> {
        Ok(self.store_mapping_if_absent(mapping)?)
    }

    fn list_asset_mappings(&self, configuration_id: i64) -> StoreResult<Vec<AssetMapping>> {
        Ok(self.load_mappings(configuration_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kentix_core::StoreError;

    fn create_test_store() -> (tempfile::TempDir, Arc<RedbConfigStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbConfigStore::open(dir.path().join("kentix.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let (_dir, store) = create_test_store();

        let first = store
            .insert_configuration(Configuration::new("http://gw-1", "k1"))
            .unwrap();
        let second = store
            .insert_configuration(Configuration::new("http://gw-2", "k2"))
            .unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        let all = store.list_configurations().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].address, "http://gw-1");
        assert_eq!(all[1].api_key, "k2");
    }

    #[test]
    fn test_explicit_id_conflict() {
        let (_dir, store) = create_test_store();

        let mut config = Configuration::new("http://gw", "key");
        config.id = Some(5);
        store.insert_configuration(config.clone()).unwrap();

        let err = store.insert_configuration(config).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Next generated id continues after the explicit one
        let next = store
            .insert_configuration(Configuration::new("http://gw-2", "key"))
            .unwrap();
        assert_eq!(next.id, Some(6));
    }

    #[test]
    fn test_update_configuration() {
        let (_dir, store) = create_test_store();

        let mut config = store
            .insert_configuration(Configuration::new("http://gw", "key"))
            .unwrap();
        config.refresh_interval = 15;
        assert!(store.update_configuration(&config).unwrap());

        let loaded = store.get_configuration(1).unwrap().unwrap();
        assert_eq!(loaded.refresh_interval, 15);

        let mut unknown = config.clone();
        unknown.id = Some(99);
        assert!(!store.update_configuration(&unknown).unwrap());
        assert!(store.get_configuration(99).unwrap().is_none());
    }

    #[test]
    fn test_active_state_updates() {
        let (_dir, store) = create_test_store();

        store
            .insert_configuration(Configuration::new("http://gw-1", "k"))
            .unwrap();
        store
            .insert_configuration(Configuration::new("http://gw-2", "k").with_active(true))
            .unwrap();

        assert_eq!(store.update_configuration_active_state(1, false).unwrap(), 1);
        assert_eq!(store.update_configuration_active_state(42, false).unwrap(), 0);
        assert_eq!(store.get_configuration(1).unwrap().unwrap().active, Some(false));

        assert_eq!(store.update_all_configurations_active_state(false).unwrap(), 2);
        for config in store.list_configurations().unwrap() {
            assert_eq!(config.active, Some(false));
        }
    }

    #[test]
    fn test_asset_mapping_first_writer_wins() {
        let (_dir, store) = create_test_store();

        let stored = store
            .insert_asset_mapping(AssetMapping::new(1, "p1", "SN-1", 10))
            .unwrap();
        assert_eq!(stored.asset_id, 10);

        let stored = store
            .insert_asset_mapping(AssetMapping::new(1, "p1", "SN-1", 11))
            .unwrap();
        assert_eq!(stored.asset_id, 10);

        let found = store.find_asset_mapping(1, "p1", "SN-1").unwrap().unwrap();
        assert_eq!(found.asset_id, 10);
        assert!(store.find_asset_mapping(1, "p2", "SN-1").unwrap().is_none());
    }

    #[test]
    fn test_list_asset_mappings_by_configuration() {
        let (_dir, store) = create_test_store();

        store.insert_asset_mapping(AssetMapping::new(1, "p1", "A", 1)).unwrap();
        store.insert_asset_mapping(AssetMapping::new(1, "p2", "A", 2)).unwrap();
        store.insert_asset_mapping(AssetMapping::new(2, "p1", "A", 3)).unwrap();

        let mappings = store.list_asset_mappings(1).unwrap();
        assert_eq!(mappings.len(), 2);
        assert!(mappings.iter().all(|m| m.configuration_id == 1));
        assert_eq!(store.list_asset_mappings(3).unwrap().len(), 0);
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kentix.redb");

        {
            let store = RedbConfigStore::open(&path).unwrap();
            store
                .insert_configuration(Configuration::new("http://gw", "key").with_projects(["1"]))
                .unwrap();
            store
                .insert_asset_mapping(AssetMapping::new(1, "1", "SN", 7))
                .unwrap();
        }

        let store = RedbConfigStore::open(&path).unwrap();
        let config = store.get_configuration(1).unwrap().unwrap();
        assert_eq!(config.project_ids(), ["1".to_string()]);
        assert_eq!(store.find_asset_mapping(1, "1", "SN").unwrap().unwrap().asset_id, 7);
        assert_eq!(store.path(), path.as_path());
    }
}
