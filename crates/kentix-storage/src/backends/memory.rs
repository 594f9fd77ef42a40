//! In-memory configuration store.

use std::collections::BTreeMap;

use kentix_core::{AssetMapping, ConfigStore, Configuration, StoreError, StoreResult};
use parking_lot::RwLock;

type MappingKey = (i64, String, String);

#[derive(Default)]
struct Tables {
    configurations: BTreeMap<i64, Configuration>,
    mappings: BTreeMap<MappingKey, i32>,
    last_id: i64,
}

/// Process-local [`ConfigStore`]. Contents are lost when dropped.
#[derive(Default)]
pub struct MemoryConfigStore {
    tables: RwLock<Tables>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn list_configurations(&self) -> StoreResult<Vec<Configuration>> {
        Ok(self.tables.read().configurations.values().cloned().collect())
    }

    fn get_configuration(&self, id: i64) -> StoreResult<Option<Configuration>> {
        Ok(self.tables.read().configurations.get(&id).cloned())
    }

    fn insert_configuration(&self, mut config: Configuration) -> StoreResult<Configuration> {
        let mut tables = self.tables.write();
        let id = match config.id {
            Some(id) if tables.configurations.contains_key(&id) => {
                return Err(StoreError::Conflict(format!(
                    "configuration {} already exists",
                    id
                )));
            }
            Some(id) => id,
            None => tables.last_id + 1,
        };
        tables.last_id = tables.last_id.max(id);
        config.id = Some(id);
        tables.configurations.insert(id, config.clone());
        Ok(config)
    }

    fn update_configuration(&self, config: &Configuration) -> StoreResult<bool> {
        let Some(id) = config.id else {
            return Ok(false);
        };
        let mut tables = self.tables.write();
        match tables.configurations.get_mut(&id) {
            Some(slot) => {
                let active = slot.active;
                *slot = config.clone();
                slot.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_configuration_active_state(&self, id: i64, active: bool) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        match tables.configurations.get_mut(&id) {
            Some(config) => {
                config.active = Some(active);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn update_all_configurations_active_state(&self, active: bool) -> StoreResult<u64> {
        let mut tables = self.tables.write();
        for config in tables.configurations.values_mut() {
            config.active = Some(active);
        }
        Ok(tables.configurations.len() as u64)
    }

    fn find_asset_mapping(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial_number: &str,
    ) -> StoreResult<Option<AssetMapping>> {
        let key = (
            configuration_id,
            project_id.to_string(),
            serial_number.to_string(),
        );
        Ok(self.tables.read().mappings.get(&key).map(|asset_id| {
            AssetMapping::new(configuration_id, project_id, serial_number, *asset_id)
        }))
    }

    fn insert_asset_mapping(&self, mapping: AssetMapping) -> StoreResult<AssetMapping> {
        let key = (
            mapping.configuration_id,
            mapping.project_id.clone(),
            mapping.serial_number.clone(),
        );
        let mut tables = self.tables.write();
        let asset_id = *tables.mappings.entry(key).or_insert(mapping.asset_id);
        Ok(AssetMapping {
            asset_id,
            ..mapping
        })
    }

    fn list_asset_mappings(&self, configuration_id: i64) -> StoreResult<Vec<AssetMapping>> {
        Ok(self
            .tables
            .read()
            .mappings
            .iter()
            .filter(|((config_id, _, _), _)| *config_id == configuration_id)
            .map(|((config_id, project_id, serial), asset_id)| {
                AssetMapping::new(*config_id, project_id.as_str(), serial.as_str(), *asset_id)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let store = MemoryConfigStore::new();
        let config = store
            .insert_configuration(Configuration::new("http://gw", "key"))
            .unwrap();
        assert_eq!(config.id, Some(1));
        assert_eq!(store.get_configuration(1).unwrap(), Some(config));
        assert!(store.get_configuration(2).unwrap().is_none());
    }

    #[test]
    fn test_active_flags() {
        let store = MemoryConfigStore::new();
        store
            .insert_configuration(Configuration::new("http://a", "k"))
            .unwrap();
        store
            .insert_configuration(Configuration::new("http://b", "k"))
            .unwrap();

        assert_eq!(store.update_configuration_active_state(2, true).unwrap(), 1);
        assert_eq!(store.update_configuration_active_state(3, true).unwrap(), 0);
        assert_eq!(store.update_all_configurations_active_state(false).unwrap(), 2);
        assert!(store
            .list_configurations()
            .unwrap()
            .iter()
            .all(|c| c.active == Some(false)));
    }

    #[test]
    fn test_mapping_insert_if_absent() {
        let store = MemoryConfigStore::new();
        let first = store
            .insert_asset_mapping(AssetMapping::new(1, "p", "SN", 5))
            .unwrap();
        let second = store
            .insert_asset_mapping(AssetMapping::new(1, "p", "SN", 6))
            .unwrap();
        assert_eq!(first.asset_id, 5);
        assert_eq!(second.asset_id, 5);
        assert_eq!(store.list_asset_mappings(1).unwrap().len(), 1);
    }
}
