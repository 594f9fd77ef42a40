//! Test doubles for the collection engine.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kentix_collector::{AssetPlatform, Collector, PlatformError, PollScheduler};
use kentix_core::{
    AssetMapping, AssetSpec, ConfigStore, Configuration, DataEnvelope, DeviceCategory, StoreError,
    StoreResult,
};
use kentix_devices::{DeviceClient, DeviceError, DeviceInfo, DeviceResult, DoorLock, SensorSnapshot};
use kentix_storage::MemoryConfigStore;
use tokio::sync::Semaphore;

/// Memory store that counts active-flag writes per configuration.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryConfigStore,
    active_writes: Mutex<HashMap<i64, usize>>,
    pub fail_list: AtomicBool,
    pub fail_active_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn active_writes(&self, id: i64) -> usize {
        self.active_writes.lock().unwrap().get(&id).copied().unwrap_or(0)
    }
}

impl ConfigStore for CountingStore {
    fn list_configurations(&self) -> StoreResult<Vec<Configuration>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store offline".to_string()));
        }
        self.inner.list_configurations()
    }

    fn get_configuration(&self, id: i64) -> StoreResult<Option<Configuration>> {
        self.inner.get_configuration(id)
    }

    fn insert_configuration(&self, config: Configuration) -> StoreResult<Configuration> {
        self.inner.insert_configuration(config)
    }

    fn update_configuration(&self, config: &Configuration) -> StoreResult<bool> {
        self.inner.update_configuration(config)
    }

    fn update_configuration_active_state(&self, id: i64, active: bool) -> StoreResult<u64> {
        *self.active_writes.lock().unwrap().entry(id).or_default() += 1;
        if self.fail_active_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write rejected".to_string()));
        }
        self.inner.update_configuration_active_state(id, active)
    }

    fn update_all_configurations_active_state(&self, active: bool) -> StoreResult<u64> {
        self.inner.update_all_configurations_active_state(active)
    }

    fn find_asset_mapping(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial_number: &str,
    ) -> StoreResult<Option<AssetMapping>> {
        self.inner
            .find_asset_mapping(configuration_id, project_id, serial_number)
    }

    fn insert_asset_mapping(&self, mapping: AssetMapping) -> StoreResult<AssetMapping> {
        self.inner.insert_asset_mapping(mapping)
    }

    fn list_asset_mappings(&self, configuration_id: i64) -> StoreResult<Vec<AssetMapping>> {
        self.inner.list_asset_mappings(configuration_id)
    }
}

/// Canned gateway. Counts every fetch; can be gated to hold a cycle open.
pub struct FakeDevices {
    pub type_code: i64,
    pub category: Option<DeviceCategory>,
    pub locks: Vec<DoorLock>,
    pub snapshot: SensorSnapshot,
    pub serial: String,
    /// Gateway addresses that answer every request with 503.
    pub unreachable: Vec<String>,
    pub info_calls: AtomicUsize,
    pub category_calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl FakeDevices {
    pub fn new(category: DeviceCategory) -> Self {
        let type_code = match category {
            DeviceCategory::AccessPoint => 1,
            DeviceCategory::AlarmManager => 8,
            DeviceCategory::MultiSensor => 110,
        };
        Self {
            type_code,
            category: Some(category),
            locks: Vec::new(),
            snapshot: SensorSnapshot::default(),
            serial: "GW-1".to_string(),
            unreachable: Vec::new(),
            info_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// A gateway reporting a type code nobody knows.
    pub fn unknown(type_code: i64) -> Self {
        Self {
            type_code,
            category: None,
            ..Self::new(DeviceCategory::AlarmManager)
        }
    }

    pub fn with_locks(mut self, locks: Vec<DoorLock>) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_snapshot(mut self, snapshot: SensorSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_serial(mut self, serial: &str) -> Self {
        self.serial = serial.to_string();
        self
    }

    pub fn with_unreachable(mut self, address: &str) -> Self {
        self.unreachable.push(address.to_string());
        self
    }

    /// Block `fetch_device_info` until permits are added to the returned gate.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceClient for FakeDevices {
    async fn fetch_device_info(&self, config: &Configuration) -> DeviceResult<DeviceInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.map(|permit| permit.forget()).ok();
        }

        let url = format!("{}/api/info", config.address);
        if self.unreachable.contains(&config.address) {
            return Err(DeviceError::Status { url, status: 503 });
        }
        let category = self.category.ok_or(DeviceError::UnrecognizedDeviceType {
            code: self.type_code,
            url,
        })?;
        Ok(DeviceInfo {
            name: "Gateway".to_string(),
            ip_address: "10.0.0.10".to_string(),
            mac_address: "00:11:22:33:44:55".to_string(),
            type_code: self.type_code,
            serial: self.serial.clone(),
            firmware_version: "1.0".to_string(),
            category,
        })
    }

    async fn fetch_access_point_readings(
        &self,
        _config: &Configuration,
    ) -> DeviceResult<Vec<DoorLock>> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.locks.clone())
    }

    async fn fetch_multi_sensor_readings(
        &self,
        _config: &Configuration,
    ) -> DeviceResult<SensorSnapshot> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

/// Platform double handing out sequential asset ids.
#[derive(Default)]
pub struct FakePlatform {
    last_id: AtomicI32,
    pub specs: Mutex<Vec<AssetSpec>>,
    pub envelopes: Mutex<Vec<DataEnvelope>>,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn creations(&self) -> usize {
        self.specs.lock().unwrap().len()
    }

    pub fn envelope_count(&self) -> usize {
        self.envelopes.lock().unwrap().len()
    }
}

#[async_trait]
impl AssetPlatform for FakePlatform {
    async fn upsert_asset(&self, spec: &AssetSpec) -> Result<Option<i32>, PlatformError> {
        self.specs.lock().unwrap().push(spec.clone());
        Ok(Some(self.last_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn upsert_data(&self, envelope: &DataEnvelope) -> Result<(), PlatformError> {
        self.envelopes.lock().unwrap().push(envelope.clone());
        Ok(())
    }
}

pub fn door_lock(id: i64, serial: &str) -> DoorLock {
    DoorLock {
        id,
        name: format!("Lock {}", id),
        serial: serial.to_string(),
        active: true,
        door_contact: 1,
    }
}

pub fn scheduler(
    store: Arc<CountingStore>,
    devices: Arc<FakeDevices>,
    platform: Arc<FakePlatform>,
) -> PollScheduler {
    let collector = Arc::new(Collector::new(store.clone(), devices, platform));
    PollScheduler::new(store, collector)
}

/// Yield to spawned tasks until `done` holds, failing after a bounded number of rounds.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub const LONG_REFRESH: Duration = Duration::from_secs(3600);
