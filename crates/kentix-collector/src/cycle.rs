//! One collection cycle for one configuration.
//!
//! Fetch, resolve and forward run strictly in that order. Gateway fetch
//! failures end the cycle; resolution and forwarding failures are counted,
//! logged and skipped so the remaining devices are still served.

use std::sync::Arc;

use kentix_core::device::DOORLOCK_ASSET_TYPE;
use kentix_core::{ConfigStore, Configuration, DataSubtype, DeviceCategory};
use kentix_devices::{DeviceClient, DeviceInfo, DoorLock};
use tracing::{debug, error, warn};

use crate::error::CollectorError;
use crate::platform::AssetPlatform;
use crate::resolver::{AssetDisplay, AssetResolver};
use crate::telemetry::{self, Payload, TelemetryForwarder};

/// Outcome counters of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Category of the polled gateway.
    pub category: Option<DeviceCategory>,
    /// Assets resolved (cached or created).
    pub assets_resolved: usize,
    /// Envelopes accepted by the platform.
    pub envelopes_forwarded: usize,
    /// Resolution and forwarding failures.
    pub failures: usize,
}

/// Runs collection cycles.
pub struct Collector {
    devices: Arc<dyn DeviceClient>,
    resolver: AssetResolver,
    forwarder: TelemetryForwarder,
}

impl Collector {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        devices: Arc<dyn DeviceClient>,
        platform: Arc<dyn AssetPlatform>,
    ) -> Self {
        Self {
            devices,
            resolver: AssetResolver::new(store, platform.clone()),
            forwarder: TelemetryForwarder::new(platform),
        }
    }

    /// Poll the gateway of a configuration and forward its readings.
    pub async fn collect(
        &self,
        config_id: i64,
        config: &Configuration,
    ) -> Result<CycleReport, CollectorError> {
        let mut report = CycleReport::default();

        let info = self
            .devices
            .fetch_device_info(config)
            .await
            .map_err(|source| CollectorError::DeviceFetch { config_id, source })?;
        report.category = Some(info.category);
        debug!(
            config_id,
            serial = %info.serial,
            category = %info.category,
            "Fetched device info"
        );

        let gateway_assets = self.forward_device_info(config_id, config, &info, &mut report).await;

        match info.category {
            DeviceCategory::AlarmManager => {}
            DeviceCategory::AccessPoint => {
                let locks = self
                    .devices
                    .fetch_access_point_readings(config)
                    .await
                    .map_err(|source| CollectorError::DeviceFetch { config_id, source })?;
                debug!(config_id, count = locks.len(), "Fetched door locks");
                for lock in &locks {
                    self.forward_door_lock(config_id, &gateway_assets, lock, &mut report)
                        .await;
                }
            }
            DeviceCategory::MultiSensor => {
                let snapshot = self
                    .devices
                    .fetch_multi_sensor_readings(config)
                    .await
                    .map_err(|source| CollectorError::DeviceFetch { config_id, source })?;
                let payload = telemetry::sensor_payload(&snapshot);
                for (_, asset_id) in &gateway_assets {
                    self.forward(config_id, DataSubtype::Input, *asset_id, payload.clone(), &mut report)
                        .await;
                }
            }
        }

        Ok(report)
    }

    /// Resolve the gateway in every project and forward its identity.
    ///
    /// Returns the (project, asset) pairs that resolved.
    async fn forward_device_info(
        &self,
        config_id: i64,
        config: &Configuration,
        info: &DeviceInfo,
        report: &mut CycleReport,
    ) -> Vec<(String, i32)> {
        if info.serial.trim().is_empty() {
            warn!(config_id, address = %config.address, "Skipping gateway without serial");
            return Vec::new();
        }

        let display = AssetDisplay {
            name: info.asset_name(),
            description: info.asset_description(),
            asset_type: info.category.asset_type().to_string(),
            parent_id: None,
        };

        let mut resolved = Vec::new();
        for project_id in config.project_ids() {
            let asset_id = match self
                .resolver
                .resolve_or_create(config_id, project_id, &info.serial, &display)
                .await
            {
                Ok(asset_id) => asset_id,
                Err(e) => {
                    error!(config_id, project_id = %project_id, error = %e, "Failed to resolve gateway asset");
                    report.failures += 1;
                    continue;
                }
            };
            report.assets_resolved += 1;

            self.forward(
                config_id,
                DataSubtype::Info,
                asset_id,
                telemetry::device_info_payload(info),
                report,
            )
            .await;
            resolved.push((project_id.clone(), asset_id));
        }
        resolved
    }

    async fn forward_door_lock(
        &self,
        config_id: i64,
        gateway_assets: &[(String, i32)],
        lock: &DoorLock,
        report: &mut CycleReport,
    ) {
        if lock.serial.trim().is_empty() {
            warn!(config_id, lock_id = lock.id, "Skipping door lock without serial");
            return;
        }

        for (project_id, gateway_asset) in gateway_assets {
            let display = AssetDisplay {
                name: lock.name.clone(),
                description: lock.asset_description(),
                asset_type: DOORLOCK_ASSET_TYPE.to_string(),
                parent_id: Some(*gateway_asset),
            };
            match self
                .resolver
                .resolve_or_create(config_id, project_id, &lock.serial, &display)
                .await
            {
                Ok(asset_id) => {
                    report.assets_resolved += 1;
                    self.forward(
                        config_id,
                        DataSubtype::Input,
                        asset_id,
                        telemetry::door_lock_payload(lock),
                        report,
                    )
                    .await;
                }
                Err(e) => {
                    error!(config_id, project_id = %project_id, serial = %lock.serial, error = %e, "Failed to resolve door lock asset");
                    report.failures += 1;
                }
            }
        }
    }

    async fn forward(
        &self,
        config_id: i64,
        subtype: DataSubtype,
        asset_id: i32,
        payload: Payload,
        report: &mut CycleReport,
    ) {
        match self.forwarder.forward(subtype, asset_id, payload).await {
            Ok(()) => report.envelopes_forwarded += 1,
            Err(e) => {
                error!(config_id, asset_id, error = %e, "Failed to forward telemetry");
                report.failures += 1;
            }
        }
    }
}
