//! Poll scheduler.
//!
//! Ticks on a fixed cadence independent of any configuration's refresh
//! interval. Each tick reconciles lifecycle flags and starts a cycle for
//! every enabled configuration that has none in flight. A cycle holds its
//! configuration's slot through the refresh delay that follows it, which is
//! what spaces consecutive cycles of one configuration.

use std::sync::Arc;
use std::time::Duration;

use kentix_core::config::defaults;
use kentix_core::{ConfigStore, Configuration};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::cycle::Collector;
use crate::error::CollectorError;
use crate::lifecycle::LifecycleManager;
use crate::running::{CycleGuard, RunningCycles};

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Cycles started.
    pub started: usize,
    /// Enabled configurations skipped because a cycle is in flight.
    pub already_running: usize,
    /// Disabled configurations.
    pub disabled: usize,
}

/// Drives collection cycles for all stored configurations.
pub struct PollScheduler {
    store: Arc<dyn ConfigStore>,
    lifecycle: LifecycleManager,
    collector: Arc<Collector>,
    running: RunningCycles,
    config: SchedulerConfig,
}

impl PollScheduler {
    pub fn new(store: Arc<dyn ConfigStore>, collector: Arc<Collector>) -> Self {
        Self {
            lifecycle: LifecycleManager::new(store.clone()),
            store,
            collector,
            running: RunningCycles::new(),
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    /// Configurations with a cycle or refresh delay in flight.
    pub fn running(&self) -> &RunningCycles {
        &self.running
    }

    /// Run one scheduling pass.
    ///
    /// Must be called from within a tokio runtime; cycles are spawned and
    /// not awaited. Only a failure to load configurations is returned.
    pub fn run_tick(&self) -> Result<TickReport, CollectorError> {
        let configs = self
            .store
            .list_configurations()
            .map_err(CollectorError::ConfigLoad)?;

        let mut report = TickReport::default();
        for config in configs {
            let Some(config_id) = config.id else {
                warn!(address = %config.address, "Skipping configuration without identifier");
                continue;
            };

            if !self.lifecycle.reconcile(config_id, &config).is_enabled() {
                report.disabled += 1;
                continue;
            }

            match self.running.try_acquire(config_id) {
                Some(guard) => {
                    self.spawn_cycle(guard, config);
                    report.started += 1;
                }
                None => report.already_running += 1,
            }
        }

        Ok(report)
    }

    fn spawn_cycle(&self, guard: CycleGuard, config: Configuration) {
        let collector = self.collector.clone();
        tokio::spawn(async move {
            let config_id = guard.id();
            debug!(config_id, "Collection cycle started");

            match collector.collect(config_id, &config).await {
                Ok(report) => info!(
                    config_id,
                    category = ?report.category,
                    assets = report.assets_resolved,
                    forwarded = report.envelopes_forwarded,
                    failures = report.failures,
                    "Collection cycle finished"
                ),
                Err(e) => error!(config_id, error = %e, "Collection cycle failed"),
            }

            tokio::time::sleep(config.refresh_interval()).await;
            drop(guard);
        });
    }

    /// Tick until `shutdown` turns true or its sender is dropped.
    ///
    /// In-flight cycles are not cancelled.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval =
            tokio::time::interval(Duration::from_millis(self.config.tick_interval_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(tick_ms = self.config.tick_interval_ms, "Poll scheduler started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_tick() {
                        Ok(report) if report.started > 0 => debug!(
                            started = report.started,
                            already_running = report.already_running,
                            disabled = report.disabled,
                            "Tick"
                        ),
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Tick aborted"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!(in_flight = self.running.len(), "Poll scheduler stopped");
    }
}
