//! Enabled/active lifecycle of configurations.
//!
//! The lifecycle manager is the only writer of the `active` flag. The
//! scheduler asks it to reconcile every configuration once per tick.

use std::sync::Arc;

use kentix_core::{ConfigState, ConfigStore, Configuration};
use tracing::{error, info};

use crate::error::CollectorError;

/// Flag write required to bring a configuration in line with its intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to write.
    Keep,
    /// Enabled but not yet marked active.
    Activate,
    /// Disabled while still marked active.
    Deactivate,
}

impl Transition {
    pub fn for_config(config: &Configuration) -> Self {
        match (config.is_enabled(), config.is_active()) {
            (true, false) => Self::Activate,
            (false, true) => Self::Deactivate,
            _ => Self::Keep,
        }
    }
}

/// Reads and writes the enabled/active state of stored configurations.
#[derive(Clone)]
pub struct LifecycleManager {
    store: Arc<dyn ConfigStore>,
}

impl LifecycleManager {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub fn is_enabled(&self, config: &Configuration) -> bool {
        config.is_enabled()
    }

    pub fn is_active(&self, config: &Configuration) -> bool {
        config.is_active()
    }

    /// Set the active flag of one configuration. Returns the affected row count.
    pub fn set_active_state(&self, config_id: i64, active: bool) -> Result<u64, CollectorError> {
        self.store
            .update_configuration_active_state(config_id, active)
            .map_err(|source| CollectorError::LifecycleWrite { config_id, source })
    }

    /// Mark every configuration inactive. Called once at shutdown.
    pub fn deactivate_all(&self) -> Result<u64, CollectorError> {
        self.store
            .update_all_configurations_active_state(false)
            .map_err(CollectorError::DeactivateAll)
    }

    /// Apply this tick's transition for a configuration.
    ///
    /// Returns the state the scheduler acts on. A failed flag write is
    /// logged and does not change the decision: an enabled configuration is
    /// still collected.
    pub fn reconcile(&self, config_id: i64, config: &Configuration) -> ConfigState {
        match Transition::for_config(config) {
            Transition::Keep => {}
            Transition::Deactivate => match self.set_active_state(config_id, false) {
                Ok(_) => info!(config_id, "Configuration disabled, collection stopped"),
                Err(e) => error!(config_id, error = %e, "Failed to deactivate configuration"),
            },
            Transition::Activate => match self.set_active_state(config_id, true) {
                Ok(_) => info!(
                    config_id,
                    config = ?config,
                    "Configuration enabled, collection started"
                ),
                Err(e) => error!(config_id, error = %e, "Failed to activate configuration"),
            },
        }

        if config.is_enabled() {
            ConfigState::EnabledActive
        } else {
            ConfigState::Disabled
        }
    }
}
