//! Connection profiles for Kentix gateways.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// A tenant's connection profile for one gateway.
///
/// `enable` and `active` are stored as optional flags: an absent flag reads
/// as `true`. Use [`Configuration::state`] rather than the raw flags.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Assigned by the store on insert, immutable afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Base URL of the gateway.
    pub address: String,
    /// Key sent as `Authorization: Basic <key>`.
    pub api_key: String,
    /// Operator intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    /// Seconds between the end of one cycle and the start of the next.
    pub refresh_interval: u64,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Set while this process polls the configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Projects the gateway's assets are created in.
    #[serde(rename = "projectIDs", default, skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,
}

impl Configuration {
    /// Create an enabled configuration for a gateway address.
    pub fn new(address: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            api_key: api_key.into(),
            refresh_interval: 60,
            ..Default::default()
        }
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = Some(enable);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval = secs;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout = Some(secs);
        self
    }

    pub fn with_projects<I, S>(mut self, projects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_ids = Some(projects.into_iter().map(Into::into).collect());
        self
    }

    /// True unless the enable flag is explicitly `false`.
    pub fn is_enabled(&self) -> bool {
        self.enable.unwrap_or(true)
    }

    /// True unless the active flag is explicitly `false`.
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    /// Project identifiers; an absent list is empty.
    pub fn project_ids(&self) -> &[String] {
        self.project_ids.as_deref().unwrap_or(&[])
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout
                .unwrap_or(defaults::REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    /// Lifecycle state derived from the stored flags.
    pub fn state(&self) -> ConfigState {
        ConfigState::from_flags(self.is_enabled(), self.is_active())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("api_key", &"<redacted>")
            .field("enable", &self.enable)
            .field("refresh_interval", &self.refresh_interval)
            .field("request_timeout", &self.request_timeout)
            .field("active", &self.active)
            .field("project_ids", &self.project_ids)
            .finish()
    }
}

/// Lifecycle state of a configuration.
///
/// A disabled configuration has no active/inactive distinction: a stale
/// active flag on a disabled row is reset by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigState {
    Disabled,
    EnabledInactive,
    EnabledActive,
}

impl ConfigState {
    pub fn from_flags(enabled: bool, active: bool) -> Self {
        match (enabled, active) {
            (false, _) => Self::Disabled,
            (true, false) => Self::EnabledInactive,
            (true, true) => Self::EnabledActive,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Display for ConfigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::EnabledInactive => write!(f, "enabled-inactive"),
            Self::EnabledActive => write!(f, "enabled-active"),
        }
    }
}
